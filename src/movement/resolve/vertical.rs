//! Gravity, one-way classification, and the ground and ceiling resolvers.

use bevy::log::debug;
use bevy::math::Vec2;

use crate::environment::{CategoryMask, Hit, PlatformId, ProbeDirection, ProbeRay, SurfaceCategory};
use crate::movement::{Action, MovementEvent, PassThrough};

use super::{Tick, count_down, spread};

/// Detect wall contact, then integrate gravity for an airborne character.
///
/// Wall detection must see the horizontal velocity before gravity changes anything.
pub(crate) fn apply_gravity(tick: &mut Tick<'_>) {
    let tuning = tick.tuning;
    let state = &mut *tick.state;

    let was_walled = state.jump.walled;
    state.jump.walled = tuning.wall_jumping
        && !state.jump.grounded
        && state.input_axis != 0.0
        && state.velocity.x == 0.0
        && state.velocity.y < 0.0;

    if state.jump.walled {
        state.jump.refill(tuning);
    }

    if !state.jump.grounded {
        let terminal = if state.jump.walled {
            tuning.max_fall_speed / tuning.wall_friction
        } else {
            tuning.max_fall_speed
        };
        state.velocity.y = (state.velocity.y - tuning.gravity * tick.dt).max(-terminal);
    }

    if state.jump.walled && !was_walled {
        tick.emit(MovementEvent::Walled);
    }
}

/// Track the one-way platform the lower body currently overlaps.
///
/// Two short probes from the box centre only reach a platform the character is inside of.
/// That platform is excluded from ground probes, so one-way platforms only hold a character
/// that comes down onto them from above.
pub(crate) fn classify_one_way(tick: &mut Tick<'_>) {
    let tuning = tick.tuning;
    let position = tick.state.position;
    let length = tuning.height() * tuning.tunables.one_way_probe_factor;

    let mut found = None;
    for x in [position.x - tuning.half_width, position.x + tuning.half_width] {
        let ray = ProbeRay::new(
            Vec2::new(x, position.y),
            ProbeDirection::Down,
            length,
            CategoryMask::ONE_WAY,
        );
        let hit = tick.probe(ray, &[]);
        if found.is_none() {
            found = hit.and_then(one_way_platform);
        }
    }

    let previous = tick.state.one_way_platform;
    if found != previous {
        if let Some(old) = previous {
            debug!("one-way platform {:?} released", old);
        }
        tick.state.one_way_platform = found;
        tick.emit(MovementEvent::OneWayClassified(found));
    }
}

fn one_way_platform(hit: Hit) -> Option<PlatformId> {
    match hit.category {
        SurfaceCategory::OneWay => Some(hit.platform),
        SurfaceCategory::Solid | SurfaceCategory::Wall => None,
    }
}

/// Establish the lower bound, landing and leaving transitions, and the jump-down request.
pub(crate) fn resolve_ground(tick: &mut Tick<'_>) {
    let tuning = tick.tuning;
    let tunables = tuning.tunables;
    let position = tick.state.position;
    let exclude: Vec<PlatformId> = tick.state.one_way_platform.into_iter().collect();
    let counts = tick.state.velocity.y <= 0.0 && !tick.state.jump.passing_through();

    let inset = tuning.half_width - tuning.skin_width;
    let mut heights = Vec::with_capacity(tuning.probes.ground);
    let mut underfoot_one_way = None;

    for x in spread(position.x - inset, position.x + inset, tuning.probes.ground) {
        // Probes start at the centre so a corner already sunk into an incline still finds it.
        let ray = ProbeRay::new(
            Vec2::new(x, position.y),
            ProbeDirection::Down,
            tuning.gravity,
            CategoryMask::GROUND,
        );
        let hit = tick.probe(ray, &exclude).filter(|hit| match hit.category {
            SurfaceCategory::Solid | SurfaceCategory::OneWay => true,
            SurfaceCategory::Wall => false,
        });
        if underfoot_one_way.is_none() {
            underfoot_one_way = hit.and_then(one_way_platform);
        }
        heights.push(hit.filter(|_| counts).map(|hit| tick.round(hit.point.y)));
    }

    tick.state.contacts.ground_left = heights.first().copied().flatten();
    tick.state.contacts.ground_right = heights.last().copied().flatten();

    // The higher contact wins, which is what holds a character up on a slope.
    let support = heights.iter().flatten().copied().reduce(f32::max);
    let min_y = support.map_or(f32::NEG_INFINITY, |top| tick.round(top + tuning.half_height));
    tick.state.bounds.min_y = min_y;
    tick.state.position.y = tick.state.position.y.max(min_y);

    let gap = (tick.state.position.y - min_y).abs();
    if !tick.state.jump.grounded {
        let tolerance = tunables.landing_tolerance
            + tick
                .state
                .contacts
                .ground_disagreement()
                .min(tunables.slope_tolerance_cap);
        // Requiring a downward velocity keeps a fresh jump from landing on the spot.
        if gap <= tolerance && tick.state.velocity.y <= 0.0 {
            let state = &mut *tick.state;
            state.velocity.y = 0.0;
            state.position.y = min_y;
            state.jump.refill(tuning);
            state.jump.grounded = true;
            state.jump.variable_height = false;
            tick.emit(MovementEvent::Landed);
        }
    } else if gap > tunables.leave_ground_distance {
        tick.state.jump.grounded = false;
        tick.emit(MovementEvent::LeftGround);
    }

    let armed = underfoot_one_way.is_some()
        && tick.state.jump.grounded
        && tick.state.input_axis == 0.0
        && tick.input.is_held(Action::MoveDown);
    if armed {
        tick.jump_force = 0.0;
        tick.jump_down_platform = underfoot_one_way;
    } else {
        tick.jump_force = tuning.jump_force;
        tick.jump_down_platform = None;
    }

    tick_pass_through(tick);
}

fn tick_pass_through(tick: &mut Tick<'_>) {
    let dt = tick.dt;
    let Some(pass) = tick.state.jump.pass_through.as_mut() else {
        return;
    };
    if pass.remaining > 0.0 {
        pass.remaining = count_down(pass.remaining, dt);
    } else {
        tick.state.jump.pass_through = None;
        tick.emit(MovementEvent::PassThroughEnded);
    }
}

/// Start ignoring ground contacts so the character drops through `platform`.
pub(crate) fn start_pass_through(tick: &mut Tick<'_>, platform: PlatformId) {
    tick.state.jump.pass_through = Some(PassThrough {
        platform,
        remaining: tick.tuning.jump_down_time,
    });
    tick.state.jump.coyote_time = 0.0;
    tick.emit(MovementEvent::PassThroughStarted(platform));
}

/// Establish the upper bound, stop on head bumps, and keep slopes from wedging into ceilings.
pub(crate) fn resolve_ceiling(tick: &mut Tick<'_>) {
    let tuning = tick.tuning;
    let tunables = tuning.tunables;
    let position = tick.state.position;
    let inset = tuning.half_width - tuning.skin_width;
    let origin_y = position.y + tuning.height() * tunables.ceiling_probe_lift;
    let length = tick.jump_force;

    let mut heights = Vec::with_capacity(tuning.probes.ceiling);
    for x in spread(position.x - inset, position.x + inset, tuning.probes.ceiling) {
        let ray = ProbeRay::new(
            Vec2::new(x, origin_y),
            ProbeDirection::Up,
            length,
            CategoryMask::CEILING,
        );
        let hit = tick.probe(ray, &[]).filter(|hit| match hit.category {
            SurfaceCategory::Solid => true,
            SurfaceCategory::Wall | SurfaceCategory::OneWay => false,
        });
        heights.push(hit.map(|hit| tick.round(hit.point.y)));
    }

    tick.state.contacts.ceiling_left = heights.first().copied().flatten();
    tick.state.contacts.ceiling_right = heights.last().copied().flatten();

    let lowest = heights.iter().flatten().copied().reduce(f32::min);
    let min_y = tick.state.bounds.min_y;
    let max_y = lowest
        .map_or(f32::INFINITY, |bottom| tick.round(bottom - tuning.half_height))
        .max(min_y);
    tick.state.bounds.max_y = max_y;
    tick.state.position.y = tick.state.position.y.min(max_y);

    if (tick.state.position.y - max_y).abs() < tunables.head_bump_distance
        && tick.state.velocity.y > 0.0
    {
        tick.state.velocity.y = 0.0;
        tick.state.jump.variable_height = false;
        tick.emit(MovementEvent::HeadBump);
    }

    let axis = tick.state.input_axis;
    if tick.state.contacts.squished_towards(axis, tuning.height()) {
        tick.state.velocity.x = 0.0;
    }
}
