//! Horizontal intent and the wall clamp.

use bevy::log::trace;
use bevy::math::Vec2;

use crate::environment::{CategoryMask, ProbeDirection, ProbeRay, SurfaceCategory};
use crate::movement::{Action, MovementEvent};

use super::{Tick, move_towards, spread};

/// Ramp the input axis toward the held direction and derive horizontal velocity.
///
/// Pressing against the current motion snaps the axis to zero first; there is no reversal
/// ramp.
pub(crate) fn resolve_axis(tick: &mut Tick<'_>) {
    let tuning = tick.tuning;
    let axis = tick.state.input_axis;

    let axis = if tick.input.is_held(Action::MoveLeft) {
        if axis > 0.0 {
            0.0
        } else {
            move_towards(axis, -1.0, tuning.acceleration * tick.dt)
        }
    } else if tick.input.is_held(Action::MoveRight) {
        if axis < 0.0 {
            0.0
        } else {
            move_towards(axis, 1.0, tuning.acceleration * tick.dt)
        }
    } else {
        move_towards(axis, 0.0, tuning.deceleration() * tick.dt)
    };

    tick.state.input_axis = axis.clamp(-1.0, 1.0);
    tick.state.velocity.x = tuning.speed * tick.state.input_axis;
}

/// Whether ray `index` of `count` may bound a grounded character.
///
/// Grounded characters ignore the bottom ray so a low step can be climbed. When squished
/// between ceiling and ground the rule flips to ignoring the top ray instead.
fn accepts_ray(grounded: bool, squished: bool, invert: bool, index: usize, count: usize) -> bool {
    if !grounded {
        true
    } else if squished && invert {
        index < count - 1
    } else {
        index > 0
    }
}

/// Cast rays from the leading edge and bound the character against the nearest wall.
pub(crate) fn clamp_against_walls(tick: &mut Tick<'_>) {
    tick.state.bounds.min_x = f32::NEG_INFINITY;
    tick.state.bounds.max_x = f32::INFINITY;

    let Some(direction) = ProbeDirection::from_axis(tick.state.input_axis) else {
        return;
    };
    let sign = match direction {
        ProbeDirection::Right => 1.0,
        _ => -1.0,
    };

    let tuning = tick.tuning;
    let skin = tuning.skin_width;
    let count = tuning.probes.horizontal;
    let position = tick.state.position;
    let grounded = tick.state.jump.grounded;
    // Contacts from the previous tick; this tick's vertical probes have not run yet.
    let squished = tick.state.contacts.squished(tuning.height());
    let invert = tuning.tunables.invert_edge_rays_when_squished;

    let edge_x = position.x + sign * (tuning.half_width - skin);
    let bottom = position.y - tuning.half_height + skin;
    let top = position.y + tuning.half_height - skin;
    let mut length = tuning.speed;
    let mut blocked = false;

    for (index, y) in spread(bottom, top, count).enumerate() {
        let ray = ProbeRay::new(
            Vec2::new(edge_x, y),
            direction,
            length,
            CategoryMask::HORIZONTAL,
        );
        let Some(hit) = tick.probe(ray, &[]) else {
            continue;
        };
        match hit.category {
            SurfaceCategory::Solid | SurfaceCategory::Wall => {}
            SurfaceCategory::OneWay => continue,
        }
        if !accepts_ray(grounded, squished, invert, index, count) {
            trace!("wall ray {index} ignored (grounded={grounded}, squished={squished})");
            continue;
        }

        length = hit.distance + skin;
        let limit = tick.round(hit.point.x - sign * tuning.half_width);
        let bounds = &mut tick.state.bounds;
        match direction {
            ProbeDirection::Left => {
                bounds.min_x = limit;
                bounds.max_x = f32::INFINITY;
            }
            _ => {
                bounds.min_x = f32::NEG_INFINITY;
                bounds.max_x = limit;
            }
        }

        let x = tick.state.position.x;
        let reached = match direction {
            ProbeDirection::Left => x <= limit,
            _ => x >= limit,
        };
        if reached {
            // Snap now rather than waiting for integration, or this tick overshoots.
            tick.state.position.x = limit;
            tick.state.velocity.x = 0.0;
            blocked = true;
        }
    }

    if blocked {
        tick.emit(MovementEvent::WallBlocked);
    }
}

#[cfg(test)]
mod tests {
    use super::accepts_ray;

    #[test]
    fn test_airborne_accepts_every_ray() {
        for index in 0..5 {
            assert!(accepts_ray(false, false, true, index, 5));
            assert!(accepts_ray(false, true, true, index, 5));
        }
    }

    #[test]
    fn test_grounded_skips_bottom_ray() {
        assert!(!accepts_ray(true, false, true, 0, 5));
        assert!(accepts_ray(true, false, true, 4, 5));
    }

    #[test]
    fn test_squished_skips_top_ray_instead() {
        assert!(accepts_ray(true, true, true, 0, 5));
        assert!(!accepts_ray(true, true, true, 4, 5));
    }

    #[test]
    fn test_squished_inversion_can_be_disabled() {
        assert!(!accepts_ray(true, true, false, 0, 5));
        assert!(accepts_ray(true, true, false, 4, 5));
    }
}
