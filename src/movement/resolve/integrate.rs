//! Position integration and numeric sanitising.

use bevy::log::warn;
use bevy::math::Vec2;

use crate::movement::{Bounds, MovementEvent, MovementState, WorldClamp};

use super::Tick;

/// Intersect probe bounds with the world clamp. An empty intersection collapses onto the
/// lower limit.
fn effective_bounds(bounds: Bounds, clamp: Option<WorldClamp>) -> Bounds {
    let Some(world) = clamp else {
        return bounds;
    };
    let mut out = Bounds {
        min_x: bounds.min_x.max(world.min_x),
        max_x: bounds.max_x.min(world.max_x),
        min_y: bounds.min_y.max(world.min_y),
        max_y: bounds.max_y.min(world.max_y),
    };
    if out.min_x > out.max_x {
        out.max_x = out.min_x;
    }
    if out.min_y > out.max_y {
        out.max_y = out.min_y;
    }
    out
}

/// Apply this tick's velocity, then clamp into this tick's bounds.
///
/// `previous` is the state the tick started from; NaN bounds, positions or velocities fall
/// back to it instead of propagating.
pub(crate) fn integrate(tick: &mut Tick<'_>, previous: &MovementState) {
    let mut sanitized = sanitize_bounds(&mut tick.state.bounds, &previous.bounds);

    let dt = tick.dt;
    let state = &mut *tick.state;
    state.bounds = effective_bounds(state.bounds, tick.tuning.world_clamp);
    state.position += state.velocity * dt;
    state.position = state.bounds.clamp(state.position);
    if state.jump.grounded && state.bounds.min_y.is_finite() {
        // Pinning to the floor each tick is what keeps the character on descending slopes.
        state.position.y = state.bounds.min_y;
    }

    sanitized |= sanitize_motion(state, previous);
    if sanitized {
        warn!(
            "non-finite movement values replaced with last valid ones (position {})",
            tick.state.position
        );
        tick.emit(MovementEvent::Sanitized);
    }
}

fn sanitize_bounds(bounds: &mut Bounds, previous: &Bounds) -> bool {
    let mut touched = false;
    for (value, fallback) in [
        (&mut bounds.min_x, previous.min_x),
        (&mut bounds.max_x, previous.max_x),
        (&mut bounds.min_y, previous.min_y),
        (&mut bounds.max_y, previous.max_y),
    ] {
        if value.is_nan() {
            *value = fallback;
            touched = true;
        }
    }
    touched
}

fn sanitize_motion(state: &mut MovementState, previous: &MovementState) -> bool {
    let mut touched = false;
    if !state.position.is_finite() {
        state.position = if previous.position.is_finite() {
            previous.position
        } else {
            Vec2::ZERO
        };
        touched = true;
    }
    if !state.velocity.is_finite() {
        state.velocity = if previous.velocity.is_finite() {
            previous.velocity
        } else {
            Vec2::ZERO
        };
        touched = true;
    }
    if !state.input_axis.is_finite() {
        state.input_axis = 0.0;
        touched = true;
    }
    touched
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_bounds_without_clamp_is_identity() {
        let bounds = Bounds {
            min_x: -1.0,
            max_x: 1.0,
            min_y: 0.0,
            max_y: f32::INFINITY,
        };
        assert_eq!(effective_bounds(bounds, None), bounds);
    }

    #[test]
    fn test_effective_bounds_intersects_world_clamp() {
        let clamp = WorldClamp {
            min_x: -10.0,
            max_x: 10.0,
            min_y: -5.0,
            max_y: 5.0,
        };
        let bounds = effective_bounds(Bounds::UNBOUNDED, Some(clamp));
        assert_eq!(bounds.min_x, -10.0);
        assert_eq!(bounds.max_x, 10.0);
        assert_eq!(bounds.min_y, -5.0);
        assert_eq!(bounds.max_y, 5.0);
    }

    #[test]
    fn test_effective_bounds_collapses_empty_intersection() {
        let clamp = WorldClamp {
            min_x: -10.0,
            max_x: 10.0,
            min_y: -5.0,
            max_y: 5.0,
        };
        let bounds = Bounds {
            min_x: 20.0,
            ..Bounds::UNBOUNDED
        };
        let out = effective_bounds(bounds, Some(clamp));
        assert_eq!(out.min_x, 20.0);
        assert_eq!(out.max_x, 20.0);
    }

    #[test]
    fn test_sanitize_bounds_restores_nan_limits() {
        let previous = Bounds {
            min_y: 2.0,
            ..Bounds::UNBOUNDED
        };
        let mut bounds = Bounds {
            min_y: f32::NAN,
            ..Bounds::UNBOUNDED
        };
        assert!(sanitize_bounds(&mut bounds, &previous));
        assert_eq!(bounds.min_y, 2.0);
        assert!(!sanitize_bounds(&mut bounds, &previous));
    }
}
