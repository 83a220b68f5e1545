//! Movement domain: the per-tick probe resolvers.
//!
//! Order matters and is fixed by [`advance`](super::advance): horizontal intent, wall clamp,
//! gravity, one-way classification, ground, ceiling, jump, integration.

pub(crate) mod horizontal;
pub(crate) mod integrate;
pub(crate) mod jump;
pub(crate) mod vertical;

use bevy::log::debug;

use crate::environment::{EnvironmentQuery, Hit, PlatformId, ProbeRay};
use crate::movement::{InputSource, MovementEvent, MovementState, MovementTuning, ProbeTrace, TickReport};

/// Working set for one tick. Resolvers read tuning and input and mutate the state in order.
pub(crate) struct Tick<'a> {
    pub tuning: &'a MovementTuning,
    pub state: &'a mut MovementState,
    pub dt: f32,
    pub input: &'a dyn InputSource,
    env: &'a dyn EnvironmentQuery,
    report: &'a mut TickReport,
    /// Jump force in effect this tick; zero while a jump-down request is armed.
    pub jump_force: f32,
    /// One-way platform underfoot when a jump-down request is armed.
    pub jump_down_platform: Option<PlatformId>,
}

impl<'a> Tick<'a> {
    pub fn new(
        tuning: &'a MovementTuning,
        state: &'a mut MovementState,
        dt: f32,
        input: &'a dyn InputSource,
        env: &'a dyn EnvironmentQuery,
        report: &'a mut TickReport,
    ) -> Self {
        Self {
            tuning,
            state,
            dt,
            input,
            env,
            report,
            jump_force: tuning.jump_force,
            jump_down_platform: None,
        }
    }

    /// Cast a probe and record it. Non-finite hits count as misses.
    pub fn probe(&mut self, ray: ProbeRay, exclude: &[PlatformId]) -> Option<Hit> {
        let hit = self.env.probe(&ray, exclude).filter(Hit::is_finite);
        self.report.probes.push(ProbeTrace { ray, hit });
        hit
    }

    pub fn emit(&mut self, event: MovementEvent) {
        debug!("movement event: {:?} at {}", event, self.state.position);
        self.report.events.push(event);
    }

    pub fn round(&self, value: f32) -> f32 {
        round_to(value, self.tuning.tunables.bound_decimals)
    }
}

/// Round to a fixed number of decimals, ties to even. Repeated clamping against a rounded
/// bound cannot creep.
pub(crate) fn round_to(value: f32, decimals: u32) -> f32 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(decimals.min(9) as i32);
    ((f64::from(value) * scale).round_ties_even() / scale) as f32
}

/// `count` evenly spaced values from `from` to `to` inclusive. `count` is at least 2.
pub(crate) fn spread(from: f32, to: f32, count: usize) -> impl Iterator<Item = f32> {
    let step = (to - from) / (count.max(2) - 1) as f32;
    (0..count).map(move |i| from + step * i as f32)
}

/// Timer residue below this is float drift from repeated subtraction, not time left.
pub(crate) const TIMER_EPSILON: f32 = 1e-4;

/// Run a countdown timer down by `dt`, landing on exactly zero once it expires.
pub(crate) fn count_down(remaining: f32, dt: f32) -> f32 {
    let left = remaining - dt;
    if left > TIMER_EPSILON { left } else { 0.0 }
}

pub(crate) fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_down_snaps_drift_to_zero() {
        let dt = 1.0 / 60.0;
        let mut coyote = 0.2_f32;
        for _ in 0..11 {
            coyote = count_down(coyote, dt);
        }
        assert!(coyote > 0.01);
        // Twelve subtractions of 1/60 leave about 1e-8 behind in f32.
        assert_eq!(count_down(coyote, dt), 0.0);
        assert_eq!(count_down(0.0, dt), 0.0);
    }

    #[test]
    fn test_round_to_fixed_decimals() {
        assert_eq!(round_to(2.7249, 3), 2.725);
        assert_eq!(round_to(f32::INFINITY, 3), f32::INFINITY);
    }

    #[test]
    fn test_spread_includes_both_ends() {
        let values: Vec<f32> = spread(-1.0, 1.0, 3).collect();
        assert_eq!(values, vec![-1.0, 0.0, 1.0]);
    }
}
