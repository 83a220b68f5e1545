//! Movement domain: the kinematic controller and its step function.

use bevy::log::{info, warn};
use bevy::math::Vec2;

use crate::environment::EnvironmentQuery;

use super::resolve::{Tick, horizontal, integrate, jump, vertical};
use super::{InputSource, MovementState, MovementTuning, TickReport, TuningError};

/// Advance `state` by one tick of `dt` seconds.
///
/// Pure with respect to its inputs: the same tuning, state, input and geometry always produce
/// the same next state. `tuning` is expected to have passed [`MovementTuning::validate`];
/// [`PlatformerController`] guarantees that.
///
/// Negative or non-finite `dt` is treated as zero, and a zero-length tick returns `state`
/// unchanged with an empty report.
pub fn advance(
    tuning: &MovementTuning,
    state: &MovementState,
    dt: f32,
    input: &dyn InputSource,
    env: &dyn EnvironmentQuery,
) -> (MovementState, TickReport) {
    let dt = if dt.is_finite() && dt >= 0.0 {
        dt
    } else {
        warn!("ignoring invalid tick length {dt}");
        0.0
    };
    if dt == 0.0 {
        // Landing, timers and jump edges only advance with elapsed time.
        return (state.clone(), TickReport::default());
    }

    let mut next = state.clone();
    let mut report = TickReport::default();
    let mut tick = Tick::new(tuning, &mut next, dt, input, env, &mut report);

    horizontal::resolve_axis(&mut tick);
    horizontal::clamp_against_walls(&mut tick);
    vertical::apply_gravity(&mut tick);
    vertical::classify_one_way(&mut tick);
    vertical::resolve_ground(&mut tick);
    vertical::resolve_ceiling(&mut tick);
    jump::evaluate(&mut tick);
    integrate::integrate(&mut tick, state);

    (next, report)
}

/// A rectangular character moved through static geometry by ray probes.
///
/// # Example
///
/// ```
/// use bevy::math::Vec2;
/// use kinematic_platformer::environment::{Shape, StaticWorld, SurfaceCategory};
/// use kinematic_platformer::movement::{MovementInput, MovementTuning, PlatformerController};
///
/// let world = StaticWorld::new().with(
///     SurfaceCategory::Solid,
///     Shape::rect(Vec2::new(0.0, -0.5), Vec2::new(20.0, 1.0)),
/// );
/// let mut controller =
///     PlatformerController::new(MovementTuning::default(), Vec2::new(0.0, 3.0)).unwrap();
///
/// for _ in 0..120 {
///     controller.step(1.0 / 60.0, &MovementInput::idle(), &world);
/// }
/// assert!(controller.state().grounded());
/// ```
#[derive(Debug, Clone)]
pub struct PlatformerController {
    tuning: MovementTuning,
    state: MovementState,
}

impl PlatformerController {
    /// Create a controller at `spawn`. Invalid tuning is rejected here, never mid-tick.
    pub fn new(tuning: MovementTuning, spawn: Vec2) -> Result<Self, TuningError> {
        tuning.validate()?;
        info!(
            "platformer controller ready: {}×{} box, jump apex {:.2}",
            tuning.width(),
            tuning.height(),
            tuning.single_jump_height()
        );
        let state = MovementState::new(&tuning, spawn);
        Ok(Self { tuning, state })
    }

    /// Resume from a saved state.
    pub fn from_state(tuning: MovementTuning, state: MovementState) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self { tuning, state })
    }

    pub fn tuning(&self) -> &MovementTuning {
        &self.tuning
    }

    pub fn state(&self) -> &MovementState {
        &self.state
    }

    pub fn into_state(self) -> MovementState {
        self.state
    }

    pub fn position(&self) -> Vec2 {
        self.state.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.state.velocity
    }

    /// Run one tick: resolve collisions and jumps, then integrate.
    pub fn step(
        &mut self,
        dt: f32,
        input: &dyn InputSource,
        env: &dyn EnvironmentQuery,
    ) -> TickReport {
        let (next, report) = advance(&self.tuning, &self.state, dt, input, env);
        self.state = next;
        report
    }

    /// Put the character back at `position` with fresh state.
    pub fn respawn(&mut self, position: Vec2) {
        self.state = MovementState::new(&self.tuning, position);
    }
}
