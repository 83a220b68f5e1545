//! Movement domain: per-character state carried from tick to tick.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::environment::{Hit, PlatformId, ProbeRay};

use super::MovementTuning;

/// Position bounds recomputed every tick from probe results.
///
/// Infinite limits mean "unbounded" and serialise as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    #[serde(with = "lower_limit")]
    pub min_x: f32,
    #[serde(with = "upper_limit")]
    pub max_x: f32,
    #[serde(with = "lower_limit")]
    pub min_y: f32,
    #[serde(with = "upper_limit")]
    pub max_y: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl Bounds {
    pub const UNBOUNDED: Self = Self {
        min_x: f32::NEG_INFINITY,
        max_x: f32::INFINITY,
        min_y: f32::NEG_INFINITY,
        max_y: f32::INFINITY,
    };

    pub fn contains(&self, point: Vec2) -> bool {
        self.min_x <= point.x
            && point.x <= self.max_x
            && self.min_y <= point.y
            && point.y <= self.max_y
    }

    /// Clamp without panicking on inverted or infinite limits; the lower bound wins.
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.min(self.max_x).max(self.min_x),
            point.y.min(self.max_y).max(self.min_y),
        )
    }
}

mod lower_limit {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
        value.is_finite().then_some(*value).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
        Ok(Option::<f32>::deserialize(deserializer)?.unwrap_or(f32::NEG_INFINITY))
    }
}

mod upper_limit {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
        value.is_finite().then_some(*value).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
        Ok(Option::<f32>::deserialize(deserializer)?.unwrap_or(f32::INFINITY))
    }
}

/// Most recent contact heights seen by the outermost ground and ceiling probes.
///
/// `None` means the probe found nothing (or its hit did not count this tick).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContactHeights {
    pub ground_left: Option<f32>,
    pub ground_right: Option<f32>,
    pub ceiling_left: Option<f32>,
    pub ceiling_right: Option<f32>,
}

impl ContactHeights {
    pub fn squished_left(&self, height: f32) -> bool {
        squished(self.ceiling_left, self.ground_left, height)
    }

    pub fn squished_right(&self, height: f32) -> bool {
        squished(self.ceiling_right, self.ground_right, height)
    }

    /// Squished on either side.
    pub fn squished(&self, height: f32) -> bool {
        self.squished_left(height) || self.squished_right(height)
    }

    /// Squished on the side the character is moving towards.
    pub fn squished_towards(&self, axis: f32, height: f32) -> bool {
        (axis > 0.0 && self.squished_right(height)) || (axis < 0.0 && self.squished_left(height))
    }

    /// How much the outermost ground probes disagree; larger on steeper slopes.
    pub fn ground_disagreement(&self) -> f32 {
        match (self.ground_left, self.ground_right) {
            (Some(left), Some(right)) => (left - right).abs(),
            (None, None) => 0.0,
            _ => f32::INFINITY,
        }
    }
}

fn squished(ceiling: Option<f32>, ground: Option<f32>, height: f32) -> bool {
    match (ceiling, ground) {
        (Some(ceiling), Some(ground)) => (ceiling - ground).abs() <= height,
        _ => false,
    }
}

/// An active one-way pass-through.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassThrough {
    pub platform: PlatformId,
    /// Seconds left before ground probes count again.
    pub remaining: f32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JumpState {
    pub grounded: bool,
    pub walled: bool,
    pub coyote_time: f32,
    pub extra_jumps_remaining: u8,
    pub pass_through: Option<PassThrough>,
    /// Set by a jump, cleared by releasing the button, landing, or a head bump.
    pub variable_height: bool,
}

impl JumpState {
    pub fn new(tuning: &MovementTuning) -> Self {
        Self {
            grounded: false,
            walled: false,
            coyote_time: tuning.coyote_time,
            extra_jumps_remaining: tuning.extra_jumps,
            pass_through: None,
            variable_height: false,
        }
    }

    pub fn passing_through(&self) -> bool {
        self.pass_through.is_some()
    }

    /// Landing or wall contact refills coyote time and air jumps.
    pub fn refill(&mut self, tuning: &MovementTuning) {
        self.coyote_time = tuning.coyote_time;
        self.extra_jumps_remaining = tuning.extra_jumps;
    }
}

/// Everything a controller carries between ticks.
///
/// Serialisable so runs can be snapshotted, replayed, and compared frame by frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MovementState {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Normalised horizontal intent in `[-1, 1]`.
    pub input_axis: f32,
    pub bounds: Bounds,
    pub contacts: ContactHeights,
    pub jump: JumpState,
    /// One-way platform currently overlapping the lower body; ground probes ignore it.
    pub one_way_platform: Option<PlatformId>,
}

impl MovementState {
    pub fn new(tuning: &MovementTuning, position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            input_axis: 0.0,
            bounds: Bounds::UNBOUNDED,
            contacts: ContactHeights::default(),
            jump: JumpState::new(tuning),
            one_way_platform: None,
        }
    }

    pub fn grounded(&self) -> bool {
        self.jump.grounded
    }

    pub fn walled(&self) -> bool {
        self.jump.walled
    }
}

/// Which rule produced a jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpKind {
    Normal,
    Extra,
    Wall,
}

/// Transitions observed during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MovementEvent {
    Landed,
    LeftGround,
    Walled,
    Jumped(JumpKind),
    JumpCut,
    HeadBump,
    PassThroughStarted(PlatformId),
    PassThroughEnded,
    OneWayClassified(Option<PlatformId>),
    WallBlocked,
    Sanitized,
}

/// A probe cast during a tick and what it found.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbeTrace {
    pub ray: ProbeRay,
    pub hit: Option<Hit>,
}

/// Side output of a tick: every probe cast plus the events that fired.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TickReport {
    pub probes: Vec<ProbeTrace>,
    pub events: Vec<MovementEvent>,
}

impl TickReport {
    pub fn fired(&self, event: MovementEvent) -> bool {
        self.events.contains(&event)
    }

    pub fn jumped(&self) -> Option<JumpKind> {
        self.events.iter().find_map(|event| match event {
            MovementEvent::Jumped(kind) => Some(*kind),
            _ => None,
        })
    }
}
