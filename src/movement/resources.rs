//! Movement domain: tuning and input resources.

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on configurable extra air jumps.
pub const MAX_EXTRA_JUMPS: u8 = 2;

/// How releasing the jump button shortens an ascending jump.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum JumpCut {
    /// Divide the upward speed by this factor.
    Divide(f32),
    /// Clamp the upward speed to what gravity removes in one tick.
    Clamp,
}

/// Number of rays cast per probe direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeCounts {
    pub horizontal: usize,
    pub ground: usize,
    pub ceiling: usize,
}

impl Default for ProbeCounts {
    fn default() -> Self {
        Self {
            horizontal: 5,
            ground: 2,
            ceiling: 2,
        }
    }
}

/// World-space rectangle the character may never leave.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldClamp {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

/// Empirically tuned resolver constants.
///
/// These trade visible snapping against slope stickiness and stair climbing. They are kept
/// configurable instead of being derived from the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverTunables {
    /// Base distance from `min_y` within which a falling character lands.
    pub landing_tolerance: f32,
    /// Cap on the extra landing tolerance granted by left/right ground disagreement.
    pub slope_tolerance_cap: f32,
    /// Distance above `min_y` at which a grounded character is considered airborne.
    /// Larger values stick harder to descending slopes.
    pub leave_ground_distance: f32,
    /// Distance below `max_y` at which upward motion stops.
    pub head_bump_distance: f32,
    /// Decimal places bounds and contact heights are rounded to.
    pub bound_decimals: u32,
    /// One-way classifier probe length as a fraction of the character height.
    pub one_way_probe_factor: f32,
    /// Ceiling probe origin lift above the centre, as a fraction of the character height.
    pub ceiling_probe_lift: f32,
    /// When squished, reject the top horizontal ray instead of the bottom one while grounded.
    pub invert_edge_rays_when_squished: bool,
}

impl Default for ResolverTunables {
    fn default() -> Self {
        Self {
            landing_tolerance: 0.025,
            slope_tolerance_cap: 0.5,
            leave_ground_distance: 0.5,
            head_bump_distance: 0.05,
            bound_decimals: 3,
            one_way_probe_factor: 0.4,
            ceiling_probe_lift: 0.125,
            invert_edge_rays_when_squished: true,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    pub speed: f32,
    pub acceleration: f32,
    /// Falls back to `2.5 × acceleration` when unset.
    pub deceleration: Option<f32>,
    pub jump_force: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub coyote_time: f32,
    /// Extra air jumps (0 = none, 1 = double jump, 2 = triple jump).
    pub extra_jumps: u8,
    pub infinite_jumping: bool,
    /// Divides the terminal fall speed while sliding down a wall.
    pub wall_friction: f32,
    pub wall_jumping: bool,
    pub jump_height_control: bool,
    pub jump_cut: JumpCut,
    /// Length of the one-way pass-through window, in seconds.
    pub jump_down_time: f32,
    pub half_width: f32,
    pub half_height: f32,
    pub skin_width: f32,
    pub probes: ProbeCounts,
    pub world_clamp: Option<WorldClamp>,
    pub tunables: ResolverTunables,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            speed: 10.0,
            acceleration: 4.0,
            deceleration: None,
            jump_force: 30.0,
            gravity: 75.0,
            max_fall_speed: 75.0,
            coyote_time: 0.2,
            extra_jumps: 1,
            infinite_jumping: false,
            wall_friction: 30.0,
            wall_jumping: true,
            jump_height_control: true,
            jump_cut: JumpCut::Clamp,
            jump_down_time: 0.1,
            half_width: 0.5,
            half_height: 1.0,
            skin_width: 0.05,
            probes: ProbeCounts::default(),
            world_clamp: None,
            tunables: ResolverTunables::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuningError {
    #[error("tuning field `{0}` is not a finite number")]
    NonFinite(&'static str),
    #[error("tuning field `{field}` must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("tuning field `{field}` must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("{direction} probes need at least 2 rays, got {count}")]
    TooFewProbes {
        direction: &'static str,
        count: usize,
    },
    #[error("at most 2 extra jumps are supported, got {0}")]
    TooManyExtraJumps(u8),
    #[error("skin width {skin} leaves no room inside a {half_width}×{half_height} half-extent box")]
    SkinTooWide {
        skin: f32,
        half_width: f32,
        half_height: f32,
    },
    #[error("world clamp is inverted: x {min_x}..{max_x}, y {min_y}..{max_y}")]
    InvertedWorldClamp {
        min_x: f32,
        max_x: f32,
        min_y: f32,
        max_y: f32,
    },
}

impl MovementTuning {
    pub fn deceleration(&self) -> f32 {
        self.deceleration.unwrap_or(2.5 * self.acceleration)
    }

    pub fn width(&self) -> f32 {
        self.half_width * 2.0
    }

    pub fn height(&self) -> f32 {
        self.half_height * 2.0
    }

    /// Apex height of a single jump: h = v² / (2g).
    pub fn single_jump_height(&self) -> f32 {
        self.jump_force * self.jump_force / (2.0 * self.gravity)
    }

    /// Apex height with every extra jump spent at the apex of the previous one.
    pub fn max_reachable_height(&self) -> f32 {
        self.single_jump_height() * (1.0 + f32::from(self.extra_jumps))
    }

    /// Reject configurations the resolvers cannot run with.
    pub fn validate(&self) -> Result<(), TuningError> {
        let finite = [
            ("speed", self.speed),
            ("acceleration", self.acceleration),
            ("deceleration", self.deceleration()),
            ("jump_force", self.jump_force),
            ("gravity", self.gravity),
            ("max_fall_speed", self.max_fall_speed),
            ("coyote_time", self.coyote_time),
            ("wall_friction", self.wall_friction),
            ("jump_down_time", self.jump_down_time),
            ("half_width", self.half_width),
            ("half_height", self.half_height),
            ("skin_width", self.skin_width),
            ("tunables.landing_tolerance", self.tunables.landing_tolerance),
            ("tunables.slope_tolerance_cap", self.tunables.slope_tolerance_cap),
            ("tunables.leave_ground_distance", self.tunables.leave_ground_distance),
            ("tunables.head_bump_distance", self.tunables.head_bump_distance),
            ("tunables.one_way_probe_factor", self.tunables.one_way_probe_factor),
            ("tunables.ceiling_probe_lift", self.tunables.ceiling_probe_lift),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(TuningError::NonFinite(field));
            }
        }

        let positive = [
            ("speed", self.speed),
            ("acceleration", self.acceleration),
            ("deceleration", self.deceleration()),
            ("gravity", self.gravity),
            ("max_fall_speed", self.max_fall_speed),
            ("wall_friction", self.wall_friction),
            ("half_width", self.half_width),
            ("half_height", self.half_height),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        let non_negative = [
            ("jump_force", self.jump_force),
            ("coyote_time", self.coyote_time),
            ("jump_down_time", self.jump_down_time),
            ("skin_width", self.skin_width),
            ("tunables.landing_tolerance", self.tunables.landing_tolerance),
            ("tunables.slope_tolerance_cap", self.tunables.slope_tolerance_cap),
            ("tunables.leave_ground_distance", self.tunables.leave_ground_distance),
            ("tunables.head_bump_distance", self.tunables.head_bump_distance),
            ("tunables.one_way_probe_factor", self.tunables.one_way_probe_factor),
            ("tunables.ceiling_probe_lift", self.tunables.ceiling_probe_lift),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(TuningError::Negative { field, value });
            }
        }

        if let JumpCut::Divide(divisor) = self.jump_cut {
            if !divisor.is_finite() {
                return Err(TuningError::NonFinite("jump_cut"));
            }
            if divisor <= 0.0 {
                return Err(TuningError::NotPositive {
                    field: "jump_cut",
                    value: divisor,
                });
            }
        }

        for (direction, count) in [
            ("horizontal", self.probes.horizontal),
            ("ground", self.probes.ground),
            ("ceiling", self.probes.ceiling),
        ] {
            if count < 2 {
                return Err(TuningError::TooFewProbes { direction, count });
            }
        }

        if self.extra_jumps > MAX_EXTRA_JUMPS {
            return Err(TuningError::TooManyExtraJumps(self.extra_jumps));
        }

        if self.skin_width >= self.half_width || self.skin_width >= self.half_height {
            return Err(TuningError::SkinTooWide {
                skin: self.skin_width,
                half_width: self.half_width,
                half_height: self.half_height,
            });
        }

        if let Some(clamp) = self.world_clamp {
            let values = [clamp.min_x, clamp.max_x, clamp.min_y, clamp.max_y];
            if values.iter().any(|value| value.is_nan()) {
                return Err(TuningError::NonFinite("world_clamp"));
            }
            if clamp.min_x > clamp.max_x || clamp.min_y > clamp.max_y {
                return Err(TuningError::InvertedWorldClamp {
                    min_x: clamp.min_x,
                    max_x: clamp.max_x,
                    min_y: clamp.min_y,
                    max_y: clamp.max_y,
                });
            }
        }

        Ok(())
    }
}

/// Player intents the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveDown,
    Jump,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::MoveDown,
        Action::Jump,
    ];

    const fn bit(self) -> u8 {
        match self {
            Action::MoveLeft => 1 << 0,
            Action::MoveRight => 1 << 1,
            Action::MoveDown => 1 << 2,
            Action::Jump => 1 << 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ActionSet(u8);

impl ActionSet {
    pub const EMPTY: Self = Self(0);

    pub fn of(actions: &[Action]) -> Self {
        actions
            .iter()
            .fold(Self::EMPTY, |set, action| set.with(*action))
    }

    #[inline]
    pub fn contains(self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    #[inline]
    pub fn with(self, action: Action) -> Self {
        Self(self.0 | action.bit())
    }

    #[inline]
    pub fn set(&mut self, action: Action, on: bool) {
        if on {
            self.0 |= action.bit();
        } else {
            self.0 &= !action.bit();
        }
    }

    #[inline]
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Polled input contract.
///
/// `was_pressed` and `was_released` are single-tick edges and must not repeat-fire.
pub trait InputSource {
    fn is_held(&self, action: Action) -> bool;
    fn was_pressed(&self, action: Action) -> bool;
    fn was_released(&self, action: Action) -> bool;
}

/// One tick's worth of input: held levels plus press/release edges.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MovementInput {
    pub held: ActionSet,
    pub pressed: ActionSet,
    pub released: ActionSet,
}

impl MovementInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn holding(actions: &[Action]) -> Self {
        Self {
            held: ActionSet::of(actions),
            ..Self::default()
        }
    }

    /// Press `action` this tick; a pressed button is also held.
    pub fn press(mut self, action: Action) -> Self {
        self.pressed = self.pressed.with(action);
        self.held = self.held.with(action);
        self
    }

    /// Release `action` this tick.
    pub fn release(mut self, action: Action) -> Self {
        self.released = self.released.with(action);
        self.held.set(action, false);
        self
    }

    pub fn hold(mut self, action: Action) -> Self {
        self.held = self.held.with(action);
        self
    }

    /// Fold another sample in, keeping edges from both and levels from `later`.
    pub fn latch(self, later: MovementInput) -> Self {
        Self {
            held: later.held,
            pressed: self.pressed.union(later.pressed),
            released: self.released.union(later.released),
        }
    }

    /// Drop the edges once a tick consumed them.
    pub fn consume_edges(&mut self) {
        self.pressed = ActionSet::EMPTY;
        self.released = ActionSet::EMPTY;
    }
}

impl InputSource for MovementInput {
    fn is_held(&self, action: Action) -> bool {
        self.held.contains(action)
    }

    fn was_pressed(&self, action: Action) -> bool {
        self.pressed.contains(action)
    }

    fn was_released(&self, action: Action) -> bool {
        self.released.contains(action)
    }
}
