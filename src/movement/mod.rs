//! Movement domain: a kinematic platformer controller driven by ray probes.
//!
//! The controller is a pure step function ([`advance`]) over [`MovementState`]; the plugin
//! feeds it sampled input and avian2d ray casts on a fixed timestep.

mod bootstrap;
mod components;
mod controller;
#[cfg(feature = "dev-tools")]
mod dev;
pub(crate) mod resolve;
mod resources;
mod state;
mod systems;


use bevy::prelude::*;

pub use bootstrap::{LevelGeometry, SurfaceOutline};
pub use components::{GameLayer, LastTick, PlatformerBody, Player, Surface};
pub use controller::{PlatformerController, advance};
#[cfg(feature = "dev-tools")]
pub use dev::DevTools;
pub use resources::{
    Action, ActionSet, InputSource, JumpCut, MAX_EXTRA_JUMPS, MovementInput, MovementTuning,
    ProbeCounts, ResolverTunables, TuningError, WorldClamp,
};
pub use state::{
    Bounds, ContactHeights, JumpKind, JumpState, MovementEvent, MovementState, PassThrough,
    ProbeTrace, TickReport,
};
pub use systems::{AvianEnvironment, PendingInput};

use crate::content::ContentLoaded;

/// Fixed tick rate the controller is stepped at.
pub const TICK_HZ: f64 = 60.0;

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementTuning>()
            .init_resource::<PendingInput>()
            .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
            .add_systems(Startup, bootstrap::bootstrap_level.after(ContentLoaded))
            .add_systems(
                Update,
                (systems::read_input, bootstrap::draw_surface_outlines),
            )
            .add_systems(
                FixedUpdate,
                (systems::step_platformers, systems::sync_transforms).chain(),
            );

        #[cfg(feature = "dev-tools")]
        app.init_resource::<DevTools>()
            .add_systems(
                Update,
                (
                    dev::toggle_dev_tools,
                    dev::reload_level,
                    dev::draw_probe_gizmos,
                ),
            )
            .add_systems(
                FixedUpdate,
                (
                    dev::drive_soak_bot.before(systems::step_platformers),
                    dev::record_soak_states.after(systems::step_platformers),
                ),
            );
    }
}
