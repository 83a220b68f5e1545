//! Kinematic 2D platformer character controller.
//!
//! A rectangular character is moved through static geometry with ray probes instead of a
//! physics solver. The controller core is host-independent and deterministic; `MovementPlugin`
//! runs it inside a bevy app with avian2d providing the ray casts.

pub mod content;
pub mod environment;
pub mod movement;
pub mod replay;

pub use environment::{EnvironmentQuery, StaticWorld, SurfaceCategory};
pub use movement::{MovementInput, MovementState, MovementTuning, PlatformerController, advance};
