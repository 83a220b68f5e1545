//! Movement domain: system modules for the platformer.

pub(crate) mod collisions;
pub(crate) mod input;
pub(crate) mod movement;

pub use collisions::AvianEnvironment;
pub use input::PendingInput;
pub(crate) use input::read_input;
pub(crate) use movement::{step_platformers, sync_transforms};
