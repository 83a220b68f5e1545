//! Content domain: tuning and level data loaded from RON.

mod data;
mod loader;
mod validation;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use bevy::prelude::*;

pub use data::{LEVEL_SCHEMA_VERSION, LevelDef, ShapeDef, SurfaceDef};
pub use loader::{ContentLoadError, load_all_content, load_level, load_tuning, parse_ron};
pub use validation::{ValidationError, validate_level};

use crate::movement::MovementTuning;

/// Where content is read from.
#[derive(Resource, Debug, Clone)]
pub struct ContentPaths {
    pub base: PathBuf,
    pub level_id: String,
}

impl Default for ContentPaths {
    fn default() -> Self {
        Self {
            base: PathBuf::from("assets/data"),
            level_id: "test_room".to_string(),
        }
    }
}

/// The level currently in play.
#[derive(Resource, Debug, Clone)]
pub struct ActiveLevel(pub LevelDef);

impl Default for ActiveLevel {
    fn default() -> Self {
        Self(LevelDef::test_room())
    }
}

/// Read tuning and the active level, keeping built-in defaults for anything that fails.
pub(crate) fn reload_content(
    paths: &ContentPaths,
    tuning: &mut MovementTuning,
    level: &mut ActiveLevel,
) -> bool {
    match load_all_content(&paths.base, &paths.level_id) {
        Ok((loaded_tuning, loaded_level)) => {
            *tuning = loaded_tuning;
            level.0 = loaded_level;
            true
        }
        Err(errors) => {
            for error in &errors {
                warn!("{}", error);
            }
            warn!(
                "Keeping current content ('{}') after {} load errors",
                level.0.id,
                errors.len()
            );
            false
        }
    }
}

fn load_content_at_startup(
    paths: Res<ContentPaths>,
    mut tuning: ResMut<MovementTuning>,
    mut level: ResMut<ActiveLevel>,
) {
    if reload_content(&paths, &mut tuning, &mut level) {
        info!(
            "Content loaded from {}: level '{}'",
            paths.base.display(),
            level.0.name
        );
    }
}

/// Labels content loading so spawning can run after it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentLoaded;

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ContentPaths>()
            .init_resource::<MovementTuning>()
            .init_resource::<ActiveLevel>()
            .add_systems(Startup, load_content_at_startup.in_set(ContentLoaded));
    }
}
