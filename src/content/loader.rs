//! Loader for RON tuning and level files.

use bevy::prelude::*;
use ron::Options;
use std::fs;
use std::path::Path;

use super::data::*;
use super::validation::validate_level;
use crate::movement::MovementTuning;

/// Error type for content loading failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentLoadError {
    pub file: String,
    pub message: String,
}

impl std::fmt::Display for ContentLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

impl std::error::Error for ContentLoadError {}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

/// Parse a single RON struct from a string; `file` only labels errors.
pub fn parse_ron<T>(file: &str, contents: &str) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    ron_options()
        .from_str(contents)
        .map_err(|e| ContentLoadError {
            file: file.to_string(),
            message: format!("Parse error: {}", e),
        })
}

/// Load a single RON struct.
fn load_single_file<T>(path: &Path) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let file_name = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|e| ContentLoadError {
        file: file_name.clone(),
        message: format!("IO error: {}", e),
    })?;

    parse_ron(&file_name, &contents)
}

/// Load and validate movement tuning. Missing fields take their defaults.
pub fn load_tuning(path: &Path) -> Result<MovementTuning, ContentLoadError> {
    let tuning: MovementTuning = load_single_file(path)?;
    tuning.validate().map_err(|e| ContentLoadError {
        file: path.display().to_string(),
        message: format!("Invalid tuning: {}", e),
    })?;
    Ok(tuning)
}

/// Load a level and check it against `tuning`.
pub fn load_level(path: &Path, tuning: &MovementTuning) -> Result<LevelDef, ContentLoadError> {
    let level: LevelDef = load_single_file(path)?;
    let errors = validate_level(&level, tuning);
    if !errors.is_empty() {
        let message = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ContentLoadError {
            file: path.display().to_string(),
            message: format!("Validation failed: {}", message),
        });
    }
    Ok(level)
}

/// Load tuning.ron and levels/<level_id>.ron from `base_path`.
/// Returns errors for any files that fail to load.
pub fn load_all_content(
    base_path: &Path,
    level_id: &str,
) -> Result<(MovementTuning, LevelDef), Vec<ContentLoadError>> {
    let mut errors = Vec::new();

    let tuning = match load_tuning(&base_path.join("tuning.ron")) {
        Ok(tuning) => tuning,
        Err(e) => {
            errors.push(e);
            // Level validation depends on the tuning; stop here.
            return Err(errors);
        }
    };

    let level_path = base_path.join("levels").join(format!("{}.ron", level_id));
    match load_level(&level_path, &tuning) {
        Ok(level) => {
            info!(
                "Loaded level '{}' with {} surfaces",
                level.name,
                level.surfaces.len()
            );
            Ok((tuning, level))
        }
        Err(e) => {
            errors.push(e);
            Err(errors)
        }
    }
}
