//! Validation for level definitions.

use super::data::*;
use crate::movement::MovementTuning;

/// A validation error with context about what failed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub level_id: String,
    /// Index into `surfaces`, or `None` for level-wide problems.
    pub surface: Option<usize>,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.surface {
            Some(index) => write!(
                f,
                "Level '{}' surface {}: {}",
                self.level_id, index, self.message
            ),
            None => write!(f, "Level '{}': {}", self.level_id, self.message),
        }
    }
}

fn check_shape(shape: &ShapeDef) -> Option<String> {
    if shape
        .coordinates()
        .iter()
        .any(|(x, y)| !x.is_finite() || !y.is_finite())
    {
        return Some("non-finite coordinate".to_string());
    }
    match shape {
        ShapeDef::Rect { size, .. } if size.0 <= 0.0 || size.1 <= 0.0 => Some(format!(
            "rect size must be positive, got ({}, {})",
            size.0, size.1
        )),
        ShapeDef::Ramp { low, high } if low.0 == high.0 || high.1 <= low.1 => Some(format!(
            "ramp must rise across a horizontal span, got {:?} -> {:?}",
            low, high
        )),
        ShapeDef::Polygon { points } if points.len() < 3 => Some(format!(
            "polygon needs at least 3 points, got {}",
            points.len()
        )),
        _ => None,
    }
}

/// Validate a level against the tuning it will be played with.
/// Returns a list of validation errors, empty if the level is usable.
pub fn validate_level(level: &LevelDef, tuning: &MovementTuning) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut push = |surface: Option<usize>, message: String| {
        errors.push(ValidationError {
            level_id: level.id.clone(),
            surface,
            message,
        })
    };

    if level.schema_version != LEVEL_SCHEMA_VERSION {
        push(
            None,
            format!(
                "schema_version {} is not supported (expected {})",
                level.schema_version, LEVEL_SCHEMA_VERSION
            ),
        );
    }

    let spawn = level.spawn_point();
    if !spawn.is_finite() {
        push(None, format!("spawn point {} is not finite", spawn));
    }

    for (index, surface) in level.surfaces.iter().enumerate() {
        if let Some(message) = check_shape(&surface.shape) {
            push(Some(index), message);
            continue;
        }
        if surface.shape.to_shape().contains(spawn) {
            push(
                Some(index),
                format!("spawn point {} is inside this surface", spawn),
            );
        }
    }

    if let Some(clamp) = tuning.world_clamp {
        let inside = (clamp.min_x..=clamp.max_x).contains(&spawn.x)
            && (clamp.min_y..=clamp.max_y).contains(&spawn.y);
        if !inside {
            push(
                None,
                format!("spawn point {} lies outside the world clamp", spawn),
            );
        }
    }

    errors
}
