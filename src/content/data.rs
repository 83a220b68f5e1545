//! Data definitions for RON level files.
//!
//! These structs mirror the structure in assets/data/levels/*.ron and are used
//! for deserialization. `build_world` turns a level into probe-able geometry.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use crate::environment::{Shape, StaticWorld, SurfaceCategory};

/// Schema version understood by this build.
pub const LEVEL_SCHEMA_VERSION: u32 = 1;

// ============================================================================
// Levels (levels/*.ron)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LevelDef {
    pub schema_version: u32,
    pub id: String,
    pub name: String,
    pub spawn: (f32, f32),
    pub surfaces: Vec<SurfaceDef>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SurfaceDef {
    pub category: SurfaceCategory,
    pub shape: ShapeDef,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum ShapeDef {
    Rect { center: (f32, f32), size: (f32, f32) },
    /// Sloped face rising from `low` to `high`.
    Ramp { low: (f32, f32), high: (f32, f32) },
    /// Convex outline, either winding.
    Polygon { points: Vec<(f32, f32)> },
}

fn vec2((x, y): (f32, f32)) -> Vec2 {
    Vec2::new(x, y)
}

impl ShapeDef {
    pub fn to_shape(&self) -> Shape {
        match self {
            ShapeDef::Rect { center, size } => Shape::rect(vec2(*center), vec2(*size)),
            ShapeDef::Ramp { low, high } => Shape::ramp(vec2(*low), vec2(*high)),
            ShapeDef::Polygon { points } => {
                Shape::Polygon(points.iter().copied().map(vec2).collect())
            }
        }
    }

    /// Every coordinate the shape is built from.
    pub fn coordinates(&self) -> Vec<(f32, f32)> {
        match self {
            ShapeDef::Rect { center, size } => vec![*center, *size],
            ShapeDef::Ramp { low, high } => vec![*low, *high],
            ShapeDef::Polygon { points } => points.clone(),
        }
    }
}

impl LevelDef {
    pub fn spawn_point(&self) -> Vec2 {
        vec2(self.spawn)
    }

    /// Build static geometry; surface `i` gets platform id `i`.
    pub fn build_world(&self) -> StaticWorld {
        self.surfaces
            .iter()
            .fold(StaticWorld::new(), |world, surface| {
                world.with(surface.category, surface.shape.to_shape())
            })
    }

    /// Built-in room used when no level file can be loaded.
    pub fn test_room() -> Self {
        let rect = |center, size, category| SurfaceDef {
            category,
            shape: ShapeDef::Rect { center, size },
        };
        Self {
            schema_version: LEVEL_SCHEMA_VERSION,
            id: "test_room".to_string(),
            name: "Test Room".to_string(),
            spawn: (-8.0, 2.0),
            surfaces: vec![
                rect((0.0, -0.5), (40.0, 1.0), SurfaceCategory::Solid),
                rect((-20.5, 10.0), (1.0, 22.0), SurfaceCategory::Wall),
                rect((20.5, 10.0), (1.0, 22.0), SurfaceCategory::Wall),
                rect((-10.0, 4.0), (6.0, 0.5), SurfaceCategory::OneWay),
                rect((-2.0, 7.5), (5.0, 0.5), SurfaceCategory::OneWay),
                rect((9.0, 4.0), (2.0, 8.0), SurfaceCategory::Wall),
                rect((0.0, 13.0), (12.0, 1.0), SurfaceCategory::Solid),
                SurfaceDef {
                    category: SurfaceCategory::Solid,
                    shape: ShapeDef::Ramp {
                        low: (12.0, 0.0),
                        high: (18.0, 3.0),
                    },
                },
            ],
        }
    }
}
