//! Content domain: tests for RON parsing, level validation, and world building.

use std::path::{Path, PathBuf};

use bevy::math::Vec2;

use super::{
    LEVEL_SCHEMA_VERSION, LevelDef, ShapeDef, SurfaceDef, load_all_content, load_level,
    parse_ron, validate_level,
};
use crate::environment::{
    CategoryMask, EnvironmentQuery, PlatformId, ProbeDirection, ProbeRay, SurfaceCategory,
};
use crate::movement::{JumpCut, MovementTuning, WorldClamp};

fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/data")
}

fn level_with(surfaces: Vec<SurfaceDef>) -> LevelDef {
    LevelDef {
        schema_version: LEVEL_SCHEMA_VERSION,
        id: "scratch".to_string(),
        name: "Scratch".to_string(),
        spawn: (0.0, 5.0),
        surfaces,
    }
}

fn solid(shape: ShapeDef) -> SurfaceDef {
    SurfaceDef {
        category: SurfaceCategory::Solid,
        shape,
    }
}

// -----------------------------------------------------------------------------
// Parsing tests
// -----------------------------------------------------------------------------

#[test]
fn test_parse_level_from_ron() {
    let source = r#"(
        schema_version: 1,
        id: "tiny",
        name: "Tiny",
        spawn: (0.0, 2.0),
        surfaces: [
            (category: Solid, shape: Rect(center: (0.0, -0.5), size: (10.0, 1.0))),
            (category: OneWay, shape: Ramp(low: (1.0, 0.0), high: (3.0, 1.0))),
            (category: Wall, shape: Polygon(points: [(5.0, 0.0), (6.0, 0.0), (6.0, 4.0)])),
        ],
    )"#;
    let level: LevelDef = parse_ron("tiny.ron", source).expect("level should parse");
    assert_eq!(level.id, "tiny");
    assert_eq!(level.spawn_point(), Vec2::new(0.0, 2.0));
    assert_eq!(level.surfaces.len(), 3);
    assert_eq!(level.surfaces[1].category, SurfaceCategory::OneWay);
    assert_eq!(
        level.surfaces[1].shape,
        ShapeDef::Ramp {
            low: (1.0, 0.0),
            high: (3.0, 1.0)
        }
    );
}

#[test]
fn test_parse_partial_tuning_keeps_defaults() {
    let source = "(gravity: 50.0, world_clamp: (min_x: -1.0, max_x: 1.0, min_y: -1.0, max_y: 1.0))";
    let tuning: MovementTuning = parse_ron("tuning.ron", source).expect("tuning should parse");
    assert_eq!(tuning.gravity, 50.0);
    assert_eq!(tuning.speed, 10.0);
    assert_eq!(tuning.deceleration, None);
    assert_eq!(tuning.jump_cut, JumpCut::Clamp);
    assert_eq!(
        tuning.world_clamp,
        Some(WorldClamp {
            min_x: -1.0,
            max_x: 1.0,
            min_y: -1.0,
            max_y: 1.0,
        })
    );
}

#[test]
fn test_parse_error_names_file() {
    let error = parse_ron::<LevelDef>("broken.ron", "(id: ").expect_err("truncated input");
    assert_eq!(error.file, "broken.ron");
    assert!(error.message.starts_with("Parse error"));
    assert!(error.to_string().contains("broken.ron"));
}

// -----------------------------------------------------------------------------
// Validation tests
// -----------------------------------------------------------------------------

#[test]
fn test_builtin_room_is_valid() {
    let level = LevelDef::test_room();
    assert!(validate_level(&level, &MovementTuning::default()).is_empty());
}

#[test]
fn test_wrong_schema_version_rejected() {
    let mut level = level_with(Vec::new());
    level.schema_version = 99;
    let errors = validate_level(&level, &MovementTuning::default());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].surface, None);
    assert!(errors[0].message.contains("schema_version 99"));
}

#[test]
fn test_degenerate_shapes_rejected() {
    let level = level_with(vec![
        solid(ShapeDef::Rect {
            center: (0.0, -0.5),
            size: (0.0, 1.0),
        }),
        solid(ShapeDef::Ramp {
            low: (1.0, 0.0),
            high: (1.0, 2.0),
        }),
        solid(ShapeDef::Ramp {
            low: (1.0, 2.0),
            high: (3.0, 1.0),
        }),
        solid(ShapeDef::Polygon {
            points: vec![(0.0, 0.0), (1.0, 0.0)],
        }),
        solid(ShapeDef::Rect {
            center: (f32::NAN, 0.0),
            size: (1.0, 1.0),
        }),
        solid(ShapeDef::Rect {
            center: (0.0, -20.0),
            size: (1.0, 1.0),
        }),
    ]);
    let errors = validate_level(&level, &MovementTuning::default());
    let flagged: Vec<_> = errors.iter().filter_map(|error| error.surface).collect();
    assert_eq!(flagged, vec![0, 1, 2, 3, 4]);
    assert!(errors[4].message.contains("non-finite"));
}

#[test]
fn test_spawn_inside_surface_rejected() {
    let level = level_with(vec![solid(ShapeDef::Rect {
        center: (0.0, 5.0),
        size: (4.0, 4.0),
    })]);
    let errors = validate_level(&level, &MovementTuning::default());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].surface, Some(0));
    let text = errors[0].to_string();
    assert!(text.starts_with("Level 'scratch' surface 0: spawn point"));
    assert!(text.ends_with("is inside this surface"));
}

#[test]
fn test_spawn_outside_world_clamp_rejected() {
    let tuning = MovementTuning {
        world_clamp: Some(WorldClamp {
            min_x: -1.0,
            max_x: 1.0,
            min_y: -1.0,
            max_y: 1.0,
        }),
        ..MovementTuning::default()
    };
    let errors = validate_level(&level_with(Vec::new()), &tuning);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("world clamp"));
}

// -----------------------------------------------------------------------------
// World building tests
// -----------------------------------------------------------------------------

#[test]
fn test_build_world_uses_surface_indices_as_ids() {
    let level = LevelDef::test_room();
    let world = level.build_world();
    assert_eq!(world.len(), level.surfaces.len());

    // Straight down from spawn lands on the floor, surface 0.
    let ray = ProbeRay::new(
        level.spawn_point(),
        ProbeDirection::Down,
        10.0,
        CategoryMask::GROUND,
    );
    let hit = world.probe(&ray, &[]).expect("floor below spawn");
    assert_eq!(hit.platform, PlatformId(0));
    assert_eq!(hit.point.y, 0.0);

    // The left ledge is surface 3.
    let ray = ProbeRay::new(
        Vec2::new(-10.0, 6.0),
        ProbeDirection::Down,
        10.0,
        CategoryMask::GROUND,
    );
    let hit = world.probe(&ray, &[]).expect("ledge below");
    assert_eq!(hit.platform, PlatformId(3));
    assert_eq!(hit.category, SurfaceCategory::OneWay);
}

// -----------------------------------------------------------------------------
// Asset tests
// -----------------------------------------------------------------------------

#[test]
fn test_shipped_content_loads() {
    let (tuning, level) = load_all_content(&data_dir(), "test_room").expect("assets load");
    assert_eq!(tuning.validate(), Ok(()));
    assert!(tuning.world_clamp.is_some());
    assert_eq!(level.id, "test_room");
    assert_eq!(level.surfaces.len(), LevelDef::test_room().surfaces.len() + 1);
}

#[test]
fn test_missing_level_reports_error() {
    let errors = load_all_content(&data_dir(), "no_such_level").expect_err("level is missing");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].file.ends_with("no_such_level.ron"));
    assert!(errors[0].message.starts_with("IO error"));
}

#[test]
fn test_load_level_reports_validation_failure() {
    let tuning = MovementTuning {
        world_clamp: Some(WorldClamp {
            min_x: 100.0,
            max_x: 200.0,
            min_y: 100.0,
            max_y: 200.0,
        }),
        ..MovementTuning::default()
    };
    let path = data_dir().join("levels/test_room.ron");
    let error = load_level(&path, &tuning).expect_err("spawn lies outside the clamp");
    assert!(error.message.starts_with("Validation failed"));
}
