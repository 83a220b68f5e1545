//! Environment domain: tests for categories, masks, shapes, and static world probes.

use bevy::math::Vec2;

use super::{
    CategoryMask, EnvironmentQuery, PlatformId, ProbeDirection, ProbeRay, Shape, StaticWorld,
    SurfaceCategory,
};

fn floor_world() -> StaticWorld {
    StaticWorld::new().with(
        SurfaceCategory::Solid,
        Shape::rect(Vec2::new(0.0, -0.5), Vec2::new(20.0, 1.0)),
    )
}

// -----------------------------------------------------------------------------
// Category and mask tests
// -----------------------------------------------------------------------------

#[test]
fn test_solid_blocks_every_direction() {
    for dir in [
        ProbeDirection::Left,
        ProbeDirection::Right,
        ProbeDirection::Up,
        ProbeDirection::Down,
    ] {
        assert!(SurfaceCategory::Solid.blocks(dir));
    }
}

#[test]
fn test_wall_blocks_horizontal_only() {
    assert!(SurfaceCategory::Wall.blocks(ProbeDirection::Left));
    assert!(SurfaceCategory::Wall.blocks(ProbeDirection::Right));
    assert!(!SurfaceCategory::Wall.blocks(ProbeDirection::Up));
    assert!(!SurfaceCategory::Wall.blocks(ProbeDirection::Down));
}

#[test]
fn test_one_way_blocks_downward_only() {
    assert!(SurfaceCategory::OneWay.blocks(ProbeDirection::Down));
    assert!(!SurfaceCategory::OneWay.blocks(ProbeDirection::Up));
    assert!(!SurfaceCategory::OneWay.blocks(ProbeDirection::Left));
    assert!(!SurfaceCategory::OneWay.blocks(ProbeDirection::Right));
}

#[test]
fn test_probe_masks() {
    assert!(CategoryMask::GROUND.contains(SurfaceCategory::Solid));
    assert!(CategoryMask::GROUND.contains(SurfaceCategory::OneWay));
    assert!(!CategoryMask::GROUND.contains(SurfaceCategory::Wall));

    assert!(CategoryMask::HORIZONTAL.contains(SurfaceCategory::Wall));
    assert!(CategoryMask::HORIZONTAL.contains(SurfaceCategory::Solid));
    assert!(!CategoryMask::HORIZONTAL.contains(SurfaceCategory::OneWay));

    assert_eq!(CategoryMask::CEILING, CategoryMask::SOLID);
    assert_eq!(CategoryMask::NONE.categories().count(), 0);
}

#[test]
fn test_mask_union_matches_bitor() {
    let mask = CategoryMask::WALL | CategoryMask::ONE_WAY;
    assert_eq!(mask, CategoryMask::WALL.union(CategoryMask::ONE_WAY));
    assert_eq!(
        mask.categories().collect::<Vec<_>>(),
        vec![SurfaceCategory::Wall, SurfaceCategory::OneWay]
    );
    assert_eq!(
        CategoryMask::from(SurfaceCategory::Solid),
        CategoryMask::SOLID
    );
}

#[test]
fn test_direction_from_axis() {
    assert_eq!(ProbeDirection::from_axis(-0.2), Some(ProbeDirection::Left));
    assert_eq!(ProbeDirection::from_axis(1.0), Some(ProbeDirection::Right));
    assert_eq!(ProbeDirection::from_axis(0.0), None);
}

// -----------------------------------------------------------------------------
// Shape tests
// -----------------------------------------------------------------------------

#[test]
fn test_rect_ray_distance_from_each_side() {
    let rect = Shape::rect(Vec2::ZERO, Vec2::new(2.0, 2.0));
    assert_eq!(
        rect.ray_distance(Vec2::new(0.0, 5.0), ProbeDirection::Down),
        Some(4.0)
    );
    assert_eq!(
        rect.ray_distance(Vec2::new(0.0, -3.0), ProbeDirection::Up),
        Some(2.0)
    );
    assert_eq!(
        rect.ray_distance(Vec2::new(4.0, 0.0), ProbeDirection::Left),
        Some(3.0)
    );
    assert_eq!(
        rect.ray_distance(Vec2::new(-4.0, 0.5), ProbeDirection::Right),
        Some(3.0)
    );
}

#[test]
fn test_rect_ray_misses_when_pointing_away_or_beside() {
    let rect = Shape::rect(Vec2::ZERO, Vec2::new(2.0, 2.0));
    assert_eq!(
        rect.ray_distance(Vec2::new(0.0, 5.0), ProbeDirection::Up),
        None
    );
    assert_eq!(
        rect.ray_distance(Vec2::new(3.0, 5.0), ProbeDirection::Down),
        None
    );
}

#[test]
fn test_ray_starting_inside_hits_at_origin() {
    let rect = Shape::rect(Vec2::ZERO, Vec2::new(2.0, 2.0));
    assert_eq!(
        rect.ray_distance(Vec2::new(0.2, 0.3), ProbeDirection::Down),
        Some(0.0)
    );
}

#[test]
fn test_ramp_surface_height_under_probe() {
    // Rises from (0, 0) to (4, 2): surface height is x / 2.
    let ramp = Shape::ramp(Vec2::new(0.0, 0.0), Vec2::new(4.0, 2.0));
    let distance = ramp
        .ray_distance(Vec2::new(2.0, 5.0), ProbeDirection::Down)
        .expect("probe above the ramp should hit it");
    assert!((distance - 4.0).abs() < 1e-5);
}

#[test]
fn test_ramp_vertical_face_blocks_horizontal_rays() {
    let ramp = Shape::ramp(Vec2::new(0.0, 0.0), Vec2::new(4.0, 2.0));
    let distance = ramp
        .ray_distance(Vec2::new(6.0, 1.0), ProbeDirection::Left)
        .expect("the tall side of the ramp is a face");
    assert!((distance - 2.0).abs() < 1e-5);
}

#[test]
fn test_polygon_contains_is_strict() {
    let ramp = Shape::ramp(Vec2::new(0.0, 0.0), Vec2::new(4.0, 2.0));
    assert!(ramp.contains(Vec2::new(3.0, 0.5)));
    assert!(!ramp.contains(Vec2::new(1.0, 1.0)));
    assert!(!ramp.contains(Vec2::new(2.0, 0.0)));
}

// -----------------------------------------------------------------------------
// StaticWorld tests
// -----------------------------------------------------------------------------

#[test]
fn test_world_assigns_sequential_ids() {
    let mut world = StaticWorld::new();
    assert!(world.is_empty());
    let a = world.add(SurfaceCategory::Solid, Shape::rect(Vec2::ZERO, Vec2::ONE));
    let b = world.add(SurfaceCategory::Wall, Shape::rect(Vec2::X, Vec2::ONE));
    assert_eq!(a, PlatformId(0));
    assert_eq!(b, PlatformId(1));
    assert_eq!(world.len(), 2);
    assert_eq!(
        world.surface(b).map(|surface| surface.category),
        Some(SurfaceCategory::Wall)
    );
}

#[test]
fn test_probe_reports_nearest_hit() {
    let world = floor_world().with(
        SurfaceCategory::Solid,
        Shape::rect(Vec2::new(0.0, 2.0), Vec2::new(2.0, 1.0)),
    );
    let ray = ProbeRay::new(
        Vec2::new(0.0, 5.0),
        ProbeDirection::Down,
        10.0,
        CategoryMask::GROUND,
    );
    let hit = world.probe(&ray, &[]).expect("two surfaces below");
    assert_eq!(hit.platform, PlatformId(1));
    assert_eq!(hit.point, Vec2::new(0.0, 2.5));
    assert_eq!(hit.distance, 2.5);
}

#[test]
fn test_probe_respects_length() {
    let ray = ProbeRay::new(
        Vec2::new(0.0, 5.0),
        ProbeDirection::Down,
        4.9,
        CategoryMask::GROUND,
    );
    assert!(floor_world().probe(&ray, &[]).is_none());

    let ray = ProbeRay { length: 5.0, ..ray };
    assert!(floor_world().probe(&ray, &[]).is_some());
}

#[test]
fn test_probe_respects_mask_and_exclusion() {
    let world = floor_world();
    let ray = ProbeRay::new(
        Vec2::new(0.0, 5.0),
        ProbeDirection::Down,
        10.0,
        CategoryMask::ONE_WAY,
    );
    assert!(world.probe(&ray, &[]).is_none());

    let ray = ProbeRay {
        mask: CategoryMask::GROUND,
        ..ray
    };
    assert!(world.probe(&ray, &[PlatformId(0)]).is_none());
}

#[test]
fn test_one_way_invisible_from_below() {
    let world = StaticWorld::new().with(
        SurfaceCategory::OneWay,
        Shape::rect(Vec2::new(0.0, 3.0), Vec2::new(4.0, 0.5)),
    );
    let up = ProbeRay::new(
        Vec2::ZERO,
        ProbeDirection::Up,
        10.0,
        CategoryMask::GROUND | CategoryMask::ONE_WAY,
    );
    assert!(world.probe(&up, &[]).is_none());

    let down = ProbeRay::new(
        Vec2::new(0.0, 6.0),
        ProbeDirection::Down,
        10.0,
        CategoryMask::GROUND,
    );
    let hit = world.probe(&down, &[]).expect("one-way blocks from above");
    assert_eq!(hit.category, SurfaceCategory::OneWay);
    assert_eq!(hit.point.y, 3.25);
}

#[test]
fn test_wall_ignored_by_vertical_probes() {
    let world = StaticWorld::new().with(
        SurfaceCategory::Wall,
        Shape::rect(Vec2::ZERO, Vec2::new(2.0, 2.0)),
    );
    let down = ProbeRay::new(
        Vec2::new(0.0, 5.0),
        ProbeDirection::Down,
        10.0,
        CategoryMask::GROUND | CategoryMask::WALL,
    );
    assert!(world.probe(&down, &[]).is_none());

    let side = ProbeRay::new(
        Vec2::new(5.0, 0.0),
        ProbeDirection::Left,
        10.0,
        CategoryMask::HORIZONTAL,
    );
    assert_eq!(
        world.probe(&side, &[]).map(|hit| hit.point),
        Some(Vec2::new(1.0, 0.0))
    );
}

#[test]
fn test_equal_distance_prefers_earliest_surface() {
    let world = StaticWorld::new()
        .with(
            SurfaceCategory::Solid,
            Shape::rect(Vec2::new(-1.0, 0.0), Vec2::new(2.0, 2.0)),
        )
        .with(
            SurfaceCategory::Solid,
            Shape::rect(Vec2::new(1.0, 0.0), Vec2::new(2.0, 2.0)),
        );
    let ray = ProbeRay::new(
        Vec2::new(0.0, 5.0),
        ProbeDirection::Down,
        10.0,
        CategoryMask::SOLID,
    );
    assert_eq!(world.probe(&ray, &[]).map(|hit| hit.platform), Some(PlatformId(0)));
}
