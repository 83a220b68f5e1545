//! Movement domain: level geometry and player bootstrap from loaded content.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::content::{ActiveLevel, LevelDef};
use crate::environment::{Shape, SurfaceCategory};
use crate::movement::{
    GameLayer, LastTick, MovementTuning, PlatformerBody, PlatformerController, Player, Surface,
};

/// Marker for entities spawned from the active level.
#[derive(Component, Debug)]
pub struct LevelGeometry;

/// World-space outline of a non-rectangular surface, drawn with gizmos.
#[derive(Component, Debug, Clone)]
pub struct SurfaceOutline(pub Vec<Vec2>);

fn surface_color(category: SurfaceCategory) -> Color {
    match category {
        SurfaceCategory::Solid => Color::srgb(0.4, 0.5, 0.4),
        SurfaceCategory::Wall => Color::srgb(0.3, 0.3, 0.4),
        SurfaceCategory::OneWay => Color::srgb(0.5, 0.4, 0.3),
    }
}

pub(crate) fn spawn_level_entities(commands: &mut Commands, level: &LevelDef) {
    for (index, surface) in level.surfaces.iter().enumerate() {
        let category = surface.category;
        let layers = CollisionLayers::new(GameLayer::from(category), [GameLayer::Player]);
        let color = surface_color(category);

        match surface.shape.to_shape() {
            Shape::Rect {
                center,
                half_extents,
            } => {
                let size = half_extents * 2.0;
                commands.spawn((
                    LevelGeometry,
                    Surface { category },
                    Sprite {
                        color,
                        custom_size: Some(size),
                        ..default()
                    },
                    Transform::from_translation(center.extend(0.0)),
                    RigidBody::Static,
                    Collider::rectangle(size.x, size.y),
                    layers,
                ));
            }
            Shape::Polygon(points) => {
                let Some(collider) = Collider::convex_hull(points.clone()) else {
                    warn!(
                        "Skipping surface {} of '{}': degenerate polygon",
                        index, level.id
                    );
                    continue;
                };
                commands.spawn((
                    LevelGeometry,
                    Surface { category },
                    SurfaceOutline(points),
                    Transform::default(),
                    RigidBody::Static,
                    collider,
                    layers,
                ));
            }
        }
    }
    debug!(
        "Spawned {} surfaces for level '{}'",
        level.surfaces.len(),
        level.id
    );
}

pub(crate) fn spawn_player_entity(commands: &mut Commands, tuning: &MovementTuning, spawn: Vec2) {
    let controller = match PlatformerController::new(tuning.clone(), spawn) {
        Ok(controller) => controller,
        Err(e) => {
            error!("Cannot spawn player with invalid tuning: {}", e);
            return;
        }
    };

    info!("Spawning player at {}", spawn);
    commands.spawn((
        Player,
        PlatformerBody(controller.into_state()),
        LastTick::default(),
        Sprite {
            color: Color::srgb(0.9, 0.9, 0.9),
            custom_size: Some(Vec2::new(tuning.width(), tuning.height())),
            ..default()
        },
        Transform::from_translation(spawn.extend(1.0)),
    ));
}

pub(crate) fn bootstrap_level(
    mut commands: Commands,
    tuning: Res<MovementTuning>,
    level: Res<ActiveLevel>,
) {
    spawn_level_entities(&mut commands, &level.0);
    spawn_player_entity(&mut commands, &tuning, level.0.spawn_point());
}

pub(crate) fn draw_surface_outlines(mut gizmos: Gizmos, query: Query<(&Surface, &SurfaceOutline)>) {
    for (surface, outline) in &query {
        let Some(first) = outline.0.first() else {
            continue;
        };
        gizmos.linestrip_2d(
            outline.0.iter().copied().chain(std::iter::once(*first)),
            surface_color(surface.category),
        );
    }
}
