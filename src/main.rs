use avian2d::prelude::*;
use bevy::prelude::*;

use kinematic_platformer::content::ContentPlugin;
use kinematic_platformer::movement::MovementPlugin;

/// World units per screen pixel; the default character is one unit wide.
const CAMERA_SCALE: f32 = 1.0 / 28.0;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Kinematic Platformer".to_string(),
                resolution: (1280, 720).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(PhysicsPlugins::default())
        .add_plugins((ContentPlugin, MovementPlugin))
        .add_systems(Startup, spawn_camera)
        .run();
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Projection::from(OrthographicProjection {
            scale: CAMERA_SCALE,
            ..OrthographicProjection::default_2d()
        }),
        Transform::from_xyz(0.0, 8.0, 0.0),
    ));
}
