//! Movement domain: debug-only probe drawing, soak bot, and content reload.

use bevy::prelude::*;

use crate::content::{ActiveLevel, ContentPaths, reload_content};
use crate::movement::bootstrap::{LevelGeometry, spawn_level_entities, spawn_player_entity};
use crate::movement::{
    LastTick, MovementState, MovementTuning, PendingInput, PlatformerBody, Player,
};
use crate::replay::{InputRecording, RandomInputs, check_determinism, first_drift, replay};

/// Largest position or velocity error tolerated between the live run and its replay.
const SOAK_TOLERANCE: f32 = 1e-2;

/// A soak run in progress: random inputs, everything needed to replay them, and the states
/// the live run actually produced.
#[derive(Debug)]
struct SoakRun {
    inputs: RandomInputs,
    start: MovementState,
    recording: InputRecording,
    live: Vec<MovementState>,
}

#[derive(Resource, Debug, Default)]
pub struct DevTools {
    pub show_probes: bool,
    next_seed: u64,
    soak: Option<SoakRun>,
}

impl DevTools {
    pub fn soaking(&self) -> bool {
        self.soak.is_some()
    }
}

pub(crate) fn toggle_dev_tools(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut dev: ResMut<DevTools>,
    tuning: Res<MovementTuning>,
    level: Res<ActiveLevel>,
    player: Query<&PlatformerBody, With<Player>>,
) {
    if keyboard.just_pressed(KeyCode::F3) {
        dev.show_probes = !dev.show_probes;
        info!("Probe gizmos: {}", dev.show_probes);
    }

    if !keyboard.just_pressed(KeyCode::F2) {
        return;
    }
    if let Some(run) = dev.soak.take() {
        finish_soak(&tuning, &level, run);
        return;
    }

    let Ok(body) = player.single() else {
        warn!("No player to soak");
        return;
    };
    let seed = dev.next_seed;
    dev.next_seed += 1;
    info!("Soak run {} started", seed);
    dev.soak = Some(SoakRun {
        inputs: RandomInputs::new(seed),
        start: body.0.clone(),
        recording: InputRecording::new(),
        live: Vec::new(),
    });
}

/// Replay a finished run against the level's own geometry and compare it with what the
/// physics-backed run did.
fn finish_soak(tuning: &MovementTuning, level: &ActiveLevel, run: SoakRun) {
    let seed = run.inputs.seed();
    let world = level.0.build_world();
    if let Err(e) = check_determinism(tuning, &run.start, &run.recording, &world) {
        error!("Soak run {} does not replay consistently: {}", seed, e);
        return;
    }

    let replayed = replay(tuning, &run.start, &run.recording, &world);
    match first_drift(&run.live, &replayed, SOAK_TOLERANCE) {
        None => info!(
            "Soak run {} stopped after {} ticks; replay matches the live run",
            seed,
            run.recording.len()
        ),
        Some(frame) => {
            let live = run.live.get(frame);
            let replayed = replayed.get(frame);
            warn!(
                "Soak run {} drifted from its replay at frame {} of {}: live {:?}, replayed {:?}",
                seed,
                frame,
                run.recording.len(),
                live.map(|state| (state.position, state.velocity)),
                replayed.map(|state| (state.position, state.velocity)),
            );
        }
    }
}

/// Replace player input with the soak bot's while a run is active.
pub(crate) fn drive_soak_bot(
    time: Res<Time>,
    mut dev: ResMut<DevTools>,
    mut pending: ResMut<PendingInput>,
) {
    let Some(run) = dev.soak.as_mut() else {
        return;
    };
    let input = run.inputs.next_input();
    run.recording.push(time.delta_secs(), input);
    pending.0 = input;
}

/// Keep the state the player reached on each soak tick.
pub(crate) fn record_soak_states(
    mut dev: ResMut<DevTools>,
    player: Query<&PlatformerBody, With<Player>>,
) {
    let Some(run) = dev.soak.as_mut() else {
        return;
    };
    if let Ok(body) = player.single() {
        run.live.push(body.0.clone());
    }
}

pub(crate) fn reload_level(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    paths: Res<ContentPaths>,
    mut tuning: ResMut<MovementTuning>,
    mut level: ResMut<ActiveLevel>,
    mut dev: ResMut<DevTools>,
    spawned: Query<Entity, Or<(With<LevelGeometry>, With<Player>)>>,
) {
    if !keyboard.just_pressed(KeyCode::F5) {
        return;
    }
    if !reload_content(&paths, &mut tuning, &mut level) {
        return;
    }

    for entity in &spawned {
        commands.entity(entity).despawn();
    }
    dev.soak = None;
    spawn_level_entities(&mut commands, &level.0);
    spawn_player_entity(&mut commands, &tuning, level.0.spawn_point());
    info!("Reloaded level '{}'", level.0.name);
}

pub(crate) fn draw_probe_gizmos(
    mut gizmos: Gizmos,
    dev: Res<DevTools>,
    tuning: Res<MovementTuning>,
    query: Query<(&PlatformerBody, &LastTick), With<Player>>,
) {
    if !dev.show_probes {
        return;
    }
    let miss = Color::srgba(0.6, 0.6, 0.6, 0.6);
    let hit_color = Color::srgb(0.2, 0.9, 0.3);
    let body_color = Color::srgb(0.9, 0.8, 0.2);

    for (body, last) in &query {
        gizmos.rect_2d(
            body.0.position,
            Vec2::new(tuning.width(), tuning.height()),
            body_color,
        );
        for probe in &last.0.probes {
            match probe.hit {
                Some(hit) => {
                    gizmos.line_2d(probe.ray.origin, hit.point, hit_color);
                    gizmos.circle_2d(hit.point, 0.06, hit_color);
                }
                None => gizmos.line_2d(probe.ray.origin, probe.ray.end(), miss),
            }
        }
    }
}
