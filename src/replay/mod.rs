//! Replay domain: recorded input streams and determinism checks.
//!
//! A recording is enough to reproduce a run exactly: the controller is a pure function of
//! tuning, state, tick length, input and geometry.

mod soak;


use std::fs;
use std::path::Path;

use bevy::log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use soak::RandomInputs;

use crate::environment::EnvironmentQuery;
use crate::movement::{MovementInput, MovementState, MovementTuning, TuningError, advance};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub dt: f32,
    pub input: MovementInput,
}

/// Inputs fed to a controller, one entry per tick.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InputRecording {
    pub frames: Vec<RecordedFrame>,
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("recording cannot run with this tuning: {0}")]
    Tuning(#[from] TuningError),
    #[error("malformed recording: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("replays diverged at frame {frame}")]
    Diverged { frame: usize },
}

impl InputRecording {
    pub fn new() -> Self {
        Self::default()
    }

    /// One frame of length `dt` per input.
    pub fn from_inputs(dt: f32, inputs: impl IntoIterator<Item = MovementInput>) -> Self {
        Self {
            frames: inputs
                .into_iter()
                .map(|input| RecordedFrame { dt, input })
                .collect(),
        }
    }

    pub fn push(&mut self, dt: f32, input: MovementInput) {
        self.frames.push(RecordedFrame { dt, input });
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn to_json(&self) -> Result<String, ReplayError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ReplayError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ReplayError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!("Saved {} recorded frames to {}", self.len(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let json = fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}

/// Feed every recorded frame through the controller; returns the state after each frame.
pub fn replay(
    tuning: &MovementTuning,
    initial: &MovementState,
    recording: &InputRecording,
    env: &dyn EnvironmentQuery,
) -> Vec<MovementState> {
    let mut state = initial.clone();
    recording
        .frames
        .iter()
        .map(|frame| {
            let (next, _) = advance(tuning, &state, frame.dt, &frame.input, env);
            state = next;
            state.clone()
        })
        .collect()
}

/// Index of the first frame whose states differ, comparing bit for bit.
///
/// A length mismatch diverges at the end of the shorter run.
pub fn first_divergence(a: &[MovementState], b: &[MovementState]) -> Option<usize> {
    let differs = a
        .iter()
        .zip(b)
        .position(|(left, right)| !same_bits(left, right));
    differs.or_else(|| (a.len() != b.len()).then_some(a.len().min(b.len())))
}

// NaN never compares equal, so derived equality cannot be used here.
fn same_bits(a: &MovementState, b: &MovementState) -> bool {
    let floats = |s: &MovementState| {
        [
            s.position.x,
            s.position.y,
            s.velocity.x,
            s.velocity.y,
            s.input_axis,
            s.bounds.min_x,
            s.bounds.max_x,
            s.bounds.min_y,
            s.bounds.max_y,
            s.jump.coyote_time,
        ]
        .map(f32::to_bits)
    };
    floats(a) == floats(b)
        && a.contacts == b.contacts
        && a.jump.grounded == b.jump.grounded
        && a.jump.walled == b.jump.walled
        && a.jump.extra_jumps_remaining == b.jump.extra_jumps_remaining
        && a.jump.pass_through == b.jump.pass_through
        && a.jump.variable_height == b.jump.variable_height
        && a.one_way_platform == b.one_way_platform
}

/// Index of the first frame where two runs disagree on motion by more than `tolerance`.
///
/// Compares position, velocity and grounding only. Runs against different backends (for
/// example the physics world and a [`StaticWorld`](crate::environment::StaticWorld) built
/// from the same level) hit the same geometry but number their platforms differently.
pub fn first_drift(a: &[MovementState], b: &[MovementState], tolerance: f32) -> Option<usize> {
    let close = |left: f32, right: f32| (left - right).abs() <= tolerance;
    let differs = a.iter().zip(b).position(|(left, right)| {
        !(close(left.position.x, right.position.x)
            && close(left.position.y, right.position.y)
            && close(left.velocity.x, right.velocity.x)
            && close(left.velocity.y, right.velocity.y)
            && left.grounded() == right.grounded())
    });
    differs.or_else(|| (a.len() != b.len()).then_some(a.len().min(b.len())))
}

/// Run `recording` twice from `initial` and fail on the first frame that differs.
pub fn check_determinism(
    tuning: &MovementTuning,
    initial: &MovementState,
    recording: &InputRecording,
    env: &dyn EnvironmentQuery,
) -> Result<(), ReplayError> {
    tuning.validate()?;
    let first = replay(tuning, initial, recording, env);
    let second = replay(tuning, initial, recording, env);
    match first_divergence(&first, &second) {
        Some(frame) => {
            warn!("Replay diverged at frame {} of {}", frame, recording.len());
            Err(ReplayError::Diverged { frame })
        }
        None => {
            debug!("Replay of {} frames is deterministic", recording.len());
            Ok(())
        }
    }
}
