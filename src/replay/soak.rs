//! Replay domain: seeded random input for soak runs.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::movement::{Action, ActionSet, MovementInput};

/// Per-tick chance that each action flips between held and released.
fn flip_chance(action: Action) -> f64 {
    match action {
        Action::MoveLeft | Action::MoveRight => 0.04,
        Action::MoveDown => 0.02,
        Action::Jump => 0.08,
    }
}

/// Endless stream of plausible inputs: held levels that persist for a while, with press and
/// release edges on every flip. The same seed always yields the same stream.
#[derive(Debug, Clone)]
pub struct RandomInputs {
    seed: u64,
    rng: ChaCha8Rng,
    held: ActionSet,
}

impl RandomInputs {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            held: ActionSet::EMPTY,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn next_input(&mut self) -> MovementInput {
        let mut input = MovementInput::idle();
        for action in Action::ALL {
            let was_held = self.held.contains(action);
            let held = if self.rng.random_bool(flip_chance(action)) {
                !was_held
            } else {
                was_held
            };
            self.held.set(action, held);
            input = match (was_held, held) {
                (false, true) => input.press(action),
                (true, false) => input.release(action),
                (true, true) => input.hold(action),
                (false, false) => input,
            };
        }
        input
    }
}

impl Iterator for RandomInputs {
    type Item = MovementInput;

    fn next(&mut self) -> Option<MovementInput> {
        Some(self.next_input())
    }
}
