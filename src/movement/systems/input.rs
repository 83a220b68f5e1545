//! Movement domain: input sampling for the platformer.

use bevy::prelude::*;

use crate::movement::{Action, MovementInput};

/// Input gathered between fixed ticks.
///
/// Frames latch edges in, the next fixed tick consumes them, so a tap shorter than a tick
/// still registers exactly once.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct PendingInput(pub MovementInput);

const STICK_DEADZONE: f32 = 0.35;

fn keys(action: Action) -> &'static [KeyCode] {
    match action {
        Action::MoveLeft => &[KeyCode::KeyA, KeyCode::ArrowLeft],
        Action::MoveRight => &[KeyCode::KeyD, KeyCode::ArrowRight],
        Action::MoveDown => &[KeyCode::KeyS, KeyCode::ArrowDown],
        Action::Jump => &[KeyCode::Space, KeyCode::KeyK],
    }
}

fn buttons(action: Action) -> &'static [GamepadButton] {
    match action {
        Action::MoveLeft => &[GamepadButton::DPadLeft],
        Action::MoveRight => &[GamepadButton::DPadRight],
        Action::MoveDown => &[GamepadButton::DPadDown],
        Action::Jump => &[GamepadButton::South],
    }
}

fn stick_holds(action: Action, stick: Vec2) -> bool {
    match action {
        Action::MoveLeft => stick.x < -STICK_DEADZONE,
        Action::MoveRight => stick.x > STICK_DEADZONE,
        Action::MoveDown => stick.y < -STICK_DEADZONE,
        Action::Jump => false,
    }
}

pub(crate) fn read_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    gamepads: Query<&Gamepad>,
    mut pending: ResMut<PendingInput>,
) {
    let mut sample = MovementInput::idle();

    for action in Action::ALL {
        let keys = keys(action);
        let mut held = keyboard.any_pressed(keys.iter().copied());
        let mut pressed = keyboard.any_just_pressed(keys.iter().copied());
        let mut released = keyboard.any_just_released(keys.iter().copied());

        for gamepad in &gamepads {
            let buttons = buttons(action);
            held |= gamepad.any_pressed(buttons.iter().copied())
                || stick_holds(action, gamepad.left_stick());
            pressed |= gamepad.any_just_pressed(buttons.iter().copied());
            released |= gamepad.any_just_released(buttons.iter().copied());
        }

        sample.held.set(action, held);
        sample.pressed.set(action, pressed);
        sample.released.set(action, released);
    }

    if !sample.pressed.is_empty() || !sample.released.is_empty() {
        trace!("input edges: {:?}", sample);
    }
    pending.0 = pending.0.latch(sample);
}
