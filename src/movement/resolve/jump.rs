//! Jump state machine: normal, pass-through, extra and wall jumps, plus the jump cut.

use bevy::log::trace;

use crate::environment::PlatformId;
use crate::movement::{Action, JumpCut, JumpKind, MovementEvent};

use super::{Tick, count_down};
use super::vertical::start_pass_through;

#[derive(Debug, Clone, Copy, PartialEq)]
enum JumpDecision {
    Jump(JumpKind),
    PassThrough(PlatformId),
}

/// Pick the first rule that applies to a jump press, in priority order.
fn decide(tick: &Tick<'_>) -> Option<JumpDecision> {
    let tuning = tick.tuning;
    let state = &*tick.state;
    let jump = &state.jump;
    let force = tick.jump_force;
    let headroom = !state.contacts.squished(tuning.height());

    if !jump.walled && (jump.grounded || jump.coyote_time > 0.0) && force > 0.0 && headroom {
        return Some(JumpDecision::Jump(JumpKind::Normal));
    }

    if jump.grounded {
        if let Some(platform) = tick.jump_down_platform {
            return Some(JumpDecision::PassThrough(platform));
        }
    }

    let has_air_jump = tuning.infinite_jumping || jump.extra_jumps_remaining > 0;
    if !jump.grounded
        && !jump.walled
        && jump.coyote_time <= 0.0
        && state.velocity.y <= 0.0
        && force > 0.0
        && has_air_jump
    {
        return Some(JumpDecision::Jump(JumpKind::Extra));
    }

    if tuning.wall_jumping && jump.walled && force > 0.0 {
        return Some(JumpDecision::Jump(JumpKind::Wall));
    }

    None
}

fn perform(tick: &mut Tick<'_>, kind: JumpKind) {
    let tuning = tick.tuning;
    let force = tick.jump_force;
    let jump = &mut tick.state.jump;

    match kind {
        JumpKind::Normal => {
            jump.coyote_time = 0.0;
            jump.grounded = false;
        }
        JumpKind::Extra => {
            if !tuning.infinite_jumping {
                jump.extra_jumps_remaining = jump.extra_jumps_remaining.saturating_sub(1);
            }
        }
        JumpKind::Wall => {
            jump.walled = false;
            jump.coyote_time = 0.0;
            jump.extra_jumps_remaining = tuning.extra_jumps;
        }
    }
    jump.variable_height = true;
    tick.state.velocity.y = force;
    tick.emit(MovementEvent::Jumped(kind));
}

/// Evaluate jump input against this tick's collision results.
pub(crate) fn evaluate(tick: &mut Tick<'_>) {
    if tick.input.was_pressed(Action::Jump) {
        match decide(tick) {
            Some(JumpDecision::Jump(kind)) => perform(tick, kind),
            Some(JumpDecision::PassThrough(platform)) => start_pass_through(tick, platform),
            None => trace!("jump press ignored: {:?}", tick.state.jump),
        }
    }

    let tuning = tick.tuning;
    if tick.input.was_released(Action::Jump)
        && tuning.jump_height_control
        && tick.state.jump.variable_height
        && !tick.state.jump.grounded
    {
        let vy = tick.state.velocity.y;
        if vy > 0.0 {
            tick.state.velocity.y = match tuning.jump_cut {
                JumpCut::Divide(divisor) => vy / divisor,
                JumpCut::Clamp => vy.min(tuning.gravity * tick.dt),
            };
            tick.emit(MovementEvent::JumpCut);
        }
        tick.state.jump.variable_height = false;
    }

    if !tick.state.jump.grounded {
        let jump = &mut tick.state.jump;
        jump.coyote_time = count_down(jump.coyote_time, tick.dt);
    }
}
