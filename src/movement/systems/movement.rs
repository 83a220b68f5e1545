//! Movement domain: fixed-step controller updates and transform sync.

use bevy::prelude::*;

use crate::movement::{
    AvianEnvironment, LastTick, MovementTuning, PendingInput, PlatformerBody, Player, advance,
};

pub(crate) fn step_platformers(
    time: Res<Time>,
    tuning: Res<MovementTuning>,
    mut pending: ResMut<PendingInput>,
    env: AvianEnvironment,
    mut query: Query<(&mut PlatformerBody, &mut LastTick), With<Player>>,
) {
    let dt = time.delta_secs();
    let input = pending.0;

    for (mut body, mut last) in &mut query {
        let (next, report) = advance(&tuning, &body.0, dt, &input, &env);
        if !next.bounds.contains(next.position) {
            error!(
                "position {} escaped bounds {:?} after a tick",
                next.position, next.bounds
            );
        }
        body.0 = next;
        last.0 = report;
    }

    pending.0.consume_edges();
}

pub(crate) fn sync_transforms(mut query: Query<(&PlatformerBody, &mut Transform), With<Player>>) {
    for (body, mut transform) in &mut query {
        let position = body.0.position;
        transform.translation.x = position.x;
        transform.translation.y = position.y;
    }
}
