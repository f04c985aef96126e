use crate::{Ball, Config, Events, GameRng, RespawnState, Time};
use hecs::World;

/// Count down the respawn delay and serve frozen balls once it expires
pub fn respawn_tick(
    world: &mut World,
    time: &Time,
    respawn_state: &mut RespawnState,
    events: &mut Events,
    rng: &mut GameRng,
    config: &Config,
) {
    respawn_state.update(time.dt);
    if !respawn_state.can_respawn() {
        return;
    }

    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        if ball.frozen {
            ball.serve(config.ball_speed_initial, rng);
            events.ball_served = true;
            tracing::debug!(vel = ?ball.vel, "Ball served");
        }
    }
}
