use crate::{Ball, Events, GameMap};
use hecs::World;

/// Teleport balls whose centre entered a portal mouth. Velocity is kept.
pub fn teleport_balls(world: &mut World, map: &GameMap, events: &mut Events) {
    if map.portals.is_empty() {
        return;
    }
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        if ball.frozen {
            continue;
        }
        if let Some((source, target)) = map.portal_at(ball.pos) {
            let exit = source.remap_through(&target, ball.pos, ball.vel);
            tracing::trace!(from = ?ball.pos, to = ?exit, "Ball teleported");
            ball.pos = exit;
            events.ball_teleported = true;
        }
    }
}
