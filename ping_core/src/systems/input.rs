use hecs::World;

use crate::{InputQueue, Paddle, PaddleIntent};

/// Turn queued paddle commands into paddle intents
pub fn ingest_inputs(world: &mut World, queue: &mut InputQueue) {
    for &(side, paddle_y) in &queue.inputs {
        if !paddle_y.is_finite() {
            tracing::debug!(?side, "Ignoring non-finite paddle command");
            continue;
        }
        for (_entity, (paddle, intent)) in world.query_mut::<(&Paddle, &mut PaddleIntent)>() {
            if paddle.side == side {
                intent.target_y = Some(paddle_y);
            }
        }
    }

    queue.clear();
}
