use crate::{Ball, Config, Paddle, PaddleIntent, Time};
use hecs::World;

/// Move paddles toward their intended position, capped by paddle speed
pub fn move_paddles(world: &mut World, time: &Time, config: &Config) {
    let max_step = config.max_paddle_step(time.dt);
    for (_entity, (paddle, intent)) in world.query_mut::<(&mut Paddle, &PaddleIntent)>() {
        if let Some(target_y) = intent.target_y {
            let delta = (target_y - paddle.y).clamp(-max_step, max_step);
            paddle.y = config.clamp_paddle_y(paddle.y + delta);
        }
    }
}

/// Move balls based on velocity; frozen balls stay put
pub fn move_balls(world: &mut World, time: &Time) {
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        if !ball.frozen {
            ball.pos += ball.vel * time.dt;
        }
    }
}
