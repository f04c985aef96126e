use crate::{Aabb, Ball, Config, Events, GameMap, Paddle, Side};
use glam::Vec2;
use hecs::World;

/// Rect occupied by a paddle; its ball-facing edge sits on `paddle_x`
pub fn paddle_rect(config: &Config, side: Side, top_y: f32) -> Aabb {
    let face_x = config.paddle_x(side);
    let (min_x, max_x) = match side {
        Side::Left => (face_x - config.paddle_width, face_x),
        Side::Right => (face_x, face_x + config.paddle_width),
    };
    Aabb::new(
        Vec2::new(min_x, top_y),
        Vec2::new(max_x, top_y + config.paddle_height),
    )
}

/// Check ball collisions with walls, obstacles and paddles
pub fn check_collisions(world: &mut World, map: &GameMap, config: &Config, events: &mut Events) {
    // Collect paddle data without holding borrows
    let paddles: Vec<Paddle> = world
        .query::<&Paddle>()
        .iter()
        .map(|(_e, paddle)| *paddle)
        .collect();

    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        if ball.frozen {
            continue;
        }
        bounce_off_walls(ball, map, config, events);
        for obstacle in &map.obstacles {
            bounce_off_obstacle(ball, obstacle, config.ball_radius, events);
        }
        for paddle in &paddles {
            if bounce_off_paddle(ball, paddle, config) {
                events.ball_hit_paddle = true;
                break;
            }
        }
    }
}

fn bounce_off_walls(ball: &mut Ball, map: &GameMap, config: &Config, events: &mut Events) {
    let radius = config.ball_radius;
    if ball.pos.y - radius <= 0.0 && ball.vel.y < 0.0 {
        ball.vel.y = -ball.vel.y;
        ball.pos.y = radius;
        events.ball_hit_wall = true;
    } else if ball.pos.y + radius >= map.height && ball.vel.y > 0.0 {
        ball.vel.y = -ball.vel.y;
        ball.pos.y = map.height - radius;
        events.ball_hit_wall = true;
    }
}

/// Reflect off an obstacle along the axis of least penetration
fn bounce_off_obstacle(ball: &mut Ball, obstacle: &Aabb, radius: f32, events: &mut Events) {
    if !obstacle.intersects_circle(ball.pos, radius) {
        return;
    }

    let push_left = ball.pos.x + radius - obstacle.min.x;
    let push_right = obstacle.max.x - (ball.pos.x - radius);
    let push_up = ball.pos.y + radius - obstacle.min.y;
    let push_down = obstacle.max.y - (ball.pos.y - radius);
    let x_pen = push_left.min(push_right);
    let y_pen = push_up.min(push_down);

    if x_pen < y_pen {
        if push_left < push_right {
            ball.pos.x = obstacle.min.x - radius;
            ball.vel.x = -ball.vel.x.abs();
        } else {
            ball.pos.x = obstacle.max.x + radius;
            ball.vel.x = ball.vel.x.abs();
        }
    } else if push_up < push_down {
        ball.pos.y = obstacle.min.y - radius;
        ball.vel.y = -ball.vel.y.abs();
    } else {
        ball.pos.y = obstacle.max.y + radius;
        ball.vel.y = ball.vel.y.abs();
    }
    events.ball_hit_obstacle = true;
}

/// Returns true if the ball was returned by this paddle
fn bounce_off_paddle(ball: &mut Ball, paddle: &Paddle, config: &Config) -> bool {
    let rect = paddle_rect(config, paddle.side, paddle.y);
    if !rect.intersects_circle(ball.pos, config.ball_radius) {
        return false;
    }
    // Only bounce balls travelling toward the paddle
    if !paddle.side.is_approached_by(ball.vel.x) {
        return false;
    }

    // Relative hit position from -1 (top edge) to 1 (bottom edge)
    let half_height = config.paddle_height / 2.0;
    let hit_relative_y =
        ((ball.pos.y - paddle.center_y(config.paddle_height)) / half_height).clamp(-1.0, 1.0);

    let new_speed = (ball.vel.length() * config.ball_speed_increase).min(config.ball_speed_max);
    let angle = hit_relative_y * config.max_deflection;
    let away = -paddle.side.approach_sign();
    ball.vel = Vec2::new(away * angle.cos(), angle.sin()) * new_speed;

    // Push ball out to the paddle face
    let face_x = config.paddle_x(paddle.side);
    ball.pos.x = face_x + away * config.ball_radius;
    true
}
