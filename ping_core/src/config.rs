use crate::{Params, Side};

/// Game configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub arena_width: f32,
    pub arena_height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,
    pub paddle_margin: f32,
    pub ball_radius: f32,
    pub ball_speed_initial: f32,
    pub ball_speed_max: f32,
    pub ball_speed_increase: f32,
    pub max_deflection: f32,
    pub win_score: u8,
    pub respawn_delay: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            arena_width: Params::ARENA_WIDTH,
            arena_height: Params::ARENA_HEIGHT,
            paddle_width: Params::PADDLE_WIDTH,
            paddle_height: Params::PADDLE_HEIGHT,
            paddle_speed: Params::PADDLE_SPEED,
            paddle_margin: Params::PADDLE_MARGIN,
            ball_radius: Params::BALL_RADIUS,
            ball_speed_initial: Params::BALL_SPEED_INITIAL,
            ball_speed_max: Params::BALL_SPEED_MAX,
            ball_speed_increase: Params::BALL_SPEED_INCREASE,
            max_deflection: Params::MAX_DEFLECTION,
            win_score: Params::WIN_SCORE,
            respawn_delay: Params::RESPAWN_DELAY,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// X coordinate of the paddle's ball-facing plane
    pub fn paddle_x(&self, side: Side) -> f32 {
        match side {
            Side::Left => self.paddle_margin,
            Side::Right => self.arena_width - self.paddle_margin,
        }
    }

    /// Clamp a paddle's top edge to arena bounds
    pub fn clamp_paddle_y(&self, y: f32) -> f32 {
        y.clamp(0.0, (self.arena_height - self.paddle_height).max(0.0))
    }

    /// Top-edge Y that vertically centres the paddle
    pub fn paddle_center_y(&self) -> f32 {
        ((self.arena_height - self.paddle_height) / 2.0).max(0.0)
    }

    /// Largest distance a paddle may travel in `dt`
    pub fn max_paddle_step(&self, dt: f32) -> f32 {
        self.paddle_speed * dt
    }
}
