/// Game tuning parameters for Ping (arena-local pixels, seconds)
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Arena
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    // Paddle
    pub const PADDLE_WIDTH: f32 = 15.0;
    pub const PADDLE_HEIGHT: f32 = 90.0;
    pub const PADDLE_SPEED: f32 = 480.0; // px per second
    pub const PADDLE_MARGIN: f32 = 30.0; // Distance from side edge to paddle face

    // Ball
    pub const BALL_RADIUS: f32 = 8.0;
    pub const BALL_SPEED_INITIAL: f32 = 360.0;
    pub const BALL_SPEED_MAX: f32 = 900.0;
    pub const BALL_SPEED_INCREASE: f32 = 1.05; // Multiply speed on paddle hit
    pub const MAX_DEFLECTION: f32 = 0.9; // ~52 degrees off the paddle edge

    // Score
    pub const WIN_SCORE: u8 = 5;
    pub const RESPAWN_DELAY: f32 = 1.0; // Ball stays frozen at centre

    // Physics
    pub const FIXED_DT: f32 = 1.0 / 60.0;
    pub const MAX_DT: f32 = 0.1; // Clamp to prevent large jumps
}
