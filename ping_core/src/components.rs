use glam::Vec2;

/// Which end of the arena a paddle defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Sign of ball `dx` for a ball travelling toward this side
    pub fn approach_sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// True if a ball with horizontal velocity `dx` is heading at this side
    pub fn is_approached_by(self, dx: f32) -> bool {
        dx * self.approach_sign() > 0.0
    }
}

/// Paddle component - `y` is the top edge in arena pixels
#[derive(Debug, Clone, Copy)]
pub struct Paddle {
    pub side: Side,
    pub y: f32,
}

impl Paddle {
    pub fn new(side: Side, y: f32) -> Self {
        Self { side, y }
    }

    pub fn center_y(&self, paddle_height: f32) -> f32 {
        self.y + paddle_height / 2.0
    }
}

/// Ball component
#[derive(Debug, Clone, Copy)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub frozen: bool, // Held at centre while waiting to be served
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            frozen: false,
        }
    }

    /// Park the ball at `center`, frozen until served
    pub fn reset(&mut self, center: Vec2) {
        self.pos = center;
        self.vel = Vec2::ZERO;
        self.frozen = true;
    }

    /// Release a frozen ball with a random direction within +-45 degrees of horizontal
    pub fn serve(&mut self, speed: f32, rng: &mut crate::GameRng) {
        use rand::Rng;
        let right = rng.0.gen_bool(0.5);
        let angle: f32 = if right {
            rng.0.gen_range(-0.785..0.785)
        } else {
            rng.0.gen_range(2.356..3.927)
        };

        self.vel = Vec2::new(angle.cos(), angle.sin()) * speed;
        self.frozen = false;
    }
}

/// Desired paddle position, consumed by `move_paddles`
#[derive(Debug, Clone, Copy, Default)]
pub struct PaddleIntent {
    pub target_y: Option<f32>,
}

impl PaddleIntent {
    pub fn new() -> Self {
        Self::default()
    }
}
