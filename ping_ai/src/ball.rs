use glam::Vec2;

use crate::InputError;

/// Read-only ball snapshot handed to the AI each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallState {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl BallState {
    pub fn new(x: f32, y: f32, dx: f32, dy: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::new(dx, dy),
        }
    }

    /// Stationary stand-in used when no usable ball data exists
    pub fn centered(width: f32, height: f32) -> Self {
        Self::new(width / 2.0, height / 2.0, 0.0, 0.0)
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Reject snapshots with NaN or infinite fields
    pub fn checked(self) -> Result<Self, InputError> {
        let fields = [
            ("x", self.pos.x),
            ("y", self.pos.y),
            ("dx", self.vel.x),
            ("dy", self.vel.y),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(InputError::NonFiniteBall { field, value });
            }
        }
        Ok(self)
    }

    pub fn is_valid(&self) -> bool {
        self.checked().is_ok()
    }
}

impl From<&ping_core::Ball> for BallState {
    fn from(ball: &ping_core::Ball) -> Self {
        Self {
            pos: ball.pos,
            vel: ball.vel,
        }
    }
}
