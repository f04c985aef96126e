use crate::{ArenaLayout, BallState, ThreatConfig};

/// Ranks simultaneous balls and picks the one to defend against
#[derive(Debug, Clone)]
pub struct ThreatSelector {
    config: ThreatConfig,
}

impl ThreatSelector {
    pub fn new(config: ThreatConfig) -> Self {
        Self { config }
    }

    /// Highest-threat valid ball. Ties keep the earliest ball; with no valid
    /// ball at all a stationary ball at the arena centre is returned.
    pub fn select(
        &self,
        balls: &[BallState],
        layout: &ArenaLayout,
        paddle_center_y: f32,
    ) -> BallState {
        let mut best: Option<(BallState, f32)> = None;

        for ball in balls {
            let ball = match ball.checked() {
                Ok(ball) => ball,
                Err(err) => {
                    tracing::debug!(%err, "Skipping malformed ball");
                    continue;
                }
            };
            let threat = self.threat(&ball, layout, paddle_center_y);
            match best {
                Some((_, best_threat)) if threat <= best_threat => {}
                _ => best = Some((ball, threat)),
            }
        }

        match best {
            Some((ball, _)) => ball,
            None => {
                tracing::debug!(count = balls.len(), "No usable ball, tracking arena centre");
                BallState::centered(layout.width, layout.height)
            }
        }
    }

    /// Danger score of a ball; always at least `base_threat`
    pub fn threat(&self, ball: &BallState, layout: &ArenaLayout, paddle_center_y: f32) -> f32 {
        let c = &self.config;
        let approaching = layout.side.is_approached_by(ball.vel.x);

        let distance_factor = 1.0 - layout.normalized_distance(ball.pos.x);
        let speed = (ball.vel.x.abs() / c.reference_speed).clamp(0.0, 1.0);
        let velocity_factor = if approaching {
            speed
        } else {
            speed * c.receding_factor
        };
        let position_factor = if layout.height > 0.0 {
            ((ball.pos.y - paddle_center_y).abs() / layout.height).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let mut extra = distance_factor * c.distance_weight
            + velocity_factor * c.velocity_weight
            + position_factor * c.position_weight;
        if approaching && layout.normalized_distance(ball.pos.x) <= c.near_band {
            extra += c.proximity_bonus;
        }
        if approaching && self.is_blocked(ball, layout) {
            extra *= c.blocked_penalty;
        }

        c.base_threat + extra.max(0.0)
    }

    /// An obstacle sits on the straight line from the ball to the paddle plane
    fn is_blocked(&self, ball: &BallState, layout: &ArenaLayout) -> bool {
        if layout.obstacles.is_empty() || ball.vel.x == 0.0 {
            return false;
        }
        let time = ((layout.paddle_x - ball.pos.x) / ball.vel.x).max(0.0);
        layout
            .obstacles
            .iter()
            .any(|obstacle| obstacle.ray_entry(ball.pos, ball.vel, time).is_some())
    }
}
