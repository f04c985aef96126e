use ping_core::GameRng;
use rand::Rng;

use crate::{ArenaLayout, BallState, OffenseConfig};

/// Decides when to attempt a spike and where on the paddle to take the ball
#[derive(Debug, Clone)]
pub struct OffensePlanner {
    config: OffenseConfig,
    last_spike: Option<f32>,
    /// Contact offset chosen for the current approach
    active_offset: Option<f32>,
    /// A spike roll has been made for the current approach
    approach_decided: bool,
}

impl OffensePlanner {
    pub fn new(config: OffenseConfig) -> Self {
        Self {
            config,
            last_spike: None,
            active_offset: None,
            approach_decided: false,
        }
    }

    pub fn clear(&mut self) {
        self.last_spike = None;
        self.active_offset = None;
        self.approach_decided = false;
    }

    pub fn is_spiking(&self) -> bool {
        self.active_offset.is_some()
    }

    /// Multiplier on spike probability from the score difference
    pub fn aggression(&self, score_self: u8, score_opp: u8) -> f32 {
        let diff = score_self as i16 - score_opp as i16;
        if diff <= -2 {
            self.config.trailing_aggression
        } else if diff >= 2 {
            self.config.leading_aggression
        } else {
            1.0
        }
    }

    /// Roll for a spike. Refused during cooldown, for receding balls and for
    /// balls still far from the paddle; otherwise a weighted coin flip.
    #[allow(clippy::too_many_arguments)]
    pub fn should_spike(
        &mut self,
        ball_x: f32,
        ball_dx: f32,
        score_self: u8,
        score_opp: u8,
        now: f32,
        layout: &ArenaLayout,
        rng: &mut GameRng,
    ) -> bool {
        if !self.config.enabled {
            return false;
        }
        if let Some(last) = self.last_spike {
            if now - last < self.config.cooldown {
                return false;
            }
        }
        if !layout.side.is_approached_by(ball_dx) {
            return false;
        }
        if layout.normalized_distance(ball_x) > self.config.proximity {
            return false;
        }

        let probability =
            (self.config.base_probability * self.aggression(score_self, score_opp)).clamp(0.0, 1.0);
        let spike = rng.0.gen_bool(probability as f64);
        if spike {
            self.last_spike = Some(now);
        }
        spike
    }

    /// Offset from paddle centre to the contact point. A ball predicted in
    /// the upper half is taken on the lower part of the paddle (sending it
    /// down) and vice versa.
    pub fn spike_contact_offset(&self, predicted_y: f32, arena_height: f32, paddle_height: f32) -> f32 {
        let reach = paddle_height / 2.0 * self.config.edge_fraction.clamp(0.0, 0.95);
        if predicted_y < arena_height / 2.0 {
            reach
        } else {
            -reach
        }
    }

    /// Contact offset for this frame: zero unless a spike is under way. One
    /// roll is made per approach, once the ball is inside the spike band.
    #[allow(clippy::too_many_arguments)]
    pub fn plan(
        &mut self,
        ball: &BallState,
        predicted_y: f32,
        score_self: u8,
        score_opp: u8,
        now: f32,
        layout: &ArenaLayout,
        rng: &mut GameRng,
    ) -> f32 {
        if !layout.side.is_approached_by(ball.vel.x) {
            self.active_offset = None;
            self.approach_decided = false;
            return 0.0;
        }
        if let Some(offset) = self.active_offset {
            return offset;
        }
        if self.approach_decided || layout.normalized_distance(ball.pos.x) > self.config.proximity {
            return 0.0;
        }

        self.approach_decided = true;
        if self.should_spike(ball.pos.x, ball.vel.x, score_self, score_opp, now, layout, rng) {
            let offset = self.spike_contact_offset(predicted_y, layout.height, layout.paddle_height);
            tracing::debug!(predicted_y, offset, "Spike planned");
            self.active_offset = Some(offset);
            return offset;
        }
        0.0
    }
}
