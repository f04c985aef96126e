//! Human-like imperfection: reaction delay before adopting a new target,
//! and damped paddle momentum instead of instant repositioning.

use ping_core::GameRng;
use rand::Rng;

use crate::HumanConfig;

#[derive(Debug, Clone)]
pub struct HumanFactor {
    config: HumanConfig,
    adopted: Option<f32>,
    /// Time at which a significantly changed target may be adopted
    ready_at: Option<f32>,
    momentum: f32,
}

impl HumanFactor {
    pub fn new(config: HumanConfig) -> Self {
        Self {
            config,
            adopted: None,
            ready_at: None,
            momentum: 0.0,
        }
    }

    pub fn adopted(&self) -> Option<f32> {
        self.adopted
    }

    pub fn momentum(&self) -> f32 {
        self.momentum
    }

    /// Reaction-time gate. Small corrections pass straight through; a
    /// significant change is only adopted once a randomized delay has
    /// elapsed, the previous target being held meanwhile. `bypass` skips
    /// the gate entirely.
    pub fn delayed_target(
        &mut self,
        raw: f32,
        now: f32,
        bypass: bool,
        rng: &mut GameRng,
    ) -> Option<f32> {
        if !raw.is_finite() {
            return self.adopted;
        }

        let significant = match self.adopted {
            Some(adopted) => (raw - adopted).abs() > self.config.change_threshold,
            None => true,
        };

        if bypass || !significant {
            self.adopted = Some(raw);
            self.ready_at = None;
            return self.adopted;
        }

        match self.ready_at {
            Some(ready_at) if now >= ready_at => {
                self.adopted = Some(raw);
                self.ready_at = None;
            }
            Some(_) => {}
            None => {
                let delay = self.reaction_delay(rng);
                if delay <= 0.0 {
                    self.adopted = Some(raw);
                } else {
                    tracing::trace!(raw, delay, "Reaction delay scheduled");
                    self.ready_at = Some(now + delay);
                }
            }
        }
        self.adopted
    }

    fn reaction_delay(&self, rng: &mut GameRng) -> f32 {
        let variance = self.config.reaction_variance;
        let jitter = if variance > 0.0 {
            rng.0.gen_range(-variance..=variance)
        } else {
            0.0
        };
        (self.config.reaction_time + jitter).max(0.0)
    }

    /// Critically damped approach from `current` toward `target`
    pub fn apply_momentum(&mut self, current: f32, target: f32, dt: f32) -> f32 {
        if !current.is_finite() || !target.is_finite() || !dt.is_finite() || dt <= 0.0 {
            return current;
        }

        let c = &self.config;
        let diff = target - current;
        if diff.abs() <= c.snap_distance {
            self.momentum = 0.0;
            return target;
        }

        self.momentum *= (-c.damping * dt).exp();
        if diff.abs() < c.close_distance {
            self.momentum *= (-c.close_damping * dt).exp();
        }
        let accel = (diff * c.stiffness).clamp(-c.max_acceleration, c.max_acceleration);
        self.momentum += accel * dt;

        let next = current + self.momentum * dt;
        // Never carry past the target
        if (target - next).signum() != diff.signum() {
            self.momentum = 0.0;
            return target;
        }
        next
    }

    /// Match momentum to the displacement actually applied this frame
    pub fn constrain_momentum(&mut self, applied: f32, dt: f32) {
        if dt > 0.0 && applied.is_finite() {
            self.momentum = applied / dt;
        } else {
            self.momentum = 0.0;
        }
    }

    /// Next significant change waits out a fresh reaction delay
    pub fn rearm(&mut self) {
        self.ready_at = None;
    }

    pub fn clear_momentum(&mut self) {
        self.momentum = 0.0;
    }

    pub fn clear(&mut self) {
        self.adopted = None;
        self.ready_at = None;
        self.momentum = 0.0;
    }
}
