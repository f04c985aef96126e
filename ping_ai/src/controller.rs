//! Paddle controller
//!
//! Per-frame sequencing: supervisor check, threat selection, intercept
//! prediction, spike offset, reaction delay, momentum, clamp.

use ping_core::{GameRng, Params, Side};
use serde::Serialize;

use crate::{
    AiConfig, ArenaLayout, BallState, ConfigError, Directive, HumanFactor, Observation,
    OffensePlanner, Supervisor, SupervisorState, ThreatSelector, TrajectoryPredictor,
};

/// Everything the controller needs from the game loop for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    /// Primary ball, used for respawn and teleport detection
    pub ball: BallState,
    /// All active balls; the primary ball is used if empty
    pub balls: &'a [BallState],
    /// Current paddle top-edge Y
    pub paddle_y: f32,
    /// Largest move the paddle may make this frame
    pub max_step: f32,
    pub ball_frozen: bool,
    pub score_self: u8,
    pub score_opp: u8,
    pub dt: f32,
    pub now: f32,
}

/// Read-only view of the AI's internals
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AiSnapshot {
    pub state: SupervisorState,
    /// Last predicted intercept (paddle centre Y)
    pub last_intercept: Option<f32>,
    /// Target top-edge Y currently adopted after the reaction delay
    pub adopted_target: Option<f32>,
    pub momentum: f32,
    pub spiking: bool,
    pub cache_entries: usize,
    pub portal_links: usize,
}

/// AI for one paddle
pub struct PaddleAi {
    layout: ArenaLayout,
    config: AiConfig,
    rng: GameRng,
    predictor: TrajectoryPredictor,
    threat: ThreatSelector,
    offense: OffensePlanner,
    human: HumanFactor,
    supervisor: Supervisor,
    last_intercept: Option<f32>,
    /// Value returned by the previous `move_paddle`
    last_output: Option<f32>,
    last_now: f32,
}

impl PaddleAi {
    /// AI with the default tuning
    pub fn new(layout: ArenaLayout, seed: u64) -> Self {
        Self::build(layout, AiConfig::default(), seed)
    }

    pub fn with_config(layout: ArenaLayout, config: AiConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(layout, config, seed))
    }

    fn build(layout: ArenaLayout, config: AiConfig, seed: u64) -> Self {
        Self {
            predictor: TrajectoryPredictor::new(config.prediction.clone(), &layout),
            threat: ThreatSelector::new(config.threat.clone()),
            offense: OffensePlanner::new(config.offense.clone()),
            human: HumanFactor::new(config.human.clone()),
            supervisor: Supervisor::new(config.safety.clone()),
            rng: GameRng::new(seed),
            last_intercept: None,
            last_output: None,
            last_now: 0.0,
            layout,
            config,
        }
    }

    pub fn side(&self) -> Side {
        self.layout.side
    }

    pub fn layout(&self) -> &ArenaLayout {
        &self.layout
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn state(&self) -> SupervisorState {
        self.supervisor.state()
    }

    /// New paddle top-edge Y for this frame. Always finite and within
    /// `[0, arena_height - paddle_height]`, whatever the inputs.
    pub fn move_paddle(&mut self, input: &FrameInput) -> f32 {
        let layout = &self.layout;
        let paddle_y = if input.paddle_y.is_finite() {
            layout.clamp_paddle_y(input.paddle_y)
        } else {
            layout.paddle_center_y()
        };
        let dt = if input.dt.is_finite() {
            input.dt.clamp(0.0, Params::MAX_DT)
        } else {
            0.0
        };
        let max_step = if input.max_step.is_finite() && input.max_step >= 0.0 {
            input.max_step
        } else {
            layout.paddle_speed * dt
        };
        let now = if input.now.is_finite() { input.now } else { self.last_now };
        self.last_now = now;

        let ball = input.ball.checked().unwrap_or_else(|err| {
            tracing::debug!(%err, "Malformed primary ball, using arena centre");
            BallState::centered(layout.width, layout.height)
        });

        let observation = Observation {
            ball,
            ball_frozen: input.ball_frozen,
            paddle_y,
            commanded_y: self.last_output,
            now,
        };
        let verdict = self
            .supervisor
            .check(&observation, &self.layout, self.predictor.portals());
        if verdict.full_clear {
            self.clear_tracking();
        }
        if verdict.retarget {
            self.predictor.invalidate_cache();
            self.human.rearm();
        }

        let next = match verdict.directive {
            Directive::GlideToCenter => {
                let speed_step = self.config.safety.reset_speed * dt;
                self.move_to_center(paddle_y, max_step.min(speed_step))
            }
            Directive::HoldCenter => self.move_to_center(paddle_y, max_step),
            Directive::Track => self.track(input, ball, paddle_y, max_step, dt, now),
        };

        let output = if next.is_finite() {
            self.layout.clamp_paddle_y(next)
        } else {
            tracing::debug!(next, "Non-finite paddle output, holding position");
            paddle_y
        };
        self.last_output = Some(output);
        output
    }

    fn move_to_center(&mut self, paddle_y: f32, max_step: f32) -> f32 {
        self.human.clear_momentum();
        let center = self.layout.paddle_center_y();
        let diff = center - paddle_y;
        if diff.abs() <= self.config.safety.center_tolerance || diff.abs() <= max_step {
            center
        } else {
            paddle_y + diff.signum() * max_step
        }
    }

    fn track(
        &mut self,
        input: &FrameInput,
        primary: BallState,
        paddle_y: f32,
        max_step: f32,
        dt: f32,
        now: f32,
    ) -> f32 {
        let half = self.layout.paddle_height / 2.0;
        let candidates = if input.balls.is_empty() {
            std::slice::from_ref(&primary)
        } else {
            input.balls
        };
        let ball = self.threat.select(candidates, &self.layout, paddle_y + half);

        let predicted = self.predictor.predict(ball, &self.layout, now, &mut self.rng);
        self.last_intercept = Some(predicted);

        let offset = self.offense.plan(
            &ball,
            predicted,
            input.score_self,
            input.score_opp,
            now,
            &self.layout,
            &mut self.rng,
        );
        let raw = self.layout.clamp_center(predicted - offset) - half;

        let bypass = self.layout.side.is_approached_by(ball.vel.x)
            && self.layout.normalized_distance(ball.pos.x) <= self.config.human.bypass_distance;
        let target = self
            .human
            .delayed_target(raw, now, bypass, &mut self.rng)
            .unwrap_or(paddle_y);

        let desired = self.human.apply_momentum(paddle_y, target, dt);
        let step = (desired - paddle_y).clamp(-max_step, max_step);
        let next = self.layout.clamp_paddle_y(paddle_y + step);
        self.human.constrain_momentum(next - paddle_y, dt);
        next
    }

    /// A point was scored: drop everything learned about the rally and
    /// glide back to centre
    pub fn on_score_event(&mut self, scorer: Side) {
        tracing::debug!(?scorer, side = ?self.layout.side, "Score event, clearing AI state");
        self.clear_tracking();
        self.supervisor.clear();
        self.supervisor.request_reset();
    }

    /// Glide to centre on demand
    pub fn reset_position(&mut self) {
        self.supervisor.request_reset();
    }

    /// Rebind to a new level layout
    pub fn bind_arena(&mut self, layout: ArenaLayout) {
        self.layout = layout;
        self.clear_tracking();
        self.supervisor.clear();
        self.reset_position();
    }

    fn clear_tracking(&mut self) {
        self.predictor.rebuild(&self.layout);
        self.offense.clear();
        self.human.clear();
        self.last_intercept = None;
        self.last_output = None;
    }

    pub fn debug_snapshot(&self) -> AiSnapshot {
        AiSnapshot {
            state: self.supervisor.state(),
            last_intercept: self.last_intercept,
            adopted_target: self.human.adopted(),
            momentum: self.human.momentum(),
            spiking: self.offense.is_spiking(),
            cache_entries: self.predictor.cache_len(),
            portal_links: self.predictor.portals().len(),
        }
    }
}
