//! Trajectory prediction.
//!
//! Projects a ball's straight-line motion to the paddle plane, folding the
//! path off the top and bottom walls and following it through portals. A
//! ball moving away is assumed to come back off the far wall.

use std::collections::HashMap;

use glam::Vec2;
use ping_core::GameRng;
use rand::Rng;

use crate::{ArenaLayout, BallState, PortalMap, PredictionConfig};

/// Below this |dx| a ball is treated as never reaching the paddle plane
const MIN_DX: f32 = 1e-3;

/// Map an unconstrained Y back into `[0, height]` as if it bounced
/// elastically off both walls (triangle wave with period `2 * height`).
pub fn wall_fold(y: f32, height: f32) -> f32 {
    if height <= 0.0 {
        return 0.0;
    }
    let period = 2.0 * height;
    let m = y.rem_euclid(period);
    if m <= height {
        m
    } else {
        period - m
    }
}

/// [`wall_fold`] over the band `[lo, hi]`
pub fn wall_fold_between(y: f32, lo: f32, hi: f32) -> f32 {
    lo + wall_fold(y - lo, hi - lo)
}

/// Ball state after `t` seconds of flight, including wall bounces
pub fn advance(ball: BallState, t: f32, height: f32) -> BallState {
    if ball.vel.y == 0.0 {
        return BallState {
            pos: ball.pos + ball.vel * t,
            vel: ball.vel,
        };
    }
    let unfolded = ball.pos.y + ball.vel.y * t;
    let mirrored = height > 0.0 && unfolded.rem_euclid(2.0 * height) > height;
    let dy = if mirrored { -ball.vel.y } else { ball.vel.y };
    BallState {
        pos: Vec2::new(ball.pos.x + ball.vel.x * t, wall_fold(unfolded, height)),
        vel: Vec2::new(ball.vel.x, dy),
    }
}

/// [`advance`] for a ball whose centre reflects at `lo` and `hi`
pub fn advance_between(ball: BallState, t: f32, lo: f32, hi: f32) -> BallState {
    let mut shifted = ball;
    shifted.pos.y -= lo;
    let mut later = advance(shifted, t, hi - lo);
    later.pos.y += lo;
    later
}

/// How an intercept was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionKind {
    /// Ball heading straight for the paddle plane
    Inbound,
    /// Ball moving away; projected back off the far wall
    Returning,
    /// Path passes through at least one portal
    Portal,
    /// Ball already past the paddle; nothing to intercept
    BehindPaddle,
    /// No horizontal motion
    Degenerate,
    /// Return trip longer than the configured horizon
    TooFar,
    /// Portal recursion cap reached
    PortalLoop,
}

impl PredictionKind {
    /// Fallbacks are returned verbatim, without simulated tracking error
    pub fn is_fallback(self) -> bool {
        matches!(
            self,
            PredictionKind::BehindPaddle
                | PredictionKind::Degenerate
                | PredictionKind::TooFar
                | PredictionKind::PortalLoop
        )
    }
}

/// Ball-centre Y at the paddle plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub y: f32,
    pub kind: PredictionKind,
}

impl Prediction {
    fn new(y: f32, kind: PredictionKind) -> Self {
        Self { y, kind }
    }
}

pub type CacheKey = (i32, i32, i32, i32);

/// Intercepts keyed by a quantized ball state. The whole cache is dropped
/// when its epoch expires, so no entry outlives one interval.
#[derive(Debug, Clone)]
pub struct PredictionCache {
    entries: HashMap<CacheKey, f32>,
    epoch_start: Option<f32>,
    interval: f32,
    position_grid: f32,
    velocity_grid: f32,
}

impl PredictionCache {
    pub fn new(config: &PredictionConfig) -> Self {
        Self {
            entries: HashMap::new(),
            epoch_start: None,
            interval: config.cache_interval,
            position_grid: config.cache_position_grid.max(f32::EPSILON),
            velocity_grid: config.cache_velocity_grid.max(f32::EPSILON),
        }
    }

    /// Start a new epoch if the current one has expired
    pub fn refresh(&mut self, now: f32) {
        let expired = match self.epoch_start {
            Some(start) => now < start || now - start >= self.interval,
            None => true,
        };
        if expired {
            self.entries.clear();
            self.epoch_start = Some(now);
        }
    }

    pub fn key(&self, ball: &BallState) -> CacheKey {
        let p = self.position_grid;
        let v = self.velocity_grid;
        (
            (ball.pos.x / p).round() as i32,
            (ball.pos.y / p).round() as i32,
            (ball.vel.x / v).round() as i32,
            (ball.vel.y / v).round() as i32,
        )
    }

    pub fn get(&mut self, ball: &BallState, now: f32) -> Option<f32> {
        self.refresh(now);
        let key = self.key(ball);
        self.entries.get(&key).copied()
    }

    pub fn insert(&mut self, ball: &BallState, now: f32, y: f32) {
        self.refresh(now);
        let key = self.key(ball);
        self.entries.insert(key, y);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.epoch_start = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Predicts where a ball will cross the paddle plane
#[derive(Debug, Clone)]
pub struct TrajectoryPredictor {
    config: PredictionConfig,
    portals: PortalMap,
    cache: PredictionCache,
}

impl TrajectoryPredictor {
    pub fn new(config: PredictionConfig, layout: &ArenaLayout) -> Self {
        let cache = PredictionCache::new(&config);
        Self {
            config,
            portals: PortalMap::build(&layout.portals),
            cache,
        }
    }

    /// Tear down the portal map and cache and rebuild from `layout`
    pub fn rebuild(&mut self, layout: &ArenaLayout) {
        self.portals = PortalMap::build(&layout.portals);
        self.cache.clear();
    }

    pub fn invalidate_cache(&mut self) {
        self.cache.clear();
    }

    pub fn portals(&self) -> &PortalMap {
        &self.portals
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Intercept Y for the paddle centre, with tracking error, clamped so the
    /// paddle stays in the arena. Results are cached for one epoch.
    pub fn predict(
        &mut self,
        ball: BallState,
        layout: &ArenaLayout,
        now: f32,
        rng: &mut GameRng,
    ) -> f32 {
        let ball = match ball.checked() {
            Ok(ball) => ball,
            Err(err) => {
                tracing::debug!(%err, "Predicting centre for malformed ball");
                return layout.clamp_center(layout.height / 2.0);
            }
        };

        if let Some(y) = self.cache.get(&ball, now) {
            return y;
        }

        let prediction = self.intercept(ball, layout);
        let y = if prediction.kind.is_fallback() {
            tracing::debug!(kind = ?prediction.kind, y = prediction.y, "Fallback prediction");
            prediction.y
        } else {
            prediction.y + self.tracking_error(&ball, layout, rng)
        };
        let y = layout.clamp_center(y);
        tracing::trace!(?ball, kind = ?prediction.kind, y, "Predicted intercept");

        self.cache.insert(&ball, now, y);
        y
    }

    /// Exact intercept with no error, clamping or caching
    pub fn intercept(&self, ball: BallState, layout: &ArenaLayout) -> Prediction {
        let center = layout.height / 2.0;
        if ball.checked().is_err() {
            return Prediction::new(center, PredictionKind::Degenerate);
        }
        if layout.is_behind_paddle(ball.pos.x, self.config.behind_margin) {
            return Prediction::new(center, PredictionKind::BehindPaddle);
        }
        let (lo, hi) = layout.ball_y_range();
        let mut ball = ball;
        ball.pos.y = ball.pos.y.clamp(lo, hi);
        self.project(ball, layout, 0)
    }

    fn project(&self, ball: BallState, layout: &ArenaLayout, hops: u32) -> Prediction {
        if hops > self.config.max_portal_depth {
            return Prediction::new(ball.pos.y, PredictionKind::PortalLoop);
        }

        let dx = ball.vel.x;
        if dx.abs() < MIN_DX {
            return Prediction::new(layout.height / 2.0, PredictionKind::Degenerate);
        }

        if layout.side.is_approached_by(dx) {
            let time = ((layout.paddle_x - ball.pos.x) / dx).max(0.0);
            if let Some(next) = self.through_portal(ball, time, layout) {
                return self.follow_portal(next, layout, hops);
            }
            let y = if ball.vel.y == 0.0 {
                ball.pos.y
            } else {
                let (lo, hi) = layout.ball_y_range();
                wall_fold_between(ball.pos.y + ball.vel.y * time, lo, hi)
            };
            return Prediction::new(y, PredictionKind::Inbound);
        }

        // Moving away: the ball comes back off the far wall
        let far_x = layout.far_wall_x();
        let t_out = ((far_x - ball.pos.x) / dx).max(0.0);
        let t_back = ((layout.paddle_x - far_x) / dx).abs();
        if t_out + t_back > self.config.max_return_time {
            return Prediction::new(layout.height / 2.0, PredictionKind::TooFar);
        }
        if let Some(next) = self.through_portal(ball, t_out, layout) {
            return self.follow_portal(next, layout, hops);
        }

        let (lo, hi) = layout.ball_y_range();
        let mut at_wall = advance_between(ball, t_out, lo, hi);
        at_wall.pos.x = far_x;
        at_wall.vel.x = -at_wall.vel.x;
        let mut prediction = self.project(at_wall, layout, hops);
        if prediction.kind == PredictionKind::Inbound {
            prediction.kind = PredictionKind::Returning;
        }
        prediction
    }

    fn follow_portal(&self, exit: BallState, layout: &ArenaLayout, hops: u32) -> Prediction {
        let mut prediction = self.project(exit, layout, hops + 1);
        if matches!(
            prediction.kind,
            PredictionKind::Inbound | PredictionKind::Returning
        ) {
            prediction.kind = PredictionKind::Portal;
        }
        prediction
    }

    /// Walk the bouncing path for `duration` seconds, one wall-to-wall
    /// segment at a time, and return the ball state at the first portal exit.
    fn through_portal(
        &self,
        ball: BallState,
        duration: f32,
        layout: &ArenaLayout,
    ) -> Option<BallState> {
        if self.portals.is_empty() {
            return None;
        }

        let (lo, hi) = layout.ball_y_range();
        let mut pos = ball.pos;
        let mut vel = ball.vel;
        let mut remaining = duration;

        for _ in 0..self.config.max_bounce_segments {
            if remaining <= 0.0 {
                break;
            }
            let t_wall = if vel.y > 0.0 {
                ((hi - pos.y) / vel.y).max(0.0)
            } else if vel.y < 0.0 {
                ((lo - pos.y) / vel.y).max(0.0)
            } else {
                f32::INFINITY
            };
            let segment = remaining.min(t_wall);

            if let Some(hit) = self.portals.first_hit(pos, vel, segment) {
                let exit = self.portals.exit_point(hit.link, hit.pos, vel)?;
                return Some(BallState { pos: exit, vel });
            }

            pos += vel * segment;
            remaining -= segment;
            if t_wall <= segment {
                vel.y = -vel.y;
            }
        }
        None
    }

    /// Uniform error in `[-E, E]`, growing with distance and ball speed
    fn tracking_error(&self, ball: &BallState, layout: &ArenaLayout, rng: &mut GameRng) -> f32 {
        let c = &self.config;
        let distance_factor = layout.normalized_distance(ball.pos.x);
        let speed_factor = (ball.speed() / c.reference_speed).clamp(0.0, 1.0);
        let bound = c.base_error
            * (1.0 - c.accuracy)
            * (1.0 + c.distance_weight * distance_factor + c.speed_weight * speed_factor);
        if bound > 0.0 {
            rng.0.gen_range(-bound..=bound)
        } else {
            0.0
        }
    }
}
