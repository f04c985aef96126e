//! Fail-safe supervisor
//!
//! A small state machine wrapped around the tracking pipeline. Each frame
//! it decides, in priority order, whether the paddle is recovering from a
//! reset, stuck, waiting for a respawn, or free to track the ball.

use glam::Vec2;
use serde::Serialize;

use crate::{ArenaLayout, BallState, PortalMap, SafetyConfig};

/// Supervisor states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SupervisorState {
    Normal,
    /// Gliding to centre after a reset request or a point
    Resetting,
    /// Paddle stopped moving for too long; gliding to centre
    Emergency,
    /// Ball frozen or respawning; paddle held at centre
    RespawnHold,
}

/// What the controller should do this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Track,
    GlideToCenter,
    HoldCenter,
}

/// Per-frame inputs the supervisor looks at
#[derive(Debug, Clone, Copy)]
pub struct Observation {
    pub ball: BallState,
    pub ball_frozen: bool,
    /// Paddle top-edge Y
    pub paddle_y: f32,
    /// Top-edge Y the controller returned last frame
    pub commanded_y: Option<f32>,
    pub now: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub directive: Directive,
    /// All tracking state must be dropped before acting
    pub full_clear: bool,
    /// Ball came out of a portal; cached predictions are stale
    pub retarget: bool,
}

impl Verdict {
    fn new(directive: Directive) -> Self {
        Self {
            directive,
            full_clear: false,
            retarget: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Supervisor {
    config: SafetyConfig,
    state: SupervisorState,
    /// Paddle Y and the time it started lagging its commands
    stuck_anchor: Option<(f32, f32)>,
    last_ball: Option<Vec2>,
}

impl Supervisor {
    pub fn new(config: SafetyConfig) -> Self {
        Self {
            config,
            state: SupervisorState::Normal,
            stuck_anchor: None,
            last_ball: None,
        }
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Glide to centre before tracking resumes
    pub fn request_reset(&mut self) {
        self.transition(SupervisorState::Resetting);
    }

    /// Drop emergency, respawn and stuck tracking
    pub fn clear(&mut self) {
        self.state = SupervisorState::Normal;
        self.stuck_anchor = None;
        self.last_ball = None;
    }

    fn transition(&mut self, next: SupervisorState) {
        if self.state != next {
            tracing::debug!(from = ?self.state, to = ?next, "Supervisor transition");
            self.state = next;
        }
        if next != SupervisorState::Normal {
            self.stuck_anchor = None;
        }
    }

    pub fn check(&mut self, obs: &Observation, layout: &ArenaLayout, portals: &PortalMap) -> Verdict {
        let at_center = (obs.paddle_y - layout.paddle_center_y()).abs() <= self.config.center_tolerance;
        let jump = self.observe_ball(obs.ball.pos, layout, portals);

        // 1. Explicit reset in progress
        if self.state == SupervisorState::Resetting {
            if !at_center {
                return Verdict::new(Directive::GlideToCenter);
            }
            self.transition(SupervisorState::Normal);
        }

        // 2. Stuck paddle
        if self.state == SupervisorState::Normal && self.is_stuck(obs) {
            tracing::debug!(paddle_y = obs.paddle_y, "Paddle stuck, entering emergency");
            self.transition(SupervisorState::Emergency);
            return Verdict {
                full_clear: true,
                ..Verdict::new(Directive::GlideToCenter)
            };
        }

        // 3. Frozen or respawning ball
        if self.state == SupervisorState::RespawnHold {
            if self.ball_released(obs) {
                self.transition(SupervisorState::Normal);
            } else {
                return Verdict::new(Directive::HoldCenter);
            }
        } else if self.ball_respawning(obs, layout, jump) {
            self.transition(SupervisorState::RespawnHold);
            return Verdict::new(Directive::HoldCenter);
        }

        if self.state == SupervisorState::Emergency {
            if !at_center {
                return Verdict::new(Directive::GlideToCenter);
            }
            self.transition(SupervisorState::Normal);
        }

        // 4. Normal tracking
        Verdict {
            retarget: jump == Some(Jump::Teleport),
            ..Verdict::new(Directive::Track)
        }
    }

    fn observe_ball(&mut self, pos: Vec2, layout: &ArenaLayout, portals: &PortalMap) -> Option<Jump> {
        let previous = self.last_ball.replace(pos)?;
        if pos.distance(previous) <= self.config.jump_distance * layout.width {
            return None;
        }
        if portals.is_near_exit(pos, self.config.teleport_slack) {
            tracing::debug!(from = ?previous, to = ?pos, "Ball teleported");
            return Some(Jump::Teleport);
        }
        let center = layout.center();
        if pos.distance(center) < previous.distance(center) {
            Some(Jump::TowardCenter)
        } else {
            None
        }
    }

    /// The paddle has failed to follow its commands for too long. A paddle
    /// resting where it was told to be never counts.
    fn is_stuck(&mut self, obs: &Observation) -> bool {
        let tolerance = self.config.stuck_tolerance;
        let lagging = obs
            .commanded_y
            .is_some_and(|commanded| (commanded - obs.paddle_y).abs() > tolerance);
        if !lagging {
            self.stuck_anchor = None;
            return false;
        }

        match self.stuck_anchor {
            Some((anchor_y, since)) if (obs.paddle_y - anchor_y).abs() <= tolerance => {
                obs.now - since > self.config.stuck_threshold
            }
            _ => {
                self.stuck_anchor = Some((obs.paddle_y, obs.now));
                false
            }
        }
    }

    fn ball_respawning(&self, obs: &Observation, layout: &ArenaLayout, jump: Option<Jump>) -> bool {
        if obs.ball_frozen || jump == Some(Jump::TowardCenter) {
            return true;
        }
        obs.ball.pos.distance(layout.center()) <= self.config.respawn_radius
            && obs.ball.speed() <= self.config.respawn_speed
    }

    fn ball_released(&self, obs: &Observation) -> bool {
        !obs.ball_frozen && obs.ball.speed() >= self.config.resume_speed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Jump {
    Teleport,
    TowardCenter,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ping_core::{Config, GameMap, Side};

    fn setup() -> (Supervisor, ArenaLayout, PortalMap) {
        let config = Config::new();
        let map = GameMap::portal_test_map(&config);
        let layout = ArenaLayout::from_map(&map, &config, Side::Right);
        let portals = PortalMap::build(&layout.portals);
        (Supervisor::new(SafetyConfig::default()), layout, portals)
    }

    fn moving_ball() -> BallState {
        BallState::new(200.0, 100.0, 300.0, 50.0)
    }

    /// Paddle sitting where it was last told to be
    fn obs(ball: BallState, paddle_y: f32, now: f32) -> Observation {
        Observation {
            ball,
            ball_frozen: false,
            paddle_y,
            commanded_y: Some(paddle_y),
            now,
        }
    }

    /// Paddle well short of its last command
    fn lagging(ball: BallState, paddle_y: f32, now: f32) -> Observation {
        Observation {
            commanded_y: Some(paddle_y + 100.0),
            ..obs(ball, paddle_y, now)
        }
    }

    #[test]
    fn test_normal_tracks() {
        let (mut sup, layout, portals) = setup();
        let verdict = sup.check(&obs(moving_ball(), 100.0, 0.0), &layout, &portals);
        assert_eq!(verdict.directive, Directive::Track);
        assert!(!verdict.full_clear);
        assert_eq!(sup.state(), SupervisorState::Normal);
    }

    #[test]
    fn test_reset_glides_until_centered() {
        let (mut sup, layout, portals) = setup();
        sup.request_reset();
        let verdict = sup.check(&obs(moving_ball(), 0.0, 0.0), &layout, &portals);
        assert_eq!(verdict.directive, Directive::GlideToCenter);
        assert_eq!(sup.state(), SupervisorState::Resetting);

        let verdict = sup.check(&obs(moving_ball(), 254.0, 0.1), &layout, &portals);
        assert_eq!(verdict.directive, Directive::Track);
        assert_eq!(sup.state(), SupervisorState::Normal);
    }

    #[test]
    fn test_reset_outranks_frozen_ball() {
        let (mut sup, layout, portals) = setup();
        sup.request_reset();
        let frozen = Observation {
            ball_frozen: true,
            ..obs(BallState::centered(800.0, 600.0), 0.0, 0.0)
        };
        assert_eq!(sup.check(&frozen, &layout, &portals).directive, Directive::GlideToCenter);
    }

    #[test]
    fn test_stuck_paddle_enters_emergency() {
        let (mut sup, layout, portals) = setup();
        let dt = 1.0 / 60.0;
        let mut emergency_at = None;
        for frame in 0..300 {
            let now = frame as f32 * dt;
            let verdict = sup.check(&lagging(moving_ball(), 10.0, now), &layout, &portals);
            if verdict.full_clear {
                emergency_at = Some(now);
                assert_eq!(verdict.directive, Directive::GlideToCenter);
                break;
            }
        }
        let at = emergency_at.expect("stuck paddle should trigger emergency");
        assert!(at > SafetyConfig::default().stuck_threshold);
        assert_eq!(sup.state(), SupervisorState::Emergency);

        // Back to normal once centred
        let verdict = sup.check(&obs(moving_ball(), 255.0, at + dt), &layout, &portals);
        assert_eq!(verdict.directive, Directive::Track);
        assert_eq!(sup.state(), SupervisorState::Normal);
    }

    #[test]
    fn test_moving_paddle_never_stuck() {
        let (mut sup, layout, portals) = setup();
        for frame in 0..600 {
            let now = frame as f32 / 60.0;
            let y = 100.0 + 50.0 * (now * 3.0).sin();
            let verdict = sup.check(&lagging(moving_ball(), y, now), &layout, &portals);
            assert!(!verdict.full_clear, "Unexpected emergency at {now}");
        }
    }

    #[test]
    fn test_paddle_resting_on_target_stays_normal() {
        let (mut sup, layout, portals) = setup();
        for frame in 0..300 {
            let now = frame as f32 / 60.0;
            let verdict = sup.check(&obs(moving_ball(), 503.0, now), &layout, &portals);
            assert!(!verdict.full_clear, "Resting paddle flagged stuck at {now}");
        }
        assert_eq!(sup.state(), SupervisorState::Normal);

        // Without a previous command there is nothing to lag behind
        let first = Observation {
            commanded_y: None,
            ..obs(moving_ball(), 503.0, 5.0)
        };
        assert_eq!(sup.check(&first, &layout, &portals).directive, Directive::Track);
    }

    #[test]
    fn test_lag_timer_restarts_once_paddle_catches_up() {
        let (mut sup, layout, portals) = setup();
        let dt = 1.0 / 60.0;
        // Lag for two seconds, catch up for one frame, lag for two more
        for frame in 0..240 {
            let now = frame as f32 * dt;
            let input = if frame == 120 {
                obs(moving_ball(), 10.0, now)
            } else {
                lagging(moving_ball(), 10.0, now)
            };
            let verdict = sup.check(&input, &layout, &portals);
            assert!(!verdict.full_clear, "Timer should have restarted, flagged at {now}");
        }
        assert_eq!(sup.state(), SupervisorState::Normal);
    }

    #[test]
    fn test_frozen_ball_holds_until_moving() {
        let (mut sup, layout, portals) = setup();
        let center = BallState::centered(800.0, 600.0);
        let frozen = Observation {
            ball_frozen: true,
            ..obs(center, 100.0, 0.0)
        };
        assert_eq!(sup.check(&frozen, &layout, &portals).directive, Directive::HoldCenter);
        assert_eq!(sup.state(), SupervisorState::RespawnHold);

        // Released but barely moving: keep holding
        let slow = BallState::new(400.0, 300.0, 10.0, 0.0);
        assert_eq!(
            sup.check(&obs(slow, 255.0, 0.1), &layout, &portals).directive,
            Directive::HoldCenter
        );

        let served = BallState::new(405.0, 300.0, 360.0, 40.0);
        assert_eq!(
            sup.check(&obs(served, 255.0, 0.2), &layout, &portals).directive,
            Directive::Track
        );
        assert_eq!(sup.state(), SupervisorState::Normal);
    }

    #[test]
    fn test_still_ball_at_center_is_respawn() {
        let (mut sup, layout, portals) = setup();
        let ball = BallState::new(410.0, 295.0, 1.0, 0.0);
        assert_eq!(
            sup.check(&obs(ball, 100.0, 0.0), &layout, &portals).directive,
            Directive::HoldCenter
        );
    }

    #[test]
    fn test_jump_toward_center_is_respawn() {
        let (mut sup, layout, portals) = setup();
        sup.check(&obs(BallState::new(790.0, 580.0, 400.0, 0.0), 100.0, 0.0), &layout, &portals);
        let verdict = sup.check(
            &obs(BallState::new(420.0, 320.0, 400.0, 0.0), 100.0, 0.016),
            &layout,
            &portals,
        );
        assert_eq!(verdict.directive, Directive::HoldCenter);
    }

    #[test]
    fn test_portal_jump_is_teleport() {
        let (mut sup, layout, portals) = setup();
        // Enters the lower-left portal, reappears at the upper-right one
        sup.check(&obs(BallState::new(270.0, 450.0, 400.0, 0.0), 100.0, 0.0), &layout, &portals);
        let verdict = sup.check(
            &obs(BallState::new(527.0, 150.0, 400.0, 0.0), 100.0, 0.016),
            &layout,
            &portals,
        );
        assert_eq!(verdict.directive, Directive::Track);
        assert!(verdict.retarget);
        assert_eq!(sup.state(), SupervisorState::Normal);
    }

    #[test]
    fn test_emergency_can_enter_respawn_hold() {
        let (mut sup, layout, portals) = setup();
        for frame in 0..250 {
            sup.check(&lagging(moving_ball(), 10.0, frame as f32 / 60.0), &layout, &portals);
        }
        assert_eq!(sup.state(), SupervisorState::Emergency);

        let frozen = Observation {
            ball_frozen: true,
            ..obs(BallState::centered(800.0, 600.0), 10.0, 5.0)
        };
        assert_eq!(sup.check(&frozen, &layout, &portals).directive, Directive::HoldCenter);
        assert_eq!(sup.state(), SupervisorState::RespawnHold);
    }

    #[test]
    fn test_clear_returns_to_normal() {
        let (mut sup, layout, portals) = setup();
        sup.request_reset();
        sup.clear();
        assert_eq!(sup.state(), SupervisorState::Normal);
        assert_eq!(
            sup.check(&obs(moving_ball(), 0.0, 0.0), &layout, &portals).directive,
            Directive::Track
        );
    }
}
