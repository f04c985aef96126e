use serde::{Deserialize, Serialize};

use crate::{AiParams, ConfigError};

/// Trajectory prediction tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    pub cache_interval: f32,
    pub cache_position_grid: f32,
    pub cache_velocity_grid: f32,
    pub max_portal_depth: u32,
    pub max_bounce_segments: u32,
    pub max_return_time: f32,
    pub behind_margin: f32,
    pub base_error: f32,
    pub accuracy: f32,
    pub distance_weight: f32,
    pub speed_weight: f32,
    pub reference_speed: f32,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            cache_interval: AiParams::CACHE_INTERVAL,
            cache_position_grid: AiParams::CACHE_POSITION_GRID,
            cache_velocity_grid: AiParams::CACHE_VELOCITY_GRID,
            max_portal_depth: AiParams::MAX_PORTAL_DEPTH,
            max_bounce_segments: AiParams::MAX_BOUNCE_SEGMENTS,
            max_return_time: AiParams::MAX_RETURN_TIME,
            behind_margin: AiParams::BEHIND_MARGIN,
            base_error: AiParams::BASE_ERROR,
            accuracy: AiParams::ACCURACY,
            distance_weight: AiParams::ERROR_DISTANCE_WEIGHT,
            speed_weight: AiParams::ERROR_SPEED_WEIGHT,
            reference_speed: AiParams::REFERENCE_SPEED,
        }
    }
}

/// Multi-ball threat scoring weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatConfig {
    pub base_threat: f32,
    pub distance_weight: f32,
    pub velocity_weight: f32,
    pub position_weight: f32,
    pub receding_factor: f32,
    pub near_band: f32,
    pub proximity_bonus: f32,
    pub blocked_penalty: f32,
    pub reference_speed: f32,
}

impl Default for ThreatConfig {
    fn default() -> Self {
        Self {
            base_threat: AiParams::BASE_THREAT,
            distance_weight: AiParams::THREAT_DISTANCE_WEIGHT,
            velocity_weight: AiParams::THREAT_VELOCITY_WEIGHT,
            position_weight: AiParams::THREAT_POSITION_WEIGHT,
            receding_factor: AiParams::RECEDING_FACTOR,
            near_band: AiParams::NEAR_BAND,
            proximity_bonus: AiParams::PROXIMITY_BONUS,
            blocked_penalty: AiParams::BLOCKED_PENALTY,
            reference_speed: AiParams::REFERENCE_SPEED,
        }
    }
}

/// Spike (aggressive return) tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffenseConfig {
    pub enabled: bool,
    pub cooldown: f32,
    pub proximity: f32,
    pub base_probability: f32,
    pub trailing_aggression: f32,
    pub leading_aggression: f32,
    pub edge_fraction: f32,
}

impl Default for OffenseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cooldown: AiParams::SPIKE_COOLDOWN,
            proximity: AiParams::SPIKE_PROXIMITY,
            base_probability: AiParams::SPIKE_PROBABILITY,
            trailing_aggression: AiParams::TRAILING_AGGRESSION,
            leading_aggression: AiParams::LEADING_AGGRESSION,
            edge_fraction: AiParams::SPIKE_EDGE_FRACTION,
        }
    }
}

/// Reaction delay and paddle momentum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HumanConfig {
    pub reaction_time: f32,
    pub reaction_variance: f32,
    pub change_threshold: f32,
    pub bypass_distance: f32,
    pub stiffness: f32,
    pub damping: f32,
    pub max_acceleration: f32,
    pub close_distance: f32,
    pub close_damping: f32,
    pub snap_distance: f32,
}

impl Default for HumanConfig {
    fn default() -> Self {
        Self {
            reaction_time: AiParams::REACTION_TIME,
            reaction_variance: AiParams::REACTION_VARIANCE,
            change_threshold: AiParams::CHANGE_THRESHOLD,
            bypass_distance: AiParams::BYPASS_DISTANCE,
            stiffness: AiParams::STIFFNESS,
            damping: AiParams::DAMPING,
            max_acceleration: AiParams::MAX_ACCELERATION,
            close_distance: AiParams::CLOSE_DISTANCE,
            close_damping: AiParams::CLOSE_DAMPING,
            snap_distance: AiParams::SNAP_DISTANCE,
        }
    }
}

/// Fail-safe supervisor thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    pub stuck_threshold: f32,
    pub stuck_tolerance: f32,
    pub center_tolerance: f32,
    pub reset_speed: f32,
    pub respawn_radius: f32,
    pub respawn_speed: f32,
    pub resume_speed: f32,
    pub jump_distance: f32,
    pub teleport_slack: f32,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            stuck_threshold: AiParams::STUCK_THRESHOLD,
            stuck_tolerance: AiParams::STUCK_TOLERANCE,
            center_tolerance: AiParams::CENTER_TOLERANCE,
            reset_speed: AiParams::RESET_SPEED,
            respawn_radius: AiParams::RESPAWN_RADIUS,
            respawn_speed: AiParams::RESPAWN_SPEED,
            resume_speed: AiParams::RESUME_SPEED,
            jump_distance: AiParams::JUMP_DISTANCE,
            teleport_slack: AiParams::TELEPORT_SLACK,
        }
    }
}

/// Complete AI configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub prediction: PredictionConfig,
    pub threat: ThreatConfig,
    pub offense: OffenseConfig,
    pub human: HumanConfig,
    pub safety: SafetyConfig,
}

/// Preset skill levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    Expert,
}

impl Difficulty {
    /// (accuracy, reaction time, stiffness, spike probability)
    fn tuning(self) -> (f32, f32, f32, f32) {
        match self {
            Difficulty::Easy => (0.55, 0.22, 45.0, 0.1),
            Difficulty::Normal => (
                AiParams::ACCURACY,
                AiParams::REACTION_TIME,
                AiParams::STIFFNESS,
                AiParams::SPIKE_PROBABILITY,
            ),
            Difficulty::Hard => (0.93, 0.08, 110.0, 0.4),
            Difficulty::Expert => (0.98, 0.05, 140.0, 0.5),
        }
    }
}

impl AiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let (accuracy, reaction_time, stiffness, spike_probability) = difficulty.tuning();
        let mut config = Self::default();
        config.prediction.accuracy = accuracy;
        config.human.reaction_time = reaction_time;
        config.human.reaction_variance = reaction_time / 3.0;
        config.human.stiffness = stiffness;
        config.human.damping = 2.0 * stiffness.sqrt();
        config.offense.base_probability = spike_probability;
        config
    }

    /// Parse a (possibly partial) JSON config; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.prediction;
        at_least("prediction.cache_interval", p.cache_interval, 0.0)?;
        at_least("prediction.cache_position_grid", p.cache_position_grid, 0.01)?;
        at_least("prediction.cache_velocity_grid", p.cache_velocity_grid, 0.01)?;
        at_least("prediction.max_return_time", p.max_return_time, 0.0)?;
        at_least("prediction.behind_margin", p.behind_margin, 0.0)?;
        at_least("prediction.base_error", p.base_error, 0.0)?;
        in_range("prediction.accuracy", p.accuracy, 0.0, 1.0)?;
        at_least("prediction.distance_weight", p.distance_weight, 0.0)?;
        at_least("prediction.speed_weight", p.speed_weight, 0.0)?;
        at_least("prediction.reference_speed", p.reference_speed, 1.0)?;

        let t = &self.threat;
        in_range("threat.base_threat", t.base_threat, 1e-3, f32::MAX)?;
        at_least("threat.distance_weight", t.distance_weight, 0.0)?;
        at_least("threat.velocity_weight", t.velocity_weight, 0.0)?;
        at_least("threat.position_weight", t.position_weight, 0.0)?;
        in_range("threat.receding_factor", t.receding_factor, 0.0, 1.0)?;
        in_range("threat.near_band", t.near_band, 0.0, 1.0)?;
        at_least("threat.proximity_bonus", t.proximity_bonus, 0.0)?;
        in_range("threat.blocked_penalty", t.blocked_penalty, 0.0, 1.0)?;
        at_least("threat.reference_speed", t.reference_speed, 1.0)?;

        let o = &self.offense;
        at_least("offense.cooldown", o.cooldown, 0.0)?;
        in_range("offense.proximity", o.proximity, 0.0, 1.0)?;
        in_range("offense.base_probability", o.base_probability, 0.0, 1.0)?;
        at_least("offense.trailing_aggression", o.trailing_aggression, 0.0)?;
        at_least("offense.leading_aggression", o.leading_aggression, 0.0)?;
        in_range("offense.edge_fraction", o.edge_fraction, 0.0, 0.95)?;

        let h = &self.human;
        at_least("human.reaction_time", h.reaction_time, 0.0)?;
        in_range("human.reaction_variance", h.reaction_variance, 0.0, h.reaction_time)?;
        at_least("human.change_threshold", h.change_threshold, 0.0)?;
        in_range("human.bypass_distance", h.bypass_distance, 0.0, 1.0)?;
        at_least("human.stiffness", h.stiffness, 0.0)?;
        at_least("human.damping", h.damping, 0.0)?;
        at_least("human.max_acceleration", h.max_acceleration, 0.0)?;
        at_least("human.close_distance", h.close_distance, 0.0)?;
        at_least("human.close_damping", h.close_damping, 0.0)?;
        at_least("human.snap_distance", h.snap_distance, 0.0)?;

        let s = &self.safety;
        at_least("safety.stuck_threshold", s.stuck_threshold, 0.0)?;
        at_least("safety.stuck_tolerance", s.stuck_tolerance, 0.0)?;
        at_least("safety.center_tolerance", s.center_tolerance, 0.0)?;
        at_least("safety.reset_speed", s.reset_speed, 0.0)?;
        at_least("safety.respawn_radius", s.respawn_radius, 0.0)?;
        at_least("safety.respawn_speed", s.respawn_speed, 0.0)?;
        at_least("safety.resume_speed", s.resume_speed, 0.0)?;
        in_range("safety.jump_distance", s.jump_distance, 0.0, 1.0)?;
        at_least("safety.teleport_slack", s.teleport_slack, 0.0)?;
        Ok(())
    }
}

fn in_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field, value });
    }
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn at_least(field: &'static str, value: f32, min: f32) -> Result<(), ConfigError> {
    in_range(field, value, min, f32::MAX)
}
