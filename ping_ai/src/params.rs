/// Default AI tuning (arena pixels, seconds)
#[derive(Debug, Clone, Copy)]
pub struct AiParams;

impl AiParams {
    // Prediction
    pub const CACHE_INTERVAL: f32 = 0.010;
    pub const CACHE_POSITION_GRID: f32 = 5.0;
    pub const CACHE_VELOCITY_GRID: f32 = 10.0;
    pub const MAX_PORTAL_DEPTH: u32 = 3;
    pub const MAX_BOUNCE_SEGMENTS: u32 = 16;
    pub const MAX_RETURN_TIME: f32 = 4.0; // Longer round trips predict the centre
    pub const BEHIND_MARGIN: f32 = 20.0;
    pub const BASE_ERROR: f32 = 40.0;
    pub const ACCURACY: f32 = 0.85;
    pub const ERROR_DISTANCE_WEIGHT: f32 = 1.0;
    pub const ERROR_SPEED_WEIGHT: f32 = 0.8;
    pub const REFERENCE_SPEED: f32 = 900.0;

    // Threat
    pub const BASE_THREAT: f32 = 0.1;
    pub const THREAT_DISTANCE_WEIGHT: f32 = 1.0;
    pub const THREAT_VELOCITY_WEIGHT: f32 = 0.8;
    pub const THREAT_POSITION_WEIGHT: f32 = 0.4;
    pub const RECEDING_FACTOR: f32 = 0.25;
    pub const NEAR_BAND: f32 = 0.2; // Fraction of arena width
    pub const PROXIMITY_BONUS: f32 = 1.0;
    pub const BLOCKED_PENALTY: f32 = 0.5;

    // Offense
    pub const SPIKE_COOLDOWN: f32 = 2.0;
    pub const SPIKE_PROXIMITY: f32 = 0.35; // Fraction of arena width
    pub const SPIKE_PROBABILITY: f32 = 0.3;
    pub const TRAILING_AGGRESSION: f32 = 1.8;
    pub const LEADING_AGGRESSION: f32 = 0.4;
    pub const SPIKE_EDGE_FRACTION: f32 = 0.7;

    // Human factor
    pub const REACTION_TIME: f32 = 0.12;
    pub const REACTION_VARIANCE: f32 = 0.04;
    pub const CHANGE_THRESHOLD: f32 = 25.0;
    pub const BYPASS_DISTANCE: f32 = 0.15; // Fraction of arena width
    pub const STIFFNESS: f32 = 80.0;
    pub const DAMPING: f32 = 17.9; // ~2 * sqrt(STIFFNESS), critically damped
    pub const MAX_ACCELERATION: f32 = 9000.0;
    pub const CLOSE_DISTANCE: f32 = 6.0;
    pub const CLOSE_DAMPING: f32 = 12.0;
    pub const SNAP_DISTANCE: f32 = 0.5;

    // Safety
    pub const STUCK_THRESHOLD: f32 = 3.0;
    pub const STUCK_TOLERANCE: f32 = 3.0;
    pub const CENTER_TOLERANCE: f32 = 2.0;
    pub const RESET_SPEED: f32 = 400.0;
    pub const RESPAWN_RADIUS: f32 = 40.0;
    pub const RESPAWN_SPEED: f32 = 5.0;
    pub const RESUME_SPEED: f32 = 30.0;
    pub const JUMP_DISTANCE: f32 = 0.25; // Fraction of arena width
    pub const TELEPORT_SLACK: f32 = 30.0;
}
