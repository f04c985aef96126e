//! Error types for the paddle AI.
//!
//! Per-frame entry points never fail; errors only surface when building an
//! AI from user-supplied configuration.

/// Invalid or unparsable AI configuration
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },

    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("Config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Malformed per-frame input, recovered locally
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum InputError {
    #[error("Ball {field} is not a finite number: {value}")]
    NonFiniteBall { field: &'static str, value: f32 },
}
