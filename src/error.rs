//! Error types for the race simulation

use thiserror::Error;

/// Errors surfaced by the simulation and its configuration layer
#[derive(Error, Debug)]
pub enum RaceError {
    /// Frame delta was negative, NaN or infinite
    #[error("invalid frame delta: {dt} (must be finite and >= 0)")]
    InvalidFrameDelta {
        /// Rejected delta in seconds
        dt: f32,
    },

    /// A settings field is out of its valid range
    #[error("invalid setting `{field}`: {reason}")]
    InvalidSettings {
        /// Offending field name
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Settings file could not be read
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid JSON for `RaceSettings`
    #[error("failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),
}
