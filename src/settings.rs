//! Race settings
//!
//! Read once when a race is built and never mutated afterwards. Physics
//! constants live in [`crate::consts`]; this struct holds the values a
//! deployment may want to tune without recompiling.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::RaceError;

/// Per-race configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceSettings {
    /// Seed for AI profiles, pace variation and lane shuffle
    pub seed: u64,
    /// Number of computer-controlled opponents (limited by free lanes)
    pub opponent_count: usize,
    /// Countdown start value in seconds
    pub countdown_seconds: f32,
    /// Distance from start line to finish line (meters)
    pub track_length: f32,
    /// Z offset of each hurdle row (negative = ahead of the start line)
    pub hurdle_z_positions: Vec<f32>,
}

impl Default for RaceSettings {
    fn default() -> Self {
        Self {
            seed: 0x5EED_F00D,
            opponent_count: NUM_AI_OPPONENTS,
            countdown_seconds: COUNTDOWN_SECONDS,
            track_length: TRACK_LENGTH,
            hurdle_z_positions: HURDLE_Z_POSITIONS.to_vec(),
        }
    }
}

impl RaceSettings {
    /// Settings for a race against `opponent_count` AIs, everything else default
    pub fn with_opponents(opponent_count: usize) -> Self {
        Self {
            opponent_count,
            ..Self::default()
        }
    }

    /// Parse settings from a JSON document; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, RaceError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RaceError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded race settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), RaceError> {
        if !self.track_length.is_finite() || self.track_length <= 0.0 {
            return Err(RaceError::InvalidSettings {
                field: "track_length",
                reason: format!("must be a positive distance, got {}", self.track_length),
            });
        }
        if !self.countdown_seconds.is_finite() || self.countdown_seconds < 0.0 {
            return Err(RaceError::InvalidSettings {
                field: "countdown_seconds",
                reason: format!("must be >= 0, got {}", self.countdown_seconds),
            });
        }
        if let Some(z) = self.hurdle_z_positions.iter().find(|z| !z.is_finite()) {
            return Err(RaceError::InvalidSettings {
                field: "hurdle_z_positions",
                reason: format!("non-finite hurdle offset {z}"),
            });
        }
        Ok(())
    }
}
