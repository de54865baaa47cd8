//! Application configuration.
//!
//! Every tunable lives here, grouped by the stage that reads it.  A TOML
//! file may set any subset; missing keys keep their defaults.
//!
//! ```toml
//! pose_url = "http://localhost:3000/"
//!
//! [fretboard]
//! fretboard_length = 320.0
//! fretting_hand = "rightWrist"
//!
//! [strum]
//! strum_line_y = 280.0
//!
//! [dispatch]
//! note_delay_ms = 35
//! program = 25
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum_gesture::{FretboardConfig, StrumConfig};
use strum_midi::DispatchConfig;

use crate::error::ConfigError;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Endpoint of the pose-estimation service.
    pub pose_url:           String,
    pub request_timeout_ms: u64,
    /// Frames between timing summaries in the log.
    pub report_every:       u64,
    pub fretboard:          FretboardConfig,
    pub strum:              StrumConfig,
    pub dispatch:           DispatchConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            pose_url:           "http://localhost:3000/".to_string(),
            request_timeout_ms: 2000,
            report_every:       30,
            fretboard:          FretboardConfig::default(),
            strum:              StrumConfig::default(),
            dispatch:           DispatchConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: AppConfig = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        let fb = &self.fretboard;
        if !(fb.fretboard_length > 0.0 && fb.fretboard_length.is_finite()) {
            return invalid("fretboard.fretboard_length must be positive");
        }
        if !(fb.fret_line_length >= 0.0) {
            return invalid("fretboard.fret_line_length must not be negative");
        }
        for (name, v) in [("min_pose_score", fb.min_pose_score), ("min_keypoint_score", fb.min_keypoint_score)] {
            if !(0.0..=1.0).contains(&v) {
                return Err(ConfigError::Invalid(format!("fretboard.{} must be within 0–1", name)));
            }
        }
        if !(self.strum.velocity_threshold >= 0.0) {
            return invalid("strum.velocity_threshold must not be negative");
        }
        if !(self.strum.tolerance >= 0.0) {
            return invalid("strum.tolerance must not be negative");
        }
        if !self.strum.strum_line_y.is_finite() {
            return invalid("strum.strum_line_y must be finite");
        }
        if self.dispatch.channel > 15 {
            return invalid("dispatch.channel must be 0–15");
        }
        if self.dispatch.velocity > 127 || self.dispatch.program > 127 {
            return invalid("dispatch.velocity and dispatch.program must be 0–127");
        }
        if self.report_every == 0 {
            return invalid("report_every must be at least 1");
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
