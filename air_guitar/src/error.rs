//! Error types for pose sources and configuration
use std::path::PathBuf;

use thiserror::Error;

/// A pose or frame source failed for one frame.
///
/// The sensing loop logs these and moves on to the next frame.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Pose service unreachable, timed out, or sent an unreadable body
    #[error("pose request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Pose service answered with a non-success status
    #[error("pose service returned HTTP {0}")]
    Status(u16),

    /// Pose JSON did not match the expected shape
    #[error("malformed pose JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A frame directory holds no usable images
    #[error("no image frames found in {}", .0.display())]
    NoFrames(PathBuf),
}

/// Configuration file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
