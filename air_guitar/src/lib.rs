//! # air_guitar
//!
//! Webcam air guitar.  Frames go to a pose-estimation service; the returned
//! keypoints pick a chord on a virtual fretboard and trigger strums, which
//! are played on a MIDI output.
//!
//! | Module | Role |
//! |---|---|
//! | [`config`] | `AppConfig`, loaded from TOML |
//! | [`frames`] | `FrameSource`, `ImageDirSource` |
//! | [`pose_client`] | pose-service wire types, `HttpPoseSource` |
//! | [`source`] | `PoseSource`, `ReplayPoseSource` |
//! | [`session`] | per-frame pipeline |
//! | [`clock`] | frame-rate and latency reporting |
//! | [`app`] | the sensing loop |

pub mod app;
pub mod clock;
pub mod config;
pub mod error;
pub mod frames;
pub mod pose_client;
pub mod session;
pub mod source;

pub use app::{run, spawn_quit_listener, RunSummary};
pub use clock::{ClockReport, FrameClock};
pub use config::AppConfig;
pub use error::{ConfigError, SourceError};
pub use frames::{Frame, FrameSource, ImageDirSource};
pub use pose_client::{HttpPoseSource, PoseClient, PoseResponse};
pub use session::{FrameReport, Session};
pub use source::{PoseSource, ReplayPoseSource};
