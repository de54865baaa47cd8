//! Reasons a frame yields no fretboard reading.
use thiserror::Error;

use crate::pose::BodyPart;

/// Why a frame could not be used.  Recoverable: the caller skips the frame.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum PoseIncomplete {
    /// The estimator's overall confidence is below the configured floor.
    #[error("pose score {score:.2} below {min:.2}")]
    LowPoseScore { score: f64, min: f64 },

    /// A required keypoint is absent or below the keypoint confidence floor.
    #[error("{0} missing or below confidence threshold")]
    MissingKeypoint(BodyPart),

    /// Shoulders share an x coordinate, so the shoulder slope is undefined.
    #[error("shoulders are vertically aligned")]
    DegenerateShoulders,

    /// The fretting hand sits exactly on the baseline line.
    #[error("fretting hand lies on the fretboard baseline")]
    HandOnBaseline,

    /// A square root of a negative number or a non-finite intermediate.
    #[error("fretboard projection left the real domain")]
    NumericDomain,

    /// Zero chord zones were requested.
    #[error("fretboard has no zones")]
    NoZones,
}
