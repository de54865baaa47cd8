//! # strum_gesture
//!
//! Turns body poses into guitar gestures.
//!
//! * The **fretting hand** selects a chord: a virtual fretboard anchored to
//!   the right shoulder is split into one zone per chord, and the zone under
//!   the hand is the active chord.
//! * The **picking hand** strums: a fast downward stroke across the strum
//!   line fires a [`StrumEvent`] for the active zone, once per stroke.
//!
//! ## Pipeline
//!
//! | Stage | Type | Output |
//! |---|---|---|
//! | Projection | [`FretboardProjector`] | `Result<FretboardReading, PoseIncomplete>` |
//! | Detection | [`StrumDetector`] | `Option<StrumEvent>` |
//! | Both, per frame | [`GestureTracker`] | [`FrameOutcome`] |
//!
//! A frame that cannot be used (missing keypoints, shoulders stacked
//! vertically, numerical trouble) is a [`PoseIncomplete`] value, not a panic;
//! callers skip it and carry on with the next frame.

pub mod error;
pub mod fretboard;
pub mod pose;
pub mod strum;
pub mod tracker;

pub use error::PoseIncomplete;
pub use fretboard::{FretboardConfig, FretboardGeometry, FretboardProjector, FretboardReading, Segment};
pub use pose::{BodyPart, Keypoint, Point, Pose};
pub use strum::{StrumConfig, StrumDetector, StrumEvent, StrumPhase, StrumState};
pub use tracker::{FrameOutcome, GestureTracker};
