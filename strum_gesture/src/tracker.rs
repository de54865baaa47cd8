//! Per-frame gesture pipeline: fretboard projection, then strum detection.

use crate::error::PoseIncomplete;
use crate::fretboard::{FretboardConfig, FretboardProjector, FretboardReading};
use crate::pose::Pose;
use crate::strum::{StrumConfig, StrumDetector, StrumEvent, StrumState};

/// What one frame produced.
#[derive(Clone, Debug)]
pub struct FrameOutcome {
    pub reading:   Result<FretboardReading, PoseIncomplete>,
    /// Picking-hand y, when it was usable this frame.
    pub picking_y: Option<f64>,
    pub strum:     Option<StrumEvent>,
}

impl FrameOutcome {
    pub fn zone(&self) -> Option<usize> {
        self.reading.as_ref().ok().map(|r| r.zone)
    }
}

/// Owns the strum state and runs both stages for every pose.
///
/// Single-threaded by construction: `track` takes `&mut self`, and one call
/// must finish before the next frame is tracked.
#[derive(Clone, Debug)]
pub struct GestureTracker {
    projector: FretboardProjector,
    detector:  StrumDetector,
    state:     StrumState,
    zones:     usize,
}

impl GestureTracker {
    pub fn new(fretboard: FretboardConfig, strum: StrumConfig, zones: usize) -> Self {
        GestureTracker {
            projector: FretboardProjector::new(fretboard),
            detector:  StrumDetector::new(strum),
            state:     StrumState::default(),
            zones,
        }
    }

    pub fn state(&self) -> StrumState { self.state }

    pub fn zones(&self) -> usize { self.zones }

    pub fn projector(&self) -> &FretboardProjector { &self.projector }

    pub fn detector(&self) -> &StrumDetector { &self.detector }

    /// Process one pose.
    ///
    /// The picking hand only moves the state machine when the pose as a whole
    /// clears the score floor and the hand itself is confidently located.
    pub fn track(&mut self, pose: &Pose) -> FrameOutcome {
        let reading = self.projector.project(pose, self.zones);
        let zone = reading.as_ref().ok().map(|r| r.zone);

        let fb = self.projector.config();
        let picking_y = if pose.overall_score >= fb.min_pose_score {
            self.detector.picking_hand_y(pose, fb.min_keypoint_score)
        } else {
            None
        };

        let strum = picking_y.and_then(|y| self.detector.observe(&mut self.state, y, zone));

        FrameOutcome { reading, picking_y, strum }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
