//! Pose sources.
//!
//! The sensing loop pulls one [`Pose`] per iteration from a [`PoseSource`],
//! without caring whether it came from the pose service or a recording.

use std::path::Path;
use std::time::Duration;

use strum_gesture::Pose;
use tracing::warn;

use crate::error::SourceError;
use crate::pose_client::PoseResponse;

// ════════════════════════════════════════════════════════════════════════════
// PoseSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver poses, one frame per call.
pub trait PoseSource {
    /// The next pose.
    ///
    /// `Ok(None)` means the source is exhausted.  An `Err` covers one frame
    /// only; the caller may keep pulling.
    fn next_pose(&mut self) -> Result<Option<Pose>, SourceError>;

    /// How long the most recent pose request took, for sources that make one.
    fn last_request(&self) -> Option<Duration> { None }
}

// ════════════════════════════════════════════════════════════════════════════
// ReplayPoseSource: JSON Lines recordings
// ════════════════════════════════════════════════════════════════════════════

/// Replays recorded pose-service responses, one JSON object per line.
///
/// Blank lines are skipped.  A malformed line is reported once as an error
/// and then passed over, so a damaged recording still plays to the end.
pub struct ReplayPoseSource {
    lines:  Vec<String>,
    next:   usize,
    repeat: bool,
}

impl ReplayPoseSource {
    pub fn open<P: AsRef<Path>>(path: P, repeat: bool) -> Result<Self, SourceError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_text(&text, repeat))
    }

    pub fn from_text(text: &str, repeat: bool) -> Self {
        let lines = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        ReplayPoseSource { lines, next: 0, repeat }
    }

    /// Number of recorded frames.
    pub fn len(&self) -> usize { self.lines.len() }

    pub fn is_empty(&self) -> bool { self.lines.is_empty() }
}

impl PoseSource for ReplayPoseSource {
    fn next_pose(&mut self) -> Result<Option<Pose>, SourceError> {
        if self.next >= self.lines.len() {
            if !self.repeat || self.lines.is_empty() {
                return Ok(None);
            }
            self.next = 0;
        }
        let index = self.next;
        self.next += 1;

        match serde_json::from_str::<PoseResponse>(&self.lines[index]) {
            Ok(resp) => Ok(Some(resp.into_pose())),
            Err(e) => {
                warn!(line = index + 1, "unreadable pose in recording");
                Err(e.into())
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
