//! Strum detection over the picking hand's vertical motion.
//!
//! Two states:
//!
//! | State | Leaves when | Goes to |
//! |---|---|---|
//! | Blocked | hand moves up (velocity < 0) | Armed |
//! | Armed | hand moves down faster than the threshold while on the strum line, with a chord zone selected | Blocked, emitting a [`StrumEvent`] |
//!
//! Frame y grows downward, so an upward motion has negative velocity.  The
//! detector starts Blocked: one physical down-stroke can fire at most once,
//! and the hand must come back up before the next one counts.  There is no
//! timeout in either state.

use serde::{Deserialize, Serialize};

use crate::pose::{BodyPart, Pose};

// ════════════════════════════════════════════════════════════════════════════
// StrumConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrumConfig {
    /// Hand whose vertical motion strums.
    pub picking_hand:       BodyPart,
    /// Minimum downward velocity (pixels per frame) that counts as a strum.
    pub velocity_threshold: f64,
    /// y coordinate of the strum line.
    pub strum_line_y:       f64,
    /// Half-height of the band around the strum line.
    pub tolerance:          f64,
}

impl Default for StrumConfig {
    fn default() -> Self {
        StrumConfig {
            picking_hand:       BodyPart::LeftWrist,
            velocity_threshold: 10.0,
            strum_line_y:       300.0,
            tolerance:          50.0,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// State
// ════════════════════════════════════════════════════════════════════════════

/// Debounce state carried from frame to frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StrumState {
    pub last_hand_y: f64,
    pub armed:       bool,
}

impl StrumState {
    /// Blocked, with the previous hand position at `y`.
    pub fn starting_at(y: f64) -> Self {
        StrumState { last_hand_y: y, armed: false }
    }

    pub fn phase(&self) -> StrumPhase {
        if self.armed { StrumPhase::Armed } else { StrumPhase::Blocked }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrumPhase { Armed, Blocked }

/// A detected strum on the chord zone that was active at the time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrumEvent {
    pub zone: usize,
}

// ════════════════════════════════════════════════════════════════════════════
// StrumDetector
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default)]
pub struct StrumDetector {
    config: StrumConfig,
}

impl StrumDetector {
    pub fn new(config: StrumConfig) -> Self { StrumDetector { config } }

    pub fn config(&self) -> &StrumConfig { &self.config }

    /// Advance the state machine by one frame.
    ///
    /// `hand_y` is the picking hand's y; `zone` is the active chord zone, if
    /// the fretboard produced one this frame.  A non-finite `hand_y` leaves
    /// the state unchanged.
    pub fn step(
        &self,
        state:  StrumState,
        hand_y: f64,
        zone:   Option<usize>,
    ) -> (StrumState, Option<StrumEvent>) {
        if !hand_y.is_finite() {
            return (state, None);
        }

        let velocity = hand_y - state.last_hand_y;
        let mut next = StrumState { last_hand_y: hand_y, armed: state.armed };
        let mut event = None;

        if !next.armed {
            if velocity < 0.0 {
                next.armed = true;
            }
        } else if velocity > self.config.velocity_threshold && self.on_strum_line(hand_y) {
            if let Some(zone) = zone {
                event = Some(StrumEvent { zone });
                next.armed = false;
            }
        }

        (next, event)
    }

    /// In-place form of [`StrumDetector::step`].
    pub fn observe(&self, state: &mut StrumState, hand_y: f64, zone: Option<usize>) -> Option<StrumEvent> {
        let (next, event) = self.step(*state, hand_y, zone);
        *state = next;
        event
    }

    /// Whether `y` lies within the tolerance band around the strum line.
    pub fn on_strum_line(&self, y: f64) -> bool {
        (y - self.config.strum_line_y).abs() <= self.config.tolerance
    }

    /// The picking hand's y, if reported with at least `min_confidence`.
    pub fn picking_hand_y(&self, pose: &Pose, min_confidence: f64) -> Option<f64> {
        pose.confident(self.config.picking_hand, min_confidence).map(|p| p.y)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Keypoint;
    use proptest::prelude::*;

    /// Feed y positions through the detector; returns events by frame index.
    fn run(start_y: f64, ys: &[f64], zone: Option<usize>) -> Vec<(usize, StrumEvent)> {
        let det = StrumDetector::default();
        let mut state = StrumState::starting_at(start_y);
        ys.iter()
            .enumerate()
            .filter_map(|(i, &y)| det.observe(&mut state, y, zone).map(|e| (i, e)))
            .collect()
    }

    #[test]
    fn velocity_sequence_fires_once_on_fourth_sample() {
        // velocities −5, −3, +2, +12; the last lands on the strum line (300)
        let events = run(294.0, &[289.0, 286.0, 288.0, 300.0], Some(1));
        assert_eq!(events, vec![(3, StrumEvent { zone: 1 })]);
    }

    #[test]
    fn starts_blocked() {
        assert_eq!(StrumState::default().phase(), StrumPhase::Blocked);
        // A fast down-stroke straight away does nothing.
        assert!(run(250.0, &[300.0], Some(0)).is_empty());
    }

    #[test]
    fn upward_motion_arms() {
        let det = StrumDetector::default();
        let (s, e) = det.step(StrumState::starting_at(300.0), 290.0, Some(0));
        assert!(e.is_none());
        assert_eq!(s.phase(), StrumPhase::Armed);
        assert_eq!(s.last_hand_y, 290.0);
    }

    #[test]
    fn slow_down_stroke_ignored() {
        // +10 is not strictly above the threshold
        assert!(run(300.0, &[280.0, 290.0], Some(0)).is_empty());
    }

    #[test]
    fn stroke_off_the_strum_line_ignored() {
        assert!(run(150.0, &[120.0, 180.0], Some(0)).is_empty());
        // band edge is inclusive: 350 is exactly 50 away
        assert_eq!(run(330.0, &[320.0, 350.0], Some(0)).len(), 1);
    }

    #[test]
    fn held_stroke_fires_once() {
        let events = run(300.0, &[270.0, 290.0, 310.0, 330.0, 345.0], Some(2));
        assert_eq!(events, vec![(1, StrumEvent { zone: 2 })]);
    }

    #[test]
    fn re_arm_allows_second_strum() {
        let events = run(300.0, &[270.0, 290.0, 260.0, 300.0], Some(0));
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].0, 3);
    }

    #[test]
    fn no_zone_keeps_detector_armed() {
        let det = StrumDetector::default();
        let mut s = StrumState::starting_at(300.0);
        det.observe(&mut s, 270.0, None);
        assert!(det.observe(&mut s, 290.0, None).is_none());
        assert_eq!(s.phase(), StrumPhase::Armed);
        assert_eq!(det.observe(&mut s, 310.0, Some(4)), Some(StrumEvent { zone: 4 }));
        assert_eq!(s.phase(), StrumPhase::Blocked);
    }

    #[test]
    fn nan_sample_leaves_state_alone() {
        let det = StrumDetector::default();
        let s = StrumState { last_hand_y: 280.0, armed: true };
        assert_eq!(det.step(s, f64::NAN, Some(0)), (s, None));
    }

    #[test]
    fn picking_hand_from_pose() {
        let det = StrumDetector::default();
        let pose = Pose::new(0.8, vec![
            Keypoint::new(BodyPart::LeftWrist,  10.0, 312.0, 0.7),
            Keypoint::new(BodyPart::RightWrist, 20.0, 100.0, 0.9),
        ]);
        assert_eq!(det.picking_hand_y(&pose, 0.5), Some(312.0));
        assert_eq!(det.picking_hand_y(&pose, 0.8), None);
    }

    proptest! {
        #[test]
        fn every_strum_preceded_by_upward_motion(
            start in 0.0f64..600.0,
            ys in proptest::collection::vec(0.0f64..600.0, 0..200),
        ) {
            let det = StrumDetector::default();
            let mut state = StrumState::starting_at(start);
            let mut moved_up_since_last = false;
            let mut prev = start;
            for y in ys {
                if y - prev < 0.0 {
                    moved_up_since_last = true;
                }
                if det.observe(&mut state, y, Some(0)).is_some() {
                    prop_assert!(moved_up_since_last);
                    moved_up_since_last = false;
                }
                prev = y;
            }
        }
    }
}
