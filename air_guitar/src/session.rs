//! Per-frame pipeline: pose → fretboard zone → strum → chord playback.

use chord_bank::ChordBank;
use strum_gesture::{FrameOutcome, GestureTracker, Pose};
use strum_midi::{NoteDispatcher, StrumHandle};
use tracing::{info, trace};

use crate::config::AppConfig;

/// What happened on one frame.
pub struct FrameReport {
    pub outcome: FrameOutcome,
    /// Chord under the fretting hand this frame.
    pub chord:   Option<String>,
    /// The strum started this frame, if any.
    pub strum:   Option<StrumHandle>,
}

impl FrameReport {
    pub fn skipped(&self) -> bool { self.outcome.reading.is_err() }
}

/// Ties the chord bank, gesture tracker and dispatcher together.
pub struct Session {
    bank:       ChordBank,
    tracker:    GestureTracker,
    dispatcher: NoteDispatcher,
    strums:     u64,
}

impl Session {
    /// One fretboard zone per chord in `bank`.
    pub fn new(bank: ChordBank, config: &AppConfig, dispatcher: NoteDispatcher) -> Self {
        let tracker = GestureTracker::new(config.fretboard.clone(), config.strum.clone(), bank.count());
        Session { bank, tracker, dispatcher, strums: 0 }
    }

    pub fn bank(&self) -> &ChordBank { &self.bank }

    pub fn tracker(&self) -> &GestureTracker { &self.tracker }

    pub fn dispatcher(&self) -> &NoteDispatcher { &self.dispatcher }

    /// Strums dispatched so far.
    pub fn strums(&self) -> u64 { self.strums }

    pub fn handle_pose(&mut self, pose: &Pose) -> FrameReport {
        let outcome = self.tracker.track(pose);

        if let Err(why) = &outcome.reading {
            trace!(reason = %why, "frame skipped");
        }
        let chord = outcome.zone().and_then(|z| self.bank.get(z)).map(|c| c.name.clone());

        let strum = outcome.strum.and_then(|event| {
            let chord = self.bank.get(event.zone)?;
            self.strums += 1;
            info!(chord = %chord.name, zone = event.zone, "strum");
            Some(self.dispatcher.play(chord))
        });

        FrameReport { outcome, chord, strum }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use strum_gesture::{BodyPart, Keypoint};
    use strum_midi::{DispatchConfig, RecordingSink};

    fn frame(hand_x: f64, pick_y: f64) -> Pose {
        Pose::new(0.9, vec![
            Keypoint::new(BodyPart::LeftShoulder,  100.0,  200.0,  0.9),
            Keypoint::new(BodyPart::RightShoulder, 300.0,  200.0,  0.9),
            Keypoint::new(BodyPart::RightWrist,    hand_x, 230.0,  0.9),
            Keypoint::new(BodyPart::LeftWrist,     250.0,  pick_y, 0.9),
        ])
    }

    fn session(sink: Arc<RecordingSink>) -> Session {
        let bank: ChordBank = "A:0|0|2|2|2|0\nE:0|2|2|1|0|0\nD:x|x|0|2|3|2".parse().unwrap();
        let config = AppConfig {
            dispatch: DispatchConfig { note_delay_ms: 0, ..DispatchConfig::default() },
            ..AppConfig::default()
        };
        let dispatcher = NoteDispatcher::new(sink, config.dispatch.clone());
        Session::new(bank, &config, dispatcher)
    }

    #[test]
    fn strum_plays_chord_under_fretting_hand() {
        let sink = Arc::new(RecordingSink::new());
        let mut s = session(sink.clone());
        s.handle_pose(&frame(150.0, 320.0));
        s.handle_pose(&frame(150.0, 280.0));
        let report = s.handle_pose(&frame(150.0, 300.0));

        assert_eq!(report.chord.as_deref(), Some("E"));
        report.strum.expect("strum").wait().unwrap();
        assert_eq!(sink.notes(), vec![40, 47, 52, 56, 59, 64]);
        assert_eq!(s.strums(), 1);
    }

    #[test]
    fn incomplete_pose_is_skipped_without_sound() {
        let sink = Arc::new(RecordingSink::new());
        let mut s = session(sink.clone());
        let report = s.handle_pose(&Pose::new(0.9, vec![]));
        assert!(report.skipped());
        assert!(report.chord.is_none());
        assert!(report.strum.is_none());
        assert!(sink.recorded().is_empty());
    }

    #[test]
    fn holding_still_does_not_restrum() {
        let sink = Arc::new(RecordingSink::new());
        let mut s = session(sink.clone());
        s.handle_pose(&frame(250.0, 320.0));
        s.handle_pose(&frame(250.0, 280.0));
        let first = s.handle_pose(&frame(250.0, 300.0));
        first.strum.expect("strum").wait().unwrap();
        for y in [310.0, 320.0, 330.0] {
            assert!(s.handle_pose(&frame(250.0, y)).strum.is_none());
        }
        assert_eq!(s.strums(), 1);
    }
}
