//! Strummed chord playback.
//!
//! Each strum gets its own thread that walks the chord's strings low to
//! high, sending a note-on per played string with a short pause in between.
//! The sensing loop only pays for spawning the thread.  Strums may overlap;
//! they share nothing but the sink.  Notes are never turned off.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chord_bank::Chord;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SinkError};
use crate::sink::MidiSink;
use crate::GuitarProgram;

// ════════════════════════════════════════════════════════════════════════════
// DispatchConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// MIDI channel, 0–15.
    pub channel:       u8,
    /// Note-on velocity, 0–127.
    pub velocity:      u8,
    /// Pause between consecutive strings of one strum.
    pub note_delay_ms: u64,
    /// General MIDI program selected at startup.
    pub program:       u8,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            channel:       0,
            velocity:      64,
            note_delay_ms: 50,
            program:       GuitarProgram::ElectricGuitarJazz.program(),
        }
    }
}

impl DispatchConfig {
    pub fn note_delay(&self) -> Duration { Duration::from_millis(self.note_delay_ms) }
}

// ════════════════════════════════════════════════════════════════════════════
// NoteDispatcher
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct NoteDispatcher {
    sink:   Arc<dyn MidiSink>,
    config: DispatchConfig,
}

impl NoteDispatcher {
    pub fn new(sink: Arc<dyn MidiSink>, config: DispatchConfig) -> Self {
        NoteDispatcher { sink, config }
    }

    pub fn config(&self) -> &DispatchConfig { &self.config }

    pub fn sink_name(&self) -> &str { self.sink.name() }

    /// Send the configured program change.
    pub fn select_program(&self) -> Result<()> {
        self.sink.program_change(self.config.channel, self.config.program)
    }

    /// Start strumming `chord` on a new thread and return immediately.
    ///
    /// Dropping the returned handle detaches the strum; it still runs to
    /// completion.  A sink failure ends this strum only and is logged.
    pub fn play(&self, chord: &Chord) -> StrumHandle {
        let (tx, rx) = mpsc::channel();
        let sink   = Arc::clone(&self.sink);
        let notes: Vec<u8> = chord.played_notes().map(|(_, n)| n).collect();
        let name   = chord.name.clone();
        let ch     = self.config.channel;
        let vel    = self.config.velocity;
        let delay  = self.config.note_delay();

        thread::spawn(move || {
            let result = sweep(sink.as_ref(), &notes, ch, vel, delay);
            match &result {
                Ok(sent) => debug!(chord = %name, notes = sent, "strum finished"),
                Err(e)   => warn!(chord = %name, error = %e, "strum abandoned"),
            }
            let _ = tx.send(result);
        });

        StrumHandle { chord: chord.name.clone(), rx }
    }

    /// Strum `chord` on the calling thread.
    pub fn play_blocking(&self, chord: &Chord) -> Result<usize> {
        let notes: Vec<u8> = chord.played_notes().map(|(_, n)| n).collect();
        sweep(self.sink.as_ref(), &notes, self.config.channel, self.config.velocity, self.config.note_delay())
    }
}

/// Note-on for each note in order, `delay` apart.  Returns how many were sent.
fn sweep(sink: &dyn MidiSink, notes: &[u8], channel: u8, velocity: u8, delay: Duration) -> Result<usize> {
    for (i, &note) in notes.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            thread::sleep(delay);
        }
        sink.note_on(channel, note, velocity)?;
    }
    Ok(notes.len())
}

// ════════════════════════════════════════════════════════════════════════════
// StrumHandle
// ════════════════════════════════════════════════════════════════════════════

/// Completion handle for one in-flight strum.
pub struct StrumHandle {
    chord: String,
    rx:    Receiver<Result<usize>>,
}

impl StrumHandle {
    pub fn chord(&self) -> &str { &self.chord }

    /// Block until the strum finishes; returns the number of notes sent.
    pub fn wait(self) -> Result<usize> {
        self.rx.recv().unwrap_or(Err(SinkError::Aborted))
    }

    /// The result if the strum already finished.
    pub fn try_result(&self) -> Option<Result<usize>> {
        match self.rx.try_recv() {
            Ok(r)                           => Some(r),
            Err(TryRecvError::Empty)        => None,
            Err(TryRecvError::Disconnected) => Some(Err(SinkError::Aborted)),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
