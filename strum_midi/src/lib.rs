//! # strum_midi
//!
//! Plays [`Chord`](chord_bank::Chord)s as strums on a MIDI output.
//!
//! * [`MidiSink`]: write-only, thread-safe MIDI destination
//!   ([`MidirSink`] for real ports, [`NullSink`]; `RecordingSink` behind
//!   the `test-util` feature).
//! * [`NoteDispatcher`]: sends one note-on per played string, low to high,
//!   a few milliseconds apart, on a background thread per strum.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use strum_midi::{open_output, DispatchConfig, NoteDispatcher};
//! use chord_bank::ChordBank;
//!
//! let bank: ChordBank = "E:0|2|2|1|0|0".parse().unwrap();
//! let sink = open_output("air_guitar", None).unwrap();
//! let dispatcher = NoteDispatcher::new(sink, DispatchConfig::default());
//! dispatcher.select_program().unwrap();
//! dispatcher.play(bank.get(0).unwrap()).wait().unwrap();
//! ```

pub mod dispatch;
pub mod error;
pub mod sink;

pub use dispatch::{DispatchConfig, NoteDispatcher, StrumHandle};
pub use error::{Result, SinkError};
pub use sink::{list_output_ports, open_output, MidiEvent, MidiSink, MidirSink, NullSink};
#[cfg(any(test, feature = "test-util"))]
pub use sink::{Recorded, RecordingSink};

// ════════════════════════════════════════════════════════════════════════════
// General MIDI guitar programs (Program 24–31)
// ════════════════════════════════════════════════════════════════════════════

/// The guitar family of General MIDI instruments (0-indexed, as sent in
/// Program Change).
///
/// Use [`GuitarProgram::program`] to get the raw `u8` value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum GuitarProgram {
    AcousticGuitarNylon  = 24,
    AcousticGuitarSteel  = 25,
    ElectricGuitarJazz   = 26,
    ElectricGuitarClean  = 27,
    ElectricGuitarMuted  = 28,
    OverdrivenGuitar     = 29,
    DistortionGuitar     = 30,
    GuitarHarmonics      = 31,
}

impl GuitarProgram {
    pub const ALL: [GuitarProgram; 8] = [
        GuitarProgram::AcousticGuitarNylon,
        GuitarProgram::AcousticGuitarSteel,
        GuitarProgram::ElectricGuitarJazz,
        GuitarProgram::ElectricGuitarClean,
        GuitarProgram::ElectricGuitarMuted,
        GuitarProgram::OverdrivenGuitar,
        GuitarProgram::DistortionGuitar,
        GuitarProgram::GuitarHarmonics,
    ];

    /// Raw MIDI program number.
    pub fn program(self) -> u8 { self as u8 }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            GuitarProgram::AcousticGuitarNylon => "Acoustic Guitar (nylon)",
            GuitarProgram::AcousticGuitarSteel => "Acoustic Guitar (steel)",
            GuitarProgram::ElectricGuitarJazz  => "Electric Guitar (jazz)",
            GuitarProgram::ElectricGuitarClean => "Electric Guitar (clean)",
            GuitarProgram::ElectricGuitarMuted => "Electric Guitar (muted)",
            GuitarProgram::OverdrivenGuitar    => "Overdriven Guitar",
            GuitarProgram::DistortionGuitar    => "Distortion Guitar",
            GuitarProgram::GuitarHarmonics     => "Guitar Harmonics",
        }
    }

    /// The guitar program with number `program`, if it is one.
    pub fn from_program(program: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|g| g.program() == program)
    }
}
