//! MIDI output backends.
//!
//! Every backend is shared between concurrently running strums, so the trait
//! takes `&self` and implementations serialise access to the port
//! internally.

use std::sync::{Arc, Mutex};
#[cfg(any(test, feature = "test-util"))]
use std::time::Instant;

use tracing::{info, warn};

use crate::error::{Result, SinkError};

// ════════════════════════════════════════════════════════════════════════════
// MidiEvent: the two channel messages this crate ever sends
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    ProgramChange { channel: u8, program: u8 },
}

impl MidiEvent {
    /// Raw MIDI bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        match *self {
            MidiEvent::NoteOn { channel, note, velocity } => {
                vec![0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F]
            }
            MidiEvent::ProgramChange { channel, program } => {
                vec![0xC0 | (channel & 0x0F), program & 0x7F]
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MidiSink
// ════════════════════════════════════════════════════════════════════════════

/// Write-only MIDI destination, safe to call from several threads at once.
pub trait MidiSink: Send + Sync {
    fn send(&self, event: MidiEvent) -> Result<()>;

    fn note_on(&self, channel: u8, note: u8, velocity: u8) -> Result<()> {
        self.send(MidiEvent::NoteOn { channel, note, velocity })
    }

    fn program_change(&self, channel: u8, program: u8) -> Result<()> {
        self.send(MidiEvent::ProgramChange { channel, program })
    }

    /// Human-readable destination name.
    fn name(&self) -> &str;
}

// ── midir backend ─────────────────────────────────────────────────────────

pub struct MidirSink {
    conn:      Mutex<midir::MidiOutputConnection>,
    port_name: String,
}

impl MidirSink {
    /// Open an output port.
    ///
    /// With `port_query`, the first port whose name contains it
    /// (case-insensitive) is used.  Without, a software synthesiser is
    /// preferred if one is visible, else the first port.
    pub fn open(client_name: &str, port_query: Option<&str>) -> Result<Self> {
        let midi_out = midir::MidiOutput::new(client_name)?;

        let ports = midi_out.ports();
        if ports.is_empty() {
            return Err(SinkError::NoPorts);
        }

        let names: Vec<String> = ports
            .iter()
            .map(|p| midi_out.port_name(p).unwrap_or_else(|_| "Unknown".to_string()))
            .collect();

        let port_idx = match port_query {
            Some(q) => find_port(&names, q).ok_or_else(|| SinkError::PortNotFound(q.to_string()))?,
            None    => preferred_port(&names),
        };

        let port_name = names[port_idx].clone();
        info!(port = %port_name, "opening MIDI output");

        let conn = midi_out
            .connect(&ports[port_idx], "air-guitar-out")
            .map_err(|e| SinkError::Connect(e.to_string()))?;

        Ok(MidirSink { conn: Mutex::new(conn), port_name })
    }
}

impl MidiSink for MidirSink {
    fn send(&self, event: MidiEvent) -> Result<()> {
        let mut conn = self.conn.lock().map_err(|_| SinkError::Poisoned)?;
        conn.send(&event.to_bytes())?;
        Ok(())
    }

    fn name(&self) -> &str { &self.port_name }
}

/// Names of all MIDI output ports.
pub fn list_output_ports() -> Result<Vec<String>> {
    let midi_out = midir::MidiOutput::new("air_guitar_enumerate")?;
    Ok(midi_out
        .ports()
        .iter()
        .enumerate()
        .map(|(i, p)| midi_out.port_name(p).unwrap_or_else(|_| format!("Unknown Device {}", i)))
        .collect())
}

fn find_port(names: &[String], query: &str) -> Option<usize> {
    let q = query.to_lowercase();
    names.iter().position(|n| n.to_lowercase().contains(&q))
}

/// Prefer a softsynth if visible, else port 0.
fn preferred_port(names: &[String]) -> usize {
    names
        .iter()
        .position(|n| {
            let n = n.to_lowercase();
            n.contains("fluid") || n.contains("timidity") ||
            n.contains("microsoft") || n.contains("gm") ||
            n.contains("synth")
        })
        .unwrap_or(0)
}

/// Open `port_query`, or fall back to [`NullSink`] when no port was asked
/// for and none can be opened.
///
/// An explicitly requested port that cannot be found is an error.
pub fn open_output(client_name: &str, port_query: Option<&str>) -> Result<Arc<dyn MidiSink>> {
    match MidirSink::open(client_name, port_query) {
        Ok(sink) => Ok(Arc::new(sink)),
        Err(e) if port_query.is_none() => {
            warn!(error = %e, "no usable MIDI output, strums will be silent");
            warn!("install a MIDI synthesiser such as `timidity -iA` or `fluidsynth` (Linux), \
                   the built-in GS Wavetable Synth (Windows) or CoreMIDI (macOS)");
            Ok(Arc::new(NullSink))
        }
        Err(e) => Err(e),
    }
}

// ── null backend (used when no MIDI port is available) ────────────────────

pub struct NullSink;

impl MidiSink for NullSink {
    fn send(&self, _event: MidiEvent) -> Result<()> { Ok(()) }
    fn name(&self) -> &str { "null" }
}

// ── recording backend (tests only, `test-util` feature) ──────────────────

/// One message captured by [`RecordingSink`].
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone, Copy)]
pub struct Recorded {
    pub event: MidiEvent,
    pub at:    Instant,
}

/// Keeps every message in memory; can be told to fail after `n` sends.
#[cfg(any(test, feature = "test-util"))]
#[derive(Default)]
pub struct RecordingSink {
    sent:       Mutex<Vec<Recorded>>,
    fail_after: Option<usize>,
}

#[cfg(any(test, feature = "test-util"))]
impl RecordingSink {
    pub fn new() -> Self { Self::default() }

    /// Accept `n` messages, then report the device as unavailable.
    pub fn failing_after(n: usize) -> Self {
        RecordingSink { sent: Mutex::new(Vec::new()), fail_after: Some(n) }
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// Notes of every note-on, in send order.
    pub fn notes(&self) -> Vec<u8> {
        self.recorded()
            .iter()
            .filter_map(|r| match r.event {
                MidiEvent::NoteOn { note, .. } => Some(note),
                _ => None,
            })
            .collect()
    }
}

#[cfg(any(test, feature = "test-util"))]
impl MidiSink for RecordingSink {
    fn send(&self, event: MidiEvent) -> Result<()> {
        let mut sent = self.sent.lock().map_err(|_| SinkError::Poisoned)?;
        if self.fail_after.is_some_and(|n| sent.len() >= n) {
            return Err(SinkError::Unavailable("device unplugged".to_string()));
        }
        sent.push(Recorded { event, at: Instant::now() });
        Ok(())
    }

    fn name(&self) -> &str { "recording" }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
