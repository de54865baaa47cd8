//! Error types for MIDI output
use thiserror::Error;

/// Failures of a [`MidiSink`](crate::MidiSink) or of a single dispatch.
#[derive(Error, Debug)]
pub enum SinkError {
    /// MIDI initialization error
    #[error("MIDI init error: {0}")]
    Init(#[from] midir::InitError),

    /// The system has no MIDI output ports
    #[error("no MIDI output ports available")]
    NoPorts,

    /// No port name contains the requested text
    #[error("no MIDI output port matching {0:?}")]
    PortNotFound(String),

    /// MIDI connection error
    #[error("MIDI connection error: {0}")]
    Connect(String),

    /// MIDI transmission error
    #[error("MIDI send error: {0}")]
    Send(#[from] midir::SendError),

    /// A sender panicked while holding the port
    #[error("MIDI output lock poisoned")]
    Poisoned,

    /// The device went away or refused the message
    #[error("MIDI output unavailable: {0}")]
    Unavailable(String),

    /// The dispatch thread ended without reporting a result
    #[error("strum dispatch aborted")]
    Aborted,
}

/// Result type for MIDI output operations
pub type Result<T> = std::result::Result<T, SinkError>;
