//! MIDI error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MidiError {
    #[error("{what} {value} is out of range (max {max})")]
    ValueOutOfRange { what: &'static str, value: u8, max: u8 },

    #[error("two {what} bindings share channel {channel} number {number}")]
    Collision { what: &'static str, channel: u8, number: u8 },

    #[error("MIDI init error: {0}")]
    Init(String),

    #[error("No MIDI output ports found\n  Tip: create a virtual port (loopMIDI on Windows, IAC Driver on macOS, `modprobe snd-virmidi` on Linux)")]
    NoPorts,

    #[error("No MIDI output port matching '{0}'\n  Tip: run with --list-ports to see what is available")]
    PortNotFound(String),

    #[error("Failed to connect to MIDI port '{port}': {reason}")]
    Connect { port: String, reason: String },

    #[error("MIDI send failed: {0}")]
    Send(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MidiError>;
