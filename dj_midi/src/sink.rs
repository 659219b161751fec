//! MIDI sinks — where outbound messages go.
//!
//! The controller core never assumes a live MIDI connection: everything is
//! written against [`MidiSink`], and a missing port degrades to [`NullSink`].

use std::io::Write;

use midir::{MidiOutput, MidiOutputConnection};
use tracing::{info, trace, warn};

use crate::error::{MidiError, Result};
use crate::message::MidiMessage;

// ════════════════════════════════════════════════════════════════════════════
// MidiSink trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that accepts outbound MIDI messages.
pub trait MidiSink: Send {
    fn send(&mut self, msg: &MidiMessage) -> Result<()>;

    /// Send in order, stopping at the first failure.
    fn send_all(&mut self, msgs: &[MidiMessage]) -> Result<()> {
        for msg in msgs {
            self.send(msg)?;
        }
        Ok(())
    }
}

// ── null backend (used when no MIDI port is available) ────────────────────

/// Drops everything.
#[derive(Debug, Default)]
pub struct NullSink;

impl MidiSink for NullSink {
    fn send(&mut self, msg: &MidiMessage) -> Result<()> {
        trace!(%msg, "midi dropped (null sink)");
        Ok(())
    }
}

// ── in-memory recorder ────────────────────────────────────────────────────

/// Records every message, in order.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub messages: Vec<MidiMessage>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand back everything recorded so far and start empty.
    pub fn take(&mut self) -> Vec<MidiMessage> {
        std::mem::take(&mut self.messages)
    }
}

impl MidiSink for MemorySink {
    fn send(&mut self, msg: &MidiMessage) -> Result<()> {
        self.messages.push(*msg);
        Ok(())
    }
}

// ── text writer (dry runs) ────────────────────────────────────────────────

/// Writes one human-readable line per message, with the wire bytes.
pub struct WriterSink<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(out: W) -> Self {
        WriterSink { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> MidiSink for WriterSink<W> {
    fn send(&mut self, msg: &MidiMessage) -> Result<()> {
        let [status, d1, d2] = msg.to_bytes();
        writeln!(self.out, "{}  [{:02X} {:02X} {:02X}]", msg, status, d1, d2)?;
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MidirSink — a live output port
// ════════════════════════════════════════════════════════════════════════════

/// A connected `midir` output port.
pub struct MidirSink {
    conn: MidiOutputConnection,
    port: String,
}

impl MidirSink {
    /// Open the first output port whose name contains `port_hint`
    /// (case-insensitive), or the first port at all when no hint is given.
    pub fn open(client_name: &str, port_hint: Option<&str>) -> Result<Self> {
        let midi_out = MidiOutput::new(client_name)
            .map_err(|e| MidiError::Init(e.to_string()))?;

        let ports = midi_out.ports();
        if ports.is_empty() {
            return Err(MidiError::NoPorts);
        }

        let port_idx = match port_hint.map(str::trim).filter(|h| !h.is_empty()) {
            None => 0,
            Some(hint) => {
                let needle = hint.to_lowercase();
                ports.iter()
                    .position(|p| {
                        midi_out.port_name(p)
                            .map(|n| n.to_lowercase().contains(&needle))
                            .unwrap_or(false)
                    })
                    .ok_or_else(|| MidiError::PortNotFound(hint.to_string()))?
            }
        };

        let port = &ports[port_idx];
        let name = midi_out.port_name(port)
            .unwrap_or_else(|_| "Unknown".to_string());
        info!(port = %name, "opening MIDI output");

        let conn = midi_out.connect(port, client_name)
            .map_err(|e| MidiError::Connect { port: name.clone(), reason: e.to_string() })?;

        Ok(MidirSink { conn, port: name })
    }

    pub fn port_name(&self) -> &str {
        &self.port
    }
}

impl MidiSink for MidirSink {
    fn send(&mut self, msg: &MidiMessage) -> Result<()> {
        trace!(%msg, "midi out");
        self.conn.send(&msg.to_bytes())
            .map_err(|e| MidiError::Send(e.to_string()))
    }
}

/// Names of all MIDI output ports currently visible.
pub fn list_output_ports(client_name: &str) -> Result<Vec<String>> {
    let midi_out = MidiOutput::new(client_name)
        .map_err(|e| MidiError::Init(e.to_string()))?;
    Ok(midi_out.ports().iter()
        .map(|p| midi_out.port_name(p).unwrap_or_else(|_| "Unknown".to_string()))
        .collect())
}

/// Try [`MidirSink::open`]; fall back to [`NullSink`] with a warning.
pub fn open_or_null(client_name: &str, port_hint: Option<&str>) -> Box<dyn MidiSink> {
    match MidirSink::open(client_name, port_hint) {
        Ok(sink) => Box::new(sink),
        Err(e) => {
            warn!("{} — using null output", e);
            Box::new(NullSink)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
