//! Channel voice messages, written straight to wire bytes.

use std::fmt;

use crate::error::{MidiError, Result};

// Status nibbles
const NOTE_OFF:       u8 = 0x80;
const NOTE_ON:        u8 = 0x90;
const CONTROL_CHANGE: u8 = 0xB0;

/// One outbound MIDI message. Channels are 0–15, all other fields 0–127.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MidiMessage {
    ControlChange { channel: u8, controller: u8, value: u8 },
    NoteOn  { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8, velocity: u8 },
}

fn check(what: &'static str, value: u8, max: u8) -> Result<u8> {
    if value > max {
        Err(MidiError::ValueOutOfRange { what, value, max })
    } else {
        Ok(value)
    }
}

impl MidiMessage {
    pub fn control_change(channel: u8, controller: u8, value: u8) -> Result<Self> {
        Ok(MidiMessage::ControlChange {
            channel:    check("channel", channel, 15)?,
            controller: check("controller", controller, 127)?,
            value:      check("value", value, 127)?,
        })
    }

    pub fn note_on(channel: u8, note: u8, velocity: u8) -> Result<Self> {
        Ok(MidiMessage::NoteOn {
            channel:  check("channel", channel, 15)?,
            note:     check("note", note, 127)?,
            velocity: check("velocity", velocity, 127)?,
        })
    }

    pub fn note_off(channel: u8, note: u8) -> Result<Self> {
        Ok(MidiMessage::NoteOff {
            channel:  check("channel", channel, 15)?,
            note:     check("note", note, 127)?,
            velocity: 0,
        })
    }

    pub fn channel(&self) -> u8 {
        match *self {
            MidiMessage::ControlChange { channel, .. }
            | MidiMessage::NoteOn { channel, .. }
            | MidiMessage::NoteOff { channel, .. } => channel,
        }
    }

    /// Controller or note number.
    pub fn number(&self) -> u8 {
        match *self {
            MidiMessage::ControlChange { controller, .. } => controller,
            MidiMessage::NoteOn { note, .. } | MidiMessage::NoteOff { note, .. } => note,
        }
    }

    /// Three wire bytes: status | channel, data 1, data 2.
    ///
    /// Out-of-range fields are masked rather than allowed to corrupt the
    /// status byte.
    pub fn to_bytes(&self) -> [u8; 3] {
        match *self {
            MidiMessage::ControlChange { channel, controller, value } =>
                [CONTROL_CHANGE | (channel & 0x0F), controller & 0x7F, value & 0x7F],
            MidiMessage::NoteOn { channel, note, velocity } =>
                [NOTE_ON | (channel & 0x0F), note & 0x7F, velocity & 0x7F],
            MidiMessage::NoteOff { channel, note, velocity } =>
                [NOTE_OFF | (channel & 0x0F), note & 0x7F, velocity & 0x7F],
        }
    }
}

impl fmt::Display for MidiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MidiMessage::ControlChange { channel, controller, value } =>
                write!(f, "cc   ch={:<2} cc={:<3} value={}", channel, controller, value),
            MidiMessage::NoteOn { channel, note, velocity } =>
                write!(f, "on   ch={:<2} note={:<3} vel={}", channel, note, velocity),
            MidiMessage::NoteOff { channel, note, velocity } =>
                write!(f, "off  ch={:<2} note={:<3} vel={}", channel, note, velocity),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
