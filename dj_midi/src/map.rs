//! Static addressing table: (ControlID | Play) × HandSide → (channel, number).
//!
//! The right hand reuses the left hand's logical controls shifted by a fixed
//! offset, so the two decks never collide in the DJ software's MIDI Learn.

use std::fmt;

use serde::{Deserialize, Serialize};
use hand_pose::HandSide;

use crate::error::{MidiError, Result};
use crate::message::MidiMessage;

/// CC / note offset between the left and right deck.
pub const DEFAULT_DECK_OFFSET: u8 = 10;

// ════════════════════════════════════════════════════════════════════════════
// ControlId / Action
// ════════════════════════════════════════════════════════════════════════════

/// A logical continuous control, independent of MIDI addressing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlId {
    Volume,
    LowEq,
    MidEq,
    HighEq,
}

impl ControlId {
    pub const ALL: [ControlId; 4] =
        [ControlId::Volume, ControlId::LowEq, ControlId::MidEq, ControlId::HighEq];

    /// Stable array slot, 0–3.
    pub fn index(self) -> usize {
        match self {
            ControlId::Volume => 0,
            ControlId::LowEq  => 1,
            ControlId::MidEq  => 2,
            ControlId::HighEq => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ControlId::Volume => "Volume",
            ControlId::LowEq  => "Low EQ",
            ControlId::MidEq  => "Mid EQ",
            ControlId::HighEq => "High EQ",
        }
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An emission decision made by a hand's control state for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Momentary press of the deck's play button.
    Play,
    /// Absolute value for a continuous control, 0–127.
    Control { control: ControlId, value: u8 },
}

// ════════════════════════════════════════════════════════════════════════════
// SideMapping
// ════════════════════════════════════════════════════════════════════════════

/// Addresses for one hand's deck. A table given in config must be complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SideMapping {
    pub channel:    u8,
    pub volume_cc:  u8,
    pub low_eq_cc:  u8,
    pub mid_eq_cc:  u8,
    pub high_eq_cc: u8,
    pub play_note:  u8,
}

impl Default for SideMapping {
    /// Left-deck layout: channel 0, CC 1–4, play on note 60.
    fn default() -> Self {
        SideMapping {
            channel:    0,
            volume_cc:  1,
            low_eq_cc:  2,
            mid_eq_cc:  3,
            high_eq_cc: 4,
            play_note:  60,
        }
    }
}

impl SideMapping {
    pub fn cc(&self, control: ControlId) -> u8 {
        match control {
            ControlId::Volume => self.volume_cc,
            ControlId::LowEq  => self.low_eq_cc,
            ControlId::MidEq  => self.mid_eq_cc,
            ControlId::HighEq => self.high_eq_cc,
        }
    }

    /// Same channel, every CC and the play note shifted by `by`.
    pub fn shifted(&self, by: u8) -> Result<SideMapping> {
        let shift = |n: u8| -> Result<u8> {
            match n.checked_add(by) {
                Some(v) if v <= 127 => Ok(v),
                _ => Err(MidiError::ValueOutOfRange {
                    what: "shifted number",
                    value: n.saturating_add(by),
                    max: 127,
                }),
            }
        };
        Ok(SideMapping {
            channel:    self.channel,
            volume_cc:  shift(self.volume_cc)?,
            low_eq_cc:  shift(self.low_eq_cc)?,
            mid_eq_cc:  shift(self.mid_eq_cc)?,
            high_eq_cc: shift(self.high_eq_cc)?,
            play_note:  shift(self.play_note)?,
        })
    }

    fn validate(&self) -> Result<()> {
        if self.channel > 15 {
            return Err(MidiError::ValueOutOfRange { what: "channel", value: self.channel, max: 15 });
        }
        for n in [self.volume_cc, self.low_eq_cc, self.mid_eq_cc, self.high_eq_cc] {
            if n > 127 {
                return Err(MidiError::ValueOutOfRange { what: "controller", value: n, max: 127 });
            }
        }
        if self.play_note > 127 {
            return Err(MidiError::ValueOutOfRange { what: "note", value: self.play_note, max: 127 });
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MidiMap
// ════════════════════════════════════════════════════════════════════════════

/// The full two-deck table plus the velocity of play presses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MidiMap {
    pub left:          SideMapping,
    pub right:         SideMapping,
    pub play_velocity: u8,
}

impl Default for MidiMap {
    fn default() -> Self {
        // The default left deck shifted by 10 stays well inside 0–127.
        let left = SideMapping::default();
        MidiMap {
            left,
            right: SideMapping {
                volume_cc:  left.volume_cc  + DEFAULT_DECK_OFFSET,
                low_eq_cc:  left.low_eq_cc  + DEFAULT_DECK_OFFSET,
                mid_eq_cc:  left.mid_eq_cc  + DEFAULT_DECK_OFFSET,
                high_eq_cc: left.high_eq_cc + DEFAULT_DECK_OFFSET,
                play_note:  left.play_note  + DEFAULT_DECK_OFFSET,
                ..left
            },
            play_velocity: 127,
        }
    }
}

impl MidiMap {
    /// Left deck = `base`, right deck = `base` shifted by `offset`.
    pub fn with_offset(base: SideMapping, offset: u8, play_velocity: u8) -> Result<Self> {
        let map = MidiMap { left: base, right: base.shifted(offset)?, play_velocity };
        map.validate()?;
        Ok(map)
    }

    pub fn side(&self, side: HandSide) -> &SideMapping {
        match side {
            HandSide::Left  => &self.left,
            HandSide::Right => &self.right,
        }
    }

    /// `(channel, controller)` for a continuous control.
    pub fn address(&self, side: HandSide, control: ControlId) -> (u8, u8) {
        let m = self.side(side);
        (m.channel, m.cc(control))
    }

    /// `(channel, note)` for the play button.
    pub fn play_address(&self, side: HandSide) -> (u8, u8) {
        let m = self.side(side);
        (m.channel, m.play_note)
    }

    /// Reject out-of-range numbers and any two bindings on the same address.
    pub fn validate(&self) -> Result<()> {
        self.left.validate()?;
        self.right.validate()?;
        if self.play_velocity > 127 {
            return Err(MidiError::ValueOutOfRange {
                what: "velocity", value: self.play_velocity, max: 127,
            });
        }

        let mut ccs = Vec::with_capacity(8);
        for side in HandSide::ALL {
            for control in ControlId::ALL {
                let addr = self.address(side, control);
                if ccs.contains(&addr) {
                    return Err(MidiError::Collision { what: "controller", channel: addr.0, number: addr.1 });
                }
                ccs.push(addr);
            }
        }
        let (l, r) = (self.play_address(HandSide::Left), self.play_address(HandSide::Right));
        if l == r {
            return Err(MidiError::Collision { what: "play note", channel: l.0, number: l.1 });
        }
        Ok(())
    }

    /// Concrete messages for one hand's action, in send order.
    pub fn messages_for(&self, side: HandSide, action: Action) -> Vec<MidiMessage> {
        match action {
            Action::Control { control, value } => {
                let (channel, controller) = self.address(side, control);
                vec![MidiMessage::ControlChange { channel, controller, value: value.min(127) }]
            }
            Action::Play => {
                let (channel, note) = self.play_address(side);
                vec![
                    MidiMessage::NoteOn  { channel, note, velocity: self.play_velocity },
                    MidiMessage::NoteOff { channel, note, velocity: 0 },
                ]
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
