//! # dj_midi
//!
//! MIDI side of the gesture DJ controller:
//!
//! * [`MidiMessage`] — control-change and note messages, encoded directly to
//!   wire bytes.
//! * [`MidiMap`] — the static ControlID × HandSide addressing table, and the
//!   translation of an [`Action`] into concrete messages.
//! * [`MidiSink`] — where messages go: a live `midir` port, a null sink, an
//!   in-memory recorder for tests, or a text writer for dry runs.
//!
//! ## Default two-deck layout
//!
//! | Control | Left CC / note | Right CC / note |
//! |---|---|---|
//! | Volume | 1 | 11 |
//! | Low EQ | 2 | 12 |
//! | Mid EQ | 3 | 13 |
//! | High EQ | 4 | 14 |
//! | Play | note 60 | note 70 |
//!
//! Both decks default to channel 0.  Bind them with MIDI Learn in the DJ
//! software.

pub mod error;
pub mod message;
pub mod map;
pub mod sink;

pub use error::{MidiError, Result};
pub use message::MidiMessage;
pub use map::{Action, ControlId, MidiMap, SideMapping, DEFAULT_DECK_OFFSET};
pub use sink::{list_output_ports, open_or_null, MemorySink, MidiSink, MidirSink, NullSink, WriterSink};
