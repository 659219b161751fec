//! # gesture_dj
//!
//! Hand-gesture DJ controller.  Each video frame's hand landmarks are
//! classified into a gesture per hand; gesture plus hand height becomes MIDI
//! for the DJ software.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Action |
//! |---|---|
//! | ✊ Fist | Nothing |
//! | 🖐 Open hand, thumb out | Play (momentary note, debounced) |
//! | 🤙 Thumb + pinky | Volume = hand height |
//! | 🤘 Pinky only | Low EQ = hand height |
//! | ☝️ Index only | Mid EQ = hand height |
//! | ✌️ Index + middle | High EQ = hand height |
//!
//! The left hand drives deck A, the right hand deck B (same controls, CC and
//! note numbers offset by 10).  Control changes are only sent when the value
//! changes; a held open hand presses Play once.
//!
//! ## Input
//!
//! Landmark detection happens outside this crate.  Frames arrive as JSON
//! lines (see [`pipeline::Frame`]) on stdin or from a file, or, with the
//! `leap` feature, straight from a LeapMotion controller.

pub mod error;
pub mod config;
pub mod control;
pub mod pipeline;
pub mod source;
pub mod app;
pub mod cli;

pub use error::{GestureDjError, Result};
pub use config::{Config, ControlConfig, MidiConfig};
pub use control::{ControlState, HandController};
pub use pipeline::{Frame, FrameOutput, GestureDj, HandObservation, HandReport};
