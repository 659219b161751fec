//! Frame pipeline — one frame in, ordered MIDI messages out.
//!
//! [`GestureDj`] owns the two independent hand controllers.  A frame is fully
//! validated before either controller is touched, so a rejected frame leaves
//! all state exactly as it was.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::trace;
use hand_pose::{analyze, classify, ExtensionRule, Gesture, HandReading, HandSide, LandmarkSet};
use dj_midi::{MidiMap, MidiMessage};

use crate::config::{Config, ControlConfig};
use crate::control::HandController;
use crate::error::{GestureDjError, Result};

// ════════════════════════════════════════════════════════════════════════════
// Input frame
// ════════════════════════════════════════════════════════════════════════════

/// One detector observation of one hand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandObservation {
    pub side: HandSide,
    pub landmarks: Vec<[f32; 3]>,
}

/// Everything the detector saw in one video frame: zero, one or two hands.
///
/// JSON form, one frame per line:
///
/// ```json
/// {"timestamp_ms": 1033, "hands": [{"side": "left", "landmarks": [[0.5, 0.5, 0.0], ...]}]}
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Capture time relative to the start of the stream, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
    #[serde(default)]
    pub hands: Vec<HandObservation>,
}

impl Frame {
    pub fn hand(&self, side: HandSide) -> Option<&HandObservation> {
        self.hands.iter().find(|h| h.side == side)
    }

    /// Validate every hand and return them by side slot (Left = 0, Right = 1).
    pub fn landmark_sets(&self) -> Result<[Option<LandmarkSet>; 2]> {
        let mut sets: [Option<LandmarkSet>; 2] = [None, None];
        for obs in &self.hands {
            let slot = &mut sets[obs.side.index()];
            if slot.is_some() {
                return Err(GestureDjError::Frame(format!("{} hand reported twice", obs.side)));
            }
            *slot = Some(LandmarkSet::from_arrays(&obs.landmarks)?);
        }
        Ok(sets)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Output
// ════════════════════════════════════════════════════════════════════════════

/// What one hand did this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandReport {
    pub side:         HandSide,
    pub gesture:      Gesture,
    /// Hand height, `None` when no hand was seen.
    pub position:     Option<f32>,
    pub play_latched: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrameOutput {
    /// Left hand's messages first, then the right hand's.
    pub messages: Vec<MidiMessage>,
    pub hands:    [HandReport; 2],
}

impl FrameOutput {
    /// `L: PLAY  R: VOLUME` — the per-hand overlay text.
    pub fn status_line(&self) -> String {
        let [l, r] = &self.hands;
        format!(
            "{}: {}  {}: {}",
            l.side.initial(), l.gesture.label(),
            r.side.initial(), r.gesture.label(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureDj
// ════════════════════════════════════════════════════════════════════════════

pub struct GestureDj {
    rule:  ExtensionRule,
    map:   MidiMap,
    hands: [HandController; 2],
}

impl GestureDj {
    /// Build from a validated configuration.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config.classifier, &config.control, config.midi.map()))
    }

    /// Build from parts; `map` is assumed valid.
    pub fn from_parts(rule: ExtensionRule, control: &ControlConfig, map: MidiMap) -> Self {
        GestureDj {
            rule,
            map,
            hands: HandSide::ALL.map(|side| HandController::new(side, control)),
        }
    }

    pub fn controller(&self, side: HandSide) -> &HandController {
        &self.hands[side.index()]
    }

    pub fn map(&self) -> &MidiMap {
        &self.map
    }

    /// Process one decoded frame. A malformed hand rejects the whole frame.
    pub fn process_frame(&mut self, frame: &Frame, now: Instant) -> Result<FrameOutput> {
        let [left, right] = frame.landmark_sets()?;
        Ok(self.process_hands(left.as_ref(), right.as_ref(), now))
    }

    /// Process one frame of already-validated landmark sets.
    pub fn process_hands(
        &mut self,
        left:  Option<&LandmarkSet>,
        right: Option<&LandmarkSet>,
        now:   Instant,
    ) -> FrameOutput {
        let mut messages = Vec::new();
        let mut reports = Vec::with_capacity(2);

        for (side, set) in [(HandSide::Left, left), (HandSide::Right, right)] {
            let controller = &mut self.hands[side.index()];
            let (gesture, position) = match analyze(set, side, &self.rule) {
                HandReading::NoHand => {
                    controller.advance_lost();
                    (Gesture::None, None)
                }
                HandReading::Detected { fingers, position } => {
                    let gesture = classify(fingers);
                    trace!(%side, ?fingers, %gesture, position, "hand");
                    if let Some(action) = controller.advance(gesture, position, now) {
                        messages.extend(self.map.messages_for(side, action));
                    }
                    (gesture, Some(position))
                }
            };
            reports.push(HandReport {
                side,
                gesture,
                position,
                play_latched: controller.state().play_latched,
            });
        }

        FrameOutput {
            messages,
            hands: [reports[0], reports[1]],
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_pose::{synth, FingerExtension};

    const OPEN: FingerExtension = FingerExtension::new(true, true, true, true, true);
    const VOLUME: FingerExtension = FingerExtension::new(true, false, false, false, true);

    fn dj() -> GestureDj {
        GestureDj::new(&Config::default()).unwrap()
    }

    fn obs(side: HandSide, fingers: FingerExtension, position: f32) -> HandObservation {
        HandObservation { side, landmarks: synth::pose_arrays(fingers, side, position) }
    }

    #[test]
    fn empty_frame_marks_both_hands_lost() {
        let mut dj = dj();
        let out = dj.process_frame(&Frame::default(), Instant::now()).unwrap();
        assert!(out.messages.is_empty());
        assert_eq!(out.hands[0].gesture, Gesture::None);
        assert_eq!(out.hands[1].position, None);
        assert_eq!(out.status_line(), "L: —  R: —");
    }

    #[test]
    fn left_messages_come_first() {
        let mut dj = dj();
        let frame = Frame {
            timestamp_ms: None,
            hands: vec![obs(HandSide::Right, OPEN, 0.5), obs(HandSide::Left, VOLUME, 0.5)],
        };
        let out = dj.process_frame(&frame, Instant::now()).unwrap();
        assert_eq!(out.messages, vec![
            MidiMessage::ControlChange { channel: 0, controller: 1, value: 64 },
            MidiMessage::NoteOn  { channel: 0, note: 70, velocity: 127 },
            MidiMessage::NoteOff { channel: 0, note: 70, velocity: 0 },
        ]);
        assert_eq!(out.status_line(), "L: VOLUME  R: PLAY");
        assert!(out.hands[1].play_latched);
    }

    #[test]
    fn malformed_hand_rejects_frame_without_touching_state() {
        let mut dj = dj();
        let mut bad = obs(HandSide::Right, VOLUME, 0.5);
        bad.landmarks.pop();
        let frame = Frame {
            timestamp_ms: None,
            hands: vec![obs(HandSide::Left, OPEN, 0.5), bad],
        };
        let err = dj.process_frame(&frame, Instant::now()).unwrap_err();
        assert!(matches!(err, GestureDjError::Pose(_)));
        assert!(err.is_recoverable());
        // The valid left hand was not applied either.
        assert_eq!(dj.controller(HandSide::Left).state().last_play_trigger_time, None);
    }

    #[test]
    fn duplicate_side_is_rejected() {
        let mut dj = dj();
        let frame = Frame {
            timestamp_ms: None,
            hands: vec![obs(HandSide::Left, OPEN, 0.5), obs(HandSide::Left, OPEN, 0.5)],
        };
        let err = dj.process_frame(&frame, Instant::now()).unwrap_err();
        assert!(matches!(err, GestureDjError::Frame(_)));
    }

    #[test]
    fn frame_json_shape() {
        let line = serde_json::to_string(&Frame {
            timestamp_ms: Some(33),
            hands: vec![obs(HandSide::Left, OPEN, 0.5)],
        }).unwrap();
        assert!(line.starts_with("{\"timestamp_ms\":33,\"hands\":[{\"side\":\"left\""));
        let back: Frame = serde_json::from_str(&line).unwrap();
        assert_eq!(back.hand(HandSide::Left).map(|h| h.landmarks.len()), Some(21));
        assert!(back.hand(HandSide::Right).is_none());
    }
}
