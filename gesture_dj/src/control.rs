//! Per-hand control state — debounced play presses and change-only CCs.
//!
//! One [`HandController`] exists per hand side and is advanced exactly once
//! per frame.  Transitions, keyed on the newly classified gesture:
//!
//! | Gesture | Effect |
//! |---|---|
//! | Fist | nothing; the play latch is left alone |
//! | OpenPalmThumbOut | [`Action::Play`] on a rising edge, at most once per debounce window |
//! | ThumbPinky / PinkyOnly / IndexOnly / IndexMiddle | [`Action::Control`] when the value changed |
//! | Unknown / None | nothing |
//!
//! `last_gesture` is always updated last.

use std::time::{Duration, Instant};

use tracing::debug;
use hand_pose::{Gesture, HandSide};
use dj_midi::{Action, ControlId};

use crate::config::ControlConfig;

/// The continuous control a gesture drives, if any.
pub fn control_for(gesture: Gesture) -> Option<ControlId> {
    match gesture {
        Gesture::ThumbPinky  => Some(ControlId::Volume),
        Gesture::PinkyOnly   => Some(ControlId::LowEq),
        Gesture::IndexOnly   => Some(ControlId::MidEq),
        Gesture::IndexMiddle => Some(ControlId::HighEq),
        _ => None,
    }
}

/// `round(position * 127)`, with position clamped to [0, 1].
pub fn cc_value(position: f32) -> u8 {
    if position.is_nan() {
        return 0;
    }
    (position.clamp(0.0, 1.0) * 127.0).round() as u8
}

// ════════════════════════════════════════════════════════════════════════════
// ControlState — what persists between frames
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlState {
    pub last_gesture: Gesture,
    /// Flips on every accepted play press: the deck is believed to be playing.
    pub play_latched: bool,
    pub last_play_trigger_time: Option<Instant>,
    last_sent_cc_value: [Option<u8>; 4],
}

impl Default for ControlState {
    fn default() -> Self {
        ControlState {
            last_gesture:           Gesture::None,
            play_latched:           false,
            last_play_trigger_time: None,
            last_sent_cc_value:     [None; 4],
        }
    }
}

impl ControlState {
    pub fn last_sent(&self, control: ControlId) -> Option<u8> {
        self.last_sent_cc_value[control.index()]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandController
// ════════════════════════════════════════════════════════════════════════════

pub struct HandController {
    side:            HandSide,
    state:           ControlState,
    debounce:        Duration,
    resend_on_entry: bool,
}

impl HandController {
    pub fn new(side: HandSide, config: &ControlConfig) -> Self {
        HandController {
            side,
            state:           ControlState::default(),
            debounce:        config.debounce_window(),
            resend_on_entry: config.resend_on_entry,
        }
    }

    pub fn side(&self) -> HandSide {
        self.side
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    /// Advance one frame. `position` is the hand height in [0, 1]; `now` is
    /// read from a monotonic clock once per frame by the caller.
    pub fn advance(&mut self, gesture: Gesture, position: f32, now: Instant) -> Option<Action> {
        let previous = self.state.last_gesture;

        let action = match gesture {
            Gesture::OpenPalmThumbOut => self.on_open_palm(previous, now),
            g => match control_for(g) {
                Some(control) => self.on_control(control, previous != g, position),
                None => None, // Fist, Unknown, None
            },
        };

        self.state.last_gesture = gesture;
        action
    }

    /// The hand vanished this frame. Only `last_gesture` changes.
    pub fn advance_lost(&mut self) {
        if self.state.last_gesture != Gesture::None {
            debug!(side = %self.side, "hand lost");
        }
        self.state.last_gesture = Gesture::None;
    }

    fn on_open_palm(&mut self, previous: Gesture, now: Instant) -> Option<Action> {
        if previous == Gesture::OpenPalmThumbOut {
            return None; // held
        }
        if let Some(last) = self.state.last_play_trigger_time {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < self.debounce {
                debug!(side = %self.side, ?elapsed, "play suppressed inside debounce window");
                return None;
            }
        }
        self.state.last_play_trigger_time = Some(now);
        self.state.play_latched = !self.state.play_latched;
        debug!(side = %self.side, playing = self.state.play_latched, "play");
        Some(Action::Play)
    }

    fn on_control(&mut self, control: ControlId, entered: bool, position: f32) -> Option<Action> {
        let value = cc_value(position);
        let slot = &mut self.state.last_sent_cc_value[control.index()];
        let changed = *slot != Some(value);
        *slot = Some(value);

        if changed || (entered && self.resend_on_entry) {
            Some(Action::Control { control, value })
        } else {
            None
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(debounce_ms: u64) -> HandController {
        HandController::new(
            HandSide::Left,
            &ControlConfig { debounce_ms, resend_on_entry: false },
        )
    }

    fn ms(t0: Instant, n: u64) -> Instant {
        t0 + Duration::from_millis(n)
    }

    // ── value scaling ────────────────────────────────────────────────────
    #[test]
    fn cc_value_rounds_and_clamps() {
        assert_eq!(cc_value(0.0), 0);
        assert_eq!(cc_value(0.5), 64);
        assert_eq!(cc_value(1.0), 127);
        assert_eq!(cc_value(1.7), 127);
        assert_eq!(cc_value(-0.3), 0);
        assert_eq!(cc_value(f32::NAN), 0);
    }

    #[test]
    fn gesture_to_control() {
        assert_eq!(control_for(Gesture::ThumbPinky),  Some(ControlId::Volume));
        assert_eq!(control_for(Gesture::PinkyOnly),   Some(ControlId::LowEq));
        assert_eq!(control_for(Gesture::IndexOnly),   Some(ControlId::MidEq));
        assert_eq!(control_for(Gesture::IndexMiddle), Some(ControlId::HighEq));
        assert_eq!(control_for(Gesture::OpenPalmThumbOut), None);
        assert_eq!(control_for(Gesture::Fist), None);
    }

    // ── play debounce ────────────────────────────────────────────────────
    #[test]
    fn held_open_palm_fires_once() {
        let mut c = controller(500);
        let t0 = Instant::now();
        let fired: Vec<_> = (0..30)
            .filter_map(|i| c.advance(Gesture::OpenPalmThumbOut, 0.5, ms(t0, i * 33)))
            .collect();
        assert_eq!(fired, vec![Action::Play]);
    }

    #[test]
    fn held_past_the_window_still_fires_once() {
        let mut c = controller(500);
        let t0 = Instant::now();
        let fired = (0..100)
            .filter_map(|i| c.advance(Gesture::OpenPalmThumbOut, 0.5, ms(t0, i * 33)))
            .count();
        assert_eq!(fired, 1);
    }

    #[test]
    fn re_entry_inside_window_is_suppressed() {
        let mut c = controller(500);
        let t0 = Instant::now();
        assert_eq!(c.advance(Gesture::OpenPalmThumbOut, 0.5, t0), Some(Action::Play));
        assert_eq!(c.advance(Gesture::Fist, 0.5, ms(t0, 50)), None);
        assert_eq!(c.advance(Gesture::OpenPalmThumbOut, 0.5, ms(t0, 100)), None);
    }

    #[test]
    fn re_arms_after_window() {
        let mut c = controller(500);
        let t0 = Instant::now();
        assert_eq!(c.advance(Gesture::OpenPalmThumbOut, 0.5, t0), Some(Action::Play));
        assert_eq!(c.advance(Gesture::Fist, 0.5, ms(t0, 300)), None);
        assert_eq!(c.advance(Gesture::OpenPalmThumbOut, 0.5, ms(t0, 600)), Some(Action::Play));
        assert_eq!(c.advance(Gesture::OpenPalmThumbOut, 0.5, ms(t0, 633)), None);
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let mut c = controller(500);
        let t0 = Instant::now();
        c.advance(Gesture::OpenPalmThumbOut, 0.5, t0);
        c.advance(Gesture::Unknown, 0.5, ms(t0, 250));
        assert_eq!(c.advance(Gesture::OpenPalmThumbOut, 0.5, ms(t0, 500)), Some(Action::Play));
    }

    #[test]
    fn play_latch_toggles_and_survives_fist() {
        let mut c = controller(0);
        let t0 = Instant::now();
        c.advance(Gesture::OpenPalmThumbOut, 0.5, t0);
        assert!(c.state().play_latched);
        c.advance(Gesture::Fist, 0.5, ms(t0, 10));
        assert!(c.state().play_latched);
        c.advance(Gesture::OpenPalmThumbOut, 0.5, ms(t0, 20));
        assert!(!c.state().play_latched);
    }

    #[test]
    fn lost_hand_keeps_trigger_time() {
        let mut c = controller(500);
        let t0 = Instant::now();
        c.advance(Gesture::OpenPalmThumbOut, 0.5, t0);
        c.advance_lost();
        assert_eq!(c.state().last_gesture, Gesture::None);
        assert_eq!(c.state().last_play_trigger_time, Some(t0));
        // Reappearing open palm is a rising edge, but still debounced.
        assert_eq!(c.advance(Gesture::OpenPalmThumbOut, 0.5, ms(t0, 200)), None);
    }

    // ── continuous controls ──────────────────────────────────────────────
    #[test]
    fn unchanged_value_is_sent_once() {
        let mut c = controller(500);
        let t0 = Instant::now();
        let sent: Vec<_> = (0..3)
            .filter_map(|i| c.advance(Gesture::ThumbPinky, 0.5, ms(t0, i * 33)))
            .collect();
        assert_eq!(sent, vec![Action::Control { control: ControlId::Volume, value: 64 }]);
        assert_eq!(c.state().last_sent(ControlId::Volume), Some(64));
    }

    #[test]
    fn every_change_is_sent() {
        let mut c = controller(500);
        let t0 = Instant::now();
        let values: Vec<u8> = [0.1f32, 0.1, 0.2, 0.2, 0.1]
            .iter()
            .enumerate()
            .filter_map(|(i, &p)| c.advance(Gesture::IndexOnly, p, ms(t0, i as u64)))
            .map(|a| match a {
                Action::Control { value, .. } => value,
                Action::Play => panic!("unexpected play"),
            })
            .collect();
        assert_eq!(values, vec![13, 25, 13]);
    }

    #[test]
    fn controls_are_tracked_independently() {
        let mut c = controller(500);
        let t0 = Instant::now();
        assert!(c.advance(Gesture::PinkyOnly, 0.5, t0).is_some());
        assert!(c.advance(Gesture::IndexMiddle, 0.5, ms(t0, 1)).is_some());
        // Back to low EQ at the value it already holds.
        assert_eq!(c.advance(Gesture::PinkyOnly, 0.5, ms(t0, 2)), None);
    }

    #[test]
    fn resend_on_entry_repeats_value_after_switching() {
        let mut c = HandController::new(
            HandSide::Right,
            &ControlConfig { debounce_ms: 500, resend_on_entry: true },
        );
        let t0 = Instant::now();
        let vol = Action::Control { control: ControlId::Volume, value: 64 };
        assert_eq!(c.advance(Gesture::ThumbPinky, 0.5, t0), Some(vol));
        assert_eq!(c.advance(Gesture::ThumbPinky, 0.5, ms(t0, 1)), None);
        c.advance(Gesture::Fist, 0.5, ms(t0, 2));
        assert_eq!(c.advance(Gesture::ThumbPinky, 0.5, ms(t0, 3)), Some(vol));
    }

    #[test]
    fn idle_gestures_do_nothing() {
        let mut c = controller(500);
        let t0 = Instant::now();
        for g in [Gesture::Fist, Gesture::Unknown, Gesture::None] {
            assert_eq!(c.advance(g, 0.9, t0), None);
            assert_eq!(c.state().last_gesture, g);
        }
        assert_eq!(c.state().last_play_trigger_time, None);
        assert!(ControlId::ALL.iter().all(|&id| c.state().last_sent(id).is_none()));
    }
}
