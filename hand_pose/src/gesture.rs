//! Gesture classification — finger pattern → gesture label.
//!
//! | (thumb, index, middle, ring, pinky) | Gesture | Label |
//! |---|---|---|
//! | all down | [`Gesture::Fist`] | `NULL` |
//! | all up | [`Gesture::OpenPalmThumbOut`] | `PLAY` |
//! | thumb + pinky | [`Gesture::ThumbPinky`] | `VOLUME` |
//! | pinky | [`Gesture::PinkyOnly`] | `LOW EQ` |
//! | index | [`Gesture::IndexOnly`] | `MID EQ` |
//! | index + middle | [`Gesture::IndexMiddle`] | `HIGH EQ` |
//! | anything else | [`Gesture::Unknown`] | `?` |
//!
//! [`Gesture::None`] is never produced by [`classify`]; it marks a frame in
//! which the hand was not detected at all.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::FingerExtension;

/// Discrete DJ-control intent read from one hand in one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    Fist,
    OpenPalmThumbOut,
    ThumbPinky,
    PinkyOnly,
    IndexOnly,
    IndexMiddle,
    /// Hand detected, pattern not in the table.
    Unknown,
    /// No hand this frame.
    None,
}

impl Gesture {
    /// Short on-screen label.
    pub fn label(self) -> &'static str {
        match self {
            Gesture::Fist             => "NULL",
            Gesture::OpenPalmThumbOut => "PLAY",
            Gesture::ThumbPinky       => "VOLUME",
            Gesture::PinkyOnly        => "LOW EQ",
            Gesture::IndexOnly        => "MID EQ",
            Gesture::IndexMiddle      => "HIGH EQ",
            Gesture::Unknown          => "?",
            Gesture::None             => "—",
        }
    }

    /// True for gestures that drive a continuous control from hand height.
    pub fn is_continuous(self) -> bool {
        matches!(
            self,
            Gesture::ThumbPinky | Gesture::PinkyOnly | Gesture::IndexOnly | Gesture::IndexMiddle
        )
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify one frame's finger pattern. Total over all 32 patterns.
pub fn classify(fingers: FingerExtension) -> Gesture {
    match fingers.as_array() {
        [false, false, false, false, false] => Gesture::Fist,
        [true,  true,  true,  true,  true ] => Gesture::OpenPalmThumbOut,
        [true,  false, false, false, true ] => Gesture::ThumbPinky,
        [false, false, false, false, true ] => Gesture::PinkyOnly,
        [false, true,  false, false, false] => Gesture::IndexOnly,
        [false, true,  true,  false, false] => Gesture::IndexMiddle,
        _ => Gesture::Unknown,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn f(t: bool, i: bool, m: bool, r: bool, p: bool) -> FingerExtension {
        FingerExtension::new(t, i, m, r, p)
    }

    #[test]
    fn table_entries() {
        assert_eq!(classify(f(false, false, false, false, false)), Gesture::Fist);
        assert_eq!(classify(f(true,  true,  true,  true,  true )), Gesture::OpenPalmThumbOut);
        assert_eq!(classify(f(true,  false, false, false, true )), Gesture::ThumbPinky);
        assert_eq!(classify(f(false, false, false, false, true )), Gesture::PinkyOnly);
        assert_eq!(classify(f(false, true,  false, false, false)), Gesture::IndexOnly);
        assert_eq!(classify(f(false, true,  true,  false, false)), Gesture::IndexMiddle);
    }

    #[test]
    fn unlisted_patterns_are_unknown() {
        assert_eq!(classify(f(true,  true,  false, false, true )), Gesture::Unknown);
        assert_eq!(classify(f(true,  false, false, false, false)), Gesture::Unknown);
        assert_eq!(classify(f(false, true,  true,  true,  true )), Gesture::Unknown);
        assert_eq!(classify(f(true,  true,  false, false, false)), Gesture::Unknown);
    }

    #[test]
    fn total_and_deterministic_over_all_patterns() {
        let mut known = 0;
        for bits in 0..32u8 {
            let pattern = FingerExtension::from_bits(bits);
            let first = classify(pattern);
            for _ in 0..3 {
                assert_eq!(classify(pattern), first);
            }
            assert_ne!(first, Gesture::None);
            if first != Gesture::Unknown {
                known += 1;
            }
        }
        assert_eq!(known, 6);
    }

    #[test]
    fn continuous_gestures() {
        assert!(Gesture::ThumbPinky.is_continuous());
        assert!(Gesture::IndexMiddle.is_continuous());
        assert!(!Gesture::OpenPalmThumbOut.is_continuous());
        assert!(!Gesture::Fist.is_continuous());
        assert!(!Gesture::None.is_continuous());
    }

    #[test]
    fn labels() {
        assert_eq!(Gesture::OpenPalmThumbOut.to_string(), "PLAY");
        assert_eq!(Gesture::PinkyOnly.label(), "LOW EQ");
    }
}
