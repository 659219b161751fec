//! Landmark geometry — finger extension and normalized hand position.
//!
//! # Extension rule
//!
//! * **Index, middle, ring, pinky** are radial: a finger is extended when its
//!   tip is farther from the wrist than its PIP knuckle, scaled by
//!   [`ExtensionRule::extension_ratio`].  Both distances scale with the hand,
//!   so the test holds whether the hand is near or far from the camera.
//! * **Thumb** is lateral: the tip must sit outward of the IP joint along x.
//!   Which way is "outward" depends on the hand side and on whether the
//!   detector sees a mirrored (selfie) image.

use serde::{Deserialize, Serialize};

use crate::landmark::*;

// ════════════════════════════════════════════════════════════════════════════
// ExtensionRule — calibration constants
// ════════════════════════════════════════════════════════════════════════════

/// Calibration for the extension tests.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtensionRule {
    /// Tip-to-wrist distance must exceed `pip_to_wrist * extension_ratio`.
    #[serde(default = "default_extension_ratio")]
    pub extension_ratio: f32,
    /// Lateral margin (normalized x units) the thumb tip must clear.
    #[serde(default = "default_thumb_margin")]
    pub thumb_margin: f32,
    /// Input frames are horizontally mirrored (selfie view).
    #[serde(default = "default_mirrored")]
    pub mirrored: bool,
}

fn default_extension_ratio() -> f32 { 1.0 }
fn default_thumb_margin() -> f32 { 0.0 }
fn default_mirrored() -> bool { true }

impl Default for ExtensionRule {
    fn default() -> Self {
        ExtensionRule {
            extension_ratio: default_extension_ratio(),
            thumb_margin:    default_thumb_margin(),
            mirrored:        default_mirrored(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FingerExtension
// ════════════════════════════════════════════════════════════════════════════

/// Which fingers are extended in one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FingerExtension {
    pub thumb:  bool,
    pub index:  bool,
    pub middle: bool,
    pub ring:   bool,
    pub pinky:  bool,
}

/// (tip, pip) pairs for the four radial fingers.
const RADIAL_FINGERS: [(usize, usize); 4] = [
    (INDEX_TIP,  INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP,   RING_PIP),
    (PINKY_TIP,  PINKY_PIP),
];

impl FingerExtension {
    pub const fn new(thumb: bool, index: bool, middle: bool, ring: bool, pinky: bool) -> Self {
        FingerExtension { thumb, index, middle, ring, pinky }
    }

    /// Decode a 5-bit pattern: bit 0 = thumb … bit 4 = pinky.
    pub const fn from_bits(bits: u8) -> Self {
        FingerExtension {
            thumb:  bits & 0b00001 != 0,
            index:  bits & 0b00010 != 0,
            middle: bits & 0b00100 != 0,
            ring:   bits & 0b01000 != 0,
            pinky:  bits & 0b10000 != 0,
        }
    }

    /// `[thumb, index, middle, ring, pinky]`
    pub const fn as_array(&self) -> [bool; 5] {
        [self.thumb, self.index, self.middle, self.ring, self.pinky]
    }

    pub fn count(&self) -> usize {
        self.as_array().iter().filter(|&&up| up).count()
    }

    /// Measure a landmark set.
    pub fn from_landmarks(set: &LandmarkSet, side: HandSide, rule: &ExtensionRule) -> Self {
        let [index, middle, ring, pinky] =
            RADIAL_FINGERS.map(|(tip, pip)| finger_extended(set, tip, pip, rule.extension_ratio));
        FingerExtension {
            thumb: thumb_out(set, side, rule),
            index,
            middle,
            ring,
            pinky,
        }
    }
}

fn finger_extended(set: &LandmarkSet, tip: usize, pip: usize, ratio: f32) -> bool {
    let wrist = set.wrist();
    set[tip].distance(&wrist) > set[pip].distance(&wrist) * ratio
}

fn thumb_out(set: &LandmarkSet, side: HandSide, rule: &ExtensionRule) -> bool {
    let dx = set[THUMB_TIP].x - set[THUMB_IP].x;
    // Mirrored view: a right thumb points toward -x, a left thumb toward +x.
    let outward = match (side, rule.mirrored) {
        (HandSide::Right, true) | (HandSide::Left, false) => -dx,
        (HandSide::Left, true) | (HandSide::Right, false) => dx,
    };
    outward > rule.thumb_margin
}

// ════════════════════════════════════════════════════════════════════════════
// Hand position + per-frame reading
// ════════════════════════════════════════════════════════════════════════════

/// Vertical hand height in [0, 1] taken at the wrist; 1 = top of frame.
pub fn hand_position(set: &LandmarkSet) -> f32 {
    (1.0 - set.wrist().y).clamp(0.0, 1.0)
}

/// What the geometry utility reports for one hand in one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HandReading {
    /// No hand detected this frame.
    NoHand,
    Detected { fingers: FingerExtension, position: f32 },
}

/// Measure one (possibly absent) hand.
pub fn analyze(set: Option<&LandmarkSet>, side: HandSide, rule: &ExtensionRule) -> HandReading {
    match set {
        None => HandReading::NoHand,
        Some(set) => HandReading::Detected {
            fingers:  FingerExtension::from_landmarks(set, side, rule),
            position: hand_position(set),
        },
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth;

    // ── finger extension ─────────────────────────────────────────────────
    #[test]
    fn every_pattern_survives_measurement() {
        let rule = ExtensionRule::default();
        for side in HandSide::ALL {
            for bits in 0..32u8 {
                let want = FingerExtension::from_bits(bits);
                let hand = synth::pose(want, side, 0.5);
                assert_eq!(
                    FingerExtension::from_landmarks(&hand, side, &rule), want,
                    "{side} hand, bits {bits:05b}"
                );
            }
        }
    }

    #[test]
    fn radial_rule_is_scale_invariant() {
        let rule = ExtensionRule::default();
        let want = FingerExtension::new(false, true, false, false, true);
        let hand = synth::pose(want, HandSide::Right, 0.5);
        let wrist = hand.wrist();
        // Shrink the whole hand toward the wrist, as if it moved away from the camera.
        let far: Vec<Point3> = hand.points().iter().map(|p| Point3::new(
            wrist.x + (p.x - wrist.x) * 0.3,
            wrist.y + (p.y - wrist.y) * 0.3,
            p.z,
        )).collect();
        let far = LandmarkSet::from_points(&far).unwrap();
        assert_eq!(FingerExtension::from_landmarks(&far, HandSide::Right, &rule), want);
    }

    #[test]
    fn extension_ratio_tightens_the_rule() {
        // Synthetic extended tips reach only ~1.3-1.4x the PIP distance.
        let strict = ExtensionRule { extension_ratio: 1.5, ..ExtensionRule::default() };
        let hand = synth::pose(FingerExtension::from_bits(0b11110), HandSide::Left, 0.5);
        let got = FingerExtension::from_landmarks(&hand, HandSide::Left, &strict);
        assert_eq!(got.count(), 0);
    }

    // ── thumb ────────────────────────────────────────────────────────────
    #[test]
    fn thumb_direction_depends_on_side() {
        let rule = ExtensionRule::default();
        let right = synth::pose(FingerExtension::from_bits(0b00001), HandSide::Right, 0.5);
        assert!(FingerExtension::from_landmarks(&right, HandSide::Right, &rule).thumb);
        // Same geometry read as a left hand points the thumb inward.
        assert!(!FingerExtension::from_landmarks(&right, HandSide::Left, &rule).thumb);
    }

    #[test]
    fn unmirrored_input_flips_thumb() {
        let rule = ExtensionRule { mirrored: false, ..ExtensionRule::default() };
        let right = synth::pose(FingerExtension::from_bits(0b00001), HandSide::Right, 0.5);
        assert!(!FingerExtension::from_landmarks(&right, HandSide::Right, &rule).thumb);
        assert!(FingerExtension::from_landmarks(&right, HandSide::Left, &rule).thumb);
    }

    #[test]
    fn thumb_margin_rejects_small_offsets() {
        let rule = ExtensionRule { thumb_margin: 0.1, ..ExtensionRule::default() };
        let hand = synth::pose(FingerExtension::from_bits(0b00001), HandSide::Right, 0.5);
        assert!(!FingerExtension::from_landmarks(&hand, HandSide::Right, &rule).thumb);
    }

    // ── position ─────────────────────────────────────────────────────────
    #[test]
    fn position_follows_wrist_height() {
        for pos in [0.0f32, 0.25, 0.5, 1.0] {
            let hand = synth::pose(FingerExtension::default(), HandSide::Left, pos);
            assert!((hand_position(&hand) - pos).abs() < 1e-6);
        }
    }

    #[test]
    fn position_clamps_outside_frame() {
        let mut pts = *synth::pose(FingerExtension::default(), HandSide::Left, 0.5).points();
        pts[WRIST].y = 1.3;
        let below = LandmarkSet::new(pts).unwrap();
        assert_eq!(hand_position(&below), 0.0);
        pts[WRIST].y = -0.2;
        let above = LandmarkSet::new(pts).unwrap();
        assert_eq!(hand_position(&above), 1.0);
    }

    // ── reading ──────────────────────────────────────────────────────────
    #[test]
    fn absent_hand_reads_as_no_hand() {
        assert_eq!(analyze(None, HandSide::Right, &ExtensionRule::default()), HandReading::NoHand);
    }

    #[test]
    fn bits_round_out_the_array() {
        let f = FingerExtension::from_bits(0b10001);
        assert_eq!(f.as_array(), [true, false, false, false, true]);
        assert_eq!(f.count(), 2);
    }

    #[test]
    fn rule_rejects_unknown_keys() {
        let rule: ExtensionRule = serde_json::from_str(r#"{"thumb_margin": 0.01}"#).unwrap();
        assert_eq!(rule.extension_ratio, 1.0);
        assert!(serde_json::from_str::<ExtensionRule>(r#"{"extention_ratio": 1.2}"#).is_err());
    }
}
