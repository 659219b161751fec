//! # hand_pose
//!
//! Per-frame hand pose analysis over the 21-point hand landmark topology
//! produced by MediaPipe-style detectors.
//!
//! * [`LandmarkSet`] — one detected hand, exactly 21 points, validated on
//!   construction.
//! * [`FingerExtension`] — which of the five fingers are extended, derived
//!   with a scale-invariant geometric rule.
//! * [`classify`] — finger pattern → [`Gesture`], total and memoryless.
//!
//! Nothing here keeps state between frames.
//!
//! ## Quick start
//!
//! ```rust
//! use hand_pose::{analyze, classify, synth, ExtensionRule, FingerExtension, Gesture, HandReading, HandSide};
//!
//! let hand = synth::pose(FingerExtension::new(false, true, true, false, false), HandSide::Right, 0.5);
//! match analyze(Some(&hand), HandSide::Right, &ExtensionRule::default()) {
//!     HandReading::Detected { fingers, position } => {
//!         assert_eq!(classify(fingers), Gesture::IndexMiddle);
//!         assert!((position - 0.5).abs() < 1e-6);
//!     }
//!     HandReading::NoHand => unreachable!(),
//! }
//! ```

pub mod error;
pub mod landmark;
pub mod geometry;
pub mod gesture;
pub mod synth;

pub use error::{PoseError, Result};
pub use landmark::{HandSide, LandmarkSet, Point3, LANDMARK_COUNT};
pub use geometry::{analyze, hand_position, ExtensionRule, FingerExtension, HandReading};
pub use gesture::{classify, Gesture};
