//! Landmark model — points, hand sides and the validated 21-point set.

use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::{PoseError, Result};

// ════════════════════════════════════════════════════════════════════════════
// Hand topology indices
// ════════════════════════════════════════════════════════════════════════════

/// Number of points in one hand landmark set.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

// ════════════════════════════════════════════════════════════════════════════
// Point3
// ════════════════════════════════════════════════════════════════════════════

/// A landmark in normalized image coordinates (x right, y down, z depth).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Point3 { x, y, z }
    }

    /// Euclidean distance in all three axes.
    pub fn distance(&self, other: &Point3) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f32; 3]> for Point3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Point3 { x, y, z }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandSide
// ════════════════════════════════════════════════════════════════════════════

/// Which hand a landmark stream belongs to. Fixed for the life of a stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandSide {
    #[serde(alias = "Left")]
    Left,
    #[serde(alias = "Right")]
    Right,
}

impl HandSide {
    pub const ALL: [HandSide; 2] = [HandSide::Left, HandSide::Right];

    /// Stable array slot: Left = 0, Right = 1.
    pub fn index(self) -> usize {
        match self {
            HandSide::Left  => 0,
            HandSide::Right => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HandSide::Left  => "Left",
            HandSide::Right => "Right",
        }
    }

    /// One-letter tag used in status lines.
    pub fn initial(self) -> char {
        match self {
            HandSide::Left  => 'L',
            HandSide::Right => 'R',
        }
    }
}

impl fmt::Display for HandSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSet
// ════════════════════════════════════════════════════════════════════════════

/// One detected hand: all 21 points, all finite.
///
/// There is no partial set. A frame without a hand carries `None` instead.
#[derive(Clone, Debug, PartialEq)]
pub struct LandmarkSet {
    points: [Point3; LANDMARK_COUNT],
}

impl LandmarkSet {
    pub fn new(points: [Point3; LANDMARK_COUNT]) -> Result<Self> {
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(PoseError::NonFinite { index });
        }
        Ok(LandmarkSet { points })
    }

    /// Skip validation for points known to be finite.
    pub(crate) const fn from_trusted(points: [Point3; LANDMARK_COUNT]) -> Self {
        LandmarkSet { points }
    }

    /// Build from a slice, failing fast if it is not exactly 21 points long.
    pub fn from_points(points: &[Point3]) -> Result<Self> {
        let points: [Point3; LANDMARK_COUNT] = points.try_into().map_err(|_| {
            PoseError::InvalidInput { expected: LANDMARK_COUNT, found: points.len() }
        })?;
        Self::new(points)
    }

    /// Build from raw `[x, y, z]` triples as delivered by a detector.
    pub fn from_arrays(raw: &[[f32; 3]]) -> Result<Self> {
        let points: Vec<Point3> = raw.iter().copied().map(Point3::from).collect();
        Self::from_points(&points)
    }

    pub fn points(&self) -> &[Point3; LANDMARK_COUNT] {
        &self.points
    }

    pub fn wrist(&self) -> Point3 {
        self.points[WRIST]
    }
}

impl Index<usize> for LandmarkSet {
    type Output = Point3;

    fn index(&self, idx: usize) -> &Point3 {
        &self.points[idx]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
