//! Synthetic landmark sets with a chosen finger pattern and height.
//!
//! Used by tests across the workspace and for replay fixtures.  The hand
//! faces the camera, fingers pointing up, in the mirrored (selfie) view the
//! default [`ExtensionRule`](crate::ExtensionRule) expects.

use crate::geometry::FingerExtension;
use crate::landmark::*;

/// Base x of index, middle, ring, pinky for a right hand.
const FINGER_BASE_X: [f32; 4] = [0.46, 0.50, 0.54, 0.58];

/// Build a hand whose wrist sits at height `position` (0 = bottom, 1 = top).
pub fn pose(fingers: FingerExtension, side: HandSide, position: f32) -> LandmarkSet {
    debug_assert!(position.is_finite());
    let wy = 1.0 - position;
    let mut pts = [Point3::default(); LANDMARK_COUNT];

    pts[WRIST] = Point3::new(0.50, wy, 0.0);

    pts[THUMB_CMC] = Point3::new(0.47, wy - 0.03, 0.0);
    pts[THUMB_MCP] = Point3::new(0.44, wy - 0.06, 0.0);
    pts[THUMB_IP]  = Point3::new(0.42, wy - 0.08, 0.0);
    pts[THUMB_TIP] = if fingers.thumb {
        Point3::new(0.38, wy - 0.10, 0.0)
    } else {
        Point3::new(0.45, wy - 0.09, 0.0)
    };

    let up = [fingers.index, fingers.middle, fingers.ring, fingers.pinky];
    for (f, (&bx, &extended)) in FINGER_BASE_X.iter().zip(up.iter()).enumerate() {
        let mcp = INDEX_MCP + f * 4;
        pts[mcp]     = Point3::new(bx, wy - 0.10, 0.0);
        pts[mcp + 1] = Point3::new(bx, wy - 0.15, 0.0);
        if extended {
            pts[mcp + 2] = Point3::new(bx, wy - 0.18, 0.0);
            pts[mcp + 3] = Point3::new(bx, wy - 0.21, 0.0);
        } else {
            pts[mcp + 2] = Point3::new(bx, wy - 0.12, 0.0);
            pts[mcp + 3] = Point3::new(bx, wy - 0.09, 0.0);
        }
    }

    if side == HandSide::Left {
        for p in pts.iter_mut() {
            p.x = 1.0 - p.x;
        }
    }

    LandmarkSet::from_trusted(pts)
}

/// Same hand as raw `[x, y, z]` triples, the shape detectors emit.
pub fn pose_arrays(fingers: FingerExtension, side: HandSide, position: f32) -> Vec<[f32; 3]> {
    pose(fingers, side, position).points().iter().map(|p| [p.x, p.y, p.z]).collect()
}
