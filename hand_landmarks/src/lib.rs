//! # hand_landmarks
//!
//! One detected hand in one video frame, as the 21-point landmark set produced
//! by MediaPipe-style hand trackers, plus the pure functions that read
//! gestures out of it.
//!
//! Coordinates are normalized camera space: `x` grows to the right, `y` grows
//! **downward**, both in `[0, 1]`; `z` is relative depth.
//!
//! ```text
//!             8   12  16  20        tips
//!             7   11  15  19
//!      4      6   10  14  18        PIP joints
//!       3     5    9  13  17        MCP joints
//!        2
//!         1
//!              0                    wrist
//! ```
//!
//! * [`geometry`]: distances, the wrist rotation control angle, palm facing.
//! * [`classify`]: pinches and thumbs-up.
//! * [`pose`]: synthetic, well-formed frames for simulators and tests.

pub mod classify;
pub mod geometry;
pub mod pose;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of points in a hand landmark set.
pub const LANDMARK_COUNT: usize = 21;

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices
// ════════════════════════════════════════════════════════════════════════════

/// Landmark indices (MediaPipe hand model convention).
#[allow(dead_code)]
pub mod idx {
    pub const WRIST:      usize = 0;
    pub const THUMB_CMC:  usize = 1;
    pub const THUMB_MCP:  usize = 2;
    pub const THUMB_IP:   usize = 3;
    pub const THUMB_TIP:  usize = 4;
    pub const INDEX_MCP:  usize = 5;
    pub const INDEX_PIP:  usize = 6;
    pub const INDEX_DIP:  usize = 7;
    pub const INDEX_TIP:  usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP:   usize = 13;
    pub const RING_PIP:   usize = 14;
    pub const RING_DIP:   usize = 15;
    pub const RING_TIP:   usize = 16;
    pub const PINKY_MCP:  usize = 17;
    pub const PINKY_PIP:  usize = 18;
    pub const PINKY_DIP:  usize = 19;
    pub const PINKY_TIP:  usize = 20;
}

/// Bone list for drawing a skeleton (parent, child).
pub const SKELETON: [(usize, usize); 21] = [
    (0, 1), (1, 2), (2, 3), (3, 4),
    (0, 5), (5, 6), (6, 7), (7, 8),
    (0, 9), (9, 10), (10, 11), (11, 12),
    (0, 13), (13, 14), (14, 15), (15, 16),
    (0, 17), (17, 18), (18, 19), (19, 20),
    (5, 9),
];

// ════════════════════════════════════════════════════════════════════════════
// Landmark / LandmarkFrame
// ════════════════════════════════════════════════════════════════════════════

/// A single tracked point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }
}

/// Error raised when a detector hands over something that is not a hand.
#[derive(Debug, Error, PartialEq)]
pub enum LandmarkError {
    #[error("expected 21 landmarks, got {0}")]
    WrongCount(usize),
    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

/// All 21 landmarks of one hand in one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LandmarkFrame {
    points: [Landmark; LANDMARK_COUNT],
}

impl LandmarkFrame {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        LandmarkFrame { points }
    }

    /// Build a frame from a detector's point list, rejecting anything that is
    /// not exactly 21 finite points.
    pub fn from_points(points: &[Landmark]) -> Result<Self, LandmarkError> {
        if points.len() != LANDMARK_COUNT {
            return Err(LandmarkError::WrongCount(points.len()));
        }
        if let Some(index) = points.iter().position(|p| {
            !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite())
        }) {
            return Err(LandmarkError::NonFinite { index });
        }
        let mut out = [Landmark::default(); LANDMARK_COUNT];
        out.copy_from_slice(points);
        Ok(LandmarkFrame { points: out })
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] { &self.points }
}

impl std::ops::Index<usize> for LandmarkFrame {
    type Output = Landmark;
    fn index(&self, i: usize) -> &Landmark { &self.points[i] }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
