//! Stateless per-frame gesture predicates.
//!
//! Nothing here smooths or remembers; debouncing belongs to the caller.

use crate::geometry::distance;
use crate::{idx, LandmarkFrame};

/// Default thumb-to-fingertip distance under which two tips are "touching".
pub const TOUCH_THRESHOLD: f32 = 0.07;

/// The four fingers that can be pinched against the thumb.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    pub fn tip(self) -> usize {
        match self {
            Finger::Index  => idx::INDEX_TIP,
            Finger::Middle => idx::MIDDLE_TIP,
            Finger::Ring   => idx::RING_TIP,
            Finger::Pinky  => idx::PINKY_TIP,
        }
    }

    pub fn pip(self) -> usize {
        match self {
            Finger::Index  => idx::INDEX_PIP,
            Finger::Middle => idx::MIDDLE_PIP,
            Finger::Ring   => idx::RING_PIP,
            Finger::Pinky  => idx::PINKY_PIP,
        }
    }

    pub fn mcp(self) -> usize {
        match self {
            Finger::Index  => idx::INDEX_MCP,
            Finger::Middle => idx::MIDDLE_MCP,
            Finger::Ring   => idx::RING_MCP,
            Finger::Pinky  => idx::PINKY_MCP,
        }
    }
}

/// Thumb tip to fingertip distance.
pub fn pinch_distance(frame: &LandmarkFrame, finger: Finger) -> f32 {
    distance(frame[idx::THUMB_TIP], frame[finger.tip()])
}

pub fn is_pinching(frame: &LandmarkFrame, finger: Finger, threshold: f32) -> bool {
    pinch_distance(frame, finger) < threshold
}

/// All four pinch signals of one frame, evaluated independently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pinches {
    pub index:  bool,
    pub middle: bool,
    pub ring:   bool,
    pub pinky:  bool,
}

impl Pinches {
    pub fn of(frame: &LandmarkFrame, threshold: f32) -> Self {
        Pinches {
            index:  is_pinching(frame, Finger::Index,  threshold),
            middle: is_pinching(frame, Finger::Middle, threshold),
            ring:   is_pinching(frame, Finger::Ring,   threshold),
            pinky:  is_pinching(frame, Finger::Pinky,  threshold),
        }
    }

    pub fn get(&self, finger: Finger) -> bool {
        match finger {
            Finger::Index  => self.index,
            Finger::Middle => self.middle,
            Finger::Ring   => self.ring,
            Finger::Pinky  => self.pinky,
        }
    }
}

/// Thumb tip above the thumb IP joint and every other fingertip below its
/// PIP joint (curled), all in image y.
pub fn is_thumbs_up(frame: &LandmarkFrame) -> bool {
    let thumb_up = frame[idx::THUMB_TIP].y < frame[idx::THUMB_IP].y;
    let curled = Finger::ALL
        .iter()
        .all(|f| frame[f.tip()].y > frame[f.pip()].y);
    thumb_up && curled
}
