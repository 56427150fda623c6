//! Synthetic hand poses.
//!
//! [`HandPose`] lays out a plausible right hand in a local frame (`along`
//! the wrist → middle MCP axis, `side` across the palm) and rotates it into
//! image space. The layout keeps every unpinched fingertip well outside
//! [`TOUCH_THRESHOLD`](crate::classify::TOUCH_THRESHOLD) of the thumb, so a
//! pose only ever shows the gestures it was asked for.

use crate::classify::Finger;
use crate::{idx, Landmark, LandmarkFrame, LANDMARK_COUNT};

// Finger offsets across the palm. The middle finger sits on the axis so the
// wrist → middle MCP direction is exactly the requested rotation.
const fn side_offset(f: Finger) -> f32 {
    match f {
        Finger::Index  =>  0.06,
        Finger::Middle =>  0.00,
        Finger::Ring   => -0.04,
        Finger::Pinky  => -0.08,
    }
}

const MCP_ALONG: f32 = 0.10;
const PIP_ALONG: f32 = 0.20;
const DIP_ALONG: f32 = 0.26;
const TIP_ALONG: f32 = 0.32;
/// Where a finger bent into a pinch puts its tip.
const BENT_TIP_ALONG: f32 = 0.18;
const BENT_DIP_ALONG: f32 = 0.22;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandPose {
    /// Wrist position in image space.
    pub origin:       (f32, f32),
    /// Raw wrist rotation in degrees (`atan2(-dy, dx)` convention).
    pub rotation_deg: f32,
    /// Finger touching the thumb, and the remaining thumb-to-tip gap.
    pub pinch:        Option<(Finger, f32)>,
    /// Mirror the palm so the back of the hand faces the camera.
    pub back_of_hand: bool,
    /// Curl all four fingers and point the thumb up.
    pub thumbs_up:    bool,
}

impl Default for HandPose {
    fn default() -> Self {
        HandPose {
            origin:       (0.5, 0.75),
            rotation_deg: 75.0,
            pinch:        None,
            back_of_hand: false,
            thumbs_up:    false,
        }
    }
}

impl HandPose {
    /// A pose whose [`hand_angle`](crate::geometry::hand_angle) is `control`
    /// (inside `[0, 180]`).
    pub fn at_control_angle(control: f32) -> Self {
        HandPose { rotation_deg: (202.5 - control) / 1.5, ..HandPose::default() }
    }

    pub fn rotated(mut self, rotation_deg: f32) -> Self {
        self.rotation_deg = rotation_deg;
        self
    }

    pub fn pinch(mut self, finger: Finger, gap: f32) -> Self {
        self.pinch = Some((finger, gap));
        self
    }

    pub fn back_of_hand(mut self) -> Self {
        self.back_of_hand = true;
        self
    }

    pub fn thumbs_up(mut self) -> Self {
        self.thumbs_up = true;
        self
    }

    /// Lay out all 21 landmarks.
    pub fn frame(&self) -> LandmarkFrame {
        let t = self.rotation_deg.to_radians();
        let along = (t.cos(), -t.sin());
        let mirror = if self.back_of_hand { -1.0 } else { 1.0 };
        let side = (t.sin() * mirror, t.cos() * mirror);
        let (ox, oy) = self.origin;

        let place = |a: f32, b: f32| {
            Landmark::new(ox + a * along.0 + b * side.0, oy + a * along.1 + b * side.1, 0.0)
        };

        let mut pts = [Landmark::default(); LANDMARK_COUNT];
        pts[idx::WRIST]     = place(0.0, 0.0);
        pts[idx::THUMB_CMC] = place(0.04, 0.06);
        pts[idx::THUMB_MCP] = place(0.07, 0.11);
        pts[idx::THUMB_IP]  = place(0.10, 0.16);
        pts[idx::THUMB_TIP] = place(0.08, 0.20);

        for finger in Finger::ALL {
            let b = side_offset(finger);
            let tip = finger.tip();
            pts[finger.mcp()] = place(MCP_ALONG, b);
            pts[finger.pip()] = place(PIP_ALONG, b);
            pts[tip - 1]      = place(DIP_ALONG, b);
            pts[tip]          = place(TIP_ALONG, b);

            if self.thumbs_up {
                // curled: tips drop below their PIP joints in image y
                let pip = pts[finger.pip()];
                pts[tip - 1] = Landmark::new(pip.x, pip.y + 0.02, 0.0);
                pts[tip]     = Landmark::new(pip.x, pip.y + 0.03, 0.0);
            }
        }

        if self.thumbs_up {
            let ip = pts[idx::THUMB_IP];
            pts[idx::THUMB_TIP] = Landmark::new(ip.x, ip.y - 0.05, 0.0);
        }

        if let Some((finger, gap)) = self.pinch {
            let b = side_offset(finger);
            let tip = finger.tip();
            pts[tip - 1] = place(BENT_DIP_ALONG, b);
            pts[tip]     = place(BENT_TIP_ALONG, b);
            let touch = pts[tip];
            pts[idx::THUMB_TIP] = Landmark::new(touch.x, touch.y, touch.z + gap);
        }

        LandmarkFrame::new(pts)
    }
}
