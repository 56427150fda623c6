//! Keyboard and mouse simulation of a tracked hand.
//!
//! The simulator window samples its controls once per redraw and sends the
//! resulting pose over a channel; the tracking thread reads it like any other
//! frame source. Dropping the sender (closing the window) ends the stream.

use std::sync::mpsc::Receiver;

use hand_landmarks::classify::Finger;
use hand_landmarks::geometry::ANGLE_MAX;
use hand_landmarks::pose::HandPose;
use hand_landmarks::LandmarkFrame;

use crate::capture::CaptureDevice;
use crate::detector::{DetectError, HandDetector};

/// Thumb-to-fingertip gap of a simulated pinch.
pub const SIM_PINCH_GAP: f32 = 0.02;

/// Snapshot of the simulator controls.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimControls {
    /// Horizontal pointer position, 0.0 (left edge) to 1.0 (right edge).
    pub pointer_x:    f32,
    pub pinch_index:  bool,
    pub pinch_middle: bool,
    pub pinch_ring:   bool,
    pub pinch_pinky:  bool,
    pub back_of_hand: bool,
    pub thumbs_up:    bool,
    pub hidden:       bool,
}

impl SimControls {
    /// The hand these controls describe, or `None` while hidden.
    ///
    /// The pointer sweeps the control angle from 0 at the left edge to 180 at
    /// the right. A thumbs-up is always shown upright. Only one finger can
    /// touch the thumb; mode pinches win over the index.
    pub fn pose(&self) -> Option<HandPose> {
        if self.hidden {
            return None;
        }
        let mut pose = if self.thumbs_up {
            HandPose::default().thumbs_up()
        } else {
            HandPose::at_control_angle(self.pointer_x.clamp(0.0, 1.0) * ANGLE_MAX)
        };
        let finger = [
            (self.pinch_middle, Finger::Middle),
            (self.pinch_ring, Finger::Ring),
            (self.pinch_pinky, Finger::Pinky),
            (self.pinch_index, Finger::Index),
        ]
        .into_iter()
        .find_map(|(held, f)| held.then_some(f));
        if let Some(f) = finger {
            pose = pose.pinch(f, SIM_PINCH_GAP);
        }
        if self.back_of_hand {
            pose = pose.back_of_hand();
        }
        Some(pose)
    }
}

/// Frame source fed by the simulator window.
pub struct SimCapture {
    rx: Receiver<Option<HandPose>>,
}

impl SimCapture {
    pub fn new(rx: Receiver<Option<HandPose>>) -> Self {
        SimCapture { rx }
    }
}

impl CaptureDevice for SimCapture {
    type Frame = Option<HandPose>;

    fn read(&mut self) -> Option<Option<HandPose>> {
        self.rx.recv().ok()
    }
}

/// "Detects" a simulated hand by laying out its landmarks.
#[derive(Default)]
pub struct SimDetector;

impl HandDetector<Option<HandPose>> for SimDetector {
    fn detect(&mut self, pose: &Option<HandPose>) -> Result<Vec<LandmarkFrame>, DetectError> {
        Ok(pose.iter().map(HandPose::frame).collect())
    }
}
