//! Per-frame gesture signals derived from one hand.

use hand_landmarks::classify::{is_thumbs_up, Pinches, TOUCH_THRESHOLD};
use hand_landmarks::geometry::{hand_angle, is_back_of_hand_facing};
use hand_landmarks::LandmarkFrame;

use crate::history::{AngleHistory, DEFAULT_WINDOW};
use crate::Mode;

/// Size changes at or below this are treated as jitter.
pub const SIZE_HYSTERESIS: f32 = 0.2;

/// Thresholds for signal extraction and the state machine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    /// Thumb-to-fingertip distance that counts as a touch.
    pub touch_threshold:  f32,
    /// Samples in the rotation moving average.
    pub smoothing_window: usize,
    /// Minimum size delta worth a `SIZE_CHANGE`.
    pub size_hysteresis:  f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            touch_threshold:  TOUCH_THRESHOLD,
            smoothing_window: DEFAULT_WINDOW,
            size_hysteresis:  SIZE_HYSTERESIS,
        }
    }
}

/// Everything the state machine needs from one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureSignals {
    /// Mode requested by a pinch this frame; `None` keeps the current mode.
    pub mode_candidate: Option<Mode>,
    pub delete_active:  bool,
    pub print_active:   bool,
    pub space_active:   bool,
    /// Moving average of the control angle, in `[0, 180]`.
    pub smoothed_angle: f32,
}

impl GestureSignals {
    /// Classify `frame` and fold its rotation into `history`.
    pub fn sample(frame: &LandmarkFrame, history: &mut AngleHistory, config: &GestureConfig) -> Self {
        let pinches = Pinches::of(frame, config.touch_threshold);
        GestureSignals {
            mode_candidate: mode_candidate(&pinches),
            delete_active:  is_back_of_hand_facing(frame),
            print_active:   pinches.index,
            space_active:   is_thumbs_up(frame),
            smoothed_angle: history.smooth(hand_angle(frame)),
        }
    }
}

/// Middle wins over ring, ring over pinky.
pub fn mode_candidate(pinches: &Pinches) -> Option<Mode> {
    if pinches.middle {
        Some(Mode::Letters)
    } else if pinches.ring {
        Some(Mode::Fonts)
    } else if pinches.pinky {
        Some(Mode::Size)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hand_landmarks::classify::Finger;
    use hand_landmarks::pose::HandPose;

    #[test]
    fn pinch_priority() {
        let all = Pinches { index: false, middle: true, ring: true, pinky: true };
        assert_eq!(mode_candidate(&all), Some(Mode::Letters));
        let ring_pinky = Pinches { ring: true, pinky: true, ..Pinches::default() };
        assert_eq!(mode_candidate(&ring_pinky), Some(Mode::Fonts));
        let pinky = Pinches { pinky: true, ..Pinches::default() };
        assert_eq!(mode_candidate(&pinky), Some(Mode::Size));
        assert_eq!(mode_candidate(&Pinches::default()), None);
    }

    #[test]
    fn middle_and_ring_together_select_letters() {
        // bend ring into the thumb as well as the middle finger
        let base = HandPose::default().pinch(Finger::Middle, 0.02).frame();
        let mut pts = *base.points();
        let thumb = pts[hand_landmarks::idx::THUMB_TIP];
        pts[Finger::Ring.tip()] = hand_landmarks::Landmark::new(thumb.x + 0.01, thumb.y, thumb.z);
        let frame = LandmarkFrame::new(pts);

        let cfg = GestureConfig::default();
        let p = Pinches::of(&frame, cfg.touch_threshold);
        assert!(p.middle && p.ring);

        let s = GestureSignals::sample(&frame, &mut AngleHistory::default(), &cfg);
        assert_eq!(s.mode_candidate, Some(Mode::Letters));
    }

    #[test]
    fn sample_feeds_history() {
        let mut h = AngleHistory::new(2);
        let cfg = GestureConfig::default();
        let a = GestureSignals::sample(&HandPose::at_control_angle(60.0).frame(), &mut h, &cfg);
        assert!((a.smoothed_angle - 60.0).abs() < 1e-2);
        let b = GestureSignals::sample(&HandPose::at_control_angle(120.0).frame(), &mut h, &cfg);
        assert!((b.smoothed_angle - 90.0).abs() < 1e-2);
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn discrete_signals() {
        let cfg = GestureConfig::default();
        let mut h = AngleHistory::default();
        let open = GestureSignals::sample(&HandPose::default().frame(), &mut h, &cfg);
        assert!(!open.delete_active && !open.print_active && !open.space_active);
        assert_eq!(open.mode_candidate, None);

        let back = GestureSignals::sample(&HandPose::default().back_of_hand().frame(), &mut h, &cfg);
        assert!(back.delete_active);

        let print = GestureSignals::sample(&HandPose::default().pinch(Finger::Index, 0.03).frame(), &mut h, &cfg);
        assert!(print.print_active);
        assert_eq!(print.mode_candidate, None);

        let space = GestureSignals::sample(&HandPose::default().thumbs_up().frame(), &mut h, &cfg);
        assert!(space.space_active);
    }
}
