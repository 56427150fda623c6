//! Pure geometry over landmark frames.

use crate::{idx, Landmark, LandmarkFrame};

/// Lower/upper bound of the control angle produced by [`hand_angle`].
pub const ANGLE_MIN: f32 = 0.0;
pub const ANGLE_MAX: f32 = 180.0;

/// Affine remap from raw wrist rotation (degrees) to the control range.
/// Raw 15° lands on 180 and raw 135° on 0, so a comfortable wrist sweep
/// covers the whole selection strip.
const ANGLE_GAIN:   f32 = -1.5;
const ANGLE_OFFSET: f32 = 202.5;

/// Cross products above this count as the back of the hand facing the camera.
pub const BACK_OF_HAND_THRESHOLD: f32 = 0.01;

/// Euclidean distance in normalized 3D landmark space.
#[inline]
pub fn distance(a: Landmark, b: Landmark) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Orientation of wrist → middle-finger MCP against the image x axis, in
/// degrees, with image y flipped so that "up" is positive.
pub fn raw_hand_angle(frame: &LandmarkFrame) -> f32 {
    let wrist = frame[idx::WRIST];
    let base  = frame[idx::MIDDLE_MCP];
    let dx = base.x - wrist.x;
    let dy = base.y - wrist.y;
    (-dy).atan2(dx).to_degrees()
}

/// Wrist rotation remapped onto the `[0, 180]` control range.
pub fn hand_angle(frame: &LandmarkFrame) -> f32 {
    control_angle(raw_hand_angle(frame))
}

/// The remap used by [`hand_angle`], exposed for callers that already hold a
/// raw angle.
#[inline]
pub fn control_angle(raw_degrees: f32) -> f32 {
    (ANGLE_GAIN * raw_degrees + ANGLE_OFFSET).clamp(ANGLE_MIN, ANGLE_MAX)
}

/// Signed 2D cross product of (index MCP − wrist) × (pinky MCP − wrist).
///
/// Its sign encodes which way the palm faces for a given hand chirality.
pub fn palm_cross(frame: &LandmarkFrame) -> f32 {
    let p0  = frame[idx::WRIST];
    let p5  = frame[idx::INDEX_MCP];
    let p17 = frame[idx::PINKY_MCP];
    let v1 = (p5.x - p0.x, p5.y - p0.y);
    let v2 = (p17.x - p0.x, p17.y - p0.y);
    v1.0 * v2.1 - v1.1 * v2.0
}

pub fn is_back_of_hand_facing(frame: &LandmarkFrame) -> bool {
    palm_cross(frame) > BACK_OF_HAND_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LANDMARK_COUNT;

    fn frame_with(edits: &[(usize, f32, f32)]) -> LandmarkFrame {
        let mut pts = [Landmark::default(); LANDMARK_COUNT];
        for &(i, x, y) in edits {
            pts[i] = Landmark::new(x, y, 0.0);
        }
        LandmarkFrame::new(pts)
    }

    #[test]
    fn distance_is_3d() {
        let a = Landmark::new(0.0, 0.0, 0.0);
        let b = Landmark::new(0.3, 0.4, 1.2);
        assert!((distance(a, b) - 1.3).abs() < 1e-6);
        assert_eq!(distance(b, b), 0.0);
    }

    #[test]
    fn hand_pointing_up_is_mid_range() {
        // wrist below the middle MCP: raw 90° → -135 + 202.5 = 67.5
        let f = frame_with(&[(0, 0.5, 0.8), (9, 0.5, 0.6)]);
        assert!((raw_hand_angle(&f) - 90.0).abs() < 1e-4);
        assert!((hand_angle(&f) - 67.5).abs() < 1e-3);
    }

    #[test]
    fn hand_angle_clamps_both_ends() {
        // pointing right: raw 0° → 202.5, clamps to 180
        let right = frame_with(&[(0, 0.2, 0.5), (9, 0.6, 0.5)]);
        assert_eq!(hand_angle(&right), ANGLE_MAX);
        // pointing left and slightly up: raw ≈173° → ≈-56.9, clamps to 0
        let left = frame_with(&[(0, 0.6, 0.5), (9, 0.2, 0.45)]);
        assert!((raw_hand_angle(&left) - 172.87).abs() < 0.01);
        assert_eq!(hand_angle(&left), ANGLE_MIN);
    }

    #[test]
    fn level_left_hand_is_minus_180() {
        // dy == 0 flips to -0.0, so atan2 lands on -180° → 472.5 → 180
        let left = frame_with(&[(0, 0.6, 0.5), (9, 0.2, 0.5)]);
        assert!((raw_hand_angle(&left) + 180.0).abs() < 1e-3);
        assert_eq!(hand_angle(&left), ANGLE_MAX);
    }

    #[test]
    fn hand_angle_always_in_range() {
        for step in 0..360 {
            let t = (step as f32).to_radians();
            let f = frame_with(&[(0, 0.5, 0.5), (9, 0.5 + 0.2 * t.cos(), 0.5 + 0.2 * t.sin())]);
            let a = hand_angle(&f);
            assert!((ANGLE_MIN..=ANGLE_MAX).contains(&a), "step {step}: {a}");
        }
    }

    #[test]
    fn degenerate_hand_is_still_in_range() {
        let f = frame_with(&[]);
        let a = hand_angle(&f);
        assert!((ANGLE_MIN..=ANGLE_MAX).contains(&a));
    }

    #[test]
    fn back_of_hand_threshold() {
        // v1 = (0.1, 0), v2 = (0, y) → cross = 0.1 * y
        let above = frame_with(&[(0, 0.0, 0.0), (5, 0.1, 0.0), (17, 0.0, 0.11)]);
        let below = frame_with(&[(0, 0.0, 0.0), (5, 0.1, 0.0), (17, 0.0, 0.09)]);
        assert!(is_back_of_hand_facing(&above));
        assert!(!is_back_of_hand_facing(&below));
    }

    #[test]
    fn back_of_hand_agrees_with_cross_everywhere() {
        for k in 0..200 {
            let y = -0.2 + k as f32 * 0.002;
            let f = frame_with(&[(0, 0.3, 0.3), (5, 0.4, 0.3), (17, 0.3, 0.3 + y)]);
            let cross = palm_cross(&f);
            assert_eq!(is_back_of_hand_facing(&f), cross > BACK_OF_HAND_THRESHOLD);
            // same input, same answer
            assert_eq!(is_back_of_hand_facing(&f), is_back_of_hand_facing(&f.clone()));
        }
    }

    #[test]
    fn mirroring_flips_palm_side() {
        let palm   = frame_with(&[(0, 0.5, 0.8), (5, 0.58, 0.7), (17, 0.42, 0.7)]);
        let mirror = frame_with(&[(0, 0.5, 0.8), (5, 0.42, 0.7), (17, 0.58, 0.7)]);
        assert!(palm_cross(&palm) < 0.0);
        assert!(!is_back_of_hand_facing(&palm));
        assert!(is_back_of_hand_facing(&mirror));
    }
}
