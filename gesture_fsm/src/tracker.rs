//! Per-frame entry point: detected hands in, events out.

use hand_landmarks::LandmarkFrame;
use tracing::debug;

use crate::history::AngleHistory;
use crate::machine::{GestureMachine, SessionState};
use crate::signals::{GestureConfig, GestureSignals};
use crate::{GestureEvent, Mode};

/// Owns the state machine and the angle history for one tracking session.
///
/// Only the first hand of a frame is processed. Frames without hands leave
/// every piece of state untouched, including the edge trackers, so a gesture
/// held through a dropout does not fire again when the hand comes back.
pub struct GestureTracker {
    config:  GestureConfig,
    machine: GestureMachine,
    history: AngleHistory,
    frames:  u64,
}

impl GestureTracker {
    pub fn new(config: GestureConfig) -> Self {
        GestureTracker {
            machine: GestureMachine::new(config),
            history: AngleHistory::new(config.smoothing_window),
            config,
            frames:  0,
        }
    }

    /// Process one video frame's detections.
    pub fn on_hands(&mut self, hands: &[LandmarkFrame]) -> Vec<GestureEvent> {
        let Some(hand) = hands.first() else {
            return Vec::new();
        };
        if hands.len() > 1 {
            debug!(extra = hands.len() - 1, "ignoring additional hands");
        }
        self.frames += 1;
        let signals = GestureSignals::sample(hand, &mut self.history, &self.config);
        self.machine.step(&signals)
    }

    pub fn mode(&self) -> Mode { self.machine.mode() }
    pub fn state(&self) -> &SessionState { self.machine.state() }
    pub fn history(&self) -> &AngleHistory { &self.history }

    /// Frames that contained a hand.
    pub fn frames_processed(&self) -> u64 { self.frames }
}

impl Default for GestureTracker {
    fn default() -> Self { GestureTracker::new(GestureConfig::default()) }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
