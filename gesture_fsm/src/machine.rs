//! Mode/selection state machine.
//!
//! `GestureMachine` owns the [`SessionState`] and turns one frame's
//! [`GestureSignals`] into zero or more [`GestureEvent`]s. Within a frame the
//! events come out in a fixed order:
//!
//! 1. `MODE_CHANGE` then `SELECTION_UPDATE("")`, when the mode switches
//! 2. `DELETE`
//! 3. the current mode's selection event
//! 4. `PRINT(letter)` then `PRINT(" ")` (letters mode only)

use tracing::debug;

use crate::signals::{GestureConfig, GestureSignals};
use crate::{GestureEvent, Mode, FONT_NAMES, LETTERS, SIZE_MAX, SIZE_MIN};

/// Everything carried from one processed frame to the next.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    pub current_mode:         Mode,
    /// Last letter sent in a `SELECTION_UPDATE`; cleared on mode change.
    pub last_selected_letter: Option<char>,
    pub last_font_index:      Option<usize>,
    pub last_size_value:      Option<f32>,
    pub print_was_active:     bool,
    pub delete_was_active:    bool,
    pub space_was_active:     bool,
}

pub struct GestureMachine {
    state:  SessionState,
    config: GestureConfig,
}

impl GestureMachine {
    pub fn new(config: GestureConfig) -> Self {
        GestureMachine { state: SessionState::default(), config }
    }

    pub fn state(&self) -> &SessionState { &self.state }
    pub fn mode(&self) -> Mode { self.state.current_mode }

    /// Advance by one frame that contained a hand.
    pub fn step(&mut self, s: &GestureSignals) -> Vec<GestureEvent> {
        let mut out = Vec::new();

        // ── mode switch ───────────────────────────────────────────────────
        if let Some(mode) = s.mode_candidate {
            if mode != self.state.current_mode {
                debug!(from = %self.state.current_mode, to = %mode, "mode change");
                self.state.current_mode = mode;
                self.state.last_selected_letter = None;
                out.push(GestureEvent::ModeChange { mode });
                out.push(GestureEvent::SelectionUpdate { selection: String::new() });
            }
        }

        // ── delete (any mode) ─────────────────────────────────────────────
        if s.delete_active && !self.state.delete_was_active {
            out.push(GestureEvent::Delete);
        }

        // ── rotation-driven selection ─────────────────────────────────────
        match self.state.current_mode {
            Mode::Letters => {
                let letter = letter_for_angle(s.smoothed_angle);
                if self.state.last_selected_letter != Some(letter) {
                    self.state.last_selected_letter = Some(letter);
                    out.push(GestureEvent::SelectionUpdate { selection: letter.to_string() });
                }
                if s.print_active && !self.state.print_was_active {
                    debug!(%letter, "print");
                    out.push(GestureEvent::Print { ch: letter });
                }
                if s.space_active && !self.state.space_was_active {
                    out.push(GestureEvent::Print { ch: ' ' });
                }
            }
            Mode::Fonts => {
                let index = font_index_for_angle(s.smoothed_angle);
                if self.state.last_font_index != Some(index) {
                    self.state.last_font_index = Some(index);
                    out.push(GestureEvent::FontChange { font: FONT_NAMES[index].to_string() });
                }
            }
            Mode::Size => {
                let size = size_for_angle(s.smoothed_angle);
                let moved = match self.state.last_size_value {
                    Some(last) => (size - last).abs() > self.config.size_hysteresis,
                    None       => true,
                };
                if moved {
                    self.state.last_size_value = Some(size);
                    out.push(GestureEvent::SizeChange { size });
                }
            }
        }

        // ── edge trackers ─────────────────────────────────────────────────
        self.state.print_was_active  = s.print_active;
        self.state.delete_was_active = s.delete_active;
        self.state.space_was_active  = s.space_active;

        out
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Angle → selection
// ════════════════════════════════════════════════════════════════════════════

/// Linear bucket `floor(angle / 180 * (count - 1))`, so only the very top of
/// the range reaches the last entry.
fn bucket(angle: f32, count: usize) -> usize {
    let last = count - 1;
    let i = (angle.clamp(0.0, 180.0) / 180.0 * last as f32) as usize;
    i.min(last)
}

pub fn letter_for_angle(angle: f32) -> char {
    LETTERS[bucket(angle, LETTERS.len())]
}

pub fn font_index_for_angle(angle: f32) -> usize {
    bucket(angle, FONT_NAMES.len())
}

pub fn size_for_angle(angle: f32) -> f32 {
    SIZE_MIN + angle.clamp(0.0, 180.0) / 180.0 * (SIZE_MAX - SIZE_MIN)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
