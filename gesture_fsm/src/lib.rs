//! # gesture_fsm
//!
//! The stateful core: per-frame gesture signals in, discrete application
//! commands out.
//!
//! ## Gesture → Event mapping
//!
//! | Gesture | Mode | Event |
//! |---|---|---|
//! | Thumb touches middle tip | any | `MODE_CHANGE(letters)` + `SELECTION_UPDATE("")` |
//! | Thumb touches ring tip | any | `MODE_CHANGE(fonts)` + `SELECTION_UPDATE("")` |
//! | Thumb touches pinky tip | any | `MODE_CHANGE(size)` + `SELECTION_UPDATE("")` |
//! | Back of hand turns to camera | any | `DELETE` |
//! | Wrist rotation | letters | `SELECTION_UPDATE(A..Z)` |
//! | Thumb touches index tip | letters | `PRINT(selected letter)` |
//! | Thumbs up | letters | `PRINT(" ")` |
//! | Wrist rotation | fonts | `FONT_CHANGE` |
//! | Wrist rotation | size | `SIZE_CHANGE(2..12)` |
//!
//! Discrete gestures fire on the rising edge only; rotation-driven
//! selections fire only when the selected value changes.
//!
//! ```rust
//! use gesture_fsm::{GestureTracker, GestureConfig, GestureEvent, Mode};
//! use hand_landmarks::{classify::Finger, pose::HandPose};
//!
//! let mut tracker = GestureTracker::new(GestureConfig::default());
//! let frame = HandPose::default().pinch(Finger::Ring, 0.02).frame();
//! let events = tracker.on_hands(&[frame]);
//! assert_eq!(events[0], GestureEvent::ModeChange { mode: Mode::Fonts });
//! ```

pub mod history;
pub mod machine;
pub mod signals;
pub mod tracker;

pub use history::AngleHistory;
pub use machine::{GestureMachine, SessionState};
pub use signals::{GestureConfig, GestureSignals};
pub use tracker::GestureTracker;

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// Selection tables
// ════════════════════════════════════════════════════════════════════════════

/// Selectable letters, in wrist-rotation order.
pub const LETTERS: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M',
    'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Selectable fonts (CSS `font-family` values), in wrist-rotation order.
pub const FONT_NAMES: [&str; 5] = [
    "Lobster, cursive",
    "'Playfair Display', serif",
    "'Roboto Mono', monospace",
    "Georgia, serif",
    "'Comic Sans MS', cursive",
];

pub const SIZE_MIN: f32 = 2.0;
pub const SIZE_MAX: f32 = 12.0;

// ════════════════════════════════════════════════════════════════════════════
// Mode
// ════════════════════════════════════════════════════════════════════════════

/// What wrist rotation currently selects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Letters,
    Fonts,
    Size,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Letters => "letters",
            Mode::Fonts   => "fonts",
            Mode::Size    => "size",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureEvent
// ════════════════════════════════════════════════════════════════════════════

/// A discrete command for the client UI.
///
/// Serializes with a `type` discriminator, e.g.
/// `{"type":"PRINT","char":"M"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GestureEvent {
    ModeChange { mode: Mode },

    /// Currently highlighted letter; empty right after a mode change.
    SelectionUpdate {
        #[serde(rename = "char")]
        selection: String,
    },

    Delete,

    /// Type one character (a letter, or `' '` for space).
    Print {
        #[serde(rename = "char")]
        ch: char,
    },

    FontChange { font: String },

    /// Font size in `[SIZE_MIN, SIZE_MAX]`.
    SizeChange { size: f32 },
}

impl GestureEvent {
    /// The wire discriminator.
    pub fn kind(&self) -> &'static str {
        match self {
            GestureEvent::ModeChange { .. }      => "MODE_CHANGE",
            GestureEvent::SelectionUpdate { .. } => "SELECTION_UPDATE",
            GestureEvent::Delete                 => "DELETE",
            GestureEvent::Print { .. }           => "PRINT",
            GestureEvent::FontChange { .. }      => "FONT_CHANGE",
            GestureEvent::SizeChange { .. }      => "SIZE_CHANGE",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
