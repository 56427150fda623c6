//! # gesture_keys
//!
//! A hand-gesture keyboard. Hand landmarks from a webcam, a recording or a
//! simulator window drive the gesture state machine, and every resulting
//! event is broadcast as a JSON line to all connected TCP clients.
//!
//! ## Gesture → Event mapping
//!
//! | Gesture | Event |
//! |---|---|
//! | Thumb touches middle fingertip | `MODE_CHANGE` → letters |
//! | Thumb touches ring fingertip | `MODE_CHANGE` → fonts |
//! | Thumb touches pinky fingertip | `MODE_CHANGE` → size |
//! | Rotate wrist | `SELECTION_UPDATE` / `FONT_CHANGE` / `SIZE_CHANGE` |
//! | Thumb touches index fingertip (letters) | `PRINT` selected letter |
//! | Thumbs up (letters) | `PRINT` space |
//! | Show back of hand | `DELETE` |
//!
//! ## Frame sources
//!
//! * (default) **Simulator**: keyboard and mouse pose a synthetic hand.
//! * `--replay FILE`: recorded detector output, one JSON line per frame.
//! * `--camera` with the `camera` feature: OpenCV capture plus a MediaPipe
//!   helper process.
//!
//! ### Simulator controls
//!
//! | Input | Hand |
//! |---|---|
//! | Mouse x | Wrist rotation (left edge 0°, right edge 180°) |
//! | `Space` (hold) | Index pinch |
//! | `1` / `2` / `3` (hold) | Middle / ring / pinky pinch |
//! | `B` (hold) | Back of hand |
//! | `U` (hold) | Thumbs up |
//! | `H` | Hide / show the hand |
//! | `Escape` | Quit |

pub mod app;
pub mod capture;
pub mod config;
pub mod detector;
pub mod preview;
pub mod sim;
pub mod tracking;
pub mod visualizer;

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "gesture_keys=info,gesture_wire=info,gesture_fsm=info";
