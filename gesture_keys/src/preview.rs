//! What a client would show after receiving the event stream so far.
//!
//! The simulator window keeps one of these to display typed text, the
//! current selection and the last event, fed from an in-process subscriber.

use gesture_fsm::{GestureEvent, Mode, FONT_NAMES};

/// Text kept on screen; older characters scroll off the left.
const MAX_TEXT: usize = 48;

#[derive(Clone, Debug, PartialEq)]
pub struct TextPreview {
    pub text:      String,
    pub mode:      Mode,
    pub selection: String,
    pub font:      String,
    pub size:      f32,
    /// Short description of the most recent event.
    pub last:      String,
    pub received:  u64,
}

impl Default for TextPreview {
    fn default() -> Self {
        TextPreview {
            text:      String::new(),
            mode:      Mode::default(),
            selection: String::new(),
            font:      FONT_NAMES[0].to_string(),
            size:      4.0,
            last:      "waiting for gestures".to_string(),
            received:  0,
        }
    }
}

impl TextPreview {
    pub fn apply(&mut self, event: &GestureEvent) {
        self.received += 1;
        self.last = match event {
            GestureEvent::ModeChange { mode } => {
                self.mode = *mode;
                format!("mode {}", mode)
            }
            GestureEvent::SelectionUpdate { selection } => {
                self.selection.clone_from(selection);
                format!("select {:?}", selection)
            }
            GestureEvent::Delete => {
                self.text.pop();
                "delete".to_string()
            }
            GestureEvent::Print { ch } => {
                self.text.push(*ch);
                if self.text.chars().count() > MAX_TEXT {
                    self.text.remove(0);
                }
                format!("print {:?}", ch)
            }
            GestureEvent::FontChange { font } => {
                self.font.clone_from(font);
                format!("font {}", font)
            }
            GestureEvent::SizeChange { size } => {
                self.size = *size;
                format!("size {:.1}", size)
            }
        };
    }
}
