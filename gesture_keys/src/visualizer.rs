//! Software-rendered simulator window using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────┬───────────────────┐
//! │                                  │  MODE    letters  │
//! │        synthetic hand            │  SELECT  M        │
//! │        (skeleton preview)        │  FONT    ...      │
//! │                                  │  SIZE    7.0      │
//! │                                  │  LAST    print M  │
//! ├──────────────────────────────────┴───────────────────┤
//! │  typed text_                                         │
//! │  key legend                                          │
//! └──────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use anyhow::{anyhow, Result};
use hand_landmarks::{idx, LandmarkFrame, SKELETON};
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};
use tracing::debug;

use crate::preview::TextPreview;
use crate::sim::SimControls;

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W:      usize = 800;
pub const WIN_H:      usize = 520;
const PANEL_W:        usize = 280;
const HAND_W:         usize = WIN_W - PANEL_W;
const HAND_H:         usize = 420;
const TEXT_Y:         usize = HAND_H + 14;
const SCALE:          usize = 2;
const BG_COLOR:       u32   = 0xFF1A1A2E;
const PANEL_BG:       u32   = 0xFF16213E;
const TEXT_BG:        u32   = 0xFF0F3460;
const BONE_COLOR:     u32   = 0xFFAADDFF;
const JOINT_COLOR:    u32   = 0xFFEEEEEE;
const TIP_COLOR:      u32   = 0xFFFFD700;
const HIDDEN_COLOR:   u32   = 0xFF555577;

const LEGEND: &str = "mouse=rotate  space=index  1/2/3=letters/fonts/size  b=back  u=thumbs up  h=hide  esc=quit";

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf:    Vec<u32>,
    hidden: bool,
}

impl Visualizer {
    pub fn new() -> Result<Self> {
        let mut window = Window::new(
            "Gesture Keys: hand simulator",
            WIN_W, WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| anyhow!("opening simulator window: {}", e))?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            hidden: false,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Sample keyboard and mouse. `None` means the window should close.
    pub fn poll_input(&mut self) -> Option<SimControls> {
        if !self.window.is_open() || self.window.is_key_down(Key::Escape) {
            return None;
        }
        if self.window.is_key_pressed(Key::H, KeyRepeat::No) {
            self.hidden = !self.hidden;
        }

        let held = |k: Key| self.window.is_key_down(k);
        let pointer_x = self
            .window
            .get_mouse_pos(MouseMode::Clamp)
            .map(|(x, _)| x / (WIN_W - 1) as f32)
            .unwrap_or(0.5);

        Some(SimControls {
            pointer_x,
            pinch_index:  held(Key::Space),
            pinch_middle: held(Key::Key1),
            pinch_ring:   held(Key::Key2),
            pinch_pinky:  held(Key::Key3),
            back_of_hand: held(Key::B),
            thumbs_up:    held(Key::U),
            hidden:       self.hidden,
        })
    }

    /// Render one frame.
    pub fn render(&mut self, hand: Option<&LandmarkFrame>, preview: &TextPreview) {
        self.buf.fill(BG_COLOR);

        // ── Hand ──────────────────────────────────────────────────────────
        match hand {
            Some(frame) => self.draw_hand(frame),
            None => self.draw_label("no hand", HAND_W / 2 - 28, HAND_H / 2, HIDDEN_COLOR),
        }

        // ── Status panel ──────────────────────────────────────────────────
        self.fill_rect(HAND_W, 0, PANEL_W, HAND_H, PANEL_BG);
        let rows = [
            ("mode", preview.mode.to_string()),
            ("select", preview.selection.clone()),
            ("font", preview.font.clone()),
            ("size", format!("{:.1}", preview.size)),
            ("last", preview.last.clone()),
            ("events", preview.received.to_string()),
        ];
        let mut y = 20;
        for (name, value) in rows {
            self.draw_label(name, HAND_W + 12, y, 0xFFFFD700);
            self.draw_label(&value, HAND_W + 12, y + 14, 0xFFEEEEEE);
            y += 40;
        }

        // ── Typed text + legend ───────────────────────────────────────────
        self.fill_rect(0, HAND_H, WIN_W, WIN_H - HAND_H, TEXT_BG);
        let text = format!("{}_", preview.text);
        self.draw_label(&text, 12, TEXT_Y, 0xFFFFFFFF);
        self.draw_label(LEGEND, 12, WIN_H - 20, 0xFF888888);

        if let Err(e) = self.window.update_with_buffer(&self.buf, WIN_W, WIN_H) {
            debug!("window update failed: {}", e);
        }
    }

    // ── Hand ──────────────────────────────────────────────────────────────

    fn draw_hand(&mut self, frame: &LandmarkFrame) {
        let to_px = |i: usize| {
            let p = frame[i];
            (
                (p.x.clamp(0.0, 1.0) * (HAND_W - 1) as f32) as isize,
                (p.y.clamp(0.0, 1.0) * (HAND_H - 1) as f32) as isize,
            )
        };
        for (a, b) in SKELETON {
            let (x0, y0) = to_px(a);
            let (x1, y1) = to_px(b);
            self.draw_line(x0, y0, x1, y1, BONE_COLOR);
        }
        let tips = [idx::THUMB_TIP, idx::INDEX_TIP, idx::MIDDLE_TIP, idx::RING_TIP, idx::PINKY_TIP];
        for i in 0..frame.points().len() {
            let (x, y) = to_px(i);
            let color = if tips.contains(&i) { TIP_COLOR } else { JOINT_COLOR };
            self.fill_rect((x - 2).max(0) as usize, (y - 2).max(0) as usize, 5, 5, color);
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(WIN_H) {
            for col in x..(x + w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < WIN_W && (y as usize) < WIN_H {
            self.buf[y as usize * WIN_W + x as usize] = color;
        }
    }

    /// Bresenham, two pixels thick.
    fn draw_line(&mut self, x0: isize, y0: isize, x1: isize, y1: isize, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            self.set_pixel(x, y, color);
            self.set_pixel(x + 1, y, color);
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    /// 3×5 bitmap font drawn at [`SCALE`]× size.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            if cx + 3 * SCALE > WIN_W { break; }
            for (row, &bits) in char_glyph(ch).iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * SCALE, y + row * SCALE, SCALE, SCALE, color);
                    }
                }
            }
            cx += 4 * SCALE;
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '"' | '\'' => [0b101, 0b101, 0b000, 0b000, 0b000],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyphs_are_case_insensitive() {
        assert_eq!(char_glyph('m'), char_glyph('M'));
        assert_ne!(char_glyph('Q'), char_glyph('?'));
    }

    #[test]
    fn glyph_rows_fit_three_bits() {
        for c in (' '..='~').chain(['é']) {
            assert!(char_glyph(c).iter().all(|&row| row < 8), "{c:?}");
        }
    }
}
