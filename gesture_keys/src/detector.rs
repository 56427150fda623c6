//! Hand landmark detection.
//!
//! All detectors speak one JSON schema per frame:
//!
//! ```json
//! {"hands":[{"handedness":"Right","score":0.93,"landmarks":[{"x":0.5,"y":0.7,"z":0.0}, ...]}],"error":null}
//! ```
//!
//! The MediaPipe helper process writes it live; a replay file holds one such
//! line per recorded frame.

use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use anyhow::{bail, Context, Result};
use hand_landmarks::{Landmark, LandmarkError, LandmarkFrame};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::capture::RawImage;

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("detector i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("malformed detector output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("detector reported an error: {0}")]
    Reported(String),
    #[error("bad hand: {0}")]
    Landmarks(#[from] LandmarkError),
    #[error("detector closed its output")]
    Closed,
}

/// Turns one frame into zero or more hands, in detector order.
pub trait HandDetector<F> {
    fn detect(&mut self, frame: &F) -> Result<Vec<LandmarkFrame>, DetectError>;
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default)]
    handedness: String,
    #[serde(default = "full_score")]
    score:      f32,
    landmarks:  Vec<Landmark>,
}

fn full_score() -> f32 { 1.0 }

#[derive(Deserialize, Debug)]
struct DetectionResult {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Parse one detector line, dropping hands scored below `min_confidence`.
///
/// A hand that is not exactly 21 finite points rejects the whole line.
pub fn parse_detection(line: &str, min_confidence: f32) -> Result<Vec<LandmarkFrame>, DetectError> {
    let result: DetectionResult = serde_json::from_str(line.trim())?;
    if let Some(error) = result.error {
        return Err(DetectError::Reported(error));
    }

    let mut hands = Vec::with_capacity(result.hands.len());
    for hand in result.hands {
        if hand.score < min_confidence {
            debug!(handedness = %hand.handedness, score = hand.score, "hand below confidence");
            continue;
        }
        hands.push(LandmarkFrame::from_points(&hand.landmarks)?);
    }
    Ok(hands)
}

// ════════════════════════════════════════════════════════════════════════════
// ReplayDetector
// ════════════════════════════════════════════════════════════════════════════

/// Detector for recorded lines: the "frame" already is the detector output.
pub struct ReplayDetector {
    min_confidence: f32,
}

impl ReplayDetector {
    pub fn new(min_confidence: f32) -> Self {
        ReplayDetector { min_confidence }
    }
}

impl HandDetector<String> for ReplayDetector {
    fn detect(&mut self, line: &String) -> Result<Vec<LandmarkFrame>, DetectError> {
        parse_detection(line, self.min_confidence)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MediapipeDetector
// ════════════════════════════════════════════════════════════════════════════

/// MediaPipe hand landmarker running in a Python helper process.
///
/// The helper (`hand_detect.py`, next to this crate's manifest) takes the
/// detection confidence as its only argument and prints `READY` once its
/// model is loaded. Each frame is then
/// sent as a 12-byte little-endian header (width, height, channels) followed
/// by the raw pixels, and answered with one JSON line. The process is killed
/// when the detector is dropped.
pub struct MediapipeDetector {
    process:        Child,
    stdin:          ChildStdin,
    stdout:         BufReader<ChildStdout>,
    min_confidence: f32,
}

/// Header written ahead of every frame.
pub fn frame_header(image: &RawImage) -> [u8; 12] {
    let mut header = [0u8; 12];
    header[0..4].copy_from_slice(&image.width.to_le_bytes());
    header[4..8].copy_from_slice(&image.height.to_le_bytes());
    header[8..12].copy_from_slice(&image.channels.to_le_bytes());
    header
}

impl MediapipeDetector {
    pub fn spawn(python: &Path, script: &Path, min_confidence: f32) -> Result<Self> {
        if !script.exists() {
            bail!("hand detection script not found at {}", script.display());
        }
        if !python.exists() {
            bail!(
                "python interpreter not found at {}; create it with: \
                 python3 -m venv .venv && .venv/bin/pip install mediapipe numpy",
                python.display()
            );
        }

        info!(script = %script.display(), "starting MediaPipe hand detector");
        let mut process = Command::new(python)
            .arg(script)
            .arg(min_confidence.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("spawning {}", python.display()))?;

        let stdin = process.stdin.take().context("detector stdin unavailable")?;
        let stdout = process.stdout.take().context("detector stdout unavailable")?;
        let mut stdout = BufReader::new(stdout);

        let mut ready = String::new();
        stdout.read_line(&mut ready).context("waiting for detector READY")?;
        if ready.trim() != "READY" {
            let _ = process.kill();
            bail!("detector did not signal ready, got {:?}", ready.trim());
        }
        info!("MediaPipe hand detector ready");

        Ok(MediapipeDetector { process, stdin, stdout, min_confidence })
    }
}

impl HandDetector<RawImage> for MediapipeDetector {
    fn detect(&mut self, image: &RawImage) -> Result<Vec<LandmarkFrame>, DetectError> {
        if image.is_empty() {
            return Ok(Vec::new());
        }
        self.stdin.write_all(&frame_header(image))?;
        self.stdin.write_all(&image.data)?;
        self.stdin.flush()?;

        let mut response = String::new();
        if self.stdout.read_line(&mut response)? == 0 {
            return Err(DetectError::Closed);
        }
        parse_detection(&response, self.min_confidence)
    }
}

impl Drop for MediapipeDetector {
    fn drop(&mut self) {
        if let Err(e) = self.process.kill() {
            warn!("failed to stop detector process: {}", e);
        }
        let _ = self.process.wait();
        debug!("MediaPipe hand detector stopped");
    }
}
