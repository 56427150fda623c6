//! Frame sources.
//!
//! A [`CaptureDevice`] hands out frames until it cannot; `None` is the end
//! of the stream, after which the tracking loop shuts down. What a frame
//! *is* depends on the source: raw pixels from a camera, one recorded
//! detector line from a replay file, a synthetic pose from the simulator.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

pub trait CaptureDevice {
    type Frame;

    /// The next frame, or `None` once the source is exhausted or broken.
    fn read(&mut self) -> Option<Self::Frame>;
}

// ════════════════════════════════════════════════════════════════════════════
// RawImage
// ════════════════════════════════════════════════════════════════════════════

/// An owned, tightly packed image (BGR for cameras).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawImage {
    pub width:    u32,
    pub height:   u32,
    pub channels: u32,
    pub data:     Vec<u8>,
}

impl RawImage {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ReplayCapture
// ════════════════════════════════════════════════════════════════════════════

/// Replays recorded detector output, one JSON line per frame.
/// Blank lines are skipped.
pub struct ReplayCapture<R> {
    lines:   Lines<R>,
    line_no: usize,
}

impl ReplayCapture<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("opening replay file {}", path.display()))?;
        info!(path = %path.display(), "replaying recorded detections");
        Ok(ReplayCapture::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> ReplayCapture<R> {
    pub fn from_reader(reader: R) -> Self {
        ReplayCapture { lines: reader.lines(), line_no: 0 }
    }

    /// Lines consumed so far, blank ones included.
    pub fn line_no(&self) -> usize { self.line_no }
}

impl<R: BufRead> CaptureDevice for ReplayCapture<R> {
    type Frame = String;

    fn read(&mut self) -> Option<String> {
        loop {
            match self.lines.next()? {
                Ok(line) => {
                    self.line_no += 1;
                    if line.trim().is_empty() {
                        continue;
                    }
                    return Some(line);
                }
                Err(e) => {
                    warn!(line = self.line_no + 1, "replay read failed: {}", e);
                    return None;
                }
            }
        }
    }
}

impl<R> Drop for ReplayCapture<R> {
    fn drop(&mut self) {
        debug!(lines = self.line_no, "replay closed");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Camera: real hardware (feature = "camera")
// ════════════════════════════════════════════════════════════════════════════

/// A webcam opened through OpenCV.
///
/// Requires the `camera` feature flag and the OpenCV libraries installed.
#[cfg(feature = "camera")]
pub struct Camera {
    capture: opencv::videoio::VideoCapture,
    frames:  u64,
}

#[cfg(feature = "camera")]
impl Camera {
    pub fn open(device_id: i32) -> Result<Self> {
        use opencv::prelude::*;
        use opencv::videoio::{VideoCapture, VideoCaptureAPIs};

        let capture = VideoCapture::new(device_id, VideoCaptureAPIs::CAP_ANY as i32)
            .with_context(|| format!("opening video device {device_id}"))?;
        if !capture.is_opened()? {
            anyhow::bail!("could not open video device {device_id}");
        }
        info!(device_id, "camera opened");
        Ok(Camera { capture, frames: 0 })
    }

    fn grab(&mut self) -> Result<Option<RawImage>> {
        use opencv::core::Mat;
        use opencv::prelude::*;

        let mut frame = Mat::default();
        if !self.capture.read(&mut frame)? || frame.empty() {
            return Ok(None);
        }
        let image = RawImage {
            width:    frame.cols() as u32,
            height:   frame.rows() as u32,
            channels: frame.channels() as u32,
            data:     frame.data_bytes()?.to_vec(),
        };
        Ok(Some(image))
    }
}

#[cfg(feature = "camera")]
impl CaptureDevice for Camera {
    type Frame = RawImage;

    fn read(&mut self) -> Option<RawImage> {
        match self.grab() {
            Ok(Some(image)) => {
                self.frames += 1;
                Some(image)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("camera read failed: {:#}", e);
                None
            }
        }
    }
}

#[cfg(feature = "camera")]
impl Drop for Camera {
    fn drop(&mut self) {
        use opencv::prelude::*;
        let _ = self.capture.release();
        info!(frames = self.frames, "camera released");
    }
}
