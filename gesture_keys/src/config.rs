//! Runtime configuration, read from TOML.
//!
//! Every key is optional; a missing file means all defaults.
//!
//! ```toml
//! listen = "127.0.0.1:5000"
//! smoothing_window = 10
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use gesture_fsm::history::DEFAULT_WINDOW;
use gesture_fsm::signals::SIZE_HYSTERESIS;
use gesture_fsm::GestureConfig;
use hand_landmarks::classify::TOUCH_THRESHOLD;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "gesture_keys.toml";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Address the event server binds.
    pub listen:                   String,
    /// OpenCV device index for the `camera` source.
    pub camera_id:                i32,
    /// Interpreter for the MediaPipe helper.
    pub detector_python:          PathBuf,
    /// MediaPipe helper script, relative to the working directory.
    pub detector_script:          PathBuf,
    /// Hands scored below this are discarded.
    pub min_detection_confidence: f32,
    pub touch_threshold:          f32,
    pub smoothing_window:         usize,
    pub size_hysteresis:          f32,
    /// Pause between frames of the tracking loop.
    pub frame_pause_ms:           u64,
    /// Capacity of the queue between tracking and broadcast.
    pub event_queue:              usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            listen:                   "0.0.0.0:5000".to_string(),
            camera_id:                0,
            detector_python:          PathBuf::from(".venv/bin/python"),
            detector_script:          PathBuf::from("gesture_keys/hand_detect.py"),
            min_detection_confidence: 0.7,
            touch_threshold:          TOUCH_THRESHOLD,
            smoothing_window:         DEFAULT_WINDOW,
            size_hysteresis:          SIZE_HYSTERESIS,
            frame_pause_ms:           10,
            event_queue:              256,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let cfg: AppConfig = toml::from_str(text).context("invalid configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg = Self::from_toml_str(&text)
            .with_context(|| format!("loading config {}", path.display()))?;
        info!(path = %path.display(), "configuration loaded");
        Ok(cfg)
    }

    /// An explicit path must exist; otherwise [`DEFAULT_CONFIG_FILE`] is
    /// used when present and the defaults when not.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.exists() {
            Self::load(fallback)
        } else {
            debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
            Ok(AppConfig::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.smoothing_window == 0 {
            bail!("smoothing_window must be at least 1");
        }
        if self.event_queue == 0 {
            bail!("event_queue must be at least 1");
        }
        if !(self.touch_threshold.is_finite() && self.touch_threshold > 0.0) {
            bail!("touch_threshold must be positive, got {}", self.touch_threshold);
        }
        if !(self.size_hysteresis.is_finite() && self.size_hysteresis >= 0.0) {
            bail!("size_hysteresis must not be negative, got {}", self.size_hysteresis);
        }
        if !(0.0..=1.0).contains(&self.min_detection_confidence) {
            bail!(
                "min_detection_confidence must be within [0, 1], got {}",
                self.min_detection_confidence
            );
        }
        Ok(())
    }

    pub fn gesture_config(&self) -> GestureConfig {
        GestureConfig {
            touch_threshold:  self.touch_threshold,
            smoothing_window: self.smoothing_window,
            size_hysteresis:  self.size_hysteresis,
        }
    }

    pub fn frame_pause(&self) -> Duration {
        Duration::from_millis(self.frame_pause_ms)
    }
}
