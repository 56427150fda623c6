//! Bounded angle history for the moving average.

use std::collections::VecDeque;

/// Default number of samples in the moving average.
pub const DEFAULT_WINDOW: usize = 15;

/// FIFO of the most recent raw control-angle samples.
#[derive(Clone, Debug)]
pub struct AngleHistory {
    samples:  VecDeque<f32>,
    capacity: usize,
}

impl AngleHistory {
    /// `capacity` is clamped to at least one sample.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        AngleHistory { samples: VecDeque::with_capacity(capacity), capacity }
    }

    /// Append a sample, evicting the oldest one past capacity.
    pub fn push(&mut self, angle: f32) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(angle);
    }

    /// Mean of the retained samples, `None` before the first push.
    pub fn mean(&self) -> Option<f32> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f32>() / self.samples.len() as f32)
    }

    /// Push then average; never `None`.
    pub fn smooth(&mut self, angle: f32) -> f32 {
        self.push(angle);
        self.mean().unwrap_or(angle)
    }

    pub fn len(&self) -> usize { self.samples.len() }
    pub fn is_empty(&self) -> bool { self.samples.is_empty() }
    pub fn capacity(&self) -> usize { self.capacity }
}

impl Default for AngleHistory {
    fn default() -> Self { AngleHistory::new(DEFAULT_WINDOW) }
}
