//! Tick timing.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde::Serialize;

/// Summary of the current sample window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimingStats {
    pub samples: usize,
    pub total_ticks: u64,
    pub average_ms: f64,
    pub max_ms: f64,
}

/// Rolling window of how long each processed frame took.
#[derive(Debug)]
pub struct FrameTimer {
    samples: VecDeque<Duration>,
    started: Option<Instant>,
    max_samples: usize,
    total_ticks: u64,
}

impl FrameTimer {
    /// A timer keeping the last 120 samples.
    pub fn new() -> Self {
        Self::with_window(120)
    }

    pub fn with_window(max_samples: usize) -> Self {
        Self {
            samples: VecDeque::new(),
            started: None,
            max_samples: max_samples.max(1),
            total_ticks: 0,
        }
    }

    pub fn begin(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Close the sample opened by [`begin`](Self::begin).
    pub fn end(&mut self) -> Option<Duration> {
        let elapsed = self.started.take()?.elapsed();
        self.record(elapsed);
        Some(elapsed)
    }

    pub fn record(&mut self, sample: Duration) {
        self.samples.push_back(sample);
        if self.samples.len() > self.max_samples {
            self.samples.pop_front();
        }
        self.total_ticks += 1;
    }

    pub fn average_ms(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let total: f64 = self.samples.iter().map(Duration::as_secs_f64).sum();
        total / self.samples.len() as f64 * 1000.0
    }

    pub fn max_ms(&self) -> f64 {
        self.samples
            .iter()
            .max()
            .map_or(0.0, |d| d.as_secs_f64() * 1000.0)
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn stats(&self) -> TimingStats {
        TimingStats {
            samples: self.samples.len(),
            total_ticks: self.total_ticks,
            average_ms: self.average_ms(),
            max_ms: self.max_ms(),
        }
    }

    pub fn reset(&mut self) {
        self.samples.clear();
        self.started = None;
        self.total_ticks = 0;
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}
