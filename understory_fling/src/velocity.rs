// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `abs`
use kurbo::{Point, Vec2};

/// Ring buffer size for velocity samples.
const HISTORY_SIZE: usize = 20;

/// Only samples within this window of the newest sample are considered.
const HORIZON_MS: u64 = 100;

/// A gap this long between consecutive samples means the pointer rested.
const ASSUME_STOPPED_MS: u64 = 40;

/// Recency weight applied per sample step (newest sample has weight 1).
const RECENCY_DECAY: f64 = 0.95;

#[derive(Clone, Copy, Debug)]
struct Sample {
    time_ms: u64,
    position: Point,
}

/// Estimates pointer velocity from timestamped absolute positions.
///
/// Velocity is the recency-weighted least-squares slope of position over
/// time, computed per axis over the samples of the last 100 ms. A pointer
/// that rested for more than 40 ms before the newest sample reports zero.
#[derive(Clone, Debug)]
pub struct VelocityTracker {
    samples: [Option<Sample>; HISTORY_SIZE],
    index: usize,
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            index: 0,
        }
    }

    /// Records an absolute position at `time_ms`.
    ///
    /// A sample older than the newest one restarts tracking, since it can
    /// only come from a new gesture with a fresh time base.
    pub fn add_sample(&mut self, time_ms: u64, position: Point) {
        if let Some(newest) = self.samples[self.index]
            && time_ms < newest.time_ms
        {
            self.clear();
        }
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(Sample { time_ms, position });
    }

    /// Forgets all samples.
    pub fn clear(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.index = 0;
    }

    /// Returns the current velocity estimate in units per second.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        let Some(newest) = self.samples[self.index] else {
            return Vec2::ZERO;
        };

        let mut sum_w = 0.0;
        let mut sum_t = 0.0;
        let mut sum_tt = 0.0;
        let mut sum_p = Vec2::ZERO;
        let mut sum_tp = Vec2::ZERO;
        let mut count = 0_usize;
        let mut weight = 1.0;
        let mut previous_time = newest.time_ms;
        let mut cursor = self.index;

        while count < HISTORY_SIZE {
            let Some(sample) = self.samples[cursor] else {
                break;
            };
            let age = newest.time_ms - sample.time_ms;
            if age > HORIZON_MS || previous_time - sample.time_ms > ASSUME_STOPPED_MS {
                break;
            }
            // Ages are at most `HORIZON_MS`, so the conversion is exact.
            let t = -(age as f64);
            let p = sample.position.to_vec2();
            sum_w += weight;
            sum_t += weight * t;
            sum_tt += weight * t * t;
            sum_p += p * weight;
            sum_tp += p * (weight * t);

            previous_time = sample.time_ms;
            weight *= RECENCY_DECAY;
            count += 1;
            cursor = (cursor + HISTORY_SIZE - 1) % HISTORY_SIZE;
        }

        if count < 2 {
            return Vec2::ZERO;
        }
        let denominator = sum_w * sum_tt - sum_t * sum_t;
        if denominator.abs() < f64::EPSILON {
            return Vec2::ZERO;
        }
        let per_ms = (sum_tp * sum_w - sum_p * sum_t) / denominator;
        per_ms * 1000.0
    }
}
