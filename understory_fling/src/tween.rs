// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Point;

/// Linear progress over a fixed duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tween {
    /// Timestamp at which progress is zero.
    pub start_ms: u64,
    /// Length of the tween. A zero duration is complete immediately.
    pub duration_ms: u64,
}

impl Tween {
    /// Creates a tween starting at `start_ms`.
    #[must_use]
    pub fn new(start_ms: u64, duration_ms: u64) -> Self {
        Self {
            start_ms,
            duration_ms,
        }
    }

    /// Progress in `[0, 1]` at `now_ms`.
    #[must_use]
    pub fn fraction(&self, now_ms: u64) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(self.start_ms) as f64;
        (elapsed / self.duration_ms as f64).min(1.0)
    }

    /// Returns `true` once `now_ms` is at or past the end.
    #[must_use]
    pub fn is_finished(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.start_ms) >= self.duration_ms
    }
}

/// Linear interpolation between two points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointTween {
    /// Position at progress zero.
    pub from: Point,
    /// Position at progress one.
    pub to: Point,
    /// Timing.
    pub tween: Tween,
}

impl PointTween {
    /// Creates a point tween.
    #[must_use]
    pub fn new(from: Point, to: Point, tween: Tween) -> Self {
        Self { from, to, tween }
    }

    /// Interpolated position at `now_ms`.
    #[must_use]
    pub fn sample(&self, now_ms: u64) -> Point {
        self.from.lerp(self.to, self.tween.fraction(now_ms))
    }
}

/// Opacity ramp from fully opaque to fully transparent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FadeTween {
    /// Timing.
    pub tween: Tween,
}

impl FadeTween {
    /// Creates a fade-out.
    #[must_use]
    pub fn new(tween: Tween) -> Self {
        Self { tween }
    }

    /// Opacity in `[0, 1]` at `now_ms`.
    #[must_use]
    pub fn opacity(&self, now_ms: u64) -> f64 {
        1.0 - self.tween.fraction(now_ms)
    }
}
