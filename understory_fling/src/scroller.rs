// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `ln` and `powf`
use kurbo::Vec2;

/// Deceleration model for [`FlingScroller`].
///
/// Velocity decays exponentially: after `t` milliseconds the speed is
/// `v0 * decay_per_ms.powf(t)`. The fling ends once the speed drops to
/// `min_velocity`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlingPhysics {
    /// Fraction of velocity retained per millisecond, in `(0, 1)`.
    pub decay_per_ms: f64,
    /// Speed floor in units per second at which motion stops. Must be positive.
    pub min_velocity: f64,
}

impl Default for FlingPhysics {
    fn default() -> Self {
        Self {
            decay_per_ms: 0.998,
            min_velocity: 20.0,
        }
    }
}

impl FlingPhysics {
    /// Returns `true` if the parameters describe a terminating deceleration.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.decay_per_ms.is_finite()
            && self.decay_per_ms > 0.0
            && self.decay_per_ms < 1.0
            && self.min_velocity.is_finite()
            && self.min_velocity > 0.0
    }

    /// Decay constant `k` (per millisecond) such that `v(t) = v0 * e^(-k t)`.
    fn rate(&self) -> f64 {
        -self.decay_per_ms.ln()
    }

    /// Time in milliseconds for `speed` (units/sec) to decay to the floor.
    ///
    /// Returns `0.0` when the speed is already at or below the floor, or when
    /// the physics are invalid.
    #[must_use]
    pub fn duration_ms(&self, speed: f64) -> f64 {
        if !self.is_valid() || !speed.is_finite() || speed <= self.min_velocity {
            return 0.0;
        }
        (speed / self.min_velocity).ln() / self.rate()
    }

    /// Distance travelled after `elapsed_ms` for a starting `velocity` in units/sec.
    fn offset_at(&self, velocity: Vec2, elapsed_ms: f64) -> Vec2 {
        let k = self.rate();
        let per_ms = velocity / 1000.0;
        // `decay^t == e^(-k t)`
        per_ms * ((1.0 - self.decay_per_ms.powf(elapsed_ms)) / k)
    }
}

/// Ballistic integrator for inertial motion after a pointer release.
///
/// The scroller reports an offset from the fling origin. Call
/// [`FlingScroller::compute_offset`] once per frame; it returns `true` while
/// the offset advanced and `false` once the fling has finished.
///
/// ```rust
/// use kurbo::Vec2;
/// use understory_fling::{FlingPhysics, FlingScroller};
///
/// let mut scroller = FlingScroller::new(FlingPhysics::default());
/// scroller.fling(Vec2::new(0.0, -3000.0), 0);
/// let mut now = 0;
/// while scroller.compute_offset(now) {
///     now += 16;
/// }
/// assert!(scroller.is_finished());
/// assert!(scroller.offset().y < 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct FlingScroller {
    physics: FlingPhysics,
    start_ms: u64,
    velocity: Vec2,
    duration_ms: f64,
    offset: Vec2,
    finished: bool,
}

impl FlingScroller {
    /// Creates an idle scroller.
    #[must_use]
    pub fn new(physics: FlingPhysics) -> Self {
        Self {
            physics,
            start_ms: 0,
            velocity: Vec2::ZERO,
            duration_ms: 0.0,
            offset: Vec2::ZERO,
            finished: true,
        }
    }

    /// Returns the deceleration model.
    #[must_use]
    pub fn physics(&self) -> FlingPhysics {
        self.physics
    }

    /// Starts a fling from offset zero with `velocity` in units per second.
    ///
    /// A velocity at or below the speed floor finishes immediately.
    pub fn fling(&mut self, velocity: Vec2, now_ms: u64) {
        self.start_ms = now_ms;
        self.velocity = velocity;
        self.offset = Vec2::ZERO;
        self.duration_ms = self.physics.duration_ms(velocity.hypot());
        self.finished = self.duration_ms <= 0.0;
        tracing::trace!(
            vx = velocity.x,
            vy = velocity.y,
            duration_ms = self.duration_ms,
            "fling started"
        );
    }

    /// Advances the offset to `now_ms`.
    ///
    /// Returns `true` if the fling was still running and the offset was
    /// updated. The final update (reaching the end of the fling) also returns
    /// `true`; every call after that returns `false`.
    pub fn compute_offset(&mut self, now_ms: u64) -> bool {
        if self.finished {
            return false;
        }
        let elapsed = now_ms.saturating_sub(self.start_ms) as f64;
        let clamped = elapsed.min(self.duration_ms);
        let offset = self.physics.offset_at(self.velocity, clamped);
        if !offset.is_finite() {
            tracing::debug!("fling offset overflowed; finishing");
            self.finished = true;
            return false;
        }
        self.offset = offset;
        if elapsed >= self.duration_ms {
            self.finished = true;
        }
        true
    }

    /// Current offset from the fling origin.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Total fling duration in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Returns `true` once the fling has ended or was aborted.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Stops the fling immediately, leaving the offset where it is.
    pub fn abort(&mut self) {
        self.finished = true;
    }
}
