// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-tunable parameters for [`GhostDragMachine`](crate::GhostDragMachine).

use kurbo::Vec2;
use thiserror::Error;
use understory_fling::FlingPhysics;

/// A configuration value was rejected. The previous value stays in effect.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A duration that must be positive was zero.
    #[error("{name} must be greater than zero")]
    ZeroDuration {
        /// Which duration.
        name: &'static str,
    },
    /// The scroll utilization ratio was outside `[0, 1]` or not finite.
    #[error("scroll utilization ratio {0} is outside [0, 1]")]
    RatioOutOfRange(f64),
    /// The velocity threshold was negative or not finite.
    #[error("velocity threshold {0} must be finite and non-negative")]
    InvalidThreshold(f64),
    /// The touch slop was negative or not finite.
    #[error("touch slop {0} must be finite and non-negative")]
    InvalidTouchSlop(f64),
    /// The fling physics would never come to rest.
    #[error("fling physics {0:?} do not decelerate to a stop")]
    InvalidFlingPhysics(FlingPhysics),
}

/// Tunables for one drag machine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GhostDragConfig {
    /// Length of the flee animation in milliseconds.
    pub fling_duration_ms: u64,
    /// Length of the on-screen fade-out in milliseconds.
    pub fade_duration_ms: u64,
    /// Share of the inertial travel that is applied to the snapshot, in `[0, 1]`.
    pub scroll_utilization_ratio: f64,
    /// Release speed (units/sec, on either axis) above which inertial motion is used.
    pub velocity_threshold: f64,
    /// Distance the pointer must travel from pointer-down before a drag starts.
    pub touch_slop: f64,
    /// Deceleration used for inertial motion.
    pub fling_physics: FlingPhysics,
}

impl Default for GhostDragConfig {
    fn default() -> Self {
        Self {
            fling_duration_ms: 800,
            fade_duration_ms: 200,
            scroll_utilization_ratio: 0.8,
            velocity_threshold: 1000.0,
            touch_slop: 8.0,
            fling_physics: FlingPhysics::default(),
        }
    }
}

impl GhostDragConfig {
    /// Checks every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_duration("fling duration", self.fling_duration_ms)?;
        check_duration("fade duration", self.fade_duration_ms)?;
        check_ratio(self.scroll_utilization_ratio)?;
        check_threshold(self.velocity_threshold)?;
        check_touch_slop(self.touch_slop)?;
        check_physics(self.fling_physics)
    }

    /// Returns `true` if `velocity` should start inertial motion.
    #[must_use]
    pub fn exceeds_velocity_threshold(&self, velocity: Vec2) -> bool {
        velocity.x.abs() > self.velocity_threshold || velocity.y.abs() > self.velocity_threshold
    }
}

pub(crate) fn check_duration(name: &'static str, duration_ms: u64) -> Result<(), ConfigError> {
    if duration_ms == 0 {
        return Err(ConfigError::ZeroDuration { name });
    }
    Ok(())
}

pub(crate) fn check_ratio(ratio: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&ratio) {
        Ok(())
    } else {
        Err(ConfigError::RatioOutOfRange(ratio))
    }
}

pub(crate) fn check_threshold(threshold: f64) -> Result<(), ConfigError> {
    if threshold.is_finite() && threshold >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold(threshold))
    }
}

pub(crate) fn check_touch_slop(slop: f64) -> Result<(), ConfigError> {
    if slop.is_finite() && slop >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidTouchSlop(slop))
    }
}

pub(crate) fn check_physics(physics: FlingPhysics) -> Result<(), ConfigError> {
    if physics.is_valid() {
        Ok(())
    } else {
        Err(ConfigError::InvalidFlingPhysics(physics))
    }
}
