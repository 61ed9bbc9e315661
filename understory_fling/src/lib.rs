// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Fling: host-driven motion primitives for pointer interactions.
//!
//! This crate provides small, clock-free building blocks for motion that
//! follows a pointer gesture:
//!
//! - [`VelocityTracker`]: estimate release velocity from timestamped pointer positions.
//! - [`FlingScroller`]: integrate a decaying velocity into an offset (inertial motion).
//! - [`Tween`], [`PointTween`], [`FadeTween`]: fixed-duration linear interpolation.
//!
//! None of these types read a clock or schedule frames. The host passes a
//! monotonically increasing timestamp in milliseconds to every call, which
//! keeps them deterministic and trivially testable.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Vec2};
//! use understory_fling::{FlingPhysics, FlingScroller, VelocityTracker};
//!
//! let mut tracker = VelocityTracker::new();
//! tracker.add_sample(0, Point::new(0.0, 0.0));
//! tracker.add_sample(10, Point::new(20.0, 0.0));
//! tracker.add_sample(20, Point::new(40.0, 0.0));
//! let velocity = tracker.velocity();
//! assert!((velocity.x - 2000.0).abs() < 1e-6);
//!
//! let mut scroller = FlingScroller::new(FlingPhysics::default());
//! scroller.fling(velocity, 100);
//! assert!(scroller.compute_offset(116));
//! assert!(scroller.offset().x > 0.0);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod scroller;
mod tween;
mod velocity;

pub use scroller::{FlingPhysics, FlingScroller};
pub use tween::{FadeTween, PointTween, Tween};
pub use velocity::VelocityTracker;
