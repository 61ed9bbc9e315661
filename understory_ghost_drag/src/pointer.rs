// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer tracking: movement deltas and touch-slop detection.
//!
//! ## Usage
//!
//! 1) Start tracking with [`PointerTracker::start`] on pointer-down.
//! 2) On each move, call [`PointerTracker::exceeds_slop`] until the gesture
//!    counts as a drag, then [`PointerTracker::update`] for the delta since
//!    the previous position.
//! 3) End tracking with [`PointerTracker::end`].
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use understory_ghost_drag::pointer::{PointerSample, PointerTracker};
//!
//! let mut pointer = PointerTracker::default();
//! pointer.start(PointerSample::new(Point::new(5.0, 5.0), Point::new(105.0, 205.0), 0));
//!
//! assert!(!pointer.exceeds_slop(Point::new(108.0, 205.0), 8.0));
//! assert!(pointer.exceeds_slop(Point::new(120.0, 205.0), 8.0));
//!
//! assert_eq!(pointer.update(Point::new(120.0, 210.0)), Some(Vec2::new(15.0, 5.0)));
//! ```

use kurbo::{Point, Vec2};

/// One pointer event as delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    /// Position relative to the dragged element's top-left corner.
    pub local: Point,
    /// Absolute screen position.
    pub raw: Point,
    /// Host timestamp in milliseconds.
    pub time_ms: u64,
}

impl PointerSample {
    /// Creates a sample.
    #[must_use]
    pub fn new(local: Point, raw: Point, time_ms: u64) -> Self {
        Self {
            local,
            raw,
            time_ms,
        }
    }
}

/// Tracks the pointer between down and up.
#[derive(Debug, Clone, Default, Copy)]
pub struct PointerTracker {
    /// The pointer-down sample.
    pub down: Option<PointerSample>,
    /// Last recorded absolute position.
    pub last_raw: Option<Point>,
}

impl PointerTracker {
    /// Starts tracking a new gesture from `sample`.
    pub fn start(&mut self, sample: PointerSample) {
        self.down = Some(sample);
        self.last_raw = Some(sample.raw);
    }

    /// Records `raw`, returning the movement since the previous position.
    pub fn update(&mut self, raw: Point) -> Option<Vec2> {
        if self.down.is_none() {
            return None;
        }
        let delta = self.last_raw.map(|last| raw - last);
        self.last_raw = Some(raw);
        delta
    }

    /// Returns `true` once `raw` is more than `slop` away from the
    /// pointer-down position on either axis.
    #[must_use]
    pub fn exceeds_slop(&self, raw: Point, slop: f64) -> bool {
        self.down.is_some_and(|down| {
            let offset = raw - down.raw;
            offset.x.abs() > slop || offset.y.abs() > slop
        })
    }

    /// Ends the gesture.
    pub fn end(&mut self) {
        self.down = None;
        self.last_raw = None;
    }

    /// Returns `true` between [`start`](Self::start) and [`end`](Self::end).
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.down.is_some()
    }
}
