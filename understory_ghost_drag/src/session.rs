// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Vec2};

use crate::geometry::{
    DEGREES_PER_SNAPSHOT_SPAN, ExitOrientation, GhostTransform, clockwise_angle,
};
use crate::pointer::PointerSample;
use crate::snapshot::Snapshot;

/// Live record of one drag-to-removal cycle.
///
/// Created when a drag starts and dropped once the snapshot is removed or the
/// machine is reset. Read access is public; all mutation goes through
/// [`GhostDragMachine`](crate::GhostDragMachine).
#[derive(Clone, Debug)]
pub struct DragSession<I> {
    snapshot: Snapshot<I>,
    /// Touch point relative to the snapshot's top-left corner.
    grab: Vec2,
    center: Point,
    current_raw: Point,
    /// Angle at which the rotation reads zero; unset while the anchor sits
    /// on the centre.
    start_angle: Option<f64>,
    current_angle: f64,
    bounds: Rect,
    lean_left: bool,
    target_orientation: Option<ExitOrientation>,
    opacity: f64,
}

impl<I> DragSession<I> {
    pub(crate) fn begin(snapshot: Snapshot<I>, sample: &PointerSample) -> Self {
        let size = snapshot.size();
        let grab = sample.local.to_vec2();
        let top_left = sample.raw - grab;
        let center = top_left + size.to_vec2() / 2.0;
        // Touching the exact centre leaves nothing to measure from yet.
        let start_angle = clockwise_angle(center, sample.raw);
        let mut session = Self {
            snapshot,
            grab,
            center,
            current_raw: sample.raw,
            start_angle,
            current_angle: 0.0,
            bounds: Rect::ZERO,
            lean_left: sample.local.x < size.width / 2.0,
            target_orientation: None,
            opacity: 1.0,
        };
        session.render();
        session
    }

    /// The captured image being dragged.
    #[must_use]
    pub fn snapshot(&self) -> &Snapshot<I> {
        &self.snapshot
    }

    /// Rotation pivot used for angle computation.
    #[must_use]
    pub fn center(&self) -> Point {
        self.center
    }

    /// Absolute position of the anchor (the point under the pointer).
    #[must_use]
    pub fn current_raw(&self) -> Point {
        self.current_raw
    }

    /// Angle from the centre to the touch point at which the rotation reads
    /// zero.
    ///
    /// `None` until the anchor has left the centre: a drag that starts on the
    /// exact centre takes its reference from the first defined angle.
    #[must_use]
    pub fn start_angle(&self) -> Option<f64> {
        self.start_angle
    }

    /// Accumulated rotation in degrees; unbounded and signed.
    #[must_use]
    pub fn current_angle(&self) -> f64 {
        self.current_angle
    }

    /// Rotation reduced to `[0, 360)`.
    #[must_use]
    pub fn rotation_degrees(&self) -> f64 {
        self.current_angle.rem_euclid(360.0)
    }

    /// Bounds of the most recently rendered transform.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Whether the initial touch was left of the snapshot's vertical midline.
    #[must_use]
    pub fn lean_left(&self) -> bool {
        self.lean_left
    }

    /// Edge chosen for the flee animation, once chosen.
    #[must_use]
    pub fn target_orientation(&self) -> Option<ExitOrientation> {
        self.target_orientation
    }

    /// Current opacity in `[0, 1]`.
    #[must_use]
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Transform to draw the snapshot with this frame.
    #[must_use]
    pub fn transform(&self) -> GhostTransform {
        GhostTransform {
            top_left: self.current_raw - self.grab,
            pivot: self.current_raw,
            rotation_degrees: self.current_angle,
        }
    }

    /// Follows the pointer by `delta`.
    pub(crate) fn drag_by(&mut self, delta: Vec2) {
        self.current_raw += delta;
        self.update_angle();
        self.render();
    }

    /// Applies one inertial step, re-anchoring the pivot to the drawn centre.
    pub(crate) fn fling_by(&mut self, delta: Vec2) {
        self.current_raw += delta;
        self.center = self.bounds.center();
        self.update_angle();
        self.render();
    }

    /// Moves the anchor to `location` along the flee path, spinning by
    /// 90 degrees per snapshot span travelled on the exit axis.
    pub(crate) fn flee_to(&mut self, location: Point, clockwise: bool) {
        let moved = match self.target_orientation {
            Some(orientation) if orientation.is_horizontal() => location.x - self.current_raw.x,
            Some(_) => location.y - self.current_raw.y,
            None => 0.0,
        };
        let span = self.snapshot.max_dimension();
        if span > 0.0 && moved.is_finite() {
            let spin = (moved / span * DEGREES_PER_SNAPSHOT_SPAN).abs();
            self.current_angle += if clockwise { spin } else { -spin };
        }
        self.current_raw = location;
        self.render();
    }

    /// Records the exit edge. Only the first call in a cycle takes effect.
    pub(crate) fn set_target_orientation(&mut self, orientation: ExitOrientation) -> bool {
        if self.target_orientation.is_some() {
            return false;
        }
        self.target_orientation = Some(orientation);
        true
    }

    pub(crate) fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Spin direction for the flee animation.
    ///
    /// Continues the current rotation: taking the angle in `(-180, 180]`, a
    /// positive angle keeps turning clockwise and a negative one
    /// counter-clockwise. An angle of exactly zero has no direction yet, so
    /// the grab side decides: grabbed left of the midline spins clockwise
    /// when the anchor is above the centre, grabbed right spins clockwise
    /// when it is below.
    #[must_use]
    pub fn flee_spin_clockwise(&self) -> bool {
        let wrapped = self.current_angle.rem_euclid(360.0);
        let signed = if wrapped > 180.0 {
            wrapped - 360.0
        } else {
            wrapped
        };
        if signed > 0.0 {
            true
        } else if signed < 0.0 {
            false
        } else if self.lean_left {
            self.current_raw.y < self.center.y
        } else {
            self.current_raw.y > self.center.y
        }
    }

    fn update_angle(&mut self) {
        let Some(angle) = clockwise_angle(self.center, self.current_raw) else {
            return;
        };
        match self.start_angle {
            Some(start) => self.current_angle = angle - start,
            // First defined angle: adopt it as the reference so the rotation
            // carries on from where it is.
            None => self.start_angle = Some(angle - self.current_angle),
        }
    }

    fn render(&mut self) {
        self.bounds = self.transform().bounds(self.snapshot.size());
    }
}
