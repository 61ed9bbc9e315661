// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry for the dragged snapshot: rotation angles, exit trajectories,
//! the render transform and off-screen testing.
//!
//! Everything here is a pure function of its inputs. Screen coordinates are
//! y-down, so a positive rotation turns the snapshot clockwise on screen.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use rand::Rng;

/// Denominators smaller than this are treated as zero.
const DEGENERATE_EPSILON: f64 = 1e-9;

/// Rotation contributed by travelling one full snapshot dimension while fleeing.
pub const DEGREES_PER_SNAPSHOT_SPAN: f64 = 90.0;

/// Clockwise angle in degrees, in `[0, 360)`, from the positive x axis to the
/// vector `point - origin`.
///
/// `origin` is treated as the centre of a circle. Returns `None` when the two
/// points coincide (or either is non-finite), in which case callers should
/// keep whatever angle they had before.
///
/// ```rust
/// use kurbo::Point;
/// use understory_ghost_drag::geometry::clockwise_angle;
///
/// let o = Point::new(10.0, 10.0);
/// assert_eq!(clockwise_angle(o, Point::new(20.0, 10.0)), Some(0.0));
/// assert_eq!(clockwise_angle(o, Point::new(10.0, 20.0)), Some(90.0));
/// assert_eq!(clockwise_angle(o, Point::new(0.0, 10.0)), Some(180.0));
/// assert_eq!(clockwise_angle(o, Point::new(10.0, 0.0)), Some(270.0));
/// assert_eq!(clockwise_angle(o, o), None);
/// ```
#[must_use]
pub fn clockwise_angle(origin: Point, point: Point) -> Option<f64> {
    let dx = point.x - origin.x;
    let dy = point.y - origin.y;
    let hypot = dx.hypot(dy);
    if !hypot.is_finite() || hypot == 0.0 {
        return None;
    }
    let base = quadrant_base(dx, dy);
    // Measure from whichever axis the quadrant starts on.
    let leg = if base == 0.0 || base == 180.0 {
        dx.abs()
    } else {
        dy.abs()
    };
    let angle = base + (leg / hypot).min(1.0).acos().to_degrees();
    Some(if angle >= 360.0 { angle - 360.0 } else { angle })
}

/// Clockwise base angle of the quadrant that `(dx, dy)` points into.
fn quadrant_base(dx: f64, dy: f64) -> f64 {
    match (dx > 0.0, dy > 0.0) {
        (true, true) => 0.0,
        (false, true) => 90.0,
        (false, false) => 180.0,
        (true, false) => 270.0,
    }
}

/// The viewport edge a fleeing snapshot travels towards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExitOrientation {
    /// Towards `x < 0`.
    Left,
    /// Towards `x > viewport width`.
    Right,
    /// Towards `y < 0`.
    Top,
    /// Towards `y > viewport height`.
    Bottom,
}

impl ExitOrientation {
    /// All orientations in tie-break order.
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Top, Self::Bottom];

    /// Returns `true` for left and right exits.
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Unit vector pointing out of the viewport through this edge.
    #[must_use]
    pub fn direction(self) -> Vec2 {
        match self {
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
            Self::Top => Vec2::new(0.0, -1.0),
            Self::Bottom => Vec2::new(0.0, 1.0),
        }
    }
}

/// Where a fleeing snapshot is sent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExitTrajectory {
    /// Absolute end point of the anchor.
    pub target: Point,
    /// The edge being exited through.
    pub orientation: ExitOrientation,
    /// Travel along the exit axis from the current anchor position.
    pub distance: f64,
}

/// `numerator / denominator`, or `None` when the denominator vanishes.
fn fraction_of(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator.abs() >= DEGENERATE_EPSILON).then(|| numerator / denominator)
}

/// Chooses the edge to flee towards and the anchor's end point.
///
/// For each edge the overshoot of `current_raw` relative to `center` is
/// measured; the largest wins, with ties going to the first of
/// [`ExitOrientation::ALL`]. An axis whose `center` coordinate is zero
/// contributes zero for both of its edges.
///
/// The travel distance is the larger viewport dimension plus the larger
/// dimension of `bounds`, so the snapshot clears the viewport from any
/// starting point at a uniform speed. The coordinate perpendicular to the
/// exit axis is jittered uniformly within `±span`, where `span` is the larger
/// dimension of `bounds`.
///
/// Returns `None` when `bounds` is empty (nothing has been rendered yet).
pub fn select_exit_trajectory<R: Rng + ?Sized>(
    current_raw: Point,
    center: Point,
    viewport: Size,
    bounds: Rect,
    rng: &mut R,
) -> Option<ExitTrajectory> {
    let span = bounds.width().abs().max(bounds.height().abs());
    if !span.is_finite() || span <= 0.0 {
        return None;
    }

    let (left, right) = match fraction_of(current_raw.x, center.x) {
        Some(ratio) => (1.0 - ratio, ratio - 1.0),
        None => (0.0, 0.0),
    };
    let (top, bottom) = match fraction_of(current_raw.y, center.y) {
        Some(ratio) => (1.0 - ratio, ratio - 1.0),
        None => (0.0, 0.0),
    };
    let fractions = [left, right, top, bottom];

    let mut orientation = ExitOrientation::Left;
    let mut best = fractions[0];
    for (candidate, fraction) in ExitOrientation::ALL.into_iter().zip(fractions).skip(1) {
        if fraction > best {
            best = fraction;
            orientation = candidate;
        }
    }

    let distance = viewport.width.max(viewport.height) + span;
    let jitter = rng.gen_range(-span..=span);
    let along = orientation.direction() * distance;
    let across = if orientation.is_horizontal() {
        Vec2::new(0.0, jitter)
    } else {
        Vec2::new(jitter, 0.0)
    };

    Some(ExitTrajectory {
        target: current_raw + along + across,
        orientation,
        distance,
    })
}

/// Placement of the snapshot for one frame.
///
/// The snapshot's own coordinate space spans `(0, 0)` to its size. It is
/// first translated so its origin sits at `top_left`, then rotated by
/// `rotation_degrees` (clockwise on screen) about `pivot`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GhostTransform {
    /// Unrotated top-left corner of the snapshot in screen space.
    pub top_left: Point,
    /// Rotation centre in screen space.
    pub pivot: Point,
    /// Clockwise rotation in degrees. Unbounded; only its value mod 360 is visible.
    pub rotation_degrees: f64,
}

impl GhostTransform {
    /// Affine mapping snapshot-local coordinates to screen coordinates.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::rotate_about(self.rotation_degrees.to_radians(), self.pivot)
            * Affine::translate(self.top_left.to_vec2())
    }

    /// Screen-space axis-aligned bounds of a snapshot of `size` under this transform.
    #[must_use]
    pub fn bounds(&self, size: Size) -> Rect {
        self.to_affine().transform_rect_bbox(size.to_rect())
    }
}

/// Axis-aligned bounds of a snapshot of `size` placed at `top_left` and
/// rotated by `angle_degrees` about `pivot`.
///
/// Uses the same affine as [`GhostTransform::to_affine`], so the result
/// always matches what was drawn.
#[must_use]
pub fn rotated_bounds(size: Size, top_left: Point, angle_degrees: f64, pivot: Point) -> Rect {
    GhostTransform {
        top_left,
        pivot,
        rotation_degrees: angle_degrees,
    }
    .bounds(size)
}

/// Returns `true` when `rect` lies entirely outside a viewport of `viewport`
/// size anchored at the origin.
#[must_use]
pub fn is_fully_offscreen(rect: Rect, viewport: Size) -> bool {
    let rect = rect.abs();
    rect.y1 < 0.0 || rect.y0 > viewport.height || rect.x1 < 0.0 || rect.x0 > viewport.width
}
