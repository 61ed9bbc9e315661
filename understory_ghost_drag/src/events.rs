// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Phases and notifications emitted by [`GhostDragMachine`](crate::GhostDragMachine).

use kurbo::Point;

/// Where the drag cycle currently is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DragPhase {
    /// Nothing is being dragged.
    #[default]
    Idle,
    /// The snapshot follows the pointer.
    Dragging,
    /// Released fast; inertial motion is running (and, if it ends on screen, the fade).
    Flinging,
    /// Released slowly; the snapshot is animating towards a viewport edge.
    Fleeing,
    /// The snapshot left the viewport and is being removed.
    OutOfScreen,
    /// The snapshot faded out on screen and is being removed.
    Gone,
}

/// A notification for the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GhostDragEvent {
    /// The phase changed.
    StateChanged(DragPhase),
    /// The snapshot moved or rotated.
    DragUpdate {
        /// Absolute anchor position.
        position: Point,
        /// Rotation in degrees, in `[0, 360)`.
        rotation_degrees: f64,
    },
    /// The host should detach the snapshot.
    RemovalRequested,
    /// Current opacity of the fading snapshot, in `[0, 1]`.
    FadeStep(f64),
    /// The original element should be shown or hidden.
    ElementVisibilityChanged {
        /// `true` when the original element should be visible again.
        visible: bool,
    },
}

/// Receives [`GhostDragEvent`]s one callback at a time.
///
/// Every method has an empty default, so observers only implement what they
/// care about. `Vec<GhostDragEvent>` collects everything.
pub trait GhostDragObserver {
    /// The phase changed.
    fn on_state_changed(&mut self, _phase: DragPhase) {}

    /// The snapshot moved or rotated.
    fn on_drag_update(&mut self, _position: Point, _rotation_degrees: f64) {}

    /// The snapshot should be detached.
    fn on_removal_requested(&mut self) {}

    /// The fading snapshot's opacity changed.
    fn on_fade_step(&mut self, _opacity: f64) {}

    /// The original element should be shown (`true`) or hidden (`false`).
    fn on_element_visibility_changed(&mut self, _visible: bool) {}

    /// Routes `event` to the matching callback.
    fn on_event(&mut self, event: GhostDragEvent) {
        match event {
            GhostDragEvent::StateChanged(phase) => self.on_state_changed(phase),
            GhostDragEvent::DragUpdate {
                position,
                rotation_degrees,
            } => self.on_drag_update(position, rotation_degrees),
            GhostDragEvent::RemovalRequested => self.on_removal_requested(),
            GhostDragEvent::FadeStep(opacity) => self.on_fade_step(opacity),
            GhostDragEvent::ElementVisibilityChanged { visible } => {
                self.on_element_visibility_changed(visible);
            }
        }
    }
}

impl GhostDragObserver for () {}

impl GhostDragObserver for Vec<GhostDragEvent> {
    fn on_event(&mut self, event: GhostDragEvent) {
        self.push(event);
    }
}
