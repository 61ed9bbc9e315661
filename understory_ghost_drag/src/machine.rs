// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::mem;

use kurbo::{Rect, Size, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace, warn};
use understory_fling::{FadeTween, FlingScroller, PointTween, Tween, VelocityTracker};

use crate::config::{
    ConfigError, GhostDragConfig, check_duration, check_ratio, check_threshold, check_touch_slop,
};
use crate::events::{DragPhase, GhostDragEvent, GhostDragObserver};
use crate::geometry::{ExitOrientation, GhostTransform, is_fully_offscreen, select_exit_trajectory};
use crate::pointer::{PointerSample, PointerTracker};
use crate::session::DragSession;
use crate::snapshot::Snapshot;

/// The single active motion driver, if any.
#[derive(Clone, Debug, Default)]
enum Motion {
    #[default]
    None,
    Fling {
        scroller: FlingScroller,
        /// Scaled scroller offset already applied to the session.
        applied: Vec2,
    },
    Flee {
        path: PointTween,
        clockwise: bool,
    },
    Fade(FadeTween),
}

/// Drag, fling and flee state machine for a snapshot of a dragged element.
///
/// The host feeds pointer events and frame ticks; the machine keeps the
/// snapshot's transform up to date and queues [`GhostDragEvent`]s for the host
/// to drain. Exactly one driver mutates the session at a time: the pointer
/// while dragging, then the fling scroller, flee tween or fade tween.
///
/// Events accumulate in an internal queue until the host takes them with
/// [`drain_events`](Self::drain_events) or [`dispatch`](Self::dispatch); a
/// host that never drains lets the queue grow for as long as it feeds input.
/// Draining once per frame keeps it to a handful of entries.
///
/// `I` is the host's image handle type; `R` is the random source used to
/// vary flee trajectories.
#[derive(Debug)]
pub struct GhostDragMachine<I, R = StdRng> {
    config: GhostDragConfig,
    viewport: Size,
    phase: DragPhase,
    pointer: PointerTracker,
    velocity: VelocityTracker,
    pending_snapshot: Option<Snapshot<I>>,
    session: Option<DragSession<I>>,
    motion: Motion,
    /// Set on release; the pointer no longer drives this cycle.
    released: bool,
    element_hidden: bool,
    /// Pending notifications, oldest first; emptied only by draining.
    events: Vec<GhostDragEvent>,
    rng: R,
}

impl<I> GhostDragMachine<I, StdRng> {
    /// Creates a machine for `viewport` with default configuration and an
    /// entropy-seeded random source.
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self::with_rng(viewport, StdRng::from_entropy())
    }
}

impl<I, R: Rng> GhostDragMachine<I, R> {
    /// Creates a machine with default configuration and the given random source.
    #[must_use]
    pub fn with_rng(viewport: Size, rng: R) -> Self {
        Self {
            config: GhostDragConfig::default(),
            viewport,
            phase: DragPhase::Idle,
            pointer: PointerTracker::default(),
            velocity: VelocityTracker::new(),
            pending_snapshot: None,
            session: None,
            motion: Motion::None,
            released: false,
            element_hidden: false,
            events: Vec::new(),
            rng,
        }
    }

    /// Creates a machine with a validated configuration.
    pub fn with_config(viewport: Size, config: GhostDragConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut machine = Self::with_rng(viewport, rng);
        machine.config = config;
        Ok(machine)
    }

    // --- configuration -------------------------------------------------

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &GhostDragConfig {
        &self.config
    }

    /// Replaces the whole configuration if it is valid.
    pub fn set_config(&mut self, config: GhostDragConfig) -> Result<(), ConfigError> {
        config.validate().inspect_err(|err| warn!(%err, "rejected configuration"))?;
        self.config = config;
        Ok(())
    }

    /// Sets the flee animation length.
    pub fn set_fling_duration_ms(&mut self, duration_ms: u64) -> Result<(), ConfigError> {
        check_duration("fling duration", duration_ms)
            .inspect_err(|err| warn!(%err, "rejected configuration"))?;
        self.config.fling_duration_ms = duration_ms;
        Ok(())
    }

    /// Sets the fade-out length.
    pub fn set_fade_duration_ms(&mut self, duration_ms: u64) -> Result<(), ConfigError> {
        check_duration("fade duration", duration_ms)
            .inspect_err(|err| warn!(%err, "rejected configuration"))?;
        self.config.fade_duration_ms = duration_ms;
        Ok(())
    }

    /// Sets the share of inertial travel applied to the snapshot.
    pub fn set_scroll_utilization_ratio(&mut self, ratio: f64) -> Result<(), ConfigError> {
        check_ratio(ratio).inspect_err(|err| warn!(%err, "rejected configuration"))?;
        self.config.scroll_utilization_ratio = ratio;
        Ok(())
    }

    /// Sets the per-axis release speed above which inertial motion is used.
    pub fn set_velocity_threshold(&mut self, threshold: f64) -> Result<(), ConfigError> {
        check_threshold(threshold).inspect_err(|err| warn!(%err, "rejected configuration"))?;
        self.config.velocity_threshold = threshold;
        Ok(())
    }

    /// Sets the distance the pointer must move before a drag starts.
    pub fn set_touch_slop(&mut self, slop: f64) -> Result<(), ConfigError> {
        check_touch_slop(slop).inspect_err(|err| warn!(%err, "rejected configuration"))?;
        self.config.touch_slop = slop;
        Ok(())
    }

    /// Viewport size used for trajectories and off-screen tests.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Updates the viewport size.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    // --- queries -------------------------------------------------------

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// The live session, while a snapshot is shown.
    #[must_use]
    pub fn session(&self) -> Option<&DragSession<I>> {
        self.session.as_ref()
    }

    /// The snapshot being shown.
    #[must_use]
    pub fn snapshot(&self) -> Option<&Snapshot<I>> {
        self.session.as_ref().map(DragSession::snapshot)
    }

    /// Transform to draw the snapshot with.
    #[must_use]
    pub fn transform(&self) -> Option<GhostTransform> {
        self.session.as_ref().map(DragSession::transform)
    }

    /// Bounds of the snapshot as last drawn.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.session.as_ref().map(DragSession::bounds)
    }

    /// Opacity of the snapshot.
    #[must_use]
    pub fn opacity(&self) -> Option<f64> {
        self.session.as_ref().map(DragSession::opacity)
    }

    /// Edge chosen by the flee animation in this cycle.
    #[must_use]
    pub fn target_orientation(&self) -> Option<ExitOrientation> {
        self.session.as_ref().and_then(DragSession::target_orientation)
    }

    /// Returns `true` while the original element is hidden behind the snapshot
    /// (or thrown away and awaiting [`reset`](Self::reset)).
    #[must_use]
    pub fn is_element_hidden(&self) -> bool {
        self.element_hidden
    }

    /// Returns `true` while a fling, flee or fade is running.
    #[must_use]
    pub fn is_motion_running(&self) -> bool {
        !matches!(self.motion, Motion::None)
    }

    // --- events --------------------------------------------------------

    /// Takes all queued events, oldest first, leaving the queue empty.
    pub fn drain_events(&mut self) -> impl Iterator<Item = GhostDragEvent> + '_ {
        self.events.drain(..)
    }

    /// Forwards all queued events to `observer`, oldest first.
    pub fn dispatch<O: GhostDragObserver + ?Sized>(&mut self, observer: &mut O) {
        for event in self.events.drain(..) {
            observer.on_event(event);
        }
    }

    // --- host input ----------------------------------------------------

    /// Supplies the snapshot for the next drag.
    ///
    /// Returns `false` (and drops the snapshot) while a snapshot is already
    /// shown or the element is still hidden from a previous cycle.
    pub fn provide_snapshot(&mut self, snapshot: Snapshot<I>) -> bool {
        if self.session.is_some() || self.element_hidden {
            trace!("snapshot ignored; a cycle is still active");
            return false;
        }
        self.pending_snapshot = Some(snapshot);
        true
    }

    /// Pointer pressed.
    pub fn on_pointer_down(&mut self, sample: PointerSample) {
        if self.session.is_some() || self.element_hidden {
            return;
        }
        self.pointer.start(sample);
        self.velocity.clear();
        self.velocity.add_sample(sample.time_ms, sample.raw);
    }

    /// Pointer moved.
    ///
    /// Before a drag starts this checks the touch slop and, once exceeded,
    /// starts dragging with the pending snapshot. A move with no snapshot
    /// available is ignored. While dragging, the snapshot follows the pointer.
    pub fn on_pointer_move(&mut self, sample: PointerSample) {
        if self.session.is_some() {
            if self.released || self.phase != DragPhase::Dragging {
                return;
            }
            self.velocity.add_sample(sample.time_ms, sample.raw);
            if let (Some(delta), Some(session)) =
                (self.pointer.update(sample.raw), self.session.as_mut())
            {
                session.drag_by(delta);
            }
            self.emit_drag_update();
            return;
        }

        if self.element_hidden {
            return;
        }
        if !self.pointer.is_tracking() {
            self.on_pointer_down(sample);
            return;
        }
        self.velocity.add_sample(sample.time_ms, sample.raw);
        if !self.pointer.exceeds_slop(sample.raw, self.config.touch_slop) {
            return;
        }
        let Some(snapshot) = self.pending_snapshot.take() else {
            trace!("drag threshold crossed without a snapshot; waiting");
            return;
        };
        self.begin_drag(snapshot, sample);
    }

    /// Pointer released.
    ///
    /// Makes the single velocity decision of the cycle: fast releases fling,
    /// slow ones flee towards an edge. Ignored before a drag started and
    /// after the first release.
    pub fn on_pointer_up(&mut self, now_ms: u64) {
        if let Some(last) = self.pointer.last_raw {
            self.velocity.add_sample(now_ms, last);
        }
        self.pointer.end();

        if self.session.is_none() {
            trace!("release before a drag started; ignoring");
            self.velocity.clear();
            return;
        }
        if self.released || self.phase != DragPhase::Dragging {
            trace!("release after control was lost; ignoring");
            return;
        }
        self.released = true;

        let velocity = self.velocity.velocity();
        self.velocity.clear();
        if self.config.exceeds_velocity_threshold(velocity) {
            debug!(vx = velocity.x, vy = velocity.y, "release: fling");
            self.start_fling(velocity, now_ms);
        } else {
            debug!(vx = velocity.x, vy = velocity.y, "release: flee");
            self.start_flee(now_ms);
        }
    }

    /// Pointer gesture cancelled; handled like a release.
    pub fn on_pointer_cancel(&mut self, now_ms: u64) {
        self.on_pointer_up(now_ms);
    }

    /// Advances the running motion to `now_ms`.
    ///
    /// Returns `true` if another frame is needed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        match mem::take(&mut self.motion) {
            Motion::None => false,
            Motion::Fling {
                mut scroller,
                applied,
            } => {
                if !scroller.compute_offset(now_ms) {
                    self.start_fade(now_ms);
                    return true;
                }
                let scaled = scroller.offset() * self.config.scroll_utilization_ratio;
                if let Some(session) = self.session.as_mut() {
                    session.fling_by(scaled - applied);
                }
                self.motion = Motion::Fling {
                    scroller,
                    applied: scaled,
                };
                self.after_motion_step()
            }
            Motion::Flee { path, clockwise } => {
                let location = path.sample(now_ms);
                if let Some(session) = self.session.as_mut() {
                    session.flee_to(location, clockwise);
                }
                if path.tween.is_finished(now_ms) {
                    self.emit_drag_update();
                    if self.leave_if_offscreen() {
                        return false;
                    }
                    self.start_fade(now_ms);
                    return true;
                }
                self.motion = Motion::Flee { path, clockwise };
                self.after_motion_step()
            }
            Motion::Fade(fade) => {
                let opacity = fade.opacity(now_ms);
                if let Some(session) = self.session.as_mut() {
                    session.set_opacity(opacity);
                }
                self.events.push(GhostDragEvent::FadeStep(opacity));
                if fade.tween.is_finished(now_ms) {
                    self.set_phase(DragPhase::Gone);
                    self.finish_cycle();
                    return false;
                }
                self.motion = Motion::Fade(fade);
                true
            }
        }
    }

    /// Returns to [`DragPhase::Idle`], clearing the session and showing the
    /// original element again.
    ///
    /// Refused (returns `false`) while dragging or while any fling, flee or
    /// fade is running; nothing is interrupted.
    pub fn reset(&mut self) -> bool {
        let dragging = self.session.is_some() && !self.released;
        if dragging || self.is_motion_running() {
            debug!(phase = ?self.phase, "reset refused while in motion");
            return false;
        }
        self.session = None;
        self.pending_snapshot = None;
        self.pointer.end();
        self.velocity.clear();
        self.released = false;
        if self.element_hidden {
            self.element_hidden = false;
            self.events
                .push(GhostDragEvent::ElementVisibilityChanged { visible: true });
        }
        self.set_phase(DragPhase::Idle);
        true
    }

    // --- internals -----------------------------------------------------

    fn begin_drag(&mut self, snapshot: Snapshot<I>, sample: PointerSample) {
        self.abort_motion();
        let session = DragSession::begin(snapshot, &sample);
        debug!(
            x = sample.raw.x,
            y = sample.raw.y,
            lean_left = session.lean_left(),
            "drag started"
        );
        self.session = Some(session);
        self.released = false;
        self.pointer.update(sample.raw);
        self.element_hidden = true;
        self.events
            .push(GhostDragEvent::ElementVisibilityChanged { visible: false });
        self.set_phase(DragPhase::Dragging);
        self.emit_drag_update();
    }

    fn start_fling(&mut self, velocity: Vec2, now_ms: u64) {
        let mut scroller = FlingScroller::new(self.config.fling_physics);
        scroller.fling(velocity, now_ms);
        self.motion = Motion::Fling {
            scroller,
            applied: Vec2::ZERO,
        };
        self.set_phase(DragPhase::Flinging);
    }

    fn start_flee(&mut self, now_ms: u64) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let clockwise = session.flee_spin_clockwise();
        let trajectory = select_exit_trajectory(
            session.current_raw(),
            session.center(),
            self.viewport,
            session.bounds(),
            &mut self.rng,
        );
        match trajectory {
            Some(trajectory) => {
                session.set_target_orientation(trajectory.orientation);
                debug!(
                    orientation = ?trajectory.orientation,
                    clockwise,
                    "fleeing"
                );
                self.motion = Motion::Flee {
                    path: PointTween::new(
                        session.current_raw(),
                        trajectory.target,
                        Tween::new(now_ms, self.config.fling_duration_ms),
                    ),
                    clockwise,
                };
                self.set_phase(DragPhase::Fleeing);
            }
            None => {
                debug!("empty snapshot bounds; fading in place");
                self.set_phase(DragPhase::Fleeing);
                self.start_fade(now_ms);
            }
        }
    }

    fn start_fade(&mut self, now_ms: u64) {
        self.motion = Motion::Fade(FadeTween::new(Tween::new(
            now_ms,
            self.config.fade_duration_ms,
        )));
    }

    /// Emits the position update for a motion frame and handles leaving the
    /// viewport. Returns whether another frame is needed.
    fn after_motion_step(&mut self) -> bool {
        self.emit_drag_update();
        !self.leave_if_offscreen()
    }

    /// Ends the cycle without a fade if the drawn bounds left the viewport.
    fn leave_if_offscreen(&mut self) -> bool {
        let Some(bounds) = self.bounds() else {
            return false;
        };
        if !is_fully_offscreen(bounds, self.viewport) {
            return false;
        }
        self.abort_motion();
        self.set_phase(DragPhase::OutOfScreen);
        self.finish_cycle();
        true
    }

    /// Cancels whichever driver is running, synchronously.
    fn abort_motion(&mut self) {
        if let Motion::Fling { scroller, .. } = &mut self.motion {
            scroller.abort();
        }
        self.motion = Motion::None;
    }

    /// Detaches the snapshot and returns to idle. The element stays hidden
    /// until [`reset`](Self::reset).
    fn finish_cycle(&mut self) {
        self.motion = Motion::None;
        if self.session.take().is_some() {
            self.events.push(GhostDragEvent::RemovalRequested);
        }
        self.released = false;
        self.set_phase(DragPhase::Idle);
    }

    fn emit_drag_update(&mut self) {
        if let Some(session) = &self.session {
            trace!(
                x = session.current_raw().x,
                y = session.current_raw().y,
                degrees = session.rotation_degrees(),
                "drag update"
            );
            self.events.push(GhostDragEvent::DragUpdate {
                position: session.current_raw(),
                rotation_degrees: session.rotation_degrees(),
            });
        }
    }

    fn set_phase(&mut self, phase: DragPhase) {
        if self.phase == phase {
            return;
        }
        debug!(from = ?self.phase, to = ?phase, "phase changed");
        self.phase = phase;
        self.events.push(GhostDragEvent::StateChanged(phase));
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;
    use rand::rngs::mock::StepRng;

    use super::*;

    /// Unrotated top-left corner of the dragged element.
    const ELEMENT_ORIGIN: Vec2 = Vec2::new(450.0, 900.0);

    fn at(x: f64, y: f64, time_ms: u64) -> PointerSample {
        let raw = Point::new(x, y);
        PointerSample::new(raw - ELEMENT_ORIGIN, raw, time_ms)
    }

    fn machine_in(viewport: Size) -> GhostDragMachine<&'static str, StepRng> {
        GhostDragMachine::with_rng(viewport, StepRng::new(0, 0))
    }

    fn machine() -> GhostDragMachine<&'static str, StepRng> {
        machine_in(Size::new(1000.0, 2000.0))
    }

    fn ghost() -> Snapshot<&'static str> {
        Snapshot::new("ghost", Size::new(100.0, 200.0))
    }

    fn phases(events: &[GhostDragEvent]) -> Vec<DragPhase> {
        events
            .iter()
            .filter_map(|event| match event {
                GhostDragEvent::StateChanged(phase) => Some(*phase),
                _ => None,
            })
            .collect()
    }

    /// Ticks every 16 ms from `start` until the machine settles.
    fn run_to_rest<R: Rng>(machine: &mut GhostDragMachine<&'static str, R>, start: u64) -> u64 {
        let mut now = start;
        let mut frames = 0;
        while machine.tick(now) {
            now += 16;
            frames += 1;
            assert!(frames < 1000, "motion never settled");
        }
        now
    }

    /// Drags `steps` times by `step` every 10 ms, starting at the element centre.
    fn drag<R: Rng>(
        machine: &mut GhostDragMachine<&'static str, R>,
        step: Vec2,
        steps: u32,
    ) -> u64 {
        let start = Point::new(500.0, 1000.0);
        machine.on_pointer_down(at(start.x, start.y, 0));
        let mut time = 0;
        for i in 1..=steps {
            time = u64::from(i) * 10;
            let p = start + step * f64::from(i);
            machine.on_pointer_move(at(p.x, p.y, time));
        }
        time
    }

    #[test]
    fn slow_release_at_centre_flees_left() {
        let mut machine = machine();
        assert!(machine.provide_snapshot(ghost()));
        machine.on_pointer_down(at(500.0, 990.0, 0));
        machine.on_pointer_move(at(500.0, 1000.0, 16));
        assert_eq!(machine.phase(), DragPhase::Dragging);
        assert!(machine.is_element_hidden());

        machine.on_pointer_up(200);
        assert_eq!(machine.phase(), DragPhase::Fleeing);
        assert_eq!(machine.target_orientation(), Some(ExitOrientation::Left));

        run_to_rest(&mut machine, 216);
        let events: Vec<_> = machine.drain_events().collect();
        assert_eq!(
            phases(&events),
            [
                DragPhase::Dragging,
                DragPhase::Fleeing,
                DragPhase::OutOfScreen,
                DragPhase::Idle
            ]
        );
        assert_eq!(
            events
                .iter()
                .filter(|e| **e == GhostDragEvent::RemovalRequested)
                .count(),
            1
        );
        assert!(machine.session().is_none());

        // The element stays hidden until the host resets.
        assert!(machine.is_element_hidden());
        assert!(!machine.provide_snapshot(ghost()));
        assert!(machine.reset());
        assert!(!machine.is_element_hidden());
        assert_eq!(
            machine.drain_events().collect::<Vec<_>>(),
            [GhostDragEvent::ElementVisibilityChanged { visible: true }]
        );
        assert!(machine.provide_snapshot(ghost()));
    }

    #[test]
    fn fast_release_flings_off_screen() {
        let mut machine = machine();
        machine.provide_snapshot(ghost());
        let up = drag(&mut machine, Vec2::new(30.0, 0.0), 6);
        machine.on_pointer_up(up);
        assert_eq!(machine.phase(), DragPhase::Flinging);
        assert!(machine.is_motion_running());
        assert_eq!(machine.target_orientation(), None);

        let before = machine.session().map(DragSession::current_raw);
        machine.tick(up + 100);
        let after = machine.session().map(DragSession::current_raw);
        assert!(after.zip(before).is_some_and(|(a, b)| a.x > b.x));

        run_to_rest(&mut machine, up + 116);
        let events: Vec<_> = machine.drain_events().collect();
        assert_eq!(
            phases(&events),
            [
                DragPhase::Dragging,
                DragPhase::Flinging,
                DragPhase::OutOfScreen,
                DragPhase::Idle
            ]
        );
        assert!(!events.iter().any(|e| matches!(e, GhostDragEvent::FadeStep(_))));
    }

    #[test]
    fn fling_that_stays_on_screen_fades_out() {
        let mut machine = machine_in(Size::new(10_000.0, 10_000.0));
        machine.provide_snapshot(ghost());
        let up = drag(&mut machine, Vec2::new(15.0, 0.0), 6);
        machine.on_pointer_up(up);
        assert_eq!(machine.phase(), DragPhase::Flinging);

        run_to_rest(&mut machine, up + 16);
        let events: Vec<_> = machine.drain_events().collect();
        assert_eq!(
            phases(&events),
            [
                DragPhase::Dragging,
                DragPhase::Flinging,
                DragPhase::Gone,
                DragPhase::Idle
            ]
        );
        let fades: Vec<f64> = events
            .iter()
            .filter_map(|e| match e {
                GhostDragEvent::FadeStep(opacity) => Some(*opacity),
                _ => None,
            })
            .collect();
        assert!(fades.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(fades.last(), Some(&0.0));
        assert!(events.contains(&GhostDragEvent::RemovalRequested));
    }

    #[test]
    fn exit_edge_is_chosen_once_per_cycle() {
        let mut machine = machine();
        machine.provide_snapshot(ghost());
        let up = drag(&mut machine, Vec2::new(2.0, 3.0), 10);
        machine.on_pointer_up(up);
        assert_eq!(machine.phase(), DragPhase::Fleeing);
        assert_eq!(machine.target_orientation(), Some(ExitOrientation::Right));

        machine.tick(up + 16);
        machine.on_pointer_move(at(100.0, 100.0, up + 20));
        machine.on_pointer_up(up + 30);
        machine.tick(up + 32);
        assert_eq!(machine.phase(), DragPhase::Fleeing);
        assert_eq!(machine.target_orientation(), Some(ExitOrientation::Right));
    }

    #[test]
    fn moves_follow_the_pointer_only_while_dragging() {
        let mut machine = machine();
        machine.provide_snapshot(ghost());
        machine.on_pointer_down(at(500.0, 1000.0, 0));
        machine.on_pointer_move(at(520.0, 1000.0, 10));
        machine.on_pointer_move(at(530.0, 1010.0, 20));
        let events: Vec<_> = machine.drain_events().collect();
        assert_eq!(
            events.last(),
            Some(&GhostDragEvent::DragUpdate {
                position: Point::new(530.0, 1010.0),
                rotation_degrees: machine
                    .session()
                    .map_or(f64::NAN, DragSession::rotation_degrees),
            })
        );
        assert_eq!(
            machine.transform().map(|t| t.top_left),
            Some(Point::new(530.0, 1010.0) - Vec2::new(70.0, 100.0))
        );

        machine.on_pointer_up(200);
        machine.drain_events().for_each(drop);
        machine.on_pointer_move(at(0.0, 0.0, 210));
        assert!(
            !machine
                .drain_events()
                .any(|e| matches!(e, GhostDragEvent::DragUpdate { .. }))
        );
    }

    #[test]
    fn tap_without_drag_is_a_no_op() {
        let mut machine = machine();
        machine.provide_snapshot(ghost());
        machine.on_pointer_down(at(500.0, 1000.0, 0));
        machine.on_pointer_move(at(504.0, 1003.0, 10));
        machine.on_pointer_up(20);
        assert_eq!(machine.phase(), DragPhase::Idle);
        assert!(!machine.is_element_hidden());
        assert_eq!(machine.drain_events().count(), 0);
        assert!(!machine.tick(40));
    }

    #[test]
    fn drag_waits_for_a_snapshot() {
        let mut machine = machine();
        machine.on_pointer_down(at(500.0, 1000.0, 0));
        machine.on_pointer_move(at(530.0, 1000.0, 10));
        assert_eq!(machine.phase(), DragPhase::Idle);
        assert!(!machine.is_element_hidden());

        assert!(machine.provide_snapshot(ghost()));
        machine.on_pointer_move(at(540.0, 1000.0, 20));
        assert_eq!(machine.phase(), DragPhase::Dragging);
        assert!(!machine.provide_snapshot(ghost()));
    }

    #[test]
    fn empty_snapshot_fades_in_place() {
        let mut machine = machine();
        machine.provide_snapshot(Snapshot::new("empty", Size::ZERO));
        machine.on_pointer_down(at(500.0, 1000.0, 0));
        machine.on_pointer_move(at(500.0, 1020.0, 10));
        machine.on_pointer_up(300);
        assert_eq!(machine.phase(), DragPhase::Fleeing);
        assert_eq!(machine.target_orientation(), None);

        run_to_rest(&mut machine, 316);
        let events: Vec<_> = machine.drain_events().collect();
        assert_eq!(
            phases(&events),
            [
                DragPhase::Dragging,
                DragPhase::Fleeing,
                DragPhase::Gone,
                DragPhase::Idle
            ]
        );
    }

    #[test]
    fn reset_is_refused_while_in_motion() {
        let mut machine = machine();
        assert!(machine.reset());
        assert_eq!(machine.drain_events().count(), 0);

        machine.provide_snapshot(ghost());
        let up = drag(&mut machine, Vec2::new(30.0, 0.0), 6);
        assert!(!machine.reset());
        assert_eq!(machine.phase(), DragPhase::Dragging);

        machine.on_pointer_up(up);
        assert!(!machine.reset());
        assert_eq!(machine.phase(), DragPhase::Flinging);

        run_to_rest(&mut machine, up + 16);
        assert!(machine.reset());
        assert!(machine.reset());
        assert_eq!(machine.phase(), DragPhase::Idle);
    }

    #[test]
    fn cancel_behaves_like_release() {
        let mut machine = machine();
        machine.provide_snapshot(ghost());
        let up = drag(&mut machine, Vec2::new(30.0, 0.0), 6);
        machine.on_pointer_cancel(up);
        assert_eq!(machine.phase(), DragPhase::Flinging);
    }

    #[test]
    fn dispatch_forwards_queued_events() {
        let mut machine = machine();
        machine.provide_snapshot(ghost());
        drag(&mut machine, Vec2::new(10.0, 0.0), 1);
        let mut seen: Vec<GhostDragEvent> = Vec::new();
        machine.dispatch(&mut seen);
        assert_eq!(
            seen[..2],
            [
                GhostDragEvent::ElementVisibilityChanged { visible: false },
                GhostDragEvent::StateChanged(DragPhase::Dragging),
            ]
        );
        assert_eq!(machine.drain_events().count(), 0);
    }

    #[test]
    fn rejected_settings_keep_previous_values() {
        let mut machine = machine();
        assert_eq!(
            machine.set_scroll_utilization_ratio(1.5),
            Err(ConfigError::RatioOutOfRange(1.5))
        );
        assert!(machine.set_fade_duration_ms(0).is_err());
        assert!(machine.set_velocity_threshold(-1.0).is_err());
        assert_eq!(*machine.config(), GhostDragConfig::default());

        assert!(machine.set_touch_slop(4.0).is_ok());
        assert!(machine.set_fling_duration_ms(500).is_ok());
        assert_eq!(machine.config().touch_slop, 4.0);
        assert_eq!(machine.config().fling_duration_ms, 500);

        let invalid = GhostDragConfig {
            fade_duration_ms: 0,
            ..GhostDragConfig::default()
        };
        assert!(machine.set_config(invalid).is_err());
        assert!(
            GhostDragMachine::<(), _>::with_config(Size::new(1.0, 1.0), invalid, StepRng::new(0, 0))
                .is_err()
        );
    }

    #[test]
    fn higher_threshold_turns_a_fling_into_a_flee() {
        let mut machine = machine();
        machine.set_velocity_threshold(10_000.0).unwrap();
        machine.provide_snapshot(ghost());
        let up = drag(&mut machine, Vec2::new(30.0, 0.0), 6);
        machine.on_pointer_up(up);
        assert_eq!(machine.phase(), DragPhase::Fleeing);
        assert_eq!(machine.target_orientation(), Some(ExitOrientation::Right));
    }

    /// Rotations reported by the queued position updates, oldest first.
    fn drain_rotations<R: Rng>(machine: &mut GhostDragMachine<&'static str, R>) -> Vec<f64> {
        machine
            .drain_events()
            .filter_map(|event| match event {
                GhostDragEvent::DragUpdate {
                    rotation_degrees, ..
                } => Some(rotation_degrees),
                _ => None,
            })
            .collect()
    }

    /// Smallest angle between two rotations, in degrees.
    fn rotation_gap(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(360.0);
        d.min(360.0 - d)
    }

    /// Drags straight up from right of the centre, so the snapshot tilts.
    /// Returns the timestamp of the last move.
    fn tilting_drag<R: Rng>(
        machine: &mut GhostDragMachine<&'static str, R>,
        step_y: f64,
        steps: u32,
    ) -> u64 {
        let start = Point::new(540.0, 1000.0);
        machine.on_pointer_down(at(start.x, start.y, 0));
        let mut time = 0;
        for i in 1..=steps {
            time = u64::from(i) * 10;
            let p = start + Vec2::new(0.0, step_y * f64::from(i));
            machine.on_pointer_move(at(p.x, p.y, time));
        }
        time
    }

    /// Anchor travel between release and the last update of a fast throw.
    fn fling_travel(ratio: f64) -> Vec2 {
        let mut machine = machine_in(Size::new(10_000.0, 10_000.0));
        machine.set_scroll_utilization_ratio(ratio).unwrap();
        machine.provide_snapshot(ghost());
        let up = drag(&mut machine, Vec2::new(15.0, 0.0), 6);
        let released = machine.session().map(DragSession::current_raw).unwrap();
        machine.on_pointer_up(up);
        assert_eq!(machine.phase(), DragPhase::Flinging);

        run_to_rest(&mut machine, up + 16);
        let last = machine
            .drain_events()
            .filter_map(|event| match event {
                GhostDragEvent::DragUpdate { position, .. } => Some(position),
                _ => None,
            })
            .last()
            .unwrap();
        last - released
    }

    #[test]
    fn utilization_ratio_scales_fling_travel() {
        let full = fling_travel(1.0);
        assert!(full.x > 500.0, "full travel {full:?}");
        assert!(full.y.abs() < 1e-9);

        let half = fling_travel(0.5);
        assert!((half.x - full.x / 2.0).abs() < 1e-6, "{half:?} vs {full:?}");

        assert_eq!(fling_travel(0.0), Vec2::ZERO);
    }

    #[test]
    fn rotation_carries_over_into_fling() {
        let mut machine = machine();
        machine.provide_snapshot(ghost());
        let up = tilting_drag(&mut machine, -15.0, 6);
        let dragged = drain_rotations(&mut machine);
        let last_drag = dragged.last().copied().unwrap();
        assert!(rotation_gap(last_drag, 0.0) > 10.0, "drag barely tilted: {last_drag}");

        machine.on_pointer_up(up);
        assert_eq!(machine.phase(), DragPhase::Flinging);
        // First frame at the release time: the pivot moves to the drawn centre
        // but the snapshot has not travelled yet.
        assert!(machine.tick(up));
        let first = drain_rotations(&mut machine);
        assert_eq!(first.len(), 1);
        assert!(
            rotation_gap(first[0], last_drag) < 1e-6,
            "{last_drag} -> {}",
            first[0]
        );
    }

    #[test]
    fn rotation_carries_over_into_flee() {
        let mut machine = machine();
        machine.provide_snapshot(ghost());
        let up = tilting_drag(&mut machine, -3.0, 10);
        let last_drag = drain_rotations(&mut machine).last().copied().unwrap();
        assert!(rotation_gap(last_drag, 0.0) > 10.0, "drag barely tilted: {last_drag}");

        machine.on_pointer_up(up);
        assert_eq!(machine.phase(), DragPhase::Fleeing);
        assert!(machine.tick(up));
        let first = drain_rotations(&mut machine);
        assert!(rotation_gap(first[0], last_drag) < 1e-9);

        // Then it spins steadily, a fraction of a turn per frame.
        assert!(machine.tick(up + 16));
        let second = drain_rotations(&mut machine);
        let step = rotation_gap(second[0], first[0]);
        assert!(step > 0.0 && step < 45.0, "spin step {step}");
    }

    #[test]
    fn grabbing_the_centre_keeps_the_snapshot_level() {
        let mut machine = machine();
        machine.provide_snapshot(ghost());
        machine.on_pointer_down(at(500.0, 990.0, 0));
        // The drag starts with the anchor on the exact centre.
        machine.on_pointer_move(at(500.0, 1000.0, 16));
        machine.on_pointer_move(at(500.5, 999.5, 32));
        assert_eq!(drain_rotations(&mut machine), [0.0, 0.0]);

        machine.on_pointer_move(at(500.5, 1000.5, 48));
        let turned = drain_rotations(&mut machine);
        assert!(rotation_gap(turned[0], 90.0) < 1e-9, "{turned:?}");
    }
}
