// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the headless ghost-drag demos.

use kurbo::{Point, Vec2};
use tracing_subscriber::EnvFilter;
use understory_ghost_drag::pointer::PointerSample;
use understory_ghost_drag::{DragPhase, GhostDragObserver};

/// Installs a `fmt` subscriber honouring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Builds a pointer sample for an element whose unrotated top-left corner is `origin`.
pub fn sample(origin: Point, raw: Point, time_ms: u64) -> PointerSample {
    PointerSample::new(raw - origin.to_vec2(), raw, time_ms)
}

/// Raw positions of a straight drag from `start`, one every `interval_ms`.
pub fn straight_drag(
    start: Point,
    step: Vec2,
    steps: u32,
    interval_ms: u64,
) -> impl Iterator<Item = (Point, u64)> {
    (1..=steps).map(move |i| (start + step * f64::from(i), u64::from(i) * interval_ms))
}

/// Observer that prints what a host would do with each event.
#[derive(Debug, Default)]
pub struct Printer {
    /// Frames during which the snapshot moved.
    pub frames: u32,
    /// Whether the snapshot was detached.
    pub removed: bool,
    /// Print every position update instead of every tenth.
    pub verbose: bool,
}

impl GhostDragObserver for Printer {
    fn on_state_changed(&mut self, phase: DragPhase) {
        println!("phase        -> {phase:?}");
    }

    fn on_drag_update(&mut self, position: Point, rotation_degrees: f64) {
        if self.verbose || self.frames % 10 == 0 {
            println!(
                "update       @ ({:7.1}, {:7.1}) rotated {rotation_degrees:6.1} deg",
                position.x, position.y
            );
        }
        self.frames += 1;
    }

    fn on_removal_requested(&mut self) {
        println!("removal      requested");
        self.removed = true;
    }

    fn on_fade_step(&mut self, opacity: f64) {
        println!("fade         opacity {opacity:.2}");
    }

    fn on_element_visibility_changed(&mut self, visible: bool) {
        println!("element      {}", if visible { "shown" } else { "hidden" });
    }
}
