// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fast drag and release: the snapshot coasts with decaying inertia.
//!
//! The viewport is large enough that the card comes to rest on screen and
//! fades out. The host then resets the machine and throws the card again.
//!
//! Run:
//! - `cargo run -p understory_demos --example ghost_fling`

use kurbo::{Point, Size, Vec2};
use understory_demos::{Printer, init_tracing, sample, straight_drag};
use understory_fling::FlingPhysics;
use understory_ghost_drag::{GhostDragConfig, GhostDragMachine, Snapshot};

fn throw(machine: &mut GhostDragMachine<&'static str>, printer: &mut Printer, step: Vec2) {
    let origin = Point::new(2000.0, 2000.0);
    let start = Point::new(2100.0, 2050.0);

    if !machine.provide_snapshot(Snapshot::new("card", Size::new(200.0, 100.0))) {
        println!("snapshot refused in {:?}", machine.phase());
        return;
    }
    machine.on_pointer_down(sample(origin, start, 0));
    let mut now = 0;
    for (raw, time_ms) in straight_drag(start, step, 6, 10) {
        machine.on_pointer_move(sample(origin, raw, time_ms));
        now = time_ms;
    }
    machine.on_pointer_up(now);
    machine.dispatch(printer);

    while machine.tick(now) {
        machine.dispatch(printer);
        now += 16;
    }
    machine.dispatch(printer);
    println!("settled in {:?} after {now} ms", machine.phase());
}

fn main() {
    init_tracing();

    let config = GhostDragConfig {
        scroll_utilization_ratio: 0.6,
        fling_physics: FlingPhysics {
            decay_per_ms: 0.997,
            ..FlingPhysics::default()
        },
        ..GhostDragConfig::default()
    };
    let mut machine = GhostDragMachine::new(Size::new(5000.0, 5000.0));
    if let Err(err) = machine.set_config(config) {
        eprintln!("invalid configuration: {err}");
        return;
    }
    let mut printer = Printer::default();
    tracing::info!(viewport = ?machine.viewport(), "fling demo");

    throw(&mut machine, &mut printer, Vec2::new(25.0, 10.0));

    // Still hidden: the next throw is refused until the host resets.
    throw(&mut machine, &mut printer, Vec2::new(-25.0, 0.0));
    if machine.reset() {
        machine.dispatch(&mut printer);
    }
    println!("reset; phase is {:?}", machine.phase());

    throw(&mut machine, &mut printer, Vec2::new(-25.0, 0.0));
    println!("{} frames total; removed: {}", printer.frames, printer.removed);
}
