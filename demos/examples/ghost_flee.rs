// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slow drag and release: the snapshot spins towards the nearest edge.
//!
//! Run:
//! - `cargo run -p understory_demos --example ghost_flee`
//! - `RUST_LOG=understory_ghost_drag=trace cargo run -p understory_demos --example ghost_flee`

use kurbo::{Point, Size, Vec2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use understory_demos::{Printer, init_tracing, sample, straight_drag};
use understory_ghost_drag::{GhostDragMachine, Snapshot};

fn main() {
    init_tracing();

    let viewport = Size::new(1080.0, 1920.0);
    let origin = Point::new(390.0, 860.0);
    let mut machine = GhostDragMachine::with_rng(viewport, StdRng::seed_from_u64(7));
    tracing::info!(?viewport, "flee demo");
    let mut printer = Printer {
        verbose: true,
        ..Printer::default()
    };

    machine.provide_snapshot(Snapshot::new("card", Size::new(300.0, 200.0)));

    // Grab the card left of centre and ease it up and to the left.
    let start = Point::new(450.0, 930.0);
    machine.on_pointer_down(sample(origin, start, 0));
    let mut now = 0;
    for (raw, time_ms) in straight_drag(start, Vec2::new(-4.0, -3.0), 12, 16) {
        machine.on_pointer_move(sample(origin, raw, time_ms));
        now = time_ms;
    }
    machine.dispatch(&mut printer);

    now += 16;
    machine.on_pointer_up(now);
    println!("exit edge    {:?}", machine.target_orientation());
    machine.dispatch(&mut printer);

    printer.verbose = false;
    while machine.tick(now) {
        machine.dispatch(&mut printer);
        now += 16;
    }
    machine.dispatch(&mut printer);

    println!(
        "done after {} frames; removed: {}; element hidden until reset: {}",
        printer.frames,
        printer.removed,
        machine.is_element_hidden()
    );
}
