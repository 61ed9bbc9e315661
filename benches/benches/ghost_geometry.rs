// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Size, Vec2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use understory_ghost_drag::geometry::{
    clockwise_angle, is_fully_offscreen, rotated_bounds, select_exit_trajectory,
};
use understory_ghost_drag::pointer::PointerSample;
use understory_ghost_drag::{GhostDragMachine, Snapshot};

const VIEWPORT: Size = Size::new(1080.0, 1920.0);
const CARD: Size = Size::new(300.0, 200.0);
const ORIGIN: Point = Point::new(390.0, 860.0);

/// Points on a circle around `center`, covering all four quadrants.
fn ring(center: Point, radius: f64, count: u32) -> Vec<Point> {
    (0..count)
        .map(|i| {
            let theta = f64::from(i) / f64::from(count) * core::f64::consts::TAU;
            center + Vec2::from_angle(theta) * radius
        })
        .collect()
}

fn bench_angle(c: &mut Criterion) {
    let mut group = c.benchmark_group("clockwise_angle");
    let center = Point::new(540.0, 960.0);
    let points = ring(center, 150.0, 256);

    group.bench_function("ring_256", |b| {
        b.iter(|| {
            let sum: f64 = points
                .iter()
                .filter_map(|p| clockwise_angle(black_box(center), *p))
                .sum();
            black_box(sum);
        });
    });
    group.finish();
}

fn bench_bounds(c: &mut Criterion) {
    let mut group = c.benchmark_group("rotated_bounds");
    let pivot = ORIGIN + Vec2::new(40.0, 60.0);

    group.bench_function("sweep_360", |b| {
        b.iter(|| {
            let mut offscreen = 0_u32;
            for degrees in 0..360_u32 {
                let rect = rotated_bounds(CARD, ORIGIN, f64::from(degrees), black_box(pivot));
                if is_fully_offscreen(rect, VIEWPORT) {
                    offscreen += 1;
                }
            }
            black_box(offscreen);
        });
    });
    group.finish();
}

fn bench_trajectory(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_exit_trajectory");
    let center = Point::new(540.0, 960.0);
    let bounds = Rect::from_origin_size(ORIGIN, CARD);
    let anchors = ring(center, 120.0, 64);

    group.bench_function("ring_64", |b| {
        b.iter_batched(
            || StdRng::seed_from_u64(0x6057_0000_0000_0001),
            |mut rng| {
                for anchor in &anchors {
                    let trajectory =
                        select_exit_trajectory(*anchor, center, VIEWPORT, bounds, &mut rng);
                    black_box(trajectory);
                }
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_fling_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("ghost_drag");
    group.sample_size(50);

    group.bench_function("fling_cycle", |b| {
        b.iter_batched(
            || {
                let rng = StdRng::seed_from_u64(0x6057_0000_0000_0002);
                let mut machine = GhostDragMachine::with_rng(VIEWPORT, rng);
                machine.provide_snapshot(Snapshot::new((), CARD));
                machine
            },
            |mut machine| {
                let start = Point::new(450.0, 930.0);
                let sample =
                    |raw: Point, time_ms| PointerSample::new(raw - ORIGIN.to_vec2(), raw, time_ms);
                machine.on_pointer_down(sample(start, 0));
                for i in 1..=6_u32 {
                    let raw = start + Vec2::new(40.0, 5.0) * f64::from(i);
                    machine.on_pointer_move(sample(raw, u64::from(i) * 10));
                }
                machine.on_pointer_up(60);
                let mut now = 60;
                while machine.tick(now) {
                    now += 16;
                }
                black_box(machine.drain_events().count());
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_angle,
    bench_bounds,
    bench_trajectory,
    bench_fling_cycle
);
criterion_main!(benches);
