// Copyright 2025 the Card Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::time::Duration;

use card_stack::config::{Geometry, StackConfig};
use card_stack::panel::CardStack;
use card_stack::physics::classify_release;
use card_stack::provider::DataProvider;
use card_stack::types::{PointerEvent, PointerId, SlotId, VanishDirection};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size, Vec2};

const VIEWPORT: Size = Size::new(600.0, 900.0);
const CARD: Size = Size::new(400.0, 500.0);
const FRAME: Duration = Duration::from_millis(16);

struct Range(usize);

impl DataProvider for Range {
    type ItemId = usize;

    fn count(&self) -> usize {
        self.0
    }

    fn item_at(&self, index: usize) -> Option<usize> {
        (index < self.0).then_some(index)
    }

    fn bind(&mut self, slot: SlotId, index: usize) {
        black_box((slot, index));
    }
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
    fn signed(&mut self, max: f64) -> f64 {
        (self.next_f64() * 2.0 - 1.0) * max
    }
}

fn stack(items: usize) -> CardStack<Range> {
    let mut stack = CardStack::new(StackConfig::default());
    stack.set_provider(Range(items));
    stack.layout(VIEWPORT, CARD);
    stack
}

fn gen_releases(count: usize, seed: u64) -> Vec<(Point, Vec2)> {
    let mut rng = Rng::new(seed);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let position = Point::new(100.0 + rng.signed(500.0), 10.0 + rng.signed(400.0));
        let velocity = Vec2::new(rng.signed(3000.0), rng.signed(3000.0));
        out.push((position, velocity));
    }
    out
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    let geometry = Geometry::measure(&StackConfig::default(), VIEWPORT, CARD)
        .expect("viewport has area");
    let releases = gen_releases(4096, 0x9E37_79B9_7F4A_7C15);
    group.throughput(Throughput::Elements(releases.len() as u64));
    group.bench_function("random_releases", |b| {
        b.iter(|| {
            for &(position, velocity) in &releases {
                black_box(classify_release(&geometry, position, velocity));
            }
        });
    });
    group.finish();
}

fn bench_paging(c: &mut Criterion) {
    let mut group = c.benchmark_group("paging");
    for &n in &[16usize, 256, 1024] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("vanish_settle_n{}", n), |b| {
            b.iter_batched(
                || stack(n),
                |mut stack| {
                    let mut direction = VanishDirection::Right;
                    while stack.vanish(direction) {
                        while stack.on_frame(FRAME) {}
                        direction = match direction {
                            VanishDirection::Left => VanishDirection::Right,
                            VanishDirection::Right => VanishDirection::Left,
                        };
                    }
                    black_box(stack.show_index());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag");
    for &moves in &[32usize, 512] {
        group.throughput(Throughput::Elements(moves as u64));
        group.bench_function(format!("pointer_stream_m{}", moves), |b| {
            b.iter_batched(
                || stack(64),
                |mut stack| {
                    let pointer = PointerId(0);
                    let mut at = Point::new(300.0, 260.0);
                    let mut t = Duration::ZERO;
                    stack.intercept(&PointerEvent::down(pointer, at, t));
                    let mut owned = false;
                    for i in 0..moves {
                        at.x += if i % 2 == 0 { 3.0 } else { -2.0 };
                        at.y += 0.5;
                        t += Duration::from_millis(4);
                        let ev = PointerEvent::moved(pointer, at, t);
                        if owned || stack.intercept(&ev) {
                            owned = true;
                            stack.handle(&ev);
                        }
                    }
                    stack.handle(&PointerEvent::up(pointer, at, t));
                    while stack.on_frame(FRAME) {}
                    black_box(stack.show_index());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_classify, bench_paging, bench_drag);
criterion_main!(benches);
