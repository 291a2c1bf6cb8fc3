// Copyright 2025 the Card Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Swipe basics.
//!
//! This example lays out a stack over a short list of names, drags the top
//! card a little and lets it snap back, then flings it to the right and
//! prints the stack before and after the vanished slot is recycled.
//!
//! Run:
//! - `cargo run -p card_stack_demos --example swipe_basics`
//! - `RUST_LOG=card_stack=trace cargo run -p card_stack_demos --example swipe_basics`

use std::time::Duration;

use card_stack::config::StackConfig;
use card_stack::panel::CardStack;
use card_stack::provider::{CardListener, DataProvider};
use card_stack::types::{PointerEvent, PointerId, SlotId, VanishDirection};
use kurbo::{Point, Size, Vec2};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const FRAME: Duration = Duration::from_millis(16);

struct Names {
    names: Vec<&'static str>,
    // What each slot currently shows, indexed by slot.
    surfaces: [&'static str; 4],
}

impl DataProvider for Names {
    type ItemId = &'static str;

    fn count(&self) -> usize {
        self.names.len()
    }

    fn item_at(&self, index: usize) -> Option<Self::ItemId> {
        self.names.get(index).copied()
    }

    fn bind(&mut self, slot: SlotId, index: usize) {
        self.surfaces[slot.index()] = self.names[index];
    }
}

#[derive(Default)]
struct Printer;

impl CardListener for Printer {
    fn on_show(&mut self, index: usize) {
        println!("  -> on_show({index})");
    }

    fn on_card_vanish(&mut self, index: usize, direction: VanishDirection) {
        println!("  -> on_card_vanish({index}, {direction:?})");
    }
}

fn dump(stack: &CardStack<Names, Printer>) {
    let surfaces = stack.provider().map(|p| p.surfaces).unwrap_or_default();
    for (rank, slot) in stack.slots_top_down().enumerate() {
        let t = slot.transform();
        println!(
            "  rank {rank}: slot {} {:>8} visible={:<5} at ({:7.1}, {:6.1}) scale {:.3} opacity {:.2}",
            slot.id().index(),
            if slot.is_visible() {
                surfaces[slot.id().index()]
            } else {
                "-"
            },
            slot.is_visible(),
            t.position.x,
            t.position.y,
            t.scale,
            t.opacity,
        );
    }
}

fn drag(
    stack: &mut CardStack<Names, Printer>,
    from: Point,
    by: Vec2,
    steps: u32,
    step_time: Duration,
) {
    let pointer = PointerId(1);
    let mut t = Duration::ZERO;
    let mut at = from;
    let mut owned = stack.intercept(&PointerEvent::down(pointer, at, t));
    for _ in 0..steps {
        at += by / f64::from(steps);
        t += step_time;
        let ev = PointerEvent::moved(pointer, at, t);
        if owned || stack.intercept(&ev) {
            owned = true;
            stack.handle(&ev);
        }
    }
    let up = PointerEvent::up(pointer, at, t);
    if owned {
        stack.handle(&up);
    } else {
        stack.intercept(&up);
    }
}

fn settle(stack: &mut CardStack<Names, Printer>) -> u32 {
    let mut frames = 0;
    while stack.on_frame(FRAME) {
        frames += 1;
    }
    frames
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut stack: CardStack<Names, Printer> = CardStack::new(StackConfig::default());
    stack.set_provider(Names {
        names: vec!["ada", "grace", "edsger", "barbara", "alan", "margaret"],
        surfaces: [""; 4],
    });
    stack.layout(Size::new(600.0, 900.0), Size::new(400.0, 500.0));
    stack.reveal();
    settle(&mut stack);

    let geometry = *stack.geometry().expect("layout has area");
    println!("controls go at y = {}", geometry.controls_top());
    println!("== Initial ==");
    dump(&stack);

    let center =
        geometry.anchor + Vec2::new(geometry.child.width / 2.0, geometry.child.height / 2.0);

    println!("== Small drag, slow release ==");
    drag(&mut stack, center, Vec2::new(120.0, 20.0), 10, Duration::from_millis(40));
    dump(&stack);
    let frames = settle(&mut stack);
    println!("  settled in {frames} frames");
    dump(&stack);

    println!("== Fling right ==");
    drag(&mut stack, center, Vec2::new(160.0, 10.0), 4, FRAME);
    dump(&stack);
    let frames = settle(&mut stack);
    println!("  settled in {frames} frames, show index {}", stack.show_index());
    dump(&stack);
}
