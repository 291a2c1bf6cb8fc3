// Copyright 2025 the Card Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Programmatic vanish and data-set changes.
//!
//! This example pages through a feed with button-style vanishes, runs out of
//! cards, appends more, and finally swaps in a new feed, printing the
//! notifications the stack emits along the way.
//!
//! Run:
//! - `cargo run -p card_stack_demos --example data_changes`
//! - `RUST_LOG=card_stack=debug cargo run -p card_stack_demos --example data_changes`

use std::time::Duration;

use card_stack::config::StackConfig;
use card_stack::panel::CardStack;
use card_stack::provider::{CardListener, DataProvider};
use card_stack::types::{SlotId, VanishDirection};
use kurbo::Size;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PostId(u32);

struct Feed {
    posts: Vec<PostId>,
}

impl DataProvider for Feed {
    type ItemId = PostId;

    fn count(&self) -> usize {
        self.posts.len()
    }

    fn item_at(&self, index: usize) -> Option<PostId> {
        self.posts.get(index).copied()
    }

    fn bind(&mut self, slot: SlotId, index: usize) {
        println!("  bind slot {} <- post {}", slot.index(), self.posts[index].0);
    }
}

#[derive(Default)]
struct Printer;

impl CardListener for Printer {
    fn on_show(&mut self, index: usize) {
        println!("  on_show({index})");
    }

    fn on_card_vanish(&mut self, index: usize, direction: VanishDirection) {
        println!("  on_card_vanish({index}, {direction:?})");
    }
}

fn run(stack: &mut CardStack<Feed, Printer>) {
    while stack.on_frame(Duration::from_millis(16)) {}
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut stack: CardStack<Feed, Printer> = CardStack::new(StackConfig::default());
    println!("== Initialize with three posts ==");
    stack.set_provider(Feed {
        posts: (1..=3).map(PostId).collect(),
    });
    stack.layout(Size::new(480.0, 720.0), Size::new(320.0, 420.0));
    stack.reveal();
    run(&mut stack);

    println!("== Vanish until empty ==");
    let mut direction = VanishDirection::Left;
    while stack.vanish(direction) {
        println!("  locked = {}", stack.is_button_locked());
        run(&mut stack);
        direction = match direction {
            VanishDirection::Left => VanishDirection::Right,
            VanishDirection::Right => VanishDirection::Left,
        };
    }
    println!("  show index {}, nothing left to vanish", stack.show_index());

    println!("== Append two posts ==");
    if let Some(feed) = stack.provider_mut() {
        feed.posts.extend([PostId(4), PostId(5)]);
    }
    stack.notify_data_changed();
    run(&mut stack);
    println!("  show index {}", stack.show_index());

    println!("== Replace the feed ==");
    if let Some(feed) = stack.provider_mut() {
        feed.posts = (100..106).map(PostId).collect();
    }
    stack.notify_data_changed();
    for slot in stack.slots_top_down() {
        println!(
            "  slot {} bound {:?} revealing {}",
            slot.id().index(),
            slot.bound_index(),
            slot.is_revealing()
        );
    }
    run(&mut stack);
    println!("  show index {}", stack.show_index());
}
