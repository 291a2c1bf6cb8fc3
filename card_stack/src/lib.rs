// Copyright 2025 the Card Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=card_stack --heading-base-level=0

//! Card Stack: a headless, `no_std` core for swipeable card stacks.
//!
//! ## Overview
//!
//! This crate manages a stack of overlapping cards where the top card can be
//! dragged and flung off either side, revealing the next one.
//! It does not draw anything and performs no layout measurement.
//! Instead, feed it layout sizes, pointer events and frame ticks, and read
//! back a [`CardTransform`](crate::types::CardTransform) for each of its four
//! render slots.
//!
//! ## Slots
//!
//! The stack keeps exactly [`SLOT_COUNT`](crate::types::SLOT_COUNT) slots alive
//! and pages them through a [`DataProvider`](crate::provider::DataProvider)'s
//! items. When a card has flown off, its slot moves to the bottom and is
//! re-bound to the next unseen item.
//! Slots are named by a stable [`SlotId`](crate::types::SlotId), so hosts can
//! map each one to a persistent render surface.
//!
//! ## Dragging
//!
//! Only the top card can be captured. On release it is classified by
//! velocity, then by displacement, into vanish-left, vanish-right or
//! return-to-center (see [`physics`](crate::physics)), and settles toward its
//! target over subsequent [`on_frame`](crate::panel::CardStack::on_frame) calls.
//! While it moves, the cards beneath it grow and rise toward the top (see
//! [`linkage`](crate::linkage)).
//!
//! ## Layering
//!
//! [`CardStack`](crate::panel::CardStack) is the facade. Its
//! [`intercept`](crate::panel::CardStack::intercept) and
//! [`handle`](crate::panel::CardStack::handle) entry points route a host's
//! pointer stream through the [`gesture`](crate::gesture) router; hosts with
//! their own gesture recognition can call
//! [`try_capture`](crate::panel::CardStack::try_capture),
//! [`on_position_changed`](crate::panel::CardStack::on_position_changed) and
//! [`release_with_velocity`](crate::panel::CardStack::release_with_velocity)
//! directly.
//!
//! ## Host loop sketch
//!
//! ```
//! use core::time::Duration;
//!
//! use card_stack::config::StackConfig;
//! use card_stack::panel::CardStack;
//! use card_stack::provider::DataProvider;
//! use card_stack::types::{PointerEvent, PointerId, SlotId};
//! use kurbo::{Point, Size};
//!
//! struct Names(Vec<&'static str>);
//!
//! impl DataProvider for Names {
//!     type ItemId = &'static str;
//!
//!     fn count(&self) -> usize {
//!         self.0.len()
//!     }
//!
//!     fn item_at(&self, index: usize) -> Option<Self::ItemId> {
//!         self.0.get(index).copied()
//!     }
//!
//!     fn bind(&mut self, _slot: SlotId, _index: usize) {
//!         // Write the item's content into the slot's surface.
//!     }
//! }
//!
//! let mut stack: CardStack<Names> = CardStack::new(StackConfig::default());
//! stack.set_provider(Names(vec!["ada", "grace", "edsger", "barbara", "alan"]));
//! stack.layout(Size::new(600.0, 900.0), Size::new(400.0, 500.0));
//! stack.reveal();
//!
//! // Fling the top card to the right.
//! let p = PointerId(0);
//! let mut pos = Point::new(300.0, 260.0);
//! let mut t = Duration::ZERO;
//! stack.handle(&PointerEvent::down(p, pos, t));
//! for _ in 0..4 {
//!     pos.x += 40.0;
//!     t += Duration::from_millis(16);
//!     stack.handle(&PointerEvent::moved(p, pos, t));
//! }
//! stack.handle(&PointerEvent::up(p, pos, t));
//!
//! // Drive frames until everything has settled.
//! while stack.on_frame(Duration::from_millis(16)) {}
//! assert_eq!(stack.show_index(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod config;
pub mod drag;
pub mod error;
pub mod gesture;
pub mod linkage;
pub mod panel;
pub mod physics;
pub mod provider;
pub mod stack;
pub mod types;
