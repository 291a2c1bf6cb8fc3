// Copyright 2025 the Card Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contracts between the stack and the host: data in, notifications out.

use kurbo::Rect;

use crate::types::{SlotId, VanishDirection};

/// Supplies the data sequence the stack pages through.
///
/// The stack never looks inside items. It asks for the count, compares item
/// identities to detect data-set resets, and asks the provider to write an
/// item's content into a render slot.
pub trait DataProvider {
    /// Identity of an item, compared with `==` to detect a replaced data set.
    ///
    /// Use a key or a cheap handle rather than the item itself.
    type ItemId: PartialEq;

    /// Number of items currently available.
    fn count(&self) -> usize;

    /// Identity of the item at `index`, or `None` past the end.
    fn item_at(&self, index: usize) -> Option<Self::ItemId>;

    /// Write the content of item `index` into `slot`.
    fn bind(&mut self, slot: SlotId, index: usize);

    /// Region (viewport coordinates) a drag must start in, if restricted.
    ///
    /// Queried lazily on the first capture attempt and cached until the data
    /// set changes.
    fn draggable_region(&self, slot: SlotId) -> Option<Rect> {
        let _ = slot;
        None
    }
}

/// Receives stack notifications.
pub trait CardListener {
    /// The card for `index` is now on top.
    fn on_show(&mut self, index: usize);

    /// The card for `index` started flying off toward `direction`.
    ///
    /// Fired when the flight starts, not when it lands.
    fn on_card_vanish(&mut self, index: usize, direction: VanishDirection);
}

/// A listener that ignores every notification.
///
/// Used by [`CardStack::new`](crate::panel::CardStack::new).
#[derive(Copy, Clone, Debug, Default)]
pub struct NoListener;

impl CardListener for NoListener {
    #[inline]
    fn on_show(&mut self, _index: usize) {}

    #[inline]
    fn on_card_vanish(&mut self, _index: usize, _direction: VanishDirection) {}
}
