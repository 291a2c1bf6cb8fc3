// Copyright 2025 the Card Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The stack controller: [`CardStack`].
//!
//! ## Overview
//!
//! `CardStack` owns the slots, the drag engine, the gesture router, the data
//! provider and the listener, and is the only place that re-ranks or re-binds
//! slots.
//!
//! ## Lifecycle
//!
//! - Set a provider with [`CardStack::set_provider`] and report sizes with
//!   [`CardStack::layout`]. The stack initializes once both are known.
//! - Call [`CardStack::reveal`] to fade the top card in.
//! - Feed pointer events through [`CardStack::intercept`] and
//!   [`CardStack::handle`], or drive captures and releases directly.
//! - Call [`CardStack::on_frame`] every frame while it returns `true`.
//! - Call [`CardStack::notify_data_changed`] after mutating the provider's data.
//!
//! ## Recycling
//!
//! When a vanished card lands off-screen its slot is parked at the deepest
//! rank and re-bound to the item four places ahead of the one on top, so the
//! four slots page through any number of items.

use core::fmt;
use core::time::Duration;

use kurbo::{Point, Rect, Size, Vec2};
use tracing::{debug, trace};

use crate::config::{Geometry, StackConfig};
use crate::drag::{DragEngine, SettleStep};
use crate::error::DragError;
use crate::gesture::{GestureRouter, PointerSink};
use crate::linkage;
use crate::physics::{self, Release};
use crate::provider::{CardListener, DataProvider, NoListener};
use crate::stack::{Slot, SlotStack};
use crate::types::{
    DragPhase, PointerEvent, PointerKind, SLOT_COUNT, SlotFlags, SlotId, VanishDirection,
};

/// A swipeable stack of cards over a [`DataProvider`].
///
/// ## Usage
///
/// - Construct with [`CardStack::new`] when no notifications are needed, or
///   [`CardStack::with_listener`] to receive [`CardListener`] callbacks.
/// - Read slot transforms back with [`CardStack::slots_top_down`] and draw
///   them bottom-up.
///
/// All operations that need a provider or geometry are no-ops until both
/// have been supplied.
pub struct CardStack<P: DataProvider, L: CardListener = NoListener> {
    config: StackConfig,
    geometry: Option<Geometry>,
    provider: Option<P>,
    listener: L,
    slots: SlotStack,
    drag: DragEngine,
    router: GestureRouter,
    show_index: usize,
    first_item: Option<P::ItemId>,
    // Outer `None` until the provider has been asked.
    draggable_region: Option<Option<Rect>>,
    initialized: bool,
    // The item at `show_index` has already flown off.
    exhausted: bool,
}

impl<P: DataProvider, L: CardListener> fmt::Debug for CardStack<P, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardStack")
            .field("config", &self.config)
            .field("geometry", &self.geometry)
            .field("slots", &self.slots)
            .field("show_index", &self.show_index)
            .field("drag_phase", &self.drag.phase())
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}

impl<P: DataProvider, L: CardListener + Default> CardStack<P, L> {
    /// Create an empty stack with a default listener.
    pub fn new(config: StackConfig) -> Self {
        Self::with_listener(config, L::default())
    }
}

impl<P: DataProvider, L: CardListener> CardStack<P, L> {
    /// Create an empty stack reporting to `listener`.
    pub fn with_listener(config: StackConfig, listener: L) -> Self {
        Self {
            router: GestureRouter::new(config.touch_slop),
            config,
            geometry: None,
            provider: None,
            listener,
            slots: SlotStack::new(),
            drag: DragEngine::default(),
            show_index: 0,
            first_item: None,
            draggable_region: None,
            initialized: false,
            exhausted: false,
        }
    }

    /// Static configuration.
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// Geometry from the last successful [`layout`](Self::layout).
    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    /// The data provider, if set.
    pub fn provider(&self) -> Option<&P> {
        self.provider.as_ref()
    }

    /// Mutable access to the data provider.
    ///
    /// Call [`notify_data_changed`](Self::notify_data_changed) after changing
    /// its data.
    pub fn provider_mut(&mut self) -> Option<&mut P> {
        self.provider.as_mut()
    }

    /// The listener.
    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Mutable access to the listener.
    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Whether slots have been bound to the provider.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Data index considered on top.
    pub fn show_index(&self) -> usize {
        self.show_index
    }

    /// Slot storage and rank order.
    pub fn slots(&self) -> &SlotStack {
        &self.slots
    }

    /// Slot by id.
    pub fn slot(&self, id: SlotId) -> &Slot {
        self.slots.slot(id)
    }

    /// Slot at `rank`. Panics if `rank >= SLOT_COUNT`.
    pub fn slot_at_rank(&self, rank: usize) -> &Slot {
        self.slots.slot(self.slots.at_rank(rank))
    }

    /// Rank of `id`.
    pub fn rank_of(&self, id: SlotId) -> usize {
        self.slots.rank_of(id)
    }

    /// Slots from top to bottom. Draw them in reverse.
    pub fn slots_top_down(&self) -> impl Iterator<Item = &Slot> + '_ {
        self.slots.iter_top_down()
    }

    /// Coarse drag engine state.
    pub fn drag_phase(&self) -> DragPhase {
        self.drag.phase()
    }

    /// Number of slots flying off-screen and waiting to be recycled.
    pub fn released_len(&self) -> usize {
        self.drag.released_len()
    }

    /// Whether a programmatic vanish is in flight.
    pub fn is_button_locked(&self) -> bool {
        self.drag.is_button_locked()
    }

    /// Topmost visible slot under `pt`.
    pub fn hit_test(&self, pt: Point) -> Option<SlotId> {
        self.geometry.and_then(|g| self.slots.hit_test(pt, &g))
    }

    fn item_count(&self) -> usize {
        self.provider.as_ref().map_or(0, P::count)
    }

    fn bind_slot(&mut self, id: SlotId, index: usize) {
        if let Some(provider) = self.provider.as_mut() {
            provider.bind(id, index);
            self.slots.bind(id, index);
        }
    }

    /// Set the data provider, returning the previous one.
    ///
    /// Slots are re-bound from item 0 as soon as geometry is known.
    pub fn set_provider(&mut self, provider: P) -> Option<P> {
        let previous = self.provider.replace(provider);
        self.initialized = false;
        self.initialize();
        previous
    }

    /// Report the viewport and card sizes.
    ///
    /// A viewport without area is ignored. Slots at rest are moved to their
    /// quiescent layout; a card being dragged or settled keeps its position.
    pub fn layout(&mut self, viewport: Size, child: Size) {
        let Some(geometry) = Geometry::measure(&self.config, viewport, child) else {
            trace!(?viewport, "ignoring layout without area");
            return;
        };
        self.geometry = Some(geometry);
        if !self.initialized {
            self.initialize();
            return;
        }
        let in_flight = self.drag.in_flight();
        self.slots
            .apply_rest_layout(&geometry, &self.config, in_flight);
        if let Some(id) = in_flight {
            linkage::apply(&mut self.slots, &geometry, &self.config, id);
        }
    }

    fn initialize(&mut self) {
        let (Some(geometry), Some(provider)) = (self.geometry, self.provider.as_mut()) else {
            return;
        };
        let count = provider.count();
        self.slots = SlotStack::new();
        self.drag.reset();
        self.show_index = 0;
        self.exhausted = false;
        self.draggable_region = None;

        for rank in 0..SLOT_COUNT.min(count) {
            let id = self.slots.at_rank(rank);
            provider.bind(id, rank);
            self.slots.bind(id, rank);
        }
        let top = self.slots.top();
        self.slots.slot_mut(top).transform.opacity = 0.0;
        self.first_item = provider.item_at(0);
        self.slots.apply_rest_layout(&geometry, &self.config, None);
        self.initialized = true;
        debug!(count, "stack initialized");
    }

    /// Start the fade-in of the top card.
    pub fn reveal(&mut self) {
        let top = self.slots.top();
        if self.initialized && self.slots.slot(top).is_visible() {
            self.slots
                .start_reveal(top, Duration::ZERO, self.config.reveal_duration);
        }
    }

    /// Recycle the oldest vanished slot once its flight is over.
    ///
    /// Returns whether the stack changed. Calling it again without a new
    /// vanish does nothing.
    pub fn reorder_after_settle(&mut self) -> bool {
        if self.drag.phase() != DragPhase::Idle {
            return false;
        }
        let Some(geometry) = self.geometry else {
            return false;
        };
        let Some(id) = self.drag.pop_released() else {
            return false;
        };
        if self.slots.slot(id).position().x == geometry.anchor.x {
            // Never left the anchor.
            self.slots.slot_mut(id).flags.insert(SlotFlags::PICKABLE);
            return false;
        }

        self.slots.park_at_back(id, &geometry, &self.config);
        let count = self.item_count();
        let next = self.show_index + SLOT_COUNT;
        if next < count {
            self.bind_slot(id, next);
        } else {
            self.slots.set_visible(id, false);
        }
        if self.show_index + 1 < count {
            self.show_index += 1;
        } else {
            self.exhausted = true;
        }
        self.slots.apply_rest_layout(&geometry, &self.config, None);
        debug!(
            slot = id.index(),
            show_index = self.show_index,
            "recycled vanished card"
        );
        if count > 0 {
            self.listener.on_show(self.show_index);
        }
        true
    }

    /// Re-synchronize after the provider's data changed.
    ///
    /// A different first item resets the stack to index 0 and re-reveals every
    /// slot with a staggered delay. Otherwise only slots that were hidden are
    /// filled.
    pub fn notify_data_changed(&mut self) {
        if !self.initialized {
            self.initialize();
            return;
        }
        self.abort_settle();
        self.draggable_region = None;

        let count = self.item_count();
        let mut reset = false;
        if count > 0 {
            let first = self.provider.as_ref().and_then(|p| p.item_at(0));
            if self.first_item.is_none() {
                self.show_index = 0;
                self.exhausted = false;
                self.first_item = first;
            } else if first != self.first_item {
                self.show_index = 0;
                self.exhausted = false;
                self.first_item = first;
                reset = true;
            }
        }
        if !reset && count > 0 && self.show_index >= count {
            // Everything up to the new end has been seen.
            self.show_index = count - 1;
            self.exhausted = true;
        }
        if self.exhausted && self.show_index + 1 < count {
            self.show_index += 1;
            self.exhausted = false;
        }

        let mut announce = false;
        let mut delay = Duration::ZERO;
        for rank in 0..SLOT_COUNT {
            let id = self.slots.at_rank(rank);
            let index = self.show_index + rank;
            if self.exhausted || index >= count {
                self.slots.set_visible(id, false);
                continue;
            }
            let was_visible = self.slots.slot(id).is_visible();
            self.bind_slot(id, index);
            if was_visible && !reset {
                continue;
            }
            if !was_visible && rank == 0 {
                announce = true;
            }
            if rank == SLOT_COUNT - 1 {
                self.slots.slot_mut(id).transform.opacity = 0.0;
            } else {
                self.slots
                    .start_reveal(id, delay, self.config.reveal_duration);
                delay += self.config.reveal_stagger;
            }
        }

        if let Some(geometry) = self.geometry {
            let in_flight = self.drag.in_flight();
            self.slots
                .apply_rest_layout(&geometry, &self.config, in_flight);
        }
        debug!(count, show_index = self.show_index, reset, "data set changed");
        if count > 0 && (reset || announce) {
            self.listener.on_show(self.show_index);
        }
    }

    /// Try to start dragging `candidate` with the press `down`.
    ///
    /// A settle still running from an earlier release is finished and
    /// reordered first. The capture is then refused unless the stack has
    /// data, no programmatic vanish is running, no other drag is active, and
    /// `candidate` is the shown top card, not flying off, and pressed inside
    /// the provider's draggable region.
    pub fn try_capture(&mut self, candidate: SlotId, down: &PointerEvent) -> bool {
        if !self.initialized {
            return false;
        }
        if self.drag.phase() == DragPhase::Settling && !self.drag.is_button_locked() {
            self.abort_settle();
        }
        let count = self.item_count();
        if let Some(refusal) =
            self.drag
                .capture_refusal(&self.slots, &self.config, candidate, count)
        {
            debug!(?refusal, slot = candidate.index(), "capture refused");
            return false;
        }
        if self.draggable_region.is_none() {
            let region = self
                .provider
                .as_ref()
                .and_then(|p| p.draggable_region(candidate));
            self.draggable_region = Some(region);
        }
        let outside = matches!(
            self.draggable_region,
            Some(Some(region)) if !region.contains(down.position)
        );
        if outside {
            debug!(slot = candidate.index(), "capture refused outside draggable region");
            return false;
        }
        let origin = self.slots.slot(candidate).position();
        self.drag.begin_drag(candidate, origin, down);
        debug!(slot = candidate.index(), "captured top card");
        true
    }

    /// Move `slot` to `position` and cascade the change into the cards beneath it.
    pub fn on_position_changed(&mut self, slot: SlotId, position: Point) {
        let Some(geometry) = self.geometry else {
            return;
        };
        self.slots.slot_mut(slot).transform.position = position;
        linkage::apply(&mut self.slots, &geometry, &self.config, slot);
    }

    /// Release the dragged card with `velocity` (units per second).
    ///
    /// Returns where the card is headed, or `None` when nothing is being
    /// dragged. A vanish notifies the listener immediately.
    pub fn release_with_velocity(&mut self, velocity: Vec2) -> Option<Release> {
        let geometry = self.geometry?;
        let slot = self.drag.session()?.slot;
        let position = self.slots.slot(slot).position();
        let (slot, release) = self.drag.release(&geometry, position, velocity)?;
        debug!(
            slot = slot.index(),
            flight = ?release.flight,
            vx = velocity.x,
            vy = velocity.y,
            "released"
        );
        if let Some(direction) = release.flight.direction() {
            self.slots.slot_mut(slot).flags.remove(SlotFlags::PICKABLE);
            self.listener.on_card_vanish(self.show_index, direction);
        }
        Some(release)
    }

    /// Fly the top card off toward `direction` without a gesture.
    ///
    /// Refused while a card is being dragged or the top card is already
    /// flying off. A return-to-center settle in progress is cut short.
    pub fn vanish(&mut self, direction: VanishDirection) -> bool {
        let Some(geometry) = self.geometry else {
            return false;
        };
        if !self.initialized || self.item_count() == 0 {
            return false;
        }
        if self.drag.phase() == DragPhase::Dragging {
            debug!("programmatic vanish refused during drag");
            return false;
        }
        let top = self.slots.top();
        if !self.slots.slot(top).is_visible() || self.drag.is_released(top) {
            return false;
        }
        self.abort_settle();

        let start = self.slots.slot(top).position();
        let target = physics::programmatic_target(&geometry, direction);
        self.drag.launch(top, start, target, direction.into());
        self.slots.slot_mut(top).flags.remove(SlotFlags::PICKABLE);
        debug!(slot = top.index(), ?direction, "programmatic vanish");
        self.listener.on_card_vanish(self.show_index, direction);
        true
    }

    /// Advance animations by `dt`. Returns whether another frame is needed.
    pub fn on_frame(&mut self, dt: Duration) -> bool {
        let mut more = self.slots.advance_reveals(dt);
        if let Some(step) = self.drag.advance(dt) {
            self.apply_step(step);
            if step.converged {
                trace!(slot = step.slot.index(), "settle converged");
                self.reorder_after_settle();
            } else {
                more = true;
            }
        }
        more
    }

    /// Converge a running settle immediately and recycle its slot if it vanished.
    pub fn abort_settle(&mut self) {
        if let Some(step) = self.drag.abort() {
            debug!(slot = step.slot.index(), "settle aborted");
            self.apply_step(step);
        }
        self.reorder_after_settle();
    }

    fn apply_step(&mut self, step: SettleStep) {
        self.on_position_changed(step.slot, step.position);
    }

    /// Apply one pointer event to the drag engine.
    ///
    /// A press hit-tests and tries to capture; moves follow the captured
    /// pointer; a lift releases with the tracked velocity and a cancel
    /// releases with none.
    pub fn process_pointer(&mut self, event: &PointerEvent) -> Result<(), DragError> {
        let max = self.config.max_fling_velocity;
        match event.kind {
            PointerKind::Down => {
                if let Some(session) = self.drag.session() {
                    if session.pointer == event.pointer {
                        trace!(pointer = ?event.pointer, "repeated press from dragging pointer");
                        return Ok(());
                    }
                    return Err(DragError::ConcurrentPointer {
                        active: session.pointer,
                        found: event.pointer,
                    });
                }
                self.abort_settle();
                if let Some(slot) = self.hit_test(event.position) {
                    self.try_capture(slot, event);
                }
            }
            PointerKind::Move => {
                if let Some((slot, position)) = self.drag.drag_to(event)? {
                    self.on_position_changed(slot, position);
                }
            }
            PointerKind::Up => {
                if let Some(velocity) = self.drag.lift_velocity(event, max)? {
                    self.release_with_velocity(velocity);
                }
            }
            PointerKind::Cancel => {
                if self.drag.lift_velocity(event, max)?.is_some() {
                    self.release_with_velocity(Vec2::ZERO);
                }
            }
        }
        Ok(())
    }

    /// Offer an event before children see it. Returns whether the stack takes the gesture.
    pub fn intercept(&mut self, event: &PointerEvent) -> bool {
        let mut router = self.router;
        let taken = router.intercept(self, event);
        self.router = router;
        taken
    }

    /// Handle an event of a gesture the stack owns. Always returns `true`.
    pub fn handle(&mut self, event: &PointerEvent) -> bool {
        let mut router = self.router;
        let handled = router.handle(self, event);
        self.router = router;
        handled
    }
}

impl<P: DataProvider, L: CardListener> PointerSink for CardStack<P, L> {
    fn abort_settle(&mut self) {
        Self::abort_settle(self);
    }

    fn dispatch(&mut self, event: &PointerEvent) -> Result<(), DragError> {
        self.process_pointer(event)
    }

    fn is_dragging(&self) -> bool {
        self.drag.phase() == DragPhase::Dragging
    }
}
