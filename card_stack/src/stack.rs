// Copyright 2025 the Card Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot storage and rank order.
//!
//! ## Overview
//!
//! A [`SlotStack`] holds exactly [`SLOT_COUNT`] slots and a rank order over
//! them. Slots are addressed by their stable [`SlotId`]; ranks only change
//! through [`SlotStack::send_to_back`], which keeps the order a permutation.

use core::time::Duration;

use kurbo::Point;

use crate::config::{Geometry, MAX_DEPTH, StackConfig};
use crate::types::{CardTransform, SLOT_COUNT, SlotFlags, SlotId};

/// A fade-in running on a slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Reveal {
    delay: Duration,
    duration: Duration,
    elapsed: Duration,
}

impl Reveal {
    pub(crate) fn new(delay: Duration, duration: Duration) -> Self {
        Self {
            delay,
            duration,
            elapsed: Duration::ZERO,
        }
    }

    /// Advance and return the current opacity.
    fn advance(&mut self, dt: Duration) -> f64 {
        self.elapsed = self.elapsed.saturating_add(dt);
        let Some(active) = self.elapsed.checked_sub(self.delay) else {
            return 0.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }
        (active.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }
}

/// One reusable render slot.
#[derive(Clone, Debug)]
pub struct Slot {
    id: SlotId,
    pub(crate) bound: Option<usize>,
    pub(crate) transform: CardTransform,
    pub(crate) flags: SlotFlags,
    pub(crate) reveal: Option<Reveal>,
}

impl Slot {
    fn new(id: SlotId) -> Self {
        Self {
            id,
            bound: None,
            transform: CardTransform::default(),
            flags: SlotFlags::PICKABLE,
            reveal: None,
        }
    }

    /// Stable handle of this slot.
    pub fn id(&self) -> SlotId {
        self.id
    }

    /// Data index bound into this slot, if any.
    pub fn bound_index(&self) -> Option<usize> {
        self.bound
    }

    /// Current transform.
    pub fn transform(&self) -> CardTransform {
        self.transform
    }

    /// Current top-left position of the unscaled card.
    pub fn position(&self) -> Point {
        self.transform.position
    }

    /// Current scale.
    pub fn scale(&self) -> f64 {
        self.transform.scale
    }

    /// Current opacity.
    pub fn opacity(&self) -> f64 {
        self.transform.opacity
    }

    /// Flags for this slot.
    pub fn flags(&self) -> SlotFlags {
        self.flags
    }

    /// Whether the slot is shown.
    pub fn is_visible(&self) -> bool {
        self.flags.contains(SlotFlags::VISIBLE)
    }

    /// Whether a fade-in is running.
    pub fn is_revealing(&self) -> bool {
        self.reveal.is_some()
    }
}

/// Fixed set of slots plus their rank order (index 0 is the top card).
#[derive(Clone, Debug)]
pub struct SlotStack {
    slots: [Slot; SLOT_COUNT],
    order: [SlotId; SLOT_COUNT],
}

impl Default for SlotStack {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotStack {
    /// Create a stack with slot `i` at rank `i`, all hidden and unbound.
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|i| Slot::new(SlotId::new(i))),
            order: core::array::from_fn(SlotId::new),
        }
    }

    /// Slot by id.
    pub fn slot(&self, id: SlotId) -> &Slot {
        &self.slots[id.idx()]
    }

    pub(crate) fn slot_mut(&mut self, id: SlotId) -> &mut Slot {
        &mut self.slots[id.idx()]
    }

    /// Slot ids ordered top to bottom.
    pub fn order(&self) -> &[SlotId; SLOT_COUNT] {
        &self.order
    }

    /// Slot at `rank`. Panics if `rank >= SLOT_COUNT`.
    pub fn at_rank(&self, rank: usize) -> SlotId {
        self.order[rank]
    }

    /// Rank of `id`.
    pub fn rank_of(&self, id: SlotId) -> usize {
        // The order is a permutation, so every id is present.
        self.order
            .iter()
            .position(|&s| s == id)
            .unwrap_or(SLOT_COUNT - 1)
    }

    /// The rank-0 slot.
    pub fn top(&self) -> SlotId {
        self.order[0]
    }

    /// The deepest (backup) slot.
    pub fn bottom(&self) -> SlotId {
        self.order[SLOT_COUNT - 1]
    }

    /// Slots from top to bottom.
    pub fn iter_top_down(&self) -> impl Iterator<Item = &Slot> + '_ {
        self.order.iter().map(|&id| self.slot(id))
    }

    /// Whether the rank order is a permutation of all slots.
    pub fn is_permutation(&self) -> bool {
        let mut seen = [false; SLOT_COUNT];
        for id in self.order {
            if core::mem::replace(&mut seen[id.idx()], true) {
                return false;
            }
        }
        seen.iter().all(|&s| s)
    }

    /// Record that `id` now shows item `index` and make it visible.
    pub(crate) fn bind(&mut self, id: SlotId, index: usize) {
        let slot = self.slot_mut(id);
        slot.bound = Some(index);
        slot.flags.insert(SlotFlags::VISIBLE);
    }

    /// Reset a vanished slot to the backup appearance and move it to the deepest rank.
    pub(crate) fn park_at_back(&mut self, id: SlotId, geometry: &Geometry, config: &StackConfig) {
        let slot = self.slot_mut(id);
        slot.transform = CardTransform {
            position: geometry.rest_position(MAX_DEPTH),
            scale: config.scale_at_depth(MAX_DEPTH),
            opacity: 0.0,
        };
        slot.flags.insert(SlotFlags::PICKABLE);
        slot.reveal = None;
        self.send_to_back(id);
    }

    /// Move `id` to the deepest rank, shifting the slots below it up by one.
    pub(crate) fn send_to_back(&mut self, id: SlotId) {
        let rank = self.rank_of(id);
        self.order.copy_within(rank + 1.., rank);
        self.order[SLOT_COUNT - 1] = id;
        debug_assert!(self.is_permutation(), "rank order must stay a permutation");
    }

    pub(crate) fn set_visible(&mut self, id: SlotId, visible: bool) {
        let slot = self.slot_mut(id);
        slot.flags.set(SlotFlags::VISIBLE, visible);
        if !visible {
            slot.bound = None;
            slot.reveal = None;
        }
    }

    /// Start a fade-in on `id`, making it visible at opacity 0.
    pub(crate) fn start_reveal(&mut self, id: SlotId, delay: Duration, duration: Duration) {
        let slot = self.slot_mut(id);
        slot.flags.insert(SlotFlags::VISIBLE);
        slot.transform.opacity = 0.0;
        slot.reveal = Some(Reveal::new(delay, duration));
    }

    /// Advance running reveals. Returns `true` while any is still running.
    pub(crate) fn advance_reveals(&mut self, dt: Duration) -> bool {
        let mut running = false;
        for slot in &mut self.slots {
            let Some(reveal) = slot.reveal.as_mut() else {
                continue;
            };
            let opacity = reveal.advance(dt);
            slot.transform.opacity = opacity;
            if opacity >= 1.0 {
                slot.reveal = None;
            } else {
                running = true;
            }
        }
        running
    }

    /// Put every slot except `skip` at the rest position and scale of its rank.
    pub(crate) fn apply_rest_layout(
        &mut self,
        geometry: &Geometry,
        config: &StackConfig,
        skip: Option<SlotId>,
    ) {
        for rank in 0..SLOT_COUNT {
            let id = self.order[rank];
            if Some(id) == skip {
                continue;
            }
            let depth = StackConfig::depth_of_rank(rank);
            let t = &mut self.slots[id.idx()].transform;
            t.position = geometry.rest_position(depth);
            t.scale = config.scale_at_depth(depth);
        }
    }

    /// Topmost visible slot whose drawn bounds contain `pt`.
    pub fn hit_test(&self, pt: Point, geometry: &Geometry) -> Option<SlotId> {
        self.iter_top_down()
            .find(|s| {
                s.is_visible()
                    && geometry
                        .card_bounds(s.transform.position, s.transform.scale)
                        .contains(pt)
            })
            .map(Slot::id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    fn geometry() -> (StackConfig, Geometry) {
        let c = StackConfig::default();
        let g = Geometry::measure(&c, Size::new(600.0, 900.0), Size::new(400.0, 500.0)).unwrap();
        (c, g)
    }

    #[test]
    fn new_stack_is_identity_permutation() {
        let s = SlotStack::new();
        assert!(s.is_permutation());
        for r in 0..SLOT_COUNT {
            assert_eq!(s.at_rank(r).index(), r);
            assert_eq!(s.rank_of(s.at_rank(r)), r);
        }
    }

    #[test]
    fn send_to_back_rotates_and_keeps_permutation() {
        let mut s = SlotStack::new();
        let top = s.top();
        s.send_to_back(top);
        assert_eq!(s.bottom(), top);
        assert_eq!(s.top().index(), 1);
        assert!(s.is_permutation());

        // Moving a middle slot only shifts the ones beneath it.
        let mid = s.at_rank(1);
        let above = s.at_rank(0);
        s.send_to_back(mid);
        assert_eq!(s.at_rank(0), above);
        assert_eq!(s.bottom(), mid);
        assert!(s.is_permutation());
    }

    #[test]
    fn park_at_back_resets_to_backup_appearance() {
        let (c, g) = geometry();
        let mut s = SlotStack::new();
        let top = s.top();
        s.bind(top, 7);
        s.slot_mut(top).flags.remove(SlotFlags::PICKABLE);
        s.slot_mut(top).transform.position = Point::new(900.0, 40.0);
        s.park_at_back(top, &g, &c);

        let slot = s.slot(top);
        assert_eq!(s.bottom(), top);
        assert_eq!(slot.position(), g.rest_position(MAX_DEPTH));
        assert_eq!(slot.scale(), c.scale_at_depth(MAX_DEPTH));
        assert_eq!(slot.opacity(), 0.0);
        assert!(slot.flags().contains(SlotFlags::PICKABLE));
        // Binding is left for the caller to replace.
        assert_eq!(slot.bound_index(), Some(7));
    }

    #[test]
    fn rest_layout_caps_depth_for_backup() {
        let (c, g) = geometry();
        let mut s = SlotStack::new();
        s.apply_rest_layout(&g, &c, None);
        let third = s.slot(s.at_rank(2)).transform();
        let backup = s.slot(s.bottom()).transform();
        assert_eq!(third.position, backup.position);
        assert_eq!(third.scale, backup.scale);
        assert_eq!(s.slot(s.top()).position(), g.anchor);
    }

    #[test]
    fn rest_layout_skips_in_flight_slot() {
        let (c, g) = geometry();
        let mut s = SlotStack::new();
        let top = s.top();
        s.slot_mut(top).transform.position = Point::new(-50.0, 3.0);
        s.apply_rest_layout(&g, &c, Some(top));
        assert_eq!(s.slot(top).position(), Point::new(-50.0, 3.0));
    }

    #[test]
    fn reveal_waits_for_delay_then_fades_in() {
        let mut s = SlotStack::new();
        let id = s.top();
        s.start_reveal(id, Duration::from_millis(100), Duration::from_millis(200));
        assert!(s.slot(id).is_visible());
        assert!(s.advance_reveals(Duration::from_millis(100)));
        assert_eq!(s.slot(id).opacity(), 0.0);
        assert!(s.advance_reveals(Duration::from_millis(100)));
        assert!((s.slot(id).opacity() - 0.5).abs() < 1e-9);
        assert!(!s.advance_reveals(Duration::from_millis(100)));
        assert_eq!(s.slot(id).opacity(), 1.0);
        assert!(!s.slot(id).is_revealing());
    }

    #[test]
    fn hit_test_prefers_top_and_skips_hidden() {
        let (c, g) = geometry();
        let mut s = SlotStack::new();
        for id in *s.order() {
            s.set_visible(id, true);
        }
        s.apply_rest_layout(&g, &c, None);
        let center = Point::new(300.0, 300.0);
        assert_eq!(s.hit_test(center, &g), Some(s.top()));
        let top = s.top();
        s.set_visible(top, false);
        assert_eq!(s.hit_test(center, &g), Some(s.at_rank(1)));
        assert_eq!(s.hit_test(Point::new(5.0, 5.0), &g), None);
    }
}
