// Copyright 2025 the Card Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: slot handles and flags, card transforms, pointer events, and release outcomes.
//!
//! ## Overview
//!
//! These types describe what flows between the host and the stack.
//! They are referenced by [`CardStack`](crate::panel::CardStack) and by the
//! [`DataProvider`](crate::provider::DataProvider) contract.

use core::time::Duration;

use kurbo::Point;

/// Number of render slots a stack keeps alive.
///
/// The stack never allocates or drops slots after construction; it only
/// re-ranks and re-binds these.
pub const SLOT_COUNT: usize = 4;

/// Handle to one of the stack's render slots.
///
/// ## Semantics
///
/// - A `SlotId` names a render surface for the whole lifetime of a
///   [`CardStack`](crate::panel::CardStack); it is never invalidated.
/// - Its rank (depth in the stack) changes as cards are recycled; query it with
///   [`CardStack::rank_of`](crate::panel::CardStack::rank_of).
/// - Hosts map a `SlotId` to their own surface with [`SlotId::index`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub(crate) u8);

impl SlotId {
    pub(crate) const fn new(idx: usize) -> Self {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Slot indices are bounded by SLOT_COUNT."
        )]
        Self(idx as u8)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Raw slot index in `0..SLOT_COUNT`.
    pub const fn index(self) -> usize {
        self.idx()
    }
}

bitflags::bitflags! {
    /// Slot flags controlling visibility and capture.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SlotFlags: u8 {
        /// Slot is visible (holds data and participates in hit testing).
        const VISIBLE  = 0b0000_0001;
        /// Slot may be captured by a drag. Cleared while the slot is flying off-screen.
        const PICKABLE = 0b0000_0010;
    }
}

impl Default for SlotFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

/// Visual transform of a slot.
///
/// `position` is the top-left corner of the unscaled card in viewport
/// coordinates. Scale pivots around the card's bottom-center, so scaled
/// cards stay anchored to their bottom edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CardTransform {
    /// Top-left corner of the unscaled card.
    pub position: Point,
    /// Uniform scale factor.
    pub scale: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

impl Default for CardTransform {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            scale: 1.0,
            opacity: 1.0,
        }
    }
}

/// Side a card flies off to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum VanishDirection {
    /// Off the left edge.
    Left,
    /// Off the right edge.
    Right,
}

/// Outcome of a release: where the card is headed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FlightType {
    /// Fly off the left edge.
    VanishLeft,
    /// Fly off the right edge.
    VanishRight,
    /// Snap back to the rest anchor.
    ReturnCenter,
}

impl FlightType {
    /// Vanish direction, or `None` for [`FlightType::ReturnCenter`].
    pub const fn direction(self) -> Option<VanishDirection> {
        match self {
            Self::VanishLeft => Some(VanishDirection::Left),
            Self::VanishRight => Some(VanishDirection::Right),
            Self::ReturnCenter => None,
        }
    }
}

impl From<VanishDirection> for FlightType {
    fn from(direction: VanishDirection) -> Self {
        match direction {
            VanishDirection::Left => Self::VanishLeft,
            VanishDirection::Right => Self::VanishRight,
        }
    }
}

/// Coarse state of the drag engine.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum DragPhase {
    /// No gesture and no animation in flight.
    Idle,
    /// The top card follows a pointer.
    Dragging,
    /// A released card is animating toward its target.
    Settling,
}

/// Identifier of a pointer (finger, mouse button) as assigned by the host.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct PointerId(pub u64);

/// Kind of pointer transition.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PointerKind {
    /// Pointer pressed.
    Down,
    /// Pointer moved while pressed.
    Move,
    /// Pointer lifted.
    Up,
    /// Gesture taken away by the host (e.g. a parent scroll view).
    Cancel,
}

/// A raw pointer event in viewport coordinates.
///
/// `time` is a monotonic timestamp from any host epoch; only differences are
/// used (for velocity estimation).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// Pointer that produced the event.
    pub pointer: PointerId,
    /// Transition kind.
    pub kind: PointerKind,
    /// Position in viewport coordinates.
    pub position: Point,
    /// Monotonic event timestamp.
    pub time: Duration,
}

impl PointerEvent {
    /// Create an event.
    pub const fn new(
        pointer: PointerId,
        kind: PointerKind,
        position: Point,
        time: Duration,
    ) -> Self {
        Self {
            pointer,
            kind,
            position,
            time,
        }
    }

    /// Shorthand for a [`PointerKind::Down`] event.
    pub const fn down(pointer: PointerId, position: Point, time: Duration) -> Self {
        Self::new(pointer, PointerKind::Down, position, time)
    }

    /// Shorthand for a [`PointerKind::Move`] event.
    pub const fn moved(pointer: PointerId, position: Point, time: Duration) -> Self {
        Self::new(pointer, PointerKind::Move, position, time)
    }

    /// Shorthand for a [`PointerKind::Up`] event.
    pub const fn up(pointer: PointerId, position: Point, time: Duration) -> Self {
        Self::new(pointer, PointerKind::Up, position, time)
    }

    /// Shorthand for a [`PointerKind::Cancel`] event.
    pub const fn cancel(pointer: PointerId, position: Point, time: Duration) -> Self {
        Self::new(pointer, PointerKind::Cancel, position, time)
    }
}
