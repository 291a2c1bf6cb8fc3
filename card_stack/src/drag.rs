// Copyright 2025 the Card Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag engine: capture arbitration and the `Idle → Dragging → Settling → Idle` machine.
//!
//! ## Overview
//!
//! The engine owns the transient parts of a swipe: the live drag session,
//! the settle animation that follows a release, the queue of slots flying
//! off-screen, and the lock held while a programmatic vanish is in flight.
//! It never reorders slots; [`CardStack`](crate::panel::CardStack) does that
//! once the engine reports a settle has converged.

use alloc::collections::VecDeque;
use core::time::Duration;

use kurbo::{Point, Vec2};

use crate::config::{Geometry, StackConfig};
use crate::error::DragError;
use crate::physics::{Release, Settle, VelocityTracker, classify_release};
use crate::stack::SlotStack;
use crate::types::{DragPhase, FlightType, PointerEvent, PointerId, SlotFlags, SlotId};

/// Why a capture attempt was refused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CaptureRefusal {
    /// The provider is missing or empty.
    NoData,
    /// A programmatic vanish is in flight.
    ButtonLocked,
    /// Another drag is running, or a settle has not been finished yet.
    Busy,
    /// The candidate is not the top card.
    NotTop,
    /// The candidate is hidden or drawn as a lower card.
    NotShown,
    /// The candidate is flying off-screen.
    Released,
    /// The touch started outside the provider's draggable region.
    OutsideDraggableRegion,
}

/// State kept while a pointer drags the top card.
#[derive(Clone, Debug)]
pub(crate) struct DragSession {
    pub(crate) slot: SlotId,
    pub(crate) pointer: PointerId,
    down: Point,
    origin: Point,
    tracker: VelocityTracker,
}

#[derive(Clone, Debug, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
    Settling(Settle),
}

/// One frame's worth of settle progress.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct SettleStep {
    pub(crate) slot: SlotId,
    pub(crate) position: Point,
    pub(crate) converged: bool,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct DragEngine {
    state: DragState,
    released: VecDeque<SlotId>,
    button_locked: bool,
}

impl DragEngine {
    pub(crate) fn phase(&self) -> DragPhase {
        match self.state {
            DragState::Idle => DragPhase::Idle,
            DragState::Dragging(_) => DragPhase::Dragging,
            DragState::Settling(_) => DragPhase::Settling,
        }
    }

    pub(crate) fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(s) => Some(s),
            _ => None,
        }
    }

    /// Slot currently owned by the engine, dragging or settling.
    pub(crate) fn in_flight(&self) -> Option<SlotId> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging(s) => Some(s.slot),
            DragState::Settling(s) => Some(s.slot),
        }
    }

    pub(crate) fn is_button_locked(&self) -> bool {
        self.button_locked
    }

    pub(crate) fn is_released(&self, slot: SlotId) -> bool {
        self.released.contains(&slot)
    }

    pub(crate) fn released_len(&self) -> usize {
        self.released.len()
    }

    pub(crate) fn pop_released(&mut self) -> Option<SlotId> {
        self.released.pop_front()
    }

    /// Drop all transient state.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check everything about a capture except the draggable region.
    pub(crate) fn capture_refusal(
        &self,
        stack: &SlotStack,
        config: &StackConfig,
        candidate: SlotId,
        item_count: usize,
    ) -> Option<CaptureRefusal> {
        if item_count == 0 {
            return Some(CaptureRefusal::NoData);
        }
        if self.button_locked {
            return Some(CaptureRefusal::ButtonLocked);
        }
        if self.phase() != DragPhase::Idle {
            return Some(CaptureRefusal::Busy);
        }
        if stack.rank_of(candidate) != 0 {
            return Some(CaptureRefusal::NotTop);
        }
        let slot = stack.slot(candidate);
        // Lower cards are also recognizable by scale, even mid-linkage.
        if !slot.is_visible() || slot.scale() <= config.scale_at_depth(1) {
            return Some(CaptureRefusal::NotShown);
        }
        if self.is_released(candidate) || !slot.flags().contains(SlotFlags::PICKABLE) {
            return Some(CaptureRefusal::Released);
        }
        None
    }

    pub(crate) fn begin_drag(&mut self, slot: SlotId, origin: Point, down: &PointerEvent) {
        let mut tracker = VelocityTracker::new();
        tracker.add(down.time, down.position);
        self.state = DragState::Dragging(DragSession {
            slot,
            pointer: down.pointer,
            down: down.position,
            origin,
            tracker,
        });
    }

    fn active_session(
        &mut self,
        event: &PointerEvent,
    ) -> Result<Option<&mut DragSession>, DragError> {
        let DragState::Dragging(session) = &mut self.state else {
            return Ok(None);
        };
        if session.pointer != event.pointer {
            return Err(DragError::ForeignPointer {
                expected: session.pointer,
                found: event.pointer,
            });
        }
        Ok(Some(session))
    }

    /// Follow a move of the dragging pointer. Returns the slot's new position.
    pub(crate) fn drag_to(
        &mut self,
        event: &PointerEvent,
    ) -> Result<Option<(SlotId, Point)>, DragError> {
        let Some(session) = self.active_session(event)? else {
            return Ok(None);
        };
        session.tracker.add(event.time, event.position);
        let position = session.origin + (event.position - session.down);
        Ok(Some((session.slot, position)))
    }

    /// Release velocity for a lift of the dragging pointer.
    pub(crate) fn lift_velocity(
        &mut self,
        event: &PointerEvent,
        max: f64,
    ) -> Result<Option<Vec2>, DragError> {
        let Some(session) = self.active_session(event)? else {
            return Ok(None);
        };
        session.tracker.add(event.time, event.position);
        Ok(Some(session.tracker.velocity(max)))
    }

    /// Release the dragged slot, now at `position`, and start settling it.
    ///
    /// Vanishing releases are queued in the released set.
    pub(crate) fn release(
        &mut self,
        geometry: &Geometry,
        position: Point,
        velocity: Vec2,
    ) -> Option<(SlotId, Release)> {
        let DragState::Dragging(session) = &self.state else {
            return None;
        };
        let slot = session.slot;
        let release = classify_release(geometry, position, velocity);
        if release.flight != FlightType::ReturnCenter {
            self.released.push_back(slot);
        }
        self.state = DragState::Settling(Settle::new(slot, position, release));
        Some((slot, release))
    }

    /// Fly `slot` from `position` to `target` without a gesture, locking capture until it lands.
    pub(crate) fn launch(
        &mut self,
        slot: SlotId,
        position: Point,
        target: Point,
        flight: FlightType,
    ) {
        self.released.push_back(slot);
        self.button_locked = true;
        self.state = DragState::Settling(Settle::new(slot, position, Release { target, flight }));
    }

    /// Advance a running settle. On convergence the engine is idle again.
    pub(crate) fn advance(&mut self, dt: Duration) -> Option<SettleStep> {
        let DragState::Settling(settle) = &mut self.state else {
            return None;
        };
        let position = settle.advance(dt);
        let step = SettleStep {
            slot: settle.slot,
            position,
            converged: settle.is_converged(),
        };
        if step.converged {
            self.become_idle();
        }
        Some(step)
    }

    /// Jump a running settle to its target and go idle.
    pub(crate) fn abort(&mut self) -> Option<SettleStep> {
        let DragState::Settling(settle) = &mut self.state else {
            return None;
        };
        let step = SettleStep {
            slot: settle.slot,
            position: settle.finish(),
            converged: true,
        };
        self.become_idle();
        Some(step)
    }

    fn become_idle(&mut self) {
        self.state = DragState::Idle;
        self.button_locked = false;
    }
}
