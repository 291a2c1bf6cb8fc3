// Copyright 2025 the Card Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture routing: decide whether a pointer stream is a drag or a pass-through tap.
//!
//! ## Overview
//!
//! Hosts typically see a pointer stream twice: once while deciding whether a
//! container should steal it from its children ([`GestureRouter::intercept`]),
//! and then as the owner of the gesture ([`GestureRouter::handle`]).
//!
//! - A touch-down is recorded, any running settle is aborted (which also runs
//!   its pending reorder), and the press is forwarded so the top card can be
//!   captured.
//! - A move is intercepted only once the engine is dragging AND the pointer
//!   has travelled further than the touch slop.
//! - Every event after interception is forwarded unconditionally. Forwarding
//!   failures are logged and the event still counts as handled.
//!
//! The router holds no reference to the stack. It talks to a [`PointerSink`],
//! which [`CardStack`](crate::panel::CardStack) implements.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;

use crate::error::DragError;
use crate::types::{PointerEvent, PointerKind};

/// Receiver of the events a [`GestureRouter`] forwards.
pub trait PointerSink {
    /// Abort a running settle, converging it immediately.
    fn abort_settle(&mut self);

    /// Apply a pointer event to the drag engine.
    fn dispatch(&mut self, event: &PointerEvent) -> Result<(), DragError>;

    /// Whether a card is currently following a pointer.
    fn is_dragging(&self) -> bool;
}

/// Classifies a press as a drag once it has moved far enough.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SlopDetector {
    slop: f64,
    origin: Option<Point>,
    exceeded: bool,
}

impl SlopDetector {
    /// Detector that trips once `|dx| + |dy|` exceeds `slop`.
    pub fn new(slop: f64) -> Self {
        Self {
            slop,
            origin: None,
            exceeded: false,
        }
    }

    /// Start a new gesture at `origin`.
    pub fn reset(&mut self, origin: Point) {
        self.origin = Some(origin);
        self.exceeded = false;
    }

    /// Feed a move. Returns whether the gesture has become a real move.
    ///
    /// Once tripped the detector stays tripped until the next [`reset`](Self::reset).
    pub fn update(&mut self, position: Point) -> bool {
        if let Some(origin) = self.origin {
            let d = position - origin;
            if d.x.abs() + d.y.abs() > self.slop {
                self.exceeded = true;
            }
        }
        self.exceeded
    }

    /// Whether the current gesture has exceeded the slop.
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }
}

/// Routes a host pointer stream into a [`PointerSink`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GestureRouter {
    down: Option<Point>,
    slop: SlopDetector,
}

impl GestureRouter {
    /// Router with the given touch slop.
    pub fn new(touch_slop: f64) -> Self {
        Self {
            down: None,
            slop: SlopDetector::new(touch_slop),
        }
    }

    /// Where the current gesture went down, if one is in progress.
    pub fn down_point(&self) -> Option<Point> {
        self.down
    }

    /// Decide whether the container should take over the gesture.
    ///
    /// Returns `true` only for a move of a captured card past the slop.
    pub fn intercept<S: PointerSink>(&mut self, sink: &mut S, event: &PointerEvent) -> bool {
        match event.kind {
            PointerKind::Down => {
                self.down = Some(event.position);
                self.slop.reset(event.position);
                sink.abort_settle();
                forward(sink, event);
                false
            }
            PointerKind::Move => {
                let moved = self.slop.update(event.position);
                sink.is_dragging() && moved
            }
            PointerKind::Up | PointerKind::Cancel => {
                self.down = None;
                forward(sink, event);
                false
            }
        }
    }

    /// Handle an event of a gesture this container owns. Always returns `true`.
    pub fn handle<S: PointerSink>(&mut self, sink: &mut S, event: &PointerEvent) -> bool {
        match event.kind {
            PointerKind::Down => {
                self.down = Some(event.position);
                self.slop.reset(event.position);
                sink.abort_settle();
            }
            PointerKind::Move => {
                self.slop.update(event.position);
            }
            PointerKind::Up | PointerKind::Cancel => self.down = None,
        }
        forward(sink, event);
        true
    }
}

fn forward<S: PointerSink>(sink: &mut S, event: &PointerEvent) {
    if let Err(err) = sink.dispatch(event) {
        tracing::warn!(%err, kind = ?event.kind, "dropping pointer event");
    }
}
