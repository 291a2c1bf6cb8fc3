// Copyright 2025 the Card Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while forwarding pointer events to the drag engine.
//!
//! None of these are fatal. [`CardStack::handle`](crate::panel::CardStack::handle)
//! logs and swallows them so a malformed pointer stream only drops the
//! offending event.

use thiserror::Error;

use crate::types::PointerId;

/// A pointer event the drag engine could not apply.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum DragError {
    /// A move or release arrived from a pointer that is not driving the drag.
    #[error("pointer {found:?} is not driving the active drag (expected {expected:?})")]
    ForeignPointer {
        /// Pointer that captured the card.
        expected: PointerId,
        /// Pointer that sent the event.
        found: PointerId,
    },
    /// A second pointer went down while a drag was in progress.
    #[error("pointer {found:?} pressed while {active:?} is dragging")]
    ConcurrentPointer {
        /// Pointer currently dragging.
        active: PointerId,
        /// Pointer that pressed.
        found: PointerId,
    },
}
