// Copyright 2025 the Card Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linkage: cascade the top card's displacement into the cards beneath it.
//!
//! ## Model
//!
//! The top card's displacement from its rest anchor is measured as
//! `|dx| + |dy|` and normalized by [`MAX_LINKAGE_DISTANCE`] into a rate in
//! `[0, 1]`. The card one rank down moves from its depth-1 rest transform to
//! the depth-0 one with that rate; the card two ranks down moves from depth 2
//! to depth 1 with a rate lagging by [`TRAILING_LAG`]. The backup card fades
//! in with the lagging rate.
//!
//! ```
//! use card_stack::linkage::linkage_rates;
//!
//! assert_eq!(linkage_rates(0.0), (0.0, 0.0));
//! let (first, second) = linkage_rates(250.0);
//! assert_eq!(first, 0.5);
//! assert!(second < first);
//! assert_eq!(linkage_rates(900.0), (1.0, 1.0));
//! ```

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;

use crate::config::{Geometry, StackConfig};
use crate::stack::SlotStack;
use crate::types::{SLOT_COUNT, SlotId};

/// Displacement at which the cards beneath finish their transition.
pub const MAX_LINKAGE_DISTANCE: f64 = 500.0;

/// How far the second trailing card lags behind the first.
pub const TRAILING_LAG: f64 = 0.1;

/// Manhattan distance of `position` from `anchor`.
pub fn linkage_distance(anchor: Point, position: Point) -> f64 {
    (position.x - anchor.x).abs() + (position.y - anchor.y).abs()
}

/// Interpolation rates for the first and second trailing cards.
pub fn linkage_rates(distance: f64) -> (f64, f64) {
    // Lag applies to the unclamped ratio: the second card lands at 1.1x the maximum.
    let raw = distance / MAX_LINKAGE_DISTANCE;
    (raw.clamp(0.0, 1.0), (raw - TRAILING_LAG).clamp(0.0, 1.0))
}

/// Vertical offset and scale of a card moving from `depth` toward `depth - 1`.
pub fn interpolate(config: &StackConfig, depth: usize, rate: f64) -> (f64, f64) {
    let from_offset = config.offset_at_depth(depth);
    let to_offset = config.offset_at_depth(depth - 1);
    let from_scale = config.scale_at_depth(depth);
    let to_scale = config.scale_at_depth(depth - 1);
    (
        from_offset + (to_offset - from_offset) * rate,
        from_scale + (to_scale - from_scale) * rate,
    )
}

/// Re-derive the transforms of the cards trailing `moved`.
///
/// No-op when fewer than two cards trail it.
pub(crate) fn apply(
    stack: &mut SlotStack,
    geometry: &Geometry,
    config: &StackConfig,
    moved: SlotId,
) {
    let rank = stack.rank_of(moved);
    if rank + 2 >= SLOT_COUNT {
        return;
    }
    let distance = linkage_distance(geometry.anchor, stack.slot(moved).position());
    let (rate, lagged) = linkage_rates(distance);

    for (depth, r) in [(1, rate), (2, lagged)] {
        let (offset, scale) = interpolate(config, depth, r);
        let id = stack.at_rank(rank + depth);
        let t = &mut stack.slot_mut(id).transform;
        t.position = Point::new(geometry.anchor.x, geometry.anchor.y + offset);
        t.scale = scale;
    }

    let backup = stack.bottom();
    stack.slot_mut(backup).transform.opacity = lagged;
}
