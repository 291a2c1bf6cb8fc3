// Copyright 2025 the Card Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static configuration and measured geometry.
//!
//! [`StackConfig`] is read once at construction. [`Geometry`] is derived from
//! it on every host layout pass and stays read-only while a drag is running.

use core::time::Duration;

use kurbo::{Point, Rect, Size};

/// Deepest depth a card is drawn at. Ranks past it share its appearance.
pub const MAX_DEPTH: usize = 2;

/// Construction-time settings for a [`CardStack`](crate::panel::CardStack).
///
/// All lengths are in the host's viewport units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackConfig {
    /// Gap between the top of the viewport and the top card.
    pub item_margin_top: f64,
    /// Gap between the deepest card and controls placed below the stack.
    pub bottom_margin_top: f64,
    /// Vertical offset added per depth step.
    pub y_offset_step: f64,
    /// Scale removed per depth step.
    pub scale_step: f64,
    /// Cumulative `|dx| + |dy|` a pointer must travel before a gesture counts as a drag.
    pub touch_slop: f64,
    /// Length of the fade-in when a slot is revealed.
    pub reveal_duration: Duration,
    /// Delay between consecutive slots in a staggered reveal.
    pub reveal_stagger: Duration,
    /// Release velocity magnitude cap, per axis, in units per second.
    pub max_fling_velocity: f64,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            item_margin_top: 10.0,
            bottom_margin_top: 40.0,
            y_offset_step: 40.0,
            scale_step: 0.08,
            touch_slop: 8.0,
            reveal_duration: Duration::from_millis(360),
            reveal_stagger: Duration::from_millis(120),
            max_fling_velocity: 8000.0,
        }
    }
}

impl StackConfig {
    /// Vertical offset of a card resting at `depth`.
    pub fn offset_at_depth(&self, depth: usize) -> f64 {
        self.y_offset_step * depth as f64
    }

    /// Scale of a card resting at `depth`.
    pub fn scale_at_depth(&self, depth: usize) -> f64 {
        1.0 - self.scale_step * depth as f64
    }

    /// Depth a card at `rank` is drawn at when nothing is being dragged.
    pub fn depth_of_rank(rank: usize) -> usize {
        rank.min(MAX_DEPTH)
    }
}

/// Viewport geometry computed by [`CardStack::layout`](crate::panel::CardStack::layout).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    /// Rest position (top-left) of the rank-0 card.
    pub anchor: Point,
    /// Size of the whole stack viewport.
    pub viewport: Size,
    /// Unscaled size of one card.
    pub child: Size,
    bottom_margin_top: f64,
    y_offset_step: f64,
}

impl Geometry {
    /// Measure the stack. Returns `None` while the viewport has no area yet,
    /// which keeps every geometry-dependent operation a no-op.
    pub fn measure(config: &StackConfig, viewport: Size, child: Size) -> Option<Self> {
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return None;
        }
        let left = (viewport.width - child.width) / 2.0;
        Some(Self {
            anchor: Point::new(left, config.item_margin_top),
            viewport,
            child,
            bottom_margin_top: config.bottom_margin_top,
            y_offset_step: config.y_offset_step,
        })
    }

    /// Rest position of a card at `depth`.
    pub fn rest_position(&self, depth: usize) -> Point {
        Point::new(
            self.anchor.x,
            self.anchor.y + self.y_offset_step * depth as f64,
        )
    }

    /// Where a host should place controls below the stack.
    pub fn controls_top(&self) -> f64 {
        self.anchor.y
            + self.child.height
            + self.y_offset_step * MAX_DEPTH as f64
            + self.bottom_margin_top
    }

    /// On-screen bounds of a card at `position` drawn with `scale`.
    ///
    /// Scaling pivots around the bottom-center of the card.
    pub fn card_bounds(&self, position: Point, scale: f64) -> Rect {
        let w = self.child.width;
        let h = self.child.height;
        let x0 = position.x + w * (1.0 - scale) / 2.0;
        let y0 = position.y + h * (1.0 - scale);
        Rect::new(x0, y0, x0 + w * scale, position.y + h)
    }
}
