// Copyright 2025 the Card Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Release physics: classification, settle trajectories, and velocity tracking.
//!
//! ## Classification
//!
//! [`classify_release`] decides where a released card goes, first match wins:
//!
//! 1. Fast rightward fling: `vx > 800` and `|vy| < 3 * vx`.
//! 2. Fast leftward fling, symmetric.
//! 3. Far enough right of the anchor: `dx > 300` and `|dy| < 3 * dx`.
//! 4. Far enough left, symmetric.
//! 5. Anything else snaps back to the anchor.
//!
//! Vanishing targets lie just past the viewport edge, with the vertical
//! coordinate extrapolated along the velocity (or displacement) ray and then
//! clamped to `[-height / 2, height]`.
//!
//! ```
//! use card_stack::config::{Geometry, StackConfig};
//! use card_stack::physics::classify_release;
//! use card_stack::types::FlightType;
//! use kurbo::{Size, Vec2};
//!
//! let g = Geometry::measure(
//!     &StackConfig::default(),
//!     Size::new(600.0, 900.0),
//!     Size::new(400.0, 500.0),
//! )
//! .unwrap();
//! let release = classify_release(&g, g.anchor, Vec2::new(900.0, 0.0));
//! assert_eq!(release.flight, FlightType::VanishRight);
//! assert_eq!(release.target.x, 600.0);
//! ```
//!
//! ## Settling
//!
//! A [`Settle`] moves a card from its release point to its target over a
//! duration derived from the distance, following a quintic ease-out. It is
//! advanced explicitly with frame deltas so tests can drive it deterministically.

use alloc::collections::VecDeque;
use core::time::Duration;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

use crate::config::Geometry;
use crate::types::{FlightType, SlotId, VanishDirection};

/// Horizontal release speed (units/s) past which a fling vanishes the card.
pub const VELOCITY_THRESHOLD: f64 = 800.0;
/// Horizontal displacement past which a release vanishes the card.
pub const DISTANCE_THRESHOLD: f64 = 300.0;
/// How steep (vertical over horizontal) a fling or drag may be and still vanish.
pub const SLOPE_FACTOR: f64 = 3.0;
/// Extra distance past the edge for programmatic vanish targets.
pub const VANISH_OVERSHOOT: f64 = 100.0;
/// Reference drag range used to scale settle durations.
pub const DRAG_RANGE: f64 = 256.0;
/// Settle duration per [`DRAG_RANGE`] of travel, in milliseconds.
pub const BASE_SETTLE_MS: f64 = 256.0;
/// Upper bound on a settle's duration, in milliseconds.
pub const MAX_SETTLE_MS: f64 = 600.0;
/// Sample window for release velocity estimation.
pub const VELOCITY_WINDOW: Duration = Duration::from_millis(100);

/// Where a released card is headed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Release {
    /// Top-left position the card settles at.
    pub target: Point,
    /// Vanish left, vanish right, or return to the anchor.
    pub flight: FlightType,
}

/// Classify a release of a card whose top-left is at `position`.
pub fn classify_release(geometry: &Geometry, position: Point, velocity: Vec2) -> Release {
    let anchor = geometry.anchor;
    let child_w = geometry.child.width;
    let right = geometry.viewport.width;
    let left = -child_w;
    let Vec2 { x: vx, y: vy } = velocity;
    let Vec2 { x: dx, y: dy } = position - anchor;

    let (target, flight) = if vx > VELOCITY_THRESHOLD && vy.abs() < vx * SLOPE_FACTOR {
        let y = vy * (child_w + position.x) / vx + position.y;
        (Point::new(right, y), FlightType::VanishRight)
    } else if vx < -VELOCITY_THRESHOLD && vy.abs() < -vx * SLOPE_FACTOR {
        let y = vy * (child_w + position.x) / -vx + position.y;
        (Point::new(left, y), FlightType::VanishLeft)
    } else if dx > DISTANCE_THRESHOLD && dy.abs() < dx * SLOPE_FACTOR {
        let y = dy * (child_w + anchor.x) / dx + anchor.y;
        (Point::new(right, y), FlightType::VanishRight)
    } else if dx < -DISTANCE_THRESHOLD && dy.abs() < -dx * SLOPE_FACTOR {
        let y = dy * (child_w + anchor.x) / -dx + anchor.y;
        (Point::new(left, y), FlightType::VanishLeft)
    } else {
        (anchor, FlightType::ReturnCenter)
    };

    let h = geometry.viewport.height;
    Release {
        target: Point::new(target.x, target.y.clamp(-h / 2.0, h)),
        flight,
    }
}

/// Off-screen target for a vanish that was not driven by a gesture.
pub fn programmatic_target(geometry: &Geometry, direction: VanishDirection) -> Point {
    let x = match direction {
        VanishDirection::Left => -geometry.child.width - VANISH_OVERSHOOT,
        VanishDirection::Right => geometry.viewport.width + VANISH_OVERSHOOT,
    };
    Point::new(x, geometry.anchor.y + geometry.viewport.height / 2.0)
}

fn axis_settle_ms(distance: f64) -> f64 {
    if distance == 0.0 {
        return 0.0;
    }
    ((distance / DRAG_RANGE + 1.0) * BASE_SETTLE_MS).min(MAX_SETTLE_MS)
}

/// Duration of a settle covering `delta`.
///
/// Each axis gets `(|d| / DRAG_RANGE + 1) * BASE_SETTLE_MS`, capped at
/// [`MAX_SETTLE_MS`]; the two are blended by each axis' share of the travel.
pub fn settle_duration(delta: Vec2) -> Duration {
    let dx = delta.x.abs();
    let dy = delta.y.abs();
    let total = dx + dy;
    if total.is_nan() || total <= 0.0 {
        return Duration::ZERO;
    }
    let ms = axis_settle_ms(dx) * (dx / total) + axis_settle_ms(dy) * (dy / total);
    Duration::from_secs_f64(ms / 1000.0)
}

/// Quintic ease-out over `t` in `[0, 1]`.
pub fn ease_out_quint(t: f64) -> f64 {
    let u = t.clamp(0.0, 1.0) - 1.0;
    u * u * u * u * u + 1.0
}

/// A card animating from its release point toward a target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Settle {
    /// Slot being moved.
    pub slot: SlotId,
    /// Where it started.
    pub start: Point,
    /// Where it ends up.
    pub target: Point,
    /// What the flight means for the stack.
    pub flight: FlightType,
    duration: Duration,
    elapsed: Duration,
}

impl Settle {
    /// Start a settle of `slot` from `start` according to `release`.
    pub fn new(slot: SlotId, start: Point, release: Release) -> Self {
        Self {
            slot,
            start,
            target: release.target,
            flight: release.flight,
            duration: settle_duration(release.target - start),
            elapsed: Duration::ZERO,
        }
    }

    /// Total length of the animation.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether the card has reached its target.
    pub fn is_converged(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Current position along the trajectory.
    pub fn position(&self) -> Point {
        if self.is_converged() {
            return self.target;
        }
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.start.lerp(self.target, ease_out_quint(t))
    }

    /// Advance by `dt` and return the new position.
    pub fn advance(&mut self, dt: Duration) -> Point {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
        self.position()
    }

    /// Jump to the target.
    pub fn finish(&mut self) -> Point {
        self.elapsed = self.duration;
        self.target
    }
}

/// Estimates pointer velocity from recent samples.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    samples: VecDeque<(Duration, Point)>,
}

impl VelocityTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Record the pointer at `position` at `time`.
    pub fn add(&mut self, time: Duration, position: Point) {
        self.samples.push_back((time, position));
        while let Some(&(oldest, _)) = self.samples.front() {
            if time.saturating_sub(oldest) > VELOCITY_WINDOW {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Velocity in units per second across the window, each axis clamped to
    /// `[-max, max]`. Zero with fewer than two distinct timestamps.
    pub fn velocity(&self, max: f64) -> Vec2 {
        let (Some(&(t0, p0)), Some(&(t1, p1))) = (self.samples.front(), self.samples.back())
        else {
            return Vec2::ZERO;
        };
        let dt = t1.saturating_sub(t0).as_secs_f64();
        if dt <= 0.0 {
            return Vec2::ZERO;
        }
        let v = (p1 - p0) / dt;
        Vec2::new(v.x.clamp(-max, max), v.y.clamp(-max, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StackConfig;
    use kurbo::Size;

    fn geometry() -> Geometry {
        Geometry::measure(
            &StackConfig::default(),
            Size::new(600.0, 900.0),
            Size::new(400.0, 500.0),
        )
        .unwrap()
    }

    fn at(g: &Geometry, dx: f64, dy: f64) -> Point {
        g.anchor + Vec2::new(dx, dy)
    }

    #[test]
    fn fast_right_fling_vanishes_right() {
        let g = geometry();
        let r = classify_release(&g, g.anchor, Vec2::new(900.0, 0.0));
        assert_eq!(r.flight, FlightType::VanishRight);
        assert_eq!(r.target, Point::new(600.0, g.anchor.y));
    }

    #[test]
    fn fast_left_fling_extrapolates_along_velocity() {
        let g = geometry();
        let pos = at(&g, -20.0, 0.0);
        let r = classify_release(&g, pos, Vec2::new(-1000.0, 500.0));
        assert_eq!(r.flight, FlightType::VanishLeft);
        assert_eq!(r.target.x, -400.0);
        // 500 * (400 + 80) / 1000 + 10
        assert!((r.target.y - 250.0).abs() < 1e-9);
    }

    #[test]
    fn far_drag_vanishes_without_velocity() {
        let g = geometry();
        let r = classify_release(&g, at(&g, 350.0, 10.0), Vec2::ZERO);
        assert_eq!(r.flight, FlightType::VanishRight);
        let r = classify_release(&g, at(&g, -350.0, 10.0), Vec2::ZERO);
        assert_eq!(r.flight, FlightType::VanishLeft);
        assert_eq!(r.target.x, -400.0);
    }

    #[test]
    fn short_drag_returns_to_center() {
        let g = geometry();
        let r = classify_release(&g, at(&g, 50.0, 5.0), Vec2::ZERO);
        assert_eq!(r.flight, FlightType::ReturnCenter);
        assert_eq!(r.target, g.anchor);
    }

    #[test]
    fn steep_fling_does_not_count_as_vanish() {
        let g = geometry();
        let r = classify_release(&g, g.anchor, Vec2::new(900.0, 3000.0));
        assert_eq!(r.flight, FlightType::ReturnCenter);
        // Steep but far drags fall through to the displacement rule.
        let r = classify_release(&g, at(&g, 320.0, 100.0), Vec2::new(900.0, 3000.0));
        assert_eq!(r.flight, FlightType::VanishRight);
    }

    #[test]
    fn velocity_rule_wins_over_displacement() {
        let g = geometry();
        let r = classify_release(&g, at(&g, -350.0, 0.0), Vec2::new(1000.0, 0.0));
        assert_eq!(r.flight, FlightType::VanishRight);
    }

    #[test]
    fn extreme_slopes_are_clamped() {
        let g = geometry();
        let r = classify_release(&g, g.anchor, Vec2::new(900.0, 2600.0));
        assert_eq!(r.flight, FlightType::VanishRight);
        assert_eq!(r.target.y, 900.0);
        let r = classify_release(&g, g.anchor, Vec2::new(900.0, -2600.0));
        assert_eq!(r.target.y, -450.0);
    }

    #[test]
    fn programmatic_targets_overshoot_edges() {
        let g = geometry();
        assert_eq!(
            programmatic_target(&g, VanishDirection::Left),
            Point::new(-500.0, 460.0)
        );
        assert_eq!(
            programmatic_target(&g, VanishDirection::Right),
            Point::new(700.0, 460.0)
        );
    }

    #[test]
    fn settle_duration_scales_and_caps() {
        assert_eq!(settle_duration(Vec2::ZERO), Duration::ZERO);
        let short = settle_duration(Vec2::new(128.0, 0.0)).as_secs_f64();
        assert!((short - 0.384).abs() < 1e-6);
        let capped = settle_duration(Vec2::new(0.0, -2000.0)).as_secs_f64();
        assert!((capped - 0.6).abs() < 1e-6);
        // Mixed travel blends the per-axis durations by share of distance.
        let mixed = settle_duration(Vec2::new(128.0, 128.0)).as_secs_f64();
        assert!((mixed - 0.384).abs() < 1e-6);
    }

    #[test]
    fn ease_out_quint_endpoints() {
        assert_eq!(ease_out_quint(0.0), 0.0);
        assert_eq!(ease_out_quint(1.0), 1.0);
        assert!(ease_out_quint(0.5) > 0.5);
    }

    #[test]
    fn settle_converges_to_target() {
        let release = Release {
            target: Point::new(600.0, 10.0),
            flight: FlightType::VanishRight,
        };
        let mut s = Settle::new(SlotId::new(0), Point::new(100.0, 10.0), release);
        assert!(!s.is_converged());
        let mid = s.advance(Duration::from_millis(100));
        assert!(mid.x > 100.0 && mid.x < 600.0);
        s.advance(Duration::from_secs(5));
        assert!(s.is_converged());
        assert_eq!(s.position(), release.target);
    }

    #[test]
    fn zero_length_settle_is_already_converged() {
        let release = Release {
            target: Point::new(100.0, 10.0),
            flight: FlightType::ReturnCenter,
        };
        let s = Settle::new(SlotId::new(0), Point::new(100.0, 10.0), release);
        assert!(s.is_converged());
    }

    #[test]
    fn tracker_measures_recent_window() {
        let mut t = VelocityTracker::new();
        assert_eq!(t.velocity(8000.0), Vec2::ZERO);
        t.add(Duration::from_millis(0), Point::new(0.0, 0.0));
        // Falls out of the window once later samples arrive.
        t.add(Duration::from_millis(200), Point::new(10.0, 0.0));
        t.add(Duration::from_millis(250), Point::new(60.0, 5.0));
        let v = t.velocity(8000.0);
        assert!((v.x - 1000.0).abs() < 1e-6);
        assert!((v.y - 100.0).abs() < 1e-6);
        let capped = t.velocity(500.0);
        assert_eq!(capped.x, 500.0);
        assert!((capped.y - 100.0).abs() < 1e-6);
    }
}
