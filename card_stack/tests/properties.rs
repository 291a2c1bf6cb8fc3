// Copyright 2025 the Card Stack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests over arbitrary interaction sequences.

use core::time::Duration;

use card_stack::config::{Geometry, StackConfig};
use card_stack::linkage::{MAX_LINKAGE_DISTANCE, linkage_rates};
use card_stack::panel::CardStack;
use card_stack::physics::classify_release;
use card_stack::provider::DataProvider;
use card_stack::types::{FlightType, PointerEvent, PointerId, SLOT_COUNT, SlotId, VanishDirection};
use kurbo::{Point, Size, Vec2};
use proptest::prelude::*;

#[derive(Debug)]
struct Numbers(Vec<u32>);

impl DataProvider for Numbers {
    type ItemId = u32;

    fn count(&self) -> usize {
        self.0.len()
    }

    fn item_at(&self, index: usize) -> Option<u32> {
        self.0.get(index).copied()
    }

    fn bind(&mut self, _slot: SlotId, _index: usize) {}
}

#[derive(Clone, Debug)]
enum Op {
    Down(f64, f64),
    Move(f64, f64),
    Up,
    Cancel,
    Frame(u64),
    Vanish(bool),
    Append(u8),
    Truncate(u8),
    Replace(u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0.0..600.0, 0.0..900.0).prop_map(|(x, y)| Op::Down(x, y)),
        (-200.0..200.0, -200.0..200.0).prop_map(|(x, y)| Op::Move(x, y)),
        Just(Op::Up),
        Just(Op::Cancel),
        (1u64..200).prop_map(Op::Frame),
        any::<bool>().prop_map(Op::Vanish),
        (1u8..6).prop_map(Op::Append),
        (0u8..8).prop_map(Op::Truncate),
        (100u32..200).prop_map(Op::Replace),
    ]
}

fn geometry() -> Geometry {
    Geometry::measure(
        &StackConfig::default(),
        Size::new(600.0, 900.0),
        Size::new(400.0, 500.0),
    )
    .expect("viewport has area")
}

proptest! {
    #[test]
    fn stack_invariants_hold_under_any_interaction(
        initial in 0usize..12,
        ops in prop::collection::vec(op(), 1..60),
    ) {
        let mut stack: CardStack<Numbers> = CardStack::new(StackConfig::default());
        stack.set_provider(Numbers((0..initial as u32).collect()));
        stack.layout(Size::new(600.0, 900.0), Size::new(400.0, 500.0));

        let pointer = PointerId(1);
        let mut t = Duration::ZERO;
        let mut at = Point::ZERO;
        for op in ops {
            t += Duration::from_millis(8);
            match op {
                Op::Down(x, y) => {
                    at = Point::new(x, y);
                    stack.handle(&PointerEvent::down(pointer, at, t));
                }
                Op::Move(dx, dy) => {
                    at += Vec2::new(dx, dy);
                    stack.handle(&PointerEvent::moved(pointer, at, t));
                }
                Op::Up => {
                    stack.handle(&PointerEvent::up(pointer, at, t));
                }
                Op::Cancel => {
                    stack.handle(&PointerEvent::cancel(pointer, at, t));
                }
                Op::Frame(ms) => {
                    stack.on_frame(Duration::from_millis(ms));
                }
                Op::Vanish(left) => {
                    let direction = if left {
                        VanishDirection::Left
                    } else {
                        VanishDirection::Right
                    };
                    stack.vanish(direction);
                }
                Op::Append(n) => {
                    let deck = stack.provider_mut().expect("provider set");
                    let next = deck.0.len() as u32;
                    deck.0.extend(next..next + u32::from(n));
                    stack.notify_data_changed();
                }
                Op::Truncate(n) => {
                    stack.provider_mut().expect("provider set").0.truncate(usize::from(n));
                    stack.notify_data_changed();
                }
                Op::Replace(first) => {
                    stack.provider_mut().expect("provider set").0 = (first..first + 8).collect();
                    stack.notify_data_changed();
                }
            }

            prop_assert!(stack.slots().is_permutation());
            prop_assert_eq!(stack.slots().order().len(), SLOT_COUNT);
            prop_assert!(stack.released_len() <= 1);
            for slot in stack.slots_top_down() {
                if slot.is_visible() {
                    prop_assert!(slot.bound_index().is_some());
                }
            }
            let count = stack.provider().map_or(0, Numbers::count);
            if count > 0 {
                prop_assert!(stack.show_index() < count);
            }
        }
    }

    #[test]
    fn classification_is_deterministic_and_bounded(
        dx in -800.0..800.0f64,
        dy in -800.0..800.0f64,
        vx in -5000.0..5000.0f64,
        vy in -5000.0..5000.0f64,
    ) {
        let g = geometry();
        let position = g.anchor + Vec2::new(dx, dy);
        let velocity = Vec2::new(vx, vy);
        let a = classify_release(&g, position, velocity);
        let b = classify_release(&g, position, velocity);
        prop_assert_eq!(a, b);

        let h = g.viewport.height;
        prop_assert!(a.target.y >= -h / 2.0 && a.target.y <= h);
        match a.flight {
            FlightType::VanishRight => {
                prop_assert_eq!(a.target.x, g.viewport.width);
            }
            FlightType::VanishLeft => {
                prop_assert_eq!(a.target.x, -g.child.width);
            }
            FlightType::ReturnCenter => {
                prop_assert_eq!(a.target, g.anchor);
            }
        }
    }

    #[test]
    fn slow_short_releases_return_to_center(
        dx in -300.0..=300.0f64,
        dy in -300.0..=300.0f64,
        vx in -800.0..=800.0f64,
        vy in -5000.0..5000.0f64,
    ) {
        let g = geometry();
        let r = classify_release(&g, g.anchor + Vec2::new(dx, dy), Vec2::new(vx, vy));
        prop_assert_eq!(r.flight, FlightType::ReturnCenter);
    }

    #[test]
    fn cascade_rates_are_monotonic(
        a in 0.0..=MAX_LINKAGE_DISTANCE,
        b in 0.0..=MAX_LINKAGE_DISTANCE,
    ) {
        let (near, far) = if a <= b { (a, b) } else { (b, a) };
        let (first_near, second_near) = linkage_rates(near);
        let (first_far, second_far) = linkage_rates(far);
        prop_assert!(first_near <= first_far);
        prop_assert!(second_near <= second_far);
        prop_assert!(second_near <= first_near);
        prop_assert!(second_far <= first_far);
        prop_assert!((0.0..=1.0).contains(&first_far));
        prop_assert!((0.0..=1.0).contains(&second_far));
    }
}

#[test]
fn cascade_rates_span_full_range() {
    assert_eq!(linkage_rates(0.0), (0.0, 0.0));
    assert_eq!(linkage_rates(MAX_LINKAGE_DISTANCE).0, 1.0);
    assert_eq!(linkage_rates(MAX_LINKAGE_DISTANCE * 1.1).1, 1.0);
}
