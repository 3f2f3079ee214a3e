//! Property-based tests for conversion.
//!
//! These verify the properties every strategy must share:
//! - Converting to the model and back reproduces the wire message
//! - Naive, cached and compiled strategies agree on output and errors,
//!   including the partially written destination after a failure

mod common;

use common::*;
use fieldbridge_core::{
    ConversionStrategy, ConvertError, Direction, NaiveStrategy, Record, WireTimestamp,
};
use proptest::prelude::*;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn text() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 ]{0,24}").unwrap()
}

/// Finite f64 values that are exactly representable as f32.
fn f32_exact() -> impl Strategy<Value = f64> {
    any::<f32>()
        .prop_filter("finite", |f| f.is_finite())
        .prop_map(f64::from)
}

fn timestamp() -> impl Strategy<Value = WireTimestamp> {
    (-4_000_000_000i64..4_000_000_000, 0i32..1_000_000_000)
        .prop_map(|(seconds, nanos)| WireTimestamp::new(seconds, nanos))
}

fn address_message() -> impl Strategy<Value = AddressMessage> {
    (text(), text(), text()).prop_map(|(street, city, zip)| AddressMessage { street, city, zip })
}

fn item_message() -> impl Strategy<Value = ItemMessage> {
    (any::<i32>(), text()).prop_map(|(id, name)| ItemMessage { id, name })
}

fn user_message_strategy() -> impl Strategy<Value = UserMessage> {
    (
        (any::<i32>(), text(), text(), any::<u32>(), f32_exact()),
        (
            timestamp(),
            text(),
            prop::collection::vec(any::<u8>(), 0..16),
            prop::collection::vec(text(), 0..4),
        ),
        (address_message(), prop::collection::vec(item_message(), 0..4)),
    )
        .prop_map(
            |(
                (id, name, email, age, score),
                (created_at, password, avatar, tags),
                (address, items),
            )| UserMessage {
                id,
                name,
                email: Some(email),
                age,
                score,
                created_at,
                password,
                avatar,
                tags,
                address: Some(address),
                items,
                on_complete: Default::default(),
                trace_id: String::new(),
            },
        )
}

fn counter_message() -> impl Strategy<Value = CounterMessage> {
    let count = prop_oneof![any::<i32>().prop_map(i64::from), any::<i64>()];
    let ratio = prop_oneof![
        f32_exact(),
        any::<f64>().prop_filter("finite", |f| f.is_finite())
    ];
    (count, ratio).prop_map(|(count, ratio)| CounterMessage { count, ratio })
}

fn run<S: Record, D: Record + Default>(
    strategy: &dyn ConversionStrategy,
    src: &S,
    direction: Direction,
) -> (D, Result<(), ConvertError>) {
    let mut dst = D::default();
    let outcome = strategy.convert(
        Some(src as &dyn Record),
        Some(&mut dst as &mut dyn Record),
        direction,
    );
    (dst, outcome)
}

// =============================================================================
// ROUND TRIP
// =============================================================================

mod round_trip {
    use super::*;

    proptest! {
        /// Wire -> model -> wire reproduces every shared field.
        ///
        /// Optional wire fields are always generated as `Some`: the model
        /// side stores `email` and `address` without presence, so `None`
        /// comes back as `Some` of the zero value.
        #[test]
        fn wire_survives_model_round_trip(wire in user_message_strategy()) {
            for strategy in isolated_strategies() {
                let (model, outcome) = run::<UserMessage, User>(strategy.as_ref(), &wire, Direction::ToModel);
                prop_assert_eq!(outcome, Ok(()));
                let (back, outcome) = run::<User, UserMessage>(strategy.as_ref(), &model, Direction::ToWire);
                prop_assert_eq!(outcome, Ok(()));
                prop_assert_eq!(&back, &wire);
            }
        }

        /// Nested lists keep their length and order.
        #[test]
        fn nested_list_order_is_preserved(items in prop::collection::vec(item_message(), 0..12)) {
            let wire = OrderMessage { items: items.clone() };
            for strategy in isolated_strategies() {
                let (order, outcome) = run::<OrderMessage, Order>(strategy.as_ref(), &wire, Direction::ToModel);
                prop_assert_eq!(outcome, Ok(()));
                prop_assert_eq!(order.items.len(), items.len());
                for (item, source) in order.items.iter().zip(&items) {
                    prop_assert_eq!(item.id, i64::from(source.id));
                    prop_assert_eq!(&item.name, &source.name);
                }
            }
        }
    }
}

// =============================================================================
// STRATEGY EQUIVALENCE
// =============================================================================

mod equivalence {
    use super::*;

    proptest! {
        /// All tiers produce the same record and the same outcome, even when
        /// narrowing fails part-way through.
        #[test]
        fn tiers_agree_on_narrowing(wire in counter_message()) {
            let results: Vec<(Counter, Result<(), ConvertError>)> = isolated_strategies()
                .iter()
                .map(|s| run(s.as_ref(), &wire, Direction::ToModel))
                .collect();
            prop_assert_eq!(&results[0], &results[1]);
            prop_assert_eq!(&results[1], &results[2]);
        }

        /// All tiers agree when writing models back to the wire, where
        /// `age` and `id` may not fit.
        #[test]
        fn tiers_agree_on_wire_output(
            wire in user_message_strategy(),
            id in prop_oneof![any::<i32>().prop_map(i64::from), any::<i64>()],
            age in prop::option::of(any::<i64>()),
        ) {
            let (model, _) = run::<UserMessage, User>(&NaiveStrategy::new(), &wire, Direction::ToModel);
            let model = User { id, age, ..model };
            let results: Vec<(UserMessage, Result<(), ConvertError>)> = isolated_strategies()
                .iter()
                .map(|s| run(s.as_ref(), &model, Direction::ToWire))
                .collect();
            prop_assert_eq!(&results[0], &results[1]);
            prop_assert_eq!(&results[1], &results[2]);
        }

        /// Timestamps, valid or not, convert identically in every tier.
        #[test]
        fn tiers_agree_on_time_codec(seconds in any::<i64>(), nanos in any::<i32>()) {
            let wire = EventMessage { at: WireTimestamp::new(seconds, nanos) };
            let results: Vec<(Event, Result<(), ConvertError>)> = isolated_strategies()
                .iter()
                .map(|s| run(s.as_ref(), &wire, Direction::ToModel))
                .collect();
            prop_assert_eq!(&results[0], &results[1]);
            prop_assert_eq!(&results[1], &results[2]);
        }
    }
}
