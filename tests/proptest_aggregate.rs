mod strategies;

use proptest::prelude::*;
use sieve::ConditionConjunction::{And, Or, Xor};
use sieve::{Bool3, ConditionOutcome, aggregate, classify, try_aggregate_partial};
use strategies::{
    arb_conjunction, arb_falsey, arb_null, arb_outcome, arb_truthy, with_one_shuffled,
};

fn count(outcomes: &[ConditionOutcome], bucket: Bool3) -> usize {
    outcomes.iter().filter(|o| o.classify() == bucket).count()
}

// ---------------------------------------------------------------------------
// AND
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn and_any_falsey_is_false(
        (outcomes, _) in with_one_shuffled(prop::collection::vec(arb_outcome(), 0..10), arb_falsey())
    ) {
        prop_assert_eq!(classify(aggregate(&outcomes, And)), Bool3::False);
    }

    #[test]
    fn and_preserves_the_only_falsey_outcome(
        (outcomes, falsey) in with_one_shuffled(
            prop::collection::vec(prop_oneof![arb_truthy(), arb_null()], 0..10),
            arb_falsey(),
        )
    ) {
        prop_assert_eq!(aggregate(&outcomes, And), falsey);
    }

    #[test]
    fn and_all_truthy_is_true(outcomes in prop::collection::vec(arb_truthy(), 0..10)) {
        prop_assert_eq!(classify(aggregate(&outcomes, And)), Bool3::True);
    }

    #[test]
    fn and_truthy_null_mix_is_null(
        truthy in prop::collection::vec(arb_truthy(), 0..10),
        nulls in prop::collection::vec(arb_null(), 1..10),
    ) {
        let outcomes: Vec<_> = truthy.into_iter().chain(nulls).collect();
        prop_assert_eq!(classify(aggregate(&outcomes, And)), Bool3::Null);
    }
}

// ---------------------------------------------------------------------------
// OR
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn or_any_truthy_is_true(
        (outcomes, _) in with_one_shuffled(prop::collection::vec(arb_outcome(), 0..10), arb_truthy())
    ) {
        prop_assert_eq!(classify(aggregate(&outcomes, Or)), Bool3::True);
    }

    #[test]
    fn or_preserves_the_only_truthy_outcome(
        (outcomes, truthy) in with_one_shuffled(
            prop::collection::vec(prop_oneof![arb_falsey(), arb_null()], 0..10),
            arb_truthy(),
        )
    ) {
        prop_assert_eq!(aggregate(&outcomes, Or), truthy);
    }

    #[test]
    fn or_all_falsey_is_false(outcomes in prop::collection::vec(arb_falsey(), 0..10)) {
        prop_assert_eq!(classify(aggregate(&outcomes, Or)), Bool3::False);
    }

    #[test]
    fn or_falsey_null_mix_is_null(
        falsey in prop::collection::vec(arb_falsey(), 0..10),
        nulls in prop::collection::vec(arb_null(), 1..10),
    ) {
        let outcomes: Vec<_> = falsey.into_iter().chain(nulls).collect();
        prop_assert_eq!(classify(aggregate(&outcomes, Or)), Bool3::Null);
    }
}

// ---------------------------------------------------------------------------
// XOR
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn xor_true_iff_exactly_one_truthy_and_no_null(outcomes in prop::collection::vec(arb_outcome(), 0..10)) {
        let truthy = count(&outcomes, Bool3::True);
        let nulls = count(&outcomes, Bool3::Null);
        let expected = if truthy == 1 && nulls == 0 {
            Bool3::True
        } else if nulls > 0 && truthy < 2 {
            Bool3::Null
        } else {
            Bool3::False
        };
        prop_assert_eq!(classify(aggregate(&outcomes, Xor)), expected);
    }
}

// ---------------------------------------------------------------------------
// Partial aggregation never contradicts full aggregation.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn partial_result_agrees_with_full_result(
        (outcomes, subset, conjunction) in prop::collection::vec(arb_outcome(), 0..12)
            .prop_flat_map(|outcomes| {
                let len = outcomes.len();
                (
                    Just(outcomes.clone()),
                    prop::sample::subsequence(outcomes, 0..=len).prop_shuffle(),
                    arb_conjunction(),
                )
            })
    ) {
        let full = aggregate(&outcomes, conjunction);
        if let Some(partial) = try_aggregate_partial(&subset, conjunction) {
            prop_assert_eq!(
                classify(partial),
                classify(full),
                "partial {:?} of {:?} decided {} but full aggregate is {}",
                subset,
                outcomes,
                partial,
                full,
            );
        }
    }

    #[test]
    fn partial_over_every_prefix_agrees(
        outcomes in prop::collection::vec(arb_outcome(), 1..12),
        conjunction in arb_conjunction(),
    ) {
        let full = aggregate(&outcomes, conjunction);
        for end in 0..=outcomes.len() {
            if let Some(partial) = try_aggregate_partial(&outcomes[..end], conjunction) {
                prop_assert_eq!(classify(partial), classify(full));
            }
        }
    }
}
