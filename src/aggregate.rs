//! Pure three-valued aggregation of child outcomes.
//!
//! `aggregate` computes a condition set's outcome from all of its children.
//! `try_aggregate_partial` computes it from the outcomes observed so far, and
//! only answers when no outcome of the unobserved children could change the
//! three-valued result. The evaluator uses it after every child to decide
//! whether the remaining siblings can be skipped.

use crate::{Bool3, ConditionConjunction, ConditionOutcome};

/// Outcomes grouped by their three-valued classification. Only the first
/// falsey and first null-like outcome are kept, in input order, because
/// those are the identities aggregation preserves.
#[derive(Debug, Default)]
struct Tally {
    truthy: usize,
    first_falsey: Option<ConditionOutcome>,
    first_null: Option<ConditionOutcome>,
}

impl Tally {
    fn of(outcomes: &[ConditionOutcome]) -> Self {
        let mut tally = Tally::default();
        for &outcome in outcomes {
            match outcome.classify() {
                Bool3::True => tally.truthy += 1,
                Bool3::False => {
                    tally.first_falsey.get_or_insert(outcome);
                }
                Bool3::Null => {
                    tally.first_null.get_or_insert(outcome);
                }
            }
        }
        tally
    }
}

/// Combine every child outcome of a condition set into the set's outcome.
///
/// - `AND`: the first falsey outcome if there is one (`NULL AND FALSE` is
///   false), else the first null-like outcome, else `Passed`.
/// - `OR`: `Passed` if any outcome is truthy, else the first null-like
///   outcome, else `Failed`.
/// - `XOR`: `Passed` with exactly one truthy outcome and no null-like ones;
///   the first null-like outcome when there are at most one truthy outcome
///   and at least one null-like one; otherwise `Failed`.
#[must_use]
pub fn aggregate(outcomes: &[ConditionOutcome], conjunction: ConditionConjunction) -> ConditionOutcome {
    let tally = Tally::of(outcomes);
    match conjunction {
        ConditionConjunction::And => tally
            .first_falsey
            .or(tally.first_null)
            .unwrap_or(ConditionOutcome::Passed),
        ConditionConjunction::Or => {
            if tally.truthy > 0 {
                ConditionOutcome::Passed
            } else {
                tally.first_null.unwrap_or(ConditionOutcome::Failed)
            }
        }
        ConditionConjunction::Xor => match (tally.truthy, tally.first_null) {
            (1, None) => ConditionOutcome::Passed,
            // An unresolved null could still be the one true child, or a second one.
            (0 | 1, Some(null)) => null,
            _ => ConditionOutcome::Failed,
        },
    }
}

/// Determine a condition set's outcome from a subset of its children's
/// outcomes, if that subset already fixes it.
///
/// Returns `None` unless every possible outcome of the remaining children
/// leads to the same three-valued result.
#[must_use]
pub fn try_aggregate_partial(
    outcomes: &[ConditionOutcome],
    conjunction: ConditionConjunction,
) -> Option<ConditionOutcome> {
    let tally = Tally::of(outcomes);
    match conjunction {
        ConditionConjunction::And => tally.first_falsey,
        ConditionConjunction::Or => (tally.truthy > 0).then_some(ConditionOutcome::Passed),
        // Two trues can never come back down to exactly one.
        ConditionConjunction::Xor => (tally.truthy > 1).then_some(ConditionOutcome::Failed),
    }
}
