use futures::future::{BoxFuture, FutureExt, try_join_all};
use tracing::{Instrument, debug, debug_span, trace, warn};

use crate::aggregate::{aggregate, try_aggregate_partial};
use crate::cost::cost;
use crate::{
    Condition, ConditionOutcome, ConditionResult, ConditionSet, ConditionSetWithResult,
    ConditionWithResult, CostOracle, EvaluationError, LeafCondition, LeafConditionWithResult,
    SignalRunner, SpanTracer, Tracer,
};

/// Evaluates condition sets against content, cheapest conditions first,
/// stopping as soon as each set's outcome is decided.
///
/// Holds no per-evaluation state: one `Evaluator` can serve any number of
/// concurrent evaluations.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
///
/// use async_trait::async_trait;
/// use sieve::{
///     ConditionConjunction, ConditionInput, ConditionOutcome, ConditionResult,
///     ConditionSetBuilder, Evaluator, LeafCondition, SignalError, SignalId, SignalRef,
///     SignalRunner,
/// };
///
/// struct ContainsLink;
///
/// #[async_trait]
/// impl SignalRunner<str> for ContainsLink {
///     async fn run_leaf(&self, _leaf: &LeafCondition, text: &str) -> Result<ConditionResult, SignalError> {
///         Ok(if text.contains("http") { ConditionResult::passed() } else { ConditionResult::failed() })
///     }
/// }
///
/// let set = ConditionSetBuilder::new(ConditionConjunction::Or)
///     .leaf(LeafCondition::new(ConditionInput::UserId).with_signal(SignalRef::new("links")))
///     .build()
///     .unwrap();
/// let prices = HashMap::from([(SignalId::from("links"), 1.0)]);
/// let evaluator = Evaluator::new(ContainsLink, prices);
///
/// let result = futures::executor::block_on(evaluator.evaluate(&set, "see http://x")).unwrap();
/// assert_eq!(result.outcome(), Some(ConditionOutcome::Passed));
/// ```
#[derive(Debug)]
pub struct Evaluator<R, O, T = SpanTracer> {
    runner: R,
    oracle: O,
    tracer: T,
}

impl<R, O> Evaluator<R, O> {
    /// Create an evaluator that reports leaf failures to the current
    /// `tracing` span.
    #[must_use]
    pub fn new(runner: R, oracle: O) -> Self {
        Self {
            runner,
            oracle,
            tracer: SpanTracer,
        }
    }
}

impl<R, O, T> Evaluator<R, O, T> {
    /// Replace the tracer leaf failures are reported to.
    #[must_use]
    pub fn with_tracer<T2: Tracer>(self, tracer: T2) -> Evaluator<R, O, T2> {
        Evaluator {
            runner: self.runner,
            oracle: self.oracle,
            tracer,
        }
    }

    #[must_use]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    #[must_use]
    pub fn oracle(&self) -> &O {
        &self.oracle
    }
}

impl<R, O, T> Evaluator<R, O, T>
where
    O: CostOracle,
    T: Tracer,
{
    /// Evaluate `set` against `ctx`.
    ///
    /// # Errors
    ///
    /// Fails only when the cost oracle fails or returns an invalid cost, since
    /// evaluation order cannot be established without it. Signal failures are
    /// recorded as `Errored` outcomes in the returned tree.
    pub async fn evaluate<C>(
        &self,
        set: &ConditionSet,
        ctx: &C,
    ) -> Result<ConditionSetWithResult, EvaluationError>
    where
        C: ?Sized + Sync,
        R: SignalRunner<C>,
    {
        evaluate(set, ctx, &self.oracle, &self.tracer, &self.runner).await
    }
}

/// Free-function form of [`Evaluator::evaluate()`], taking the collaborators
/// directly.
///
/// # Errors
///
/// See [`Evaluator::evaluate()`].
pub async fn evaluate<C, R, O, T>(
    set: &ConditionSet,
    ctx: &C,
    oracle: &O,
    tracer: &T,
    runner: &R,
) -> Result<ConditionSetWithResult, EvaluationError>
where
    C: ?Sized + Sync,
    R: SignalRunner<C> + ?Sized,
    O: CostOracle + ?Sized,
    T: Tracer + ?Sized,
{
    let scope = Scope {
        runner,
        oracle,
        tracer,
    };
    let (conditions, outcome) = evaluate_children(set, ctx, scope).await?;
    Ok(ConditionSetWithResult {
        conjunction: set.conjunction(),
        conditions,
        result: Some(ConditionResult::new(outcome)),
    })
}

/// The collaborators of one evaluation pass.
struct Scope<'a, R: ?Sized, O: ?Sized, T: ?Sized> {
    runner: &'a R,
    oracle: &'a O,
    tracer: &'a T,
}

impl<R: ?Sized, O: ?Sized, T: ?Sized> Clone for Scope<'_, R, O, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: ?Sized, O: ?Sized, T: ?Sized> Copy for Scope<'_, R, O, T> {}

/// Evaluate the children of `set` in ascending cost order, one at a time,
/// until their combined outcome is decided. Returns the annotated children
/// (in scheduling order) and the set's outcome.
fn evaluate_children<'a, C, R, O, T>(
    set: &'a ConditionSet,
    ctx: &'a C,
    scope: Scope<'a, R, O, T>,
) -> BoxFuture<'a, Result<(Vec<ConditionWithResult>, ConditionOutcome), EvaluationError>>
where
    C: ?Sized + Sync,
    R: SignalRunner<C> + ?Sized,
    O: CostOracle + ?Sized,
    T: Tracer + ?Sized,
{
    let conjunction = set.conjunction();
    let span = debug_span!(
        "condition_set",
        %conjunction,
        conditions = set.conditions().len()
    );

    async move {
        let costs = try_join_all(set.conditions().iter().map(|c| cost(c, scope.oracle))).await?;

        let mut scheduled: Vec<(&Condition, f64)> = set.conditions().iter().zip(costs).collect();
        // Stable: equal costs keep their authored order.
        scheduled.sort_by(|a, b| a.1.total_cmp(&b.1));
        debug!(
            costs = ?scheduled.iter().map(|(_, c)| *c).collect::<Vec<_>>(),
            "scheduled conditions by cost"
        );

        let mut conditions = Vec::with_capacity(scheduled.len());
        let mut outcomes = Vec::with_capacity(scheduled.len());
        let mut latched: Option<ConditionOutcome> = None;

        for (condition, _) in scheduled {
            if latched.is_some() {
                trace!("skipping condition; set outcome already decided");
                conditions.push(ConditionWithResult::from(condition));
                continue;
            }

            let (evaluated, outcome) = match condition {
                Condition::Set(nested) => {
                    let (children, outcome) = evaluate_children(nested, ctx, scope).await?;
                    let evaluated = ConditionWithResult::Set(ConditionSetWithResult {
                        conjunction: nested.conjunction(),
                        conditions: children,
                        result: Some(ConditionResult::new(outcome)),
                    });
                    (evaluated, outcome)
                }
                Condition::Leaf(leaf) => {
                    let result = run_leaf(leaf, ctx, scope).await;
                    let outcome = result.outcome;
                    let evaluated = ConditionWithResult::Leaf(LeafConditionWithResult {
                        condition: leaf.clone(),
                        result: Some(result),
                    });
                    (evaluated, outcome)
                }
            };

            conditions.push(evaluated);
            outcomes.push(outcome);

            latched = try_aggregate_partial(&outcomes, conjunction);
            if let Some(outcome) = latched {
                debug!(
                    %outcome,
                    evaluated = outcomes.len(),
                    remaining = set.conditions().len() - outcomes.len(),
                    "short-circuited"
                );
            }
        }

        let outcome = latched.unwrap_or_else(|| aggregate(&outcomes, conjunction));
        Ok((conditions, outcome))
    }
    .instrument(span)
    .boxed()
}

/// Run one leaf. A runner failure becomes an `Errored` result and is
/// reported to the tracer; it never aborts the pass.
async fn run_leaf<C, R, O, T>(leaf: &LeafCondition, ctx: &C, scope: Scope<'_, R, O, T>) -> ConditionResult
where
    C: ?Sized + Sync,
    R: SignalRunner<C> + ?Sized,
    O: ?Sized,
    T: Tracer + ?Sized,
{
    match scope.runner.run_leaf(leaf, ctx).await {
        Ok(result) => result,
        Err(err) => {
            warn!(condition = %leaf, error = %err, "leaf condition failed; recording ERRORED");
            if scope.tracer.is_recording() {
                scope.tracer.record_exception(&err);
            }
            ConditionResult::errored(&err)
        }
    }
}
