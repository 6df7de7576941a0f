use futures::future::{BoxFuture, FutureExt, try_join_all};

use crate::{Condition, CostOracle, EvaluationError, LeafCondition, SignalId};

/// Estimate what evaluating `condition` would cost, for scheduling.
///
/// A leaf costs its signal plus every signal in its derived-field recipe; a
/// leaf with neither is free. A nested set costs the sum of its children.
/// Sibling lookups are issued concurrently.
///
/// # Errors
///
/// Returns [`EvaluationError::Cost`] if the oracle fails for any signal, and
/// [`EvaluationError::InvalidCost`] if it returns a negative or non-finite
/// value.
pub fn cost<'a, O>(condition: &'a Condition, oracle: &'a O) -> BoxFuture<'a, Result<f64, EvaluationError>>
where
    O: CostOracle + ?Sized,
{
    async move {
        match condition {
            Condition::Leaf(leaf) => leaf_cost(leaf, oracle).await,
            Condition::Set(set) => {
                let costs = try_join_all(set.conditions().iter().map(|c| cost(c, oracle))).await?;
                Ok(costs.into_iter().sum())
            }
        }
    }
    .boxed()
}

async fn leaf_cost<O>(leaf: &LeafCondition, oracle: &O) -> Result<f64, EvaluationError>
where
    O: CostOracle + ?Sized,
{
    let costs = try_join_all(leaf.signal_ids().map(|id| signal_cost(id, oracle))).await?;
    Ok(costs.into_iter().sum())
}

async fn signal_cost<O>(signal: &SignalId, oracle: &O) -> Result<f64, EvaluationError>
where
    O: CostOracle + ?Sized,
{
    let cost = oracle
        .signal_cost(signal)
        .await
        .map_err(|source| EvaluationError::Cost {
            signal: signal.clone(),
            source,
        })?;
    if !cost.is_finite() || cost < 0.0 {
        return Err(EvaluationError::InvalidCost {
            signal: signal.clone(),
            cost,
        });
    }
    Ok(cost)
}
