use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{ConditionResult, LeafCondition, SignalError, SignalId};

/// Runs the signal behind a leaf condition against an evaluation context.
///
/// An `Err` is not fatal to the evaluation: the leaf is recorded as
/// `Errored` and its siblings still run. Deadlines belong here too; a
/// runner that times out should return [`SignalError::Timeout`].
#[async_trait]
pub trait SignalRunner<C: ?Sized + Sync>: Send + Sync {
    async fn run_leaf(&self, condition: &LeafCondition, ctx: &C) -> Result<ConditionResult, SignalError>;
}

/// Prices signals so cheaper conditions can run first.
///
/// Costs are dimensionless and must be finite and non-negative. Implementors
/// are free to memoize.
#[async_trait]
pub trait CostOracle: Send + Sync {
    async fn signal_cost(&self, signal: &SignalId) -> Result<f64, SignalError>;
}

#[async_trait]
impl<C, R> SignalRunner<C> for Arc<R>
where
    C: ?Sized + Sync,
    R: SignalRunner<C> + ?Sized,
{
    async fn run_leaf(&self, condition: &LeafCondition, ctx: &C) -> Result<ConditionResult, SignalError> {
        (**self).run_leaf(condition, ctx).await
    }
}

#[async_trait]
impl<C, R> SignalRunner<C> for &R
where
    C: ?Sized + Sync,
    R: SignalRunner<C> + ?Sized,
{
    async fn run_leaf(&self, condition: &LeafCondition, ctx: &C) -> Result<ConditionResult, SignalError> {
        (**self).run_leaf(condition, ctx).await
    }
}

#[async_trait]
impl<O: CostOracle + ?Sized> CostOracle for Arc<O> {
    async fn signal_cost(&self, signal: &SignalId) -> Result<f64, SignalError> {
        (**self).signal_cost(signal).await
    }
}

#[async_trait]
impl<O: CostOracle + ?Sized> CostOracle for &O {
    async fn signal_cost(&self, signal: &SignalId) -> Result<f64, SignalError> {
        (**self).signal_cost(signal).await
    }
}

/// A fixed price list. Looking up a signal with no entry is an error.
#[async_trait]
impl CostOracle for HashMap<SignalId, f64> {
    async fn signal_cost(&self, signal: &SignalId) -> Result<f64, SignalError> {
        self.get(signal)
            .copied()
            .ok_or_else(|| SignalError::message(format!("no cost registered for signal '{signal}'")))
    }
}
