//! Cost-ordered, short-circuiting evaluation of moderation condition sets
//! under three-valued logic.

mod aggregate;
mod cost;
mod error;
mod evaluate;
mod signal;
mod tracer;
mod types;

pub use aggregate::{aggregate, try_aggregate_partial};
pub use cost::cost;
pub use error::{EvaluationError, SieveError, SignalError};
pub use evaluate::{Evaluator, evaluate};
pub use signal::{CostOracle, SignalRunner};
pub use tracer::{NoopTracer, SpanTracer, Tracer};
pub use types::{
    Bool3, Condition, ConditionConjunction, ConditionInput, ConditionOutcome, ConditionResult,
    ConditionSet, ConditionSetBuilder, ConditionSetError, ConditionSetWithResult,
    ConditionWithResult, CoopInput, DerivedFieldSource, DerivedFieldSpec, ErrorRecord,
    LeafCondition, LeafConditionWithResult, Leaves, MatchingValues, SignalId, SignalRef,
    Threshold, ValueComparator, classify,
};
