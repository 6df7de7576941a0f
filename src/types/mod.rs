mod condition_set;
mod conjunction;
mod error;
mod leaf;
mod outcome;
mod with_result;

pub use condition_set::{Condition, ConditionSet, ConditionSetBuilder, Leaves};
pub use conjunction::ConditionConjunction;
pub use error::ConditionSetError;
pub use leaf::{
    ConditionInput, CoopInput, DerivedFieldSource, DerivedFieldSpec, LeafCondition,
    MatchingValues, SignalId, SignalRef, Threshold, ValueComparator,
};
pub use outcome::{Bool3, ConditionOutcome, ConditionResult, ErrorRecord, classify};
pub use with_result::{ConditionSetWithResult, ConditionWithResult, LeafConditionWithResult};
