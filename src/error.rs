use std::time::Duration;

use thiserror::Error;

use crate::{ConditionSetError, SignalId};

/// Failure reported by a collaborator: a signal runner that could not
/// produce a result, or a cost oracle that could not price a signal.
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("signal call timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl SignalError {
    pub fn message(message: impl Into<String>) -> Self {
        SignalError::Message(message.into())
    }

    pub fn other(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        SignalError::Other(Box::new(err))
    }

    /// Short machine-readable name of the variant, recorded alongside the
    /// message on errored results.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            SignalError::Timeout(_) => "timeout",
            SignalError::Message(_) => "message",
            SignalError::Other(_) => "other",
        }
    }
}

/// Errors that abort an evaluation pass. Leaf failures never do; they become
/// `Errored` outcomes in the result tree instead.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("cost lookup failed for signal '{signal}'")]
    Cost {
        signal: SignalId,
        #[source]
        source: SignalError,
    },

    #[error("invalid cost {cost} for signal '{signal}'; costs must be finite and non-negative")]
    InvalidCost { signal: SignalId, cost: f64 },
}

/// Unified error type covering condition-set construction, evaluation, and
/// JSON loading.
#[derive(Debug, Error)]
pub enum SieveError {
    #[error(transparent)]
    ConditionSet(#[from] ConditionSetError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[cfg(feature = "serde")]
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
