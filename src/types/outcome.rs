use std::fmt;

use crate::error::SignalError;

/// Three-valued truth used when combining condition outcomes, with SQL-style
/// `NULL` semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bool3 {
    True,
    False,
    Null,
}

impl Bool3 {
    /// `None` stands for [`Bool3::Null`].
    #[must_use]
    pub fn as_option(self) -> Option<bool> {
        match self {
            Bool3::True => Some(true),
            Bool3::False => Some(false),
            Bool3::Null => None,
        }
    }
}

impl From<Option<bool>> for Bool3 {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Bool3::True,
            Some(false) => Bool3::False,
            None => Bool3::Null,
        }
    }
}

impl fmt::Display for Bool3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bool3::True => write!(f, "true"),
            Bool3::False => write!(f, "false"),
            Bool3::Null => write!(f, "null"),
        }
    }
}

/// The outcome of evaluating one node of a condition tree.
///
/// `Passed`, `Failed` and `Inapplicable` are completion outcomes: the signal
/// ran and produced an answer. `Errored` is a failure outcome: the signal
/// could not produce an answer at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum ConditionOutcome {
    Passed,
    Failed,
    /// The condition does not apply to this content (e.g. the input field is
    /// missing from the item type).
    Inapplicable,
    Errored,
}

impl ConditionOutcome {
    pub const ALL: [ConditionOutcome; 4] = [
        ConditionOutcome::Passed,
        ConditionOutcome::Failed,
        ConditionOutcome::Inapplicable,
        ConditionOutcome::Errored,
    ];

    /// Map this outcome onto three-valued logic.
    ///
    /// `Passed` is the only truthy outcome. `Failed` and `Inapplicable` are
    /// both falsey, and `Errored` is null-like.
    #[must_use]
    pub fn classify(self) -> Bool3 {
        match self {
            ConditionOutcome::Passed => Bool3::True,
            ConditionOutcome::Failed | ConditionOutcome::Inapplicable => Bool3::False,
            ConditionOutcome::Errored => Bool3::Null,
        }
    }

    #[must_use]
    pub fn is_failure(self) -> bool {
        matches!(self, ConditionOutcome::Errored)
    }
}

/// Free-function form of [`ConditionOutcome::classify()`].
#[must_use]
pub fn classify(outcome: ConditionOutcome) -> Bool3 {
    outcome.classify()
}

impl fmt::Display for ConditionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionOutcome::Passed => write!(f, "PASSED"),
            ConditionOutcome::Failed => write!(f, "FAILED"),
            ConditionOutcome::Inapplicable => write!(f, "INAPPLICABLE"),
            ConditionOutcome::Errored => write!(f, "ERRORED"),
        }
    }
}

/// A serializable snapshot of the error behind an `Errored` outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ErrorRecord {
    pub kind: String,
    pub message: String,
}

impl From<&SignalError> for ErrorRecord {
    fn from(err: &SignalError) -> Self {
        Self {
            kind: err.kind().to_owned(),
            message: err.to_string(),
        }
    }
}

/// The result attached to an evaluated node.
///
/// Completion outcomes may carry the signal's score and the value that
/// matched. Failure outcomes carry only the error.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
#[must_use]
pub struct ConditionResult {
    pub outcome: ConditionOutcome,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub score: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub matched_value: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub error: Option<ErrorRecord>,
}

impl ConditionResult {
    pub fn new(outcome: ConditionOutcome) -> Self {
        Self {
            outcome,
            score: None,
            matched_value: None,
            error: None,
        }
    }

    pub fn passed() -> Self {
        Self::new(ConditionOutcome::Passed)
    }

    pub fn failed() -> Self {
        Self::new(ConditionOutcome::Failed)
    }

    pub fn inapplicable() -> Self {
        Self::new(ConditionOutcome::Inapplicable)
    }

    pub fn errored(err: &SignalError) -> Self {
        Self {
            error: Some(ErrorRecord::from(err)),
            ..Self::new(ConditionOutcome::Errored)
        }
    }

    pub fn with_score(mut self, score: impl Into<String>) -> Self {
        self.score = Some(score.into());
        self
    }

    pub fn with_matched_value(mut self, value: impl Into<String>) -> Self {
        self.matched_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn classify(&self) -> Bool3 {
        self.outcome.classify()
    }
}

impl From<ConditionOutcome> for ConditionResult {
    fn from(outcome: ConditionOutcome) -> Self {
        Self::new(outcome)
    }
}
