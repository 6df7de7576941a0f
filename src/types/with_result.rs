use std::fmt;

use super::condition_set::{Condition, ConditionSet};
use super::conjunction::ConditionConjunction;
use super::leaf::LeafCondition;
use super::outcome::{ConditionOutcome, ConditionResult};

/// A leaf condition together with the result of running it. `result` is
/// `None` when the leaf was skipped.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LeafConditionWithResult {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub condition: LeafCondition,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub result: Option<ConditionResult>,
}

/// The annotated form of a [`ConditionSet`] produced by evaluation.
///
/// `conditions` are listed in the order they were scheduled (cheapest
/// first). Children that were short-circuited appear in their unevaluated
/// form, with no result anywhere in their subtree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ConditionSetWithResult {
    pub conjunction: ConditionConjunction,
    pub conditions: Vec<ConditionWithResult>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub result: Option<ConditionResult>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum ConditionWithResult {
    Set(ConditionSetWithResult),
    Leaf(LeafConditionWithResult),
}

impl ConditionWithResult {
    #[must_use]
    pub fn result(&self) -> Option<&ConditionResult> {
        match self {
            ConditionWithResult::Leaf(leaf) => leaf.result.as_ref(),
            ConditionWithResult::Set(set) => set.result.as_ref(),
        }
    }

    #[must_use]
    pub fn outcome(&self) -> Option<ConditionOutcome> {
        self.result().map(|r| r.outcome)
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.result().is_none()
    }
}

impl ConditionSetWithResult {
    #[must_use]
    pub fn outcome(&self) -> Option<ConditionOutcome> {
        self.result.as_ref().map(|r| r.outcome)
    }

    /// Leaves whose signal actually ran, in evaluation order.
    #[must_use]
    pub fn evaluated_leaves(&self) -> Vec<&LeafConditionWithResult> {
        let mut out = Vec::new();
        collect_evaluated(&self.conditions, &mut out);
        out
    }
}

fn collect_evaluated<'a>(
    conditions: &'a [ConditionWithResult],
    out: &mut Vec<&'a LeafConditionWithResult>,
) {
    for condition in conditions {
        match condition {
            ConditionWithResult::Leaf(leaf) if leaf.result.is_some() => out.push(leaf),
            ConditionWithResult::Leaf(_) => {}
            ConditionWithResult::Set(set) => collect_evaluated(&set.conditions, out),
        }
    }
}

// Unevaluated (skipped) forms.

impl From<&LeafCondition> for LeafConditionWithResult {
    fn from(condition: &LeafCondition) -> Self {
        Self {
            condition: condition.clone(),
            result: None,
        }
    }
}

impl From<&ConditionSet> for ConditionSetWithResult {
    fn from(set: &ConditionSet) -> Self {
        Self {
            conjunction: set.conjunction(),
            conditions: set.conditions().iter().map(ConditionWithResult::from).collect(),
            result: None,
        }
    }
}

impl From<&Condition> for ConditionWithResult {
    fn from(condition: &Condition) -> Self {
        match condition {
            Condition::Leaf(leaf) => ConditionWithResult::Leaf(leaf.into()),
            Condition::Set(set) => ConditionWithResult::Set(set.into()),
        }
    }
}

impl fmt::Display for ConditionSetWithResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_set(f, self, 0)
    }
}

fn write_outcome(f: &mut fmt::Formatter<'_>, result: Option<&ConditionResult>) -> fmt::Result {
    match result {
        Some(r) => write!(f, "[{}]", r.outcome),
        None => write!(f, "[skipped]"),
    }
}

fn write_set(f: &mut fmt::Formatter<'_>, set: &ConditionSetWithResult, depth: usize) -> fmt::Result {
    write!(f, "{:indent$}", "", indent = depth * 2)?;
    write_outcome(f, set.result.as_ref())?;
    writeln!(f, " {}", set.conjunction)?;
    for child in &set.conditions {
        match child {
            ConditionWithResult::Set(nested) => write_set(f, nested, depth + 1)?,
            ConditionWithResult::Leaf(leaf) => {
                write!(f, "{:indent$}", "", indent = (depth + 1) * 2)?;
                write_outcome(f, leaf.result.as_ref())?;
                writeln!(f, " {}", leaf.condition)?;
            }
        }
    }
    Ok(())
}
