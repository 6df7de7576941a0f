use std::slice;

use super::conjunction::ConditionConjunction;
use super::error::ConditionSetError;
use super::leaf::{LeafCondition, SignalId};

/// A node of a condition tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum Condition {
    Set(ConditionSet),
    Leaf(LeafCondition),
}

impl Condition {
    #[must_use]
    pub fn as_leaf(&self) -> Option<&LeafCondition> {
        match self {
            Condition::Leaf(leaf) => Some(leaf),
            Condition::Set(_) => None,
        }
    }

    #[must_use]
    pub fn as_set(&self) -> Option<&ConditionSet> {
        match self {
            Condition::Set(set) => Some(set),
            Condition::Leaf(_) => None,
        }
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        matches!(self, Condition::Set(_))
    }
}

impl From<LeafCondition> for Condition {
    fn from(leaf: LeafCondition) -> Self {
        Condition::Leaf(leaf)
    }
}

impl From<ConditionSet> for Condition {
    fn from(set: ConditionSet) -> Self {
        Condition::Set(set)
    }
}

/// An interior node: a non-empty list of conditions combined by a
/// conjunction.
///
/// Built with [`ConditionSetBuilder`] or [`ConditionSet::new()`]; both reject
/// an empty condition list, so every `ConditionSet` has at least one child.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", try_from = "RawConditionSet")
)]
pub struct ConditionSet {
    conjunction: ConditionConjunction,
    conditions: Vec<Condition>,
}

impl ConditionSet {
    /// # Errors
    ///
    /// Returns [`ConditionSetError::Empty`] if `conditions` is empty.
    pub fn new(
        conjunction: ConditionConjunction,
        conditions: Vec<Condition>,
    ) -> Result<Self, ConditionSetError> {
        if conditions.is_empty() {
            return Err(ConditionSetError::Empty { conjunction });
        }
        Ok(Self {
            conjunction,
            conditions,
        })
    }

    #[must_use]
    pub fn conjunction(&self) -> ConditionConjunction {
        self.conjunction
    }

    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Every leaf in the tree, depth-first in authored order.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            stack: vec![self.conditions.iter()],
        }
    }

    /// Every signal referenced anywhere in the tree, including the recipes of
    /// derived-field inputs. Signals may repeat.
    pub fn signals(&self) -> impl Iterator<Item = &SignalId> {
        self.leaves().flat_map(|leaf| leaf.signal_ids())
    }

    /// Parse a condition set from its stored JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`SieveError::Json`](crate::SieveError::Json) if the document is
    /// malformed or any condition set in it is empty.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, crate::SieveError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConditionSet {
    conjunction: ConditionConjunction,
    conditions: Vec<Condition>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawConditionSet> for ConditionSet {
    type Error = ConditionSetError;

    fn try_from(raw: RawConditionSet) -> Result<Self, Self::Error> {
        ConditionSet::new(raw.conjunction, raw.conditions)
    }
}

/// Depth-first iterator over the leaves of a [`ConditionSet`].
#[derive(Debug)]
pub struct Leaves<'a> {
    stack: Vec<slice::Iter<'a, Condition>>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a LeafCondition;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(Condition::Leaf(leaf)) => return Some(leaf),
                Some(Condition::Set(set)) => self.stack.push(set.conditions.iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Builder for constructing a [`ConditionSet`].
///
/// # Example
///
/// ```
/// use sieve::{ConditionConjunction, ConditionInput, ConditionSetBuilder, LeafCondition, SignalRef};
///
/// let leaf = |id: &str| {
///     LeafCondition::new(ConditionInput::UserId).with_signal(SignalRef::new(id))
/// };
///
/// let set = ConditionSetBuilder::new(ConditionConjunction::Or)
///     .leaf(leaf("known-spammer"))
///     .set(ConditionConjunction::And, |s| {
///         s.leaf(leaf("new-account")).leaf(leaf("link-heavy"))
///     })
///     .build()
///     .unwrap();
/// assert_eq!(set.leaves().count(), 3);
/// ```
#[derive(Debug)]
#[must_use]
pub struct ConditionSetBuilder {
    conjunction: ConditionConjunction,
    conditions: Vec<PendingCondition>,
}

#[derive(Debug)]
enum PendingCondition {
    Ready(Condition),
    Set(ConditionSetBuilder),
}

impl ConditionSetBuilder {
    pub fn new(conjunction: ConditionConjunction) -> Self {
        Self {
            conjunction,
            conditions: Vec::new(),
        }
    }

    pub fn leaf(mut self, leaf: LeafCondition) -> Self {
        self.conditions
            .push(PendingCondition::Ready(Condition::Leaf(leaf)));
        self
    }

    /// Add a nested condition set, defined by the closure.
    pub fn set(
        mut self,
        conjunction: ConditionConjunction,
        f: impl FnOnce(ConditionSetBuilder) -> ConditionSetBuilder,
    ) -> Self {
        self.conditions
            .push(PendingCondition::Set(f(ConditionSetBuilder::new(conjunction))));
        self
    }

    /// Add an already-built condition.
    pub fn condition(mut self, condition: impl Into<Condition>) -> Self {
        self.conditions
            .push(PendingCondition::Ready(condition.into()));
        self
    }

    /// # Errors
    ///
    /// Returns [`ConditionSetError::Empty`] if this set or any nested set has
    /// no conditions.
    pub fn build(self) -> Result<ConditionSet, ConditionSetError> {
        let conditions = self
            .conditions
            .into_iter()
            .map(|pending| match pending {
                PendingCondition::Ready(condition) => Ok(condition),
                PendingCondition::Set(builder) => builder.build().map(Condition::Set),
            })
            .collect::<Result<Vec<_>, _>>()?;
        ConditionSet::new(self.conjunction, conditions)
    }
}
