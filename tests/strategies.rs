#![allow(dead_code)]

use std::collections::HashMap;

use proptest::prelude::*;
use sieve::{
    Bool3, Condition, ConditionConjunction, ConditionInput, ConditionOutcome, ConditionSet,
    LeafCondition, SignalId, SignalRef, aggregate,
};

fn outcomes_where(bucket: Bool3) -> Vec<ConditionOutcome> {
    ConditionOutcome::ALL
        .iter()
        .copied()
        .filter(|o| o.classify() == bucket)
        .collect()
}

pub fn arb_outcome() -> impl Strategy<Value = ConditionOutcome> {
    prop::sample::select(ConditionOutcome::ALL.to_vec())
}

pub fn arb_truthy() -> impl Strategy<Value = ConditionOutcome> {
    prop::sample::select(outcomes_where(Bool3::True))
}

pub fn arb_falsey() -> impl Strategy<Value = ConditionOutcome> {
    prop::sample::select(outcomes_where(Bool3::False))
}

pub fn arb_null() -> impl Strategy<Value = ConditionOutcome> {
    prop::sample::select(outcomes_where(Bool3::Null))
}

pub fn arb_conjunction() -> impl Strategy<Value = ConditionConjunction> {
    prop::sample::select(ConditionConjunction::ALL.to_vec())
}

/// `base` with `extra` inserted, then shuffled.
pub fn with_one_shuffled(
    base: impl Strategy<Value = Vec<ConditionOutcome>>,
    extra: impl Strategy<Value = ConditionOutcome>,
) -> impl Strategy<Value = (Vec<ConditionOutcome>, ConditionOutcome)> {
    (base, extra).prop_flat_map(|(mut outcomes, extra)| {
        outcomes.push(extra);
        (Just(outcomes).prop_shuffle(), Just(extra))
    })
}

/// A generated condition node: leaves carry the outcome their signal will
/// produce and the cost the oracle will report for it.
#[derive(Debug, Clone)]
pub enum GenNode {
    Leaf {
        outcome: ConditionOutcome,
        cost: u32,
    },
    Set {
        conjunction: ConditionConjunction,
        children: Vec<GenNode>,
    },
}

fn arb_node() -> impl Strategy<Value = GenNode> {
    let leaf = (arb_outcome(), 0_u32..50).prop_map(|(outcome, cost)| GenNode::Leaf { outcome, cost });
    leaf.prop_recursive(3, 32, 4, |inner| {
        (arb_conjunction(), prop::collection::vec(inner, 1..=4))
            .prop_map(|(conjunction, children)| GenNode::Set { conjunction, children })
    })
}

/// A complete generated condition tree.
#[derive(Debug, Clone)]
pub struct GenTree {
    pub conjunction: ConditionConjunction,
    pub children: Vec<GenNode>,
}

pub fn arb_tree() -> impl Strategy<Value = GenTree> {
    (arb_conjunction(), prop::collection::vec(arb_node(), 1..=5))
        .prop_map(|(conjunction, children)| GenTree { conjunction, children })
}

/// Everything needed to evaluate a [`GenTree`]: the condition set plus the
/// outcome and cost of every signal in it. Each leaf gets its own signal.
#[derive(Debug)]
pub struct BuiltTree {
    pub set: ConditionSet,
    pub outcomes: HashMap<SignalId, ConditionOutcome>,
    pub costs: HashMap<SignalId, f64>,
}

impl GenTree {
    /// # Panics
    ///
    /// Panics if a generated set is empty (the generators never produce one).
    #[must_use]
    pub fn build(&self) -> BuiltTree {
        let mut outcomes = HashMap::new();
        let mut costs = HashMap::new();
        let conditions = self
            .children
            .iter()
            .map(|node| build_node(node, &mut outcomes, &mut costs))
            .collect();
        let set = ConditionSet::new(self.conjunction, conditions).expect("generated set is non-empty");
        BuiltTree { set, outcomes, costs }
    }

    /// The outcome with every leaf evaluated and no short-circuiting.
    #[must_use]
    pub fn full_outcome(&self) -> ConditionOutcome {
        let outcomes: Vec<_> = self.children.iter().map(node_full_outcome).collect();
        aggregate(&outcomes, self.conjunction)
    }
}

fn build_node(
    node: &GenNode,
    outcomes: &mut HashMap<SignalId, ConditionOutcome>,
    costs: &mut HashMap<SignalId, f64>,
) -> Condition {
    match node {
        GenNode::Leaf { outcome, cost } => {
            let id = SignalId::new(format!("signal-{}", outcomes.len()));
            outcomes.insert(id.clone(), *outcome);
            costs.insert(id.clone(), f64::from(*cost));
            Condition::Leaf(LeafCondition::new(ConditionInput::UserId).with_signal(SignalRef::new(id)))
        }
        GenNode::Set {
            conjunction,
            children,
        } => {
            let conditions = children
                .iter()
                .map(|child| build_node(child, outcomes, costs))
                .collect();
            Condition::Set(ConditionSet::new(*conjunction, conditions).expect("generated set is non-empty"))
        }
    }
}

fn node_full_outcome(node: &GenNode) -> ConditionOutcome {
    match node {
        GenNode::Leaf { outcome, .. } => *outcome,
        GenNode::Set {
            conjunction,
            children,
        } => {
            let outcomes: Vec<_> = children.iter().map(node_full_outcome).collect();
            aggregate(&outcomes, *conjunction)
        }
    }
}
