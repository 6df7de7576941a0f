//! Evaluate a small moderation policy against a few posts.
//!
//! Run with `RUST_LOG=sieve=debug cargo run --example moderate` to watch the
//! scheduler skip work.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use sieve::{
    ConditionConjunction, ConditionInput, ConditionResult, ConditionSetBuilder, Evaluator,
    LeafCondition, SignalError, SignalId, SignalRef, SignalRunner, Threshold, ValueComparator,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Signals backed by word lists. `slow_model` stands in for a remote
/// classifier: it sleeps, and times out on very long posts.
struct KeywordSignals {
    lists: HashMap<SignalId, Vec<&'static str>>,
}

impl KeywordSignals {
    fn new() -> Self {
        let lists = HashMap::from([
            (SignalId::from("spam_words"), vec!["free money", "click here", "winner"]),
            (SignalId::from("slurs"), vec!["idiot", "moron"]),
            (SignalId::from("links"), vec!["http://", "https://"]),
        ]);
        Self { lists }
    }
}

#[async_trait]
impl SignalRunner<str> for KeywordSignals {
    async fn run_leaf(&self, leaf: &LeafCondition, text: &str) -> Result<ConditionResult, SignalError> {
        let id = leaf
            .signal_id()
            .ok_or_else(|| SignalError::message("leaf has no signal"))?;

        if id.as_str() == "slow_model" {
            tokio::time::sleep(Duration::from_millis(20)).await;
            if text.len() > 200 {
                return Err(SignalError::Timeout(Duration::from_millis(20)));
            }
            let shouting = text.chars().filter(char::is_ascii_uppercase).count();
            #[allow(clippy::cast_precision_loss)]
            let score = shouting as f64 / text.len().max(1) as f64;
            let passed = match &leaf.threshold {
                Some(Threshold::Number(t)) => score > *t,
                _ => score > 0.5,
            };
            let result = if passed {
                ConditionResult::passed()
            } else {
                ConditionResult::failed()
            };
            return Ok(result.with_score(format!("{score:.2}")));
        }

        let words = self
            .lists
            .get(id)
            .ok_or_else(|| SignalError::message(format!("unknown signal '{id}'")))?;
        let lowered = text.to_lowercase();
        Ok(match words.iter().find(|w| lowered.contains(*w)) {
            Some(hit) => ConditionResult::passed().with_matched_value(*hit),
            None => ConditionResult::failed(),
        })
    }
}

fn on_text(signal: &str) -> LeafCondition {
    LeafCondition::new(ConditionInput::ContentField {
        name: "body".to_owned(),
        item_type_id: "post".to_owned(),
    })
    .with_signal(SignalRef::new(signal))
}

#[tokio::main]
async fn main() -> Result<(), sieve::SieveError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sieve=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    // Flag spam, or abusive posts that are also shouting or linking out.
    let policy = ConditionSetBuilder::new(ConditionConjunction::Or)
        .leaf(on_text("spam_words"))
        .set(ConditionConjunction::And, |s| {
            s.leaf(on_text("slurs")).set(ConditionConjunction::Or, |s| {
                s.leaf(on_text("links")).leaf(
                    on_text("slow_model")
                        .with_comparator(ValueComparator::GreaterThan)
                        .with_threshold(0.3),
                )
            })
        })
        .build()?;

    let prices = HashMap::from([
        (SignalId::from("spam_words"), 1.0),
        (SignalId::from("slurs"), 1.0),
        (SignalId::from("links"), 0.5),
        (SignalId::from("slow_model"), 25.0),
    ]);
    let evaluator = Evaluator::new(KeywordSignals::new(), prices);

    let posts = [
        "WINNER! claim your free money today",
        "you absolute moron, read https://example.com",
        "YOU ARE AN IDIOT",
        "lovely weather for a walk",
    ];

    for post in posts {
        let result = evaluator.evaluate(&policy, post).await?;
        println!("{post:?}\n{result}");
    }

    Ok(())
}
