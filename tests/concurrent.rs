
use std::sync::Arc;
use std::thread;

use sieve::{ConditionConjunction, ConditionOutcome, ConditionSet, ConditionSetBuilder, Evaluator, NoopTracer};
use stubs::{ScriptedRunner, leaf, prices};

fn moderation_policy() -> ConditionSet {
    // spam OR (nsfw AND adult_account)
    ConditionSetBuilder::new(ConditionConjunction::Or)
        .leaf(leaf("spam"))
        .set(ConditionConjunction::And, |s| s.leaf(leaf("nsfw")).leaf(leaf("adult_account")))
        .build()
        .unwrap()
}

fn runner() -> ScriptedRunner {
    ScriptedRunner::new()
        .outcome("spam", ConditionOutcome::Failed)
        .outcome("nsfw", ConditionOutcome::Passed)
        .outcome("adult_account", ConditionOutcome::Passed)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shared_evaluator_across_tasks() {
    let evaluator = Arc::new(
        Evaluator::new(
            runner(),
            prices(&[("spam", 1.0), ("nsfw", 3.0), ("adult_account", 0.5)]),
        )
        .with_tracer(NoopTracer),
    );
    let policy = Arc::new(moderation_policy());

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let evaluator = Arc::clone(&evaluator);
            let policy = Arc::clone(&policy);
            tokio::spawn(async move { evaluator.evaluate(&policy, &()).await })
        })
        .collect();

    for handle in handles {
        let result = handle.await.unwrap().unwrap();
        assert_eq!(result.outcome(), Some(ConditionOutcome::Passed));
    }

    // Every pass ran spam (cost 1) first, then the nested set (cost 3.5).
    let calls = evaluator.runner().calls();
    assert_eq!(calls.len(), 32 * 3);
    assert_eq!(calls.iter().filter(|c| *c == "spam").count(), 32);
}

#[test]
fn shared_evaluator_across_threads() {
    let evaluator = Arc::new(Evaluator::new(
        runner(),
        prices(&[("spam", 1.0), ("nsfw", 3.0), ("adult_account", 0.5)]),
    ));
    let policy = Arc::new(moderation_policy());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let evaluator = Arc::clone(&evaluator);
            let policy = Arc::clone(&policy);
            thread::spawn(move || futures::executor::block_on(evaluator.evaluate(&policy, &())))
        })
        .collect();

    for handle in handles {
        let result = handle.join().unwrap().unwrap();
        assert_eq!(result.outcome(), Some(ConditionOutcome::Passed));
        assert_eq!(result.evaluated_leaves().len(), 3);
    }
}

#[tokio::test]
async fn independent_passes_do_not_share_state() {
    let policy = moderation_policy();
    let oracle = prices(&[("spam", 1.0), ("nsfw", 3.0), ("adult_account", 0.5)]);

    let passing = runner();
    let failing = ScriptedRunner::new()
        .outcome("spam", ConditionOutcome::Failed)
        .outcome("nsfw", ConditionOutcome::Failed)
        .outcome("adult_account", ConditionOutcome::Passed);

    let (a, b) = tokio::join!(
        sieve::evaluate(&policy, &(), &oracle, &NoopTracer, &passing),
        sieve::evaluate(&policy, &(), &oracle, &NoopTracer, &failing),
    );

    assert_eq!(a.unwrap().outcome(), Some(ConditionOutcome::Passed));
    assert_eq!(b.unwrap().outcome(), Some(ConditionOutcome::Failed));
}
