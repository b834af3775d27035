//! Delivery guarantees: eviction, at-least-once, no overlap.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn success_evicts_and_reload_does_not_resurrect() {
    let world = World::new();
    world.seed("a", world.clock.now() + Duration::minutes(5));
    world.load().await;

    world.sweep().await;

    assert!(world.cached_ids().is_empty());
    assert!(world.store.get(&EventId::new("a")).unwrap().notified);

    world.load().await;
    assert!(world.cached_ids().is_empty());
}

#[tokio::test]
async fn persist_failure_means_another_attempt_next_tick() {
    let world = World::new();
    world.seed("a", world.clock.now() + Duration::minutes(5));
    world.load().await;
    world.store.set_mark_notified_fails(true);

    let first = world.sweep().await;
    assert_eq!(first.persist_failures, 1);
    assert_eq!(world.cached_ids(), vec!["a"]);

    world.store.set_mark_notified_fails(false);
    world.clock.advance(Duration::minutes(1));
    let second = world.sweep().await;

    assert_eq!(second.notified, vec![EventId::new("a")]);
    assert_eq!(world.sent_to("a"), 2);
    assert_eq!(world.mark_calls(), 2);
    assert!(world.cached_ids().is_empty());
}

#[tokio::test]
async fn notifier_failure_is_isolated_per_event() {
    let world = World::new();
    world.seed("bad", world.clock.now() + Duration::minutes(5));
    world.seed("good", world.clock.now() + Duration::minutes(6));
    world.load().await;
    world.notifier.fail_destination("owner-bad");

    let report = world.sweep().await;

    assert_eq!(report.notify_failures, 1);
    assert_eq!(report.notified, vec![EventId::new("good")]);
    assert_eq!(world.cached_ids(), vec!["bad"]);
    assert_eq!(world.mark_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn slow_sweep_is_not_overlapped() {
    let world = World::new();
    world.seed("a", world.clock.now() + Duration::minutes(5));
    world.seed("b", world.clock.now() + Duration::minutes(6));
    world.load().await;
    world
        .notifier
        .set_latency(std::time::Duration::from_secs(120));

    let sweeper = world.scheduling.sweeper();
    let (first, second) = tokio::join!(sweeper.sweep(), sweeper.sweep());

    assert!(!first.skipped);
    assert!(second.skipped);
    assert_eq!(first.notified.len(), 2);
    assert_eq!(world.sent_to("a"), 1);
    assert_eq!(world.sent_to("b"), 1);
}

#[tokio::test(start_paused = true)]
async fn scheduled_ticks_never_double_send() {
    let world = World::new();
    world.seed("a", world.clock.now() + Duration::minutes(5));
    world
        .notifier
        .set_latency(std::time::Duration::from_secs(150));

    world.scheduling.start().await.unwrap();
    tokio::time::sleep(std::time::Duration::from_secs(600)).await;
    world.scheduling.shutdown().await;

    assert_eq!(world.sent_to("a"), 1);
    assert!(world.cached_ids().is_empty());
}
