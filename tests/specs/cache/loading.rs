//! Loading today's working set.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn load_keeps_only_todays_pending_events() {
    let world = World::new();
    world.seed("yesterday", world.local(-1, 18, 0));
    world.seed("morning", world.local(0, 7, 30));
    world.seed("evening", world.local(0, 20, 0));
    world.seed("tomorrow", world.local(1, 8, 0));
    world
        .store
        .insert(Event::new("done", "done", world.local(0, 12, 0), "owner-done").notified());

    world.load().await;

    assert_eq!(world.cached_ids(), vec!["morning", "evening"]);
}

#[tokio::test]
async fn load_queries_the_local_day_for_pending_rows() {
    let world = World::new();

    world.load().await;

    assert_eq!(
        world.store.calls(),
        vec![StoreCall::Query {
            range: rmd_core::DateRange::new(world.local(0, 0, 0), world.local(1, 0, 0)),
            notified: false,
        }]
    );
}

#[tokio::test]
async fn failed_load_keeps_previous_contents() {
    let world = World::new();
    world.seed("a", world.local(0, 15, 0));
    world.load().await;

    world.seed("b", world.local(0, 16, 0));
    world.store.fail_next_queries(1);
    assert!(world.scheduling.loader().load().await.is_err());

    assert_eq!(world.cached_ids(), vec!["a"]);
}

#[tokio::test]
async fn spillover_extends_the_range_past_midnight() {
    let world = World::with_config(SchedulerConfig::default().with_spillover_minutes(30));
    world.seed("late", world.local(0, 23, 50));
    world.seed("just-after", world.local(1, 0, 5));
    world.seed("too-late", world.local(1, 0, 45));

    world.load().await;

    assert_eq!(world.cached_ids(), vec!["late", "just-after"]);
}
