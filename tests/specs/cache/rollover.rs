//! Local-day rollover.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn midnight_reloads_once_before_next_sweep() {
    let world = World::new();
    world.seed("today", world.local(0, 22, 0));
    world.seed("tomorrow-early", world.local(1, 0, 20));
    world.seed("tomorrow-noon", world.local(1, 12, 0));
    world.load().await;
    assert_eq!(world.cached_ids(), vec!["today"]);

    world.clock.set(world.local(1, 0, 1));
    world.store.clear_calls();

    let check = world.scheduling.watcher().check().await;
    assert_eq!(
        check,
        DayCheck::Reloaded {
            day: start_day().succ_opt().unwrap(),
            count: 2
        }
    );
    assert_eq!(world.cached_ids(), vec!["tomorrow-early", "tomorrow-noon"]);

    // A second check in the same day does nothing
    assert_eq!(world.scheduling.watcher().check().await, DayCheck::Unchanged);
    assert_eq!(world.store.query_count(), 1);

    // The sweep that follows sees the new day's set
    let report = world.sweep().await;
    assert_eq!(report.notified, vec![EventId::new("tomorrow-early")]);
}

#[tokio::test]
async fn unsent_leftovers_from_yesterday_are_dropped() {
    let world = World::new();
    world.seed("missed", world.local(0, 23, 59));
    world.load().await;

    world.clock.set(world.local(1, 6, 0));
    world.scheduling.watcher().check().await;

    assert!(world.cached_ids().is_empty());
}
