//! Which events a sweep reminds.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn due_window_selects_only_near_events() {
    let world = World::new();
    let now = world.clock.now();
    world.seed("a", now + Duration::minutes(20));
    world.seed("b", now + Duration::minutes(40));
    world
        .store
        .insert(Event::new("c", "c", now + Duration::minutes(10), "owner-c").notified());
    world.load().await;

    assert_eq!(world.cached_ids(), vec!["a", "b"]);

    let report = world.sweep().await;

    assert_eq!(report.notified, vec![EventId::new("a")]);
    assert_eq!(world.sent_to("a"), 1);
    assert_eq!(world.sent_to("b"), 0);
    assert_eq!(world.sent_to("c"), 0);
}

#[tokio::test]
async fn window_edges_are_inclusive() {
    let world = World::new();
    let now = world.clock.now();
    world.seed("now", now);
    world.seed("edge", now + Duration::minutes(30));
    world.seed("past-edge", now + Duration::minutes(31));
    world.load().await;

    let report = world.sweep().await;

    assert_eq!(
        report.notified,
        vec![EventId::new("now"), EventId::new("edge")]
    );
}

#[tokio::test]
async fn reminder_text_uses_local_time() {
    let world = World::new();
    world.seed("standup", world.local(0, 9, 25));
    world.load().await;

    world.sweep().await;

    let calls = world.notifier.calls_to("owner-standup");
    assert_eq!(calls[0].text, "Reminder: standup at 09:25 (25 min)");
}

#[tokio::test]
async fn configured_default_lead_applies() {
    let mut config = SchedulerConfig::default();
    config.default_reminder_minutes = 60;
    let world = World::with_config(config);
    world.seed("b", world.clock.now() + Duration::minutes(40));
    world.load().await;

    assert_eq!(world.sweep().await.notified, vec![EventId::new("b")]);
}
