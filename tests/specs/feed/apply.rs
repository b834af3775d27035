//! Change-feed application.

use crate::prelude::*;
use similar_asserts::assert_eq;

fn payload(operation: &str, id: &str, date: DateTime<Utc>, notified: bool) -> String {
    format!(
        r#"{{"operation":"{}","event":{{"id":"{}","title":"t","date":"{}","reminder_minutes":30,"notified":{},"owner_reference":"owner-{}"}}}}"#,
        operation,
        id,
        date.to_rfc3339(),
        notified,
        id
    )
}

#[tokio::test]
async fn repeated_insert_yields_one_entry() {
    let world = World::new();
    world.load().await;
    let insert = payload("INSERT", "e1", world.local(0, 14, 0), false);
    let listener = world.scheduling.listener();

    assert_eq!(listener.apply_json(&insert).unwrap(), FeedOutcome::Inserted);
    assert_eq!(listener.apply_json(&insert).unwrap(), FeedOutcome::Replaced);

    assert_eq!(world.cached_ids(), vec!["e1"]);
}

#[tokio::test]
async fn delete_of_absent_id_is_a_noop() {
    let world = World::new();
    world.seed("keep", world.local(0, 14, 0));
    world.load().await;

    let outcome = world
        .scheduling
        .listener()
        .apply_json(r#"{"operation":"DELETE","event":{"id":"ghost"}}"#)
        .unwrap();

    assert_eq!(outcome, FeedOutcome::Absent);
    assert_eq!(world.cached_ids(), vec!["keep"]);
}

#[tokio::test]
async fn update_of_unseen_id_inserts_it() {
    let world = World::new();
    world.load().await;

    let outcome = world
        .scheduling
        .listener()
        .apply_json(&payload("UPDATE", "missed", world.local(0, 14, 0), false))
        .unwrap();

    assert_eq!(outcome, FeedOutcome::Inserted);
    assert_eq!(world.cached_ids(), vec!["missed"]);
}

#[tokio::test]
async fn malformed_payloads_leave_cache_untouched() {
    let world = World::new();
    world.seed("keep", world.local(0, 14, 0));
    world.load().await;
    let listener = world.scheduling.listener();

    assert!(listener.apply_json(r#"{"event":{"id":"x"}}"#).is_err());
    assert!(listener.apply_json(r#"{"operation":"INSERT","event":{"title":"x"}}"#).is_err());
    assert!(listener.apply_json(r#"{"operation":"MERGE","event":{"id":"x"}}"#).is_err());

    assert_eq!(world.cached_ids(), vec!["keep"]);
}

#[tokio::test]
async fn store_echo_of_mark_notified_does_not_resurrect() {
    let world = World::new();
    let event = world.seed("soon", world.local(0, 9, 10));
    world.load().await;

    world.sweep().await;
    assert!(world.cached_ids().is_empty());

    // The store publishes its own UPDATE for the flag change
    world
        .scheduling
        .listener()
        .apply_json(&payload("UPDATE", "soon", event.date, true))
        .unwrap();
    world.sweep().await;

    assert!(world.cached_ids().is_empty());
    assert_eq!(world.sent_to("soon"), 1);
}

#[tokio::test]
async fn feed_insert_is_swept_without_reload() {
    let world = World::new();
    world.load().await;

    world
        .scheduling
        .listener()
        .apply_json(&payload("INSERT", "walk-in", world.local(0, 9, 15), false))
        .unwrap();
    world.store.insert(Event::new(
        "walk-in",
        "t",
        world.local(0, 9, 15),
        "owner-walk-in",
    ));

    let report = world.sweep().await;

    assert_eq!(report.notified, vec![EventId::new("walk-in")]);
    assert_eq!(world.store.query_count(), 1);
}
