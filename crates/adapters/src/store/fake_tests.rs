// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{DateTime, Duration, TimeZone, Utc};

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 10, hour, 0, 0).unwrap()
}

fn range() -> DateRange {
    DateRange::new(at(0), at(0) + Duration::days(1))
}

#[tokio::test]
async fn query_filters_range_and_flag_in_date_order() {
    let store = FakeStore::with_events([
        Event::new("late", "late", at(20), "+1"),
        Event::new("early", "early", at(8), "+1"),
        Event::new("done", "done", at(9), "+1").notified(),
        Event::new("tomorrow", "tomorrow", at(0) + Duration::days(1), "+1"),
    ]);

    let events = store.query_events(range(), false).await.unwrap();
    let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["early", "late"]);
    assert_eq!(
        store.calls(),
        vec![StoreCall::Query {
            range: range(),
            notified: false
        }]
    );
}

#[tokio::test]
async fn injected_query_failures_are_consumed() {
    let store = FakeStore::with_events([Event::new("a", "a", at(8), "+1")]);
    store.fail_next_queries(2);

    assert!(store.query_events(range(), false).await.is_err());
    assert!(store.query_events(range(), false).await.is_err());
    assert_eq!(store.query_events(range(), false).await.unwrap().len(), 1);
    assert_eq!(store.query_count(), 3);
}

#[tokio::test]
async fn mark_notified_sets_flag() {
    let store = FakeStore::with_events([Event::new("a", "a", at(8), "+1")]);

    store.mark_notified(&EventId::new("a")).await.unwrap();

    assert!(store.get(&EventId::new("a")).unwrap().notified);
    assert!(store.query_events(range(), false).await.unwrap().is_empty());
}

#[tokio::test]
async fn mark_notified_unknown_id_is_not_found() {
    let store = FakeStore::new();
    let err = store.mark_notified(&EventId::new("ghost")).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id.as_str() == "ghost"));
}

#[tokio::test]
async fn mark_notified_failure_leaves_flag_unset() {
    let store = FakeStore::with_events([Event::new("a", "a", at(8), "+1")]);
    store.set_mark_notified_fails(true);

    assert!(store.mark_notified(&EventId::new("a")).await.is_err());
    assert!(!store.get(&EventId::new("a")).unwrap().notified);
}
