// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const INSERT: &str = r#"{
    "operation": "INSERT",
    "event": {
        "id": 7,
        "title": "pick up kids",
        "date": "2026-06-01T20:00:00Z",
        "reminder_minutes": 10,
        "notified": false,
        "owner_reference": "+5215550002"
    }
}"#;

#[test]
fn parses_insert() {
    let message = FeedMessage::parse(INSERT).unwrap();

    assert_eq!(message.operation(), FeedOperation::Insert);
    assert_eq!(message.id(), &EventId::new("7"));
    let FeedMessage::Insert(event) = message else {
        panic!("expected insert");
    };
    assert_eq!(event.title, "pick up kids");
    assert_eq!(event.reminder_minutes, Some(10));
}

#[test]
fn operation_is_case_insensitive() {
    let payload = INSERT.replace("INSERT", "update");
    let message = FeedMessage::parse(&payload).unwrap();
    assert_eq!(message.operation(), FeedOperation::Update);
}

#[test]
fn delete_needs_only_an_id() {
    let message = FeedMessage::parse(r#"{"operation":"DELETE","event":{"id":"abc"}}"#).unwrap();
    assert_eq!(message, FeedMessage::Delete(EventId::new("abc")));
}

#[test]
fn rejects_missing_operation() {
    let err = FeedMessage::parse(r#"{"event":{"id":"abc"}}"#).unwrap_err();
    assert!(matches!(err, FeedError::MissingOperation));
}

#[test]
fn rejects_unknown_operation() {
    let err = FeedMessage::parse(r#"{"operation":"TRUNCATE","event":{"id":"abc"}}"#).unwrap_err();
    assert!(matches!(err, FeedError::UnknownOperation(op) if op == "TRUNCATE"));
}

#[test]
fn rejects_missing_event_id() {
    let err =
        FeedMessage::parse(r#"{"operation":"INSERT","event":{"date":"2026-06-01T20:00:00Z"}}"#)
            .unwrap_err();
    assert!(matches!(err, FeedError::MissingEventId));

    let err = FeedMessage::parse(r#"{"operation":"DELETE","event":{"id":null}}"#).unwrap_err();
    assert!(matches!(err, FeedError::MissingEventId));
}

#[test]
fn rejects_missing_event() {
    let err = FeedMessage::parse(r#"{"operation":"DELETE"}"#).unwrap_err();
    assert!(matches!(err, FeedError::MissingEvent));
}

#[test]
fn rejects_upsert_without_date() {
    let err = FeedMessage::parse(r#"{"operation":"INSERT","event":{"id":"abc"}}"#).unwrap_err();
    assert!(matches!(err, FeedError::InvalidEvent { id, .. } if id == "abc"));
}

#[test]
fn rejects_invalid_json() {
    assert!(matches!(
        FeedMessage::parse("{not json").unwrap_err(),
        FeedError::Json(_)
    ));
}
