// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 2, 15, 0, 0).unwrap()
}

#[yare::parameterized(
    inside_window       = { 20, Some(30), true },
    at_window_edge      = { 30, Some(30), true },
    outside_window      = { 40, Some(30), false },
    starting_now        = { 0, Some(30), true },
    already_started     = { -5, Some(30), false },
    default_lead        = { 25, None, true },
    beyond_default_lead = { 31, None, false },
    zero_lead_not_yet   = { 1, Some(0), false },
)]
fn due_window(offset_minutes: i64, lead: Option<u32>, expected: bool) {
    let mut event = Event::new("e-1", "standup", now() + Duration::minutes(offset_minutes), "+100");
    event.reminder_minutes = lead;
    assert_eq!(event.is_due(now(), DEFAULT_REMINDER_MINUTES), expected);
}

#[test]
fn minutes_until_truncates_partial_minutes() {
    let event = Event::new("e-1", "call", now() + Duration::seconds(30 * 60 + 59), "+100");
    assert_eq!(event.minutes_until(now()), 30);
    assert!(event.is_due(now(), 30));
}

#[test]
fn deserializes_store_row_with_numeric_id() {
    let json = r#"{
        "id": 42,
        "title": "dentist",
        "date": "2026-04-02T17:30:00Z",
        "reminder_minutes": 15,
        "notified": false,
        "owner_reference": "whatsapp:+5215550001"
    }"#;

    let event: Event = serde_json::from_str(json).unwrap();
    assert_eq!(event.id, EventId::new("42"));
    assert_eq!(event.reminder_minutes, Some(15));
    assert_eq!(event.date, Utc.with_ymd_and_hms(2026, 4, 2, 17, 30, 0).unwrap());
}

#[test]
fn deserializes_offset_dates_into_utc() {
    let json = r#"{"id": "abc", "date": "2026-04-02T11:30:00-06:00"}"#;

    let event: Event = serde_json::from_str(json).unwrap();
    assert_eq!(event.date, Utc.with_ymd_and_hms(2026, 4, 2, 17, 30, 0).unwrap());
    assert_eq!(event.reminder_minutes, None);
    assert!(!event.notified);
    assert_eq!(event.reminder_lead(DEFAULT_REMINDER_MINUTES), 30);
}

#[test]
fn rejects_empty_id() {
    let json = r#"{"id": "", "date": "2026-04-02T11:30:00Z"}"#;
    assert!(serde_json::from_str::<Event>(json).is_err());
}

#[test]
fn date_range_extends_end_only() {
    let range = DateRange::new(now(), now() + Duration::hours(24));
    let extended = range.extend_end(45);
    assert_eq!(extended.from, range.from);
    assert_eq!(extended.to, range.to + Duration::minutes(45));
    assert!(extended.contains(range.to));
}
