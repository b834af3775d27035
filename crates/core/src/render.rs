// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message text for reminders and digests

use crate::event::Event;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use std::fmt::Write;

/// Reminder text for a single due event
pub fn render_reminder(event: &Event, now: DateTime<Utc>, zone: Tz) -> String {
    let local = event.date.with_timezone(&zone);
    let minutes = event.minutes_until(now).max(0);
    format!(
        "Reminder: {} at {} ({} min)",
        display_title(event),
        local.format("%H:%M"),
        minutes
    )
}

/// Digest text listing `events` for `day`, ordered by time
pub fn render_digest(day: NaiveDate, events: &[Event], zone: Tz) -> String {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by_key(|e| e.date);

    let mut text = format!("Today's events ({}):", day.format("%Y-%m-%d"));
    for event in sorted {
        let local = event.date.with_timezone(&zone);
        // Writing to a String cannot fail
        let _ = write!(
            text,
            "\n- {} {}",
            local.format("%H:%M"),
            display_title(event)
        );
    }
    text
}

fn display_title(event: &Event) -> &str {
    let title = event.title.trim();
    if title.is_empty() {
        "(untitled)"
    } else {
        title
    }
}
