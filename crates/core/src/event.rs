// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduled event record

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Reminder lead used when an event does not carry its own
pub const DEFAULT_REMINDER_MINUTES: u32 = 30;

/// Store-assigned event identifier
///
/// Stores hand out either numeric or string keys; both are kept as text so
/// the id can join cache, store and change-feed records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EventId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Text(s) if s.is_empty() => Err(serde::de::Error::custom("empty event id")),
            RawId::Text(s) => Ok(Self(s)),
            RawId::Number(n) => Ok(Self(n.to_string())),
        }
    }
}

/// A single scheduled occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    #[serde(default)]
    pub title: String,
    /// Due instant, always UTC
    pub date: DateTime<Utc>,
    /// Minutes before `date` to remind; `None` means the configured default
    #[serde(default)]
    pub reminder_minutes: Option<u32>,
    #[serde(default)]
    pub notified: bool,
    /// Destination handle for reminders
    #[serde(default)]
    pub owner_reference: String,
}

impl Event {
    pub fn new(
        id: impl Into<EventId>,
        title: impl Into<String>,
        date: DateTime<Utc>,
        owner_reference: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            date,
            reminder_minutes: None,
            notified: false,
            owner_reference: owner_reference.into(),
        }
    }

    pub fn with_reminder_minutes(mut self, minutes: u32) -> Self {
        self.reminder_minutes = Some(minutes);
        self
    }

    pub fn notified(mut self) -> Self {
        self.notified = true;
        self
    }

    pub fn reminder_lead(&self, default_minutes: u32) -> u32 {
        self.reminder_minutes.unwrap_or(default_minutes)
    }

    /// Whole minutes from `now` until the event, truncated toward zero
    pub fn minutes_until(&self, now: DateTime<Utc>) -> i64 {
        (self.date - now).num_minutes()
    }

    /// Whether `now` falls inside this event's reminder window
    pub fn is_due(&self, now: DateTime<Utc>, default_minutes: u32) -> bool {
        let minutes = self.minutes_until(now);
        minutes >= 0 && minutes <= i64::from(self.reminder_lead(default_minutes))
    }
}

/// Half-open UTC interval `[from, to)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.from && instant < self.to
    }

    /// Push the upper bound out by `minutes`
    pub fn extend_end(self, minutes: u32) -> Self {
        Self {
            from: self.from,
            to: self.to + Duration::minutes(i64::from(minutes)),
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
