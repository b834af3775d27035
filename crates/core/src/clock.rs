// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling
//!
//! Instants are always UTC. Calendar-day arithmetic goes through the clock's
//! fixed local zone.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::sync::{Arc, Mutex};

use crate::event::DateRange;

/// A clock that provides the current time in one fixed local zone
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;

    fn zone(&self) -> Tz;

    /// Calendar day of `instant` in the local zone
    fn local_day(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.zone()).date_naive()
    }

    fn today(&self) -> NaiveDate {
        self.local_day(self.now())
    }

    fn local_now(&self) -> DateTime<Tz> {
        self.now().with_timezone(&self.zone())
    }
}

/// Real system clock
#[derive(Clone, Debug)]
pub struct SystemClock {
    zone: Tz,
}

impl SystemClock {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn zone(&self) -> Tz {
        self.zone
    }
}

/// Fake clock for testing with controllable time
#[derive(Clone, Debug)]
pub struct FakeClock {
    current: Arc<Mutex<DateTime<Utc>>>,
    zone: Tz,
}

impl FakeClock {
    pub fn new(start: DateTime<Utc>, zone: Tz) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
            zone,
        }
    }

    /// Build a clock from a wall-clock reading in `zone`
    ///
    /// Ambiguous readings resolve to the earlier instant; readings inside a
    /// DST gap fall back to interpreting the reading as UTC.
    pub fn at_local(zone: Tz, day: NaiveDate, time: NaiveTime) -> Self {
        let naive = day.and_time(time);
        let start = match zone.from_local_datetime(&naive) {
            LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => t.with_timezone(&Utc),
            LocalResult::None => naive.and_utc(),
        };
        Self::new(start, zone)
    }

    /// Advance the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current += duration;
    }

    /// Set the clock to a specific instant
    pub fn set(&self, instant: DateTime<Utc>) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = instant;
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn zone(&self) -> Tz {
        self.zone
    }
}

/// Half-open UTC range covering the local calendar day `day` in `zone`
pub fn day_range(day: NaiveDate, zone: Tz) -> DateRange {
    let from = start_of_day(day, zone);
    let to = day
        .succ_opt()
        .map(|next| start_of_day(next, zone))
        .unwrap_or_else(|| from + Duration::days(1));
    DateRange { from, to }
}

/// First instant of `day` in `zone`
///
/// Some zones skip local midnight on DST changes; the first existing local
/// time of the day is used instead.
fn start_of_day(day: NaiveDate, zone: Tz) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    for offset_minutes in (0..=180).step_by(15) {
        let candidate = midnight + Duration::minutes(offset_minutes);
        match zone.from_local_datetime(&candidate) {
            LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => {
                return t.with_timezone(&Utc);
            }
            LocalResult::None => continue,
        }
    }
    midnight.and_utc()
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
