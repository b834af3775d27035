//! Shared fixture for behavioral specs.

#![allow(dead_code)]

pub use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
pub use rmd_adapters::{FakeNotifier, FakeStore, StoreCall};
pub use rmd_core::{Clock, Event, EventId, FakeClock, SchedulerConfig};
pub use rmd_engine::{DayCheck, FeedOutcome, Scheduling, SweepReport};

use chrono::TimeZone;
use chrono_tz::Tz;

pub const ZONE: Tz = chrono_tz::Europe::Berlin;

/// A fully wired scheduling subsystem over fakes, at 09:00 Berlin time
pub struct World {
    pub clock: FakeClock,
    pub store: FakeStore,
    pub notifier: FakeNotifier,
    pub scheduling: Scheduling<FakeStore, FakeNotifier, FakeClock>,
}

impl World {
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        let clock = FakeClock::at_local(ZONE, start_day(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        let store = FakeStore::new();
        let notifier = FakeNotifier::new();
        let scheduling = Scheduling::new(
            store.clone(),
            notifier.clone(),
            clock.clone(),
            config.with_zone(ZONE),
        )
        .unwrap();
        Self {
            clock,
            store,
            notifier,
            scheduling,
        }
    }

    /// Local wall time `day_offset` days from the starting day, as UTC
    pub fn local(&self, day_offset: i64, hour: u32, minute: u32) -> DateTime<Utc> {
        let day = start_day() + Duration::days(day_offset);
        let naive = day.and_hms_opt(hour, minute, 0).unwrap();
        ZONE.from_local_datetime(&naive)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    /// Add a pending row to the store
    pub fn seed(&self, id: &str, date: DateTime<Utc>) -> Event {
        let event = Event::new(id, id, date, format!("owner-{}", id));
        self.store.insert(event.clone());
        event
    }

    pub async fn load(&self) {
        self.scheduling.loader().load().await.unwrap();
    }

    pub async fn sweep(&self) -> SweepReport {
        self.scheduling.sweeper().sweep().await
    }

    pub fn cached_ids(&self) -> Vec<String> {
        self.scheduling
            .cache()
            .snapshot()
            .into_iter()
            .map(|e| e.id.to_string())
            .collect()
    }

    pub fn sent_to(&self, id: &str) -> usize {
        self.notifier.calls_to(&format!("owner-{}", id)).len()
    }

    pub fn mark_calls(&self) -> usize {
        self.store
            .calls()
            .iter()
            .filter(|c| matches!(c, StoreCall::MarkNotified { .. }))
            .count()
    }
}

pub fn start_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
}
