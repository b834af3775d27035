// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wholesale cache (re)population from the store

use crate::cache::EventCache;
use crate::error::LoadError;
use chrono::NaiveDate;
use rmd_adapters::StoreGateway;
use rmd_core::{day_range, Clock, DateRange, RetryPolicy};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// The local day most recently loaded into the cache, with its query range
#[derive(Debug, Default)]
pub struct LoadedDay {
    current: Mutex<Option<(NaiveDate, DateRange)>>,
}

impl LoadedDay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn day(&self) -> Option<NaiveDate> {
        self.get().map(|(day, _)| day)
    }

    pub fn range(&self) -> Option<DateRange> {
        self.get().map(|(_, range)| range)
    }

    pub fn get(&self) -> Option<(NaiveDate, DateRange)> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set(&self, day: NaiveDate, range: DateRange) {
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = Some((day, range));
    }
}

/// Outcome of a successful load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub day: NaiveDate,
    pub count: usize,
}

/// Query range of the working set for local `day`
pub fn working_range(day: NaiveDate, zone: chrono_tz::Tz, spillover_minutes: u32) -> DateRange {
    day_range(day, zone).extend_end(spillover_minutes)
}

/// Loads today's pending events from the store into the cache
pub struct CacheLoader<S, C> {
    store: S,
    clock: C,
    cache: Arc<EventCache>,
    loaded: Arc<LoadedDay>,
    retry: RetryPolicy,
    spillover_minutes: u32,
}

impl<S: StoreGateway, C: Clock> CacheLoader<S, C> {
    pub fn new(store: S, clock: C, cache: Arc<EventCache>, retry: RetryPolicy) -> Self {
        Self {
            store,
            clock,
            cache,
            loaded: Arc::new(LoadedDay::new()),
            retry,
            spillover_minutes: 0,
        }
    }

    pub fn with_spillover_minutes(mut self, minutes: u32) -> Self {
        self.spillover_minutes = minutes;
        self
    }

    pub fn loaded(&self) -> Arc<LoadedDay> {
        Arc::clone(&self.loaded)
    }

    pub fn loaded_day(&self) -> Option<NaiveDate> {
        self.loaded.day()
    }

    pub fn spillover_minutes(&self) -> u32 {
        self.spillover_minutes
    }

    /// Single load attempt for the current local day
    ///
    /// On failure the cache keeps its previous contents. Feed changes that
    /// land while the query is in flight are replayed over its result.
    pub async fn load(&self) -> Result<LoadSummary, LoadError> {
        let day = self.clock.today();
        let range = working_range(day, self.clock.zone(), self.spillover_minutes);

        let reload = self.cache.begin_reload();
        let events = self.store.query_events(range, false).await?;

        // The store already filters; drop anything that slipped through
        let total = events.len();
        let events: Vec<_> = events
            .into_iter()
            .filter(|e| !e.notified && range.contains(e.date))
            .collect();
        if events.len() != total {
            warn!(
                %day,
                dropped = total - events.len(),
                "store returned rows outside the load filter"
            );
        }

        let count = reload.finish(events, range);
        self.loaded.set(day, range);

        info!(%day, count, "cache loaded");
        Ok(LoadSummary { day, count })
    }

    /// Load, retrying on the configured policy until success or exhaustion
    pub async fn load_with_retry(&self) -> Result<LoadSummary, LoadError> {
        let mut attempt = 1;
        loop {
            match self.load().await {
                Ok(summary) => return Ok(summary),
                Err(LoadError::Store(e)) => match self.retry.next_delay(attempt) {
                    Some(delay) => {
                        warn!(
                            attempt,
                            retry_in_secs = delay.as_secs(),
                            error = %e,
                            "cache load failed, keeping previous contents"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    None => {
                        warn!(attempt, error = %e, "cache load failed, giving up");
                        return Err(LoadError::Exhausted {
                            attempts: attempt,
                            last: e,
                        });
                    }
                },
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
