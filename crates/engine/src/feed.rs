// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Incremental cache updates from the store's change feed
//!
//! INSERT and UPDATE are both upserts keyed by id, so replays and updates
//! for unseen ids converge on the same state. A row that no longer belongs
//! in the working set (already notified, or dated outside the loaded range)
//! is evicted instead; this is what keeps the store's echo of a
//! `mark_notified` from putting an event back.

use crate::cache::{EventCache, Upsert};
use crate::loader::{working_range, LoadedDay};
use rmd_core::{Clock, DateRange, Event, FeedError, FeedMessage};
use std::sync::Arc;
use tracing::{debug, warn};

/// What applying a feed message did to the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOutcome {
    Inserted,
    Replaced,
    Removed,
    /// DELETE or eviction for an id the cache did not hold
    Absent,
    /// Upsert of a row outside the working set; any cached copy was removed
    Evicted { was_cached: bool },
}

/// Applies change-feed mutations to the shared cache
pub struct ChangeFeedListener<C> {
    cache: Arc<EventCache>,
    loaded: Arc<LoadedDay>,
    clock: C,
    spillover_minutes: u32,
}

impl<C: Clock> ChangeFeedListener<C> {
    pub fn new(cache: Arc<EventCache>, loaded: Arc<LoadedDay>, clock: C) -> Self {
        Self {
            cache,
            loaded,
            clock,
            spillover_minutes: 0,
        }
    }

    pub fn with_spillover_minutes(mut self, minutes: u32) -> Self {
        self.spillover_minutes = minutes;
        self
    }

    /// Parse and apply a raw payload; malformed input leaves the cache untouched
    pub fn apply_json(&self, payload: &str) -> Result<FeedOutcome, FeedError> {
        match FeedMessage::parse(payload) {
            Ok(message) => Ok(self.apply(message)),
            Err(e) => {
                warn!(error = %e, "rejected change-feed payload");
                Err(e)
            }
        }
    }

    pub fn apply(&self, message: FeedMessage) -> FeedOutcome {
        let operation = message.operation();
        let outcome = match message {
            FeedMessage::Insert(event) | FeedMessage::Update(event) => self.upsert(event),
            FeedMessage::Delete(id) => {
                if self.cache.remove(&id) {
                    FeedOutcome::Removed
                } else {
                    FeedOutcome::Absent
                }
            }
        };
        debug!(%operation, ?outcome, "change applied");
        outcome
    }

    fn upsert(&self, event: Event) -> FeedOutcome {
        if event.notified || !self.window().contains(event.date) {
            let was_cached = self.cache.evict(&event);
            return FeedOutcome::Evicted { was_cached };
        }

        match self.cache.upsert(event) {
            Upsert::Inserted => FeedOutcome::Inserted,
            Upsert::Replaced => FeedOutcome::Replaced,
        }
    }

    /// Range of the loaded day, or of today when nothing has loaded yet
    fn window(&self) -> DateRange {
        self.loaded.range().unwrap_or_else(|| {
            working_range(
                self.clock.today(),
                self.clock.zone(),
                self.spillover_minutes,
            )
        })
    }
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
