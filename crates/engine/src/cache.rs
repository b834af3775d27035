// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory working set of today's pending events
//!
//! Shared by the loader, the change feed and the sweeper. Every operation
//! takes the same lock, so readers always see a whole replacement or none
//! of it.
//!
//! A reload brackets its store query with [`EventCache::begin_reload`].
//! Mutations made while the query is in flight are journaled and replayed
//! over the fresh rows, so a change committed after the query read the
//! store is not lost.

use rmd_core::{DateRange, Event, EventId};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Result of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced,
}

/// Mutation recorded while a reload is in flight
#[derive(Debug, Clone)]
enum Change {
    /// Latest known row; replayed against the new range
    Row(Event),
    Removed(EventId),
}

#[derive(Debug, Default)]
struct Inner {
    events: Vec<Event>,
    reloads_in_flight: usize,
    journal: Vec<Change>,
}

impl Inner {
    fn record(&mut self, change: Change) {
        if self.reloads_in_flight > 0 {
            self.journal.push(change);
        }
    }
}

/// Ordered container of events keyed by id
#[derive(Debug, Default)]
pub struct EventCache {
    inner: Mutex<Inner>,
}

impl EventCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start journaling mutations for a reload
    ///
    /// Dropping the returned [`Reload`] without finishing it discards the
    /// journal and leaves the contents as they are.
    pub fn begin_reload(&self) -> Reload<'_> {
        self.inner().reloads_in_flight += 1;
        Reload { cache: self }
    }

    /// Discard current contents and install `events`
    ///
    /// Input order is kept; a repeated id keeps its first position and the
    /// last value seen.
    pub fn replace_all(&self, events: Vec<Event>) {
        let mut unique: Vec<Event> = Vec::with_capacity(events.len());
        for event in events {
            upsert_into(&mut unique, event);
        }
        self.inner().events = unique;
    }

    /// Insert if `id` is absent, else overwrite in place
    pub fn upsert(&self, event: Event) -> Upsert {
        let mut inner = self.inner();
        inner.record(Change::Row(event.clone()));
        upsert_into(&mut inner.events, event)
    }

    /// Remove by id; returns whether an entry was present
    pub fn remove(&self, id: &EventId) -> bool {
        let mut inner = self.inner();
        inner.record(Change::Removed(id.clone()));
        remove_from(&mut inner.events, id)
    }

    /// Remove `row`'s id because the row left the working set
    ///
    /// A reload in flight replays the row itself, so a row that belongs to
    /// the reloaded range comes back.
    pub fn evict(&self, row: &Event) -> bool {
        let mut inner = self.inner();
        inner.record(Change::Row(row.clone()));
        remove_from(&mut inner.events, &row.id)
    }

    /// Independent copy of the current contents
    pub fn snapshot(&self) -> Vec<Event> {
        self.inner().events.clone()
    }

    pub fn get(&self, id: &EventId) -> Option<Event> {
        self.inner().events.iter().find(|e| &e.id == id).cloned()
    }

    pub fn contains(&self, id: &EventId) -> bool {
        self.inner().events.iter().any(|e| &e.id == id)
    }

    pub fn len(&self) -> usize {
        self.inner().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner().events.is_empty()
    }
}

/// An in-flight reload; see [`EventCache::begin_reload`]
pub struct Reload<'a> {
    cache: &'a EventCache,
}

impl Reload<'_> {
    /// Install `events`, then replay the changes made since the reload began
    ///
    /// Replayed rows are kept only when pending and inside `range`. Returns
    /// the number of events installed.
    pub fn finish(self, events: Vec<Event>, range: DateRange) -> usize {
        let mut inner = self.cache.inner();
        let mut fresh: Vec<Event> = Vec::with_capacity(events.len());
        for event in events {
            upsert_into(&mut fresh, event);
        }

        let journal = inner.journal.clone();
        for change in &journal {
            match change {
                Change::Row(row) if !row.notified && range.contains(row.date) => {
                    upsert_into(&mut fresh, row.clone());
                }
                Change::Row(row) => {
                    remove_from(&mut fresh, &row.id);
                }
                Change::Removed(id) => {
                    remove_from(&mut fresh, id);
                }
            }
        }
        if !journal.is_empty() {
            debug!(replayed = journal.len(), "replayed changes made during reload");
        }
        inner.events = fresh;
        inner.events.len()
    }
}

impl Drop for Reload<'_> {
    fn drop(&mut self) {
        let mut inner = self.cache.inner();
        inner.reloads_in_flight = inner.reloads_in_flight.saturating_sub(1);
        if inner.reloads_in_flight == 0 {
            inner.journal.clear();
        }
    }
}

fn remove_from(events: &mut Vec<Event>, id: &EventId) -> bool {
    match events.iter().position(|e| &e.id == id) {
        Some(index) => {
            events.remove(index);
            true
        }
        None => false,
    }
}

fn upsert_into(events: &mut Vec<Event>, event: Event) -> Upsert {
    match events.iter_mut().find(|e| e.id == event.id) {
        Some(existing) => {
            *existing = event;
            Upsert::Replaced
        }
        None => {
            events.push(event);
            Upsert::Inserted
        }
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
