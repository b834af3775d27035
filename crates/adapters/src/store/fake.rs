// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{StoreError, StoreGateway};
use async_trait::async_trait;
use rmd_core::{DateRange, Event, EventId};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Query { range: DateRange, notified: bool },
    MarkNotified { id: EventId },
}

#[derive(Default)]
struct FakeStoreState {
    events: Vec<Event>,
    calls: Vec<StoreCall>,
    /// Number of upcoming queries that fail
    failing_queries: u32,
    fail_mark_notified: bool,
    query_latency: Option<Duration>,
}

/// In-memory store with call recording and failure injection
#[derive(Clone, Default)]
pub struct FakeStore {
    state: Arc<Mutex<FakeStoreState>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: impl IntoIterator<Item = Event>) -> Self {
        let store = Self::new();
        for event in events {
            store.insert(event);
        }
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeStoreState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert or replace a row by id
    pub fn insert(&self, event: Event) {
        let mut state = self.lock();
        match state.events.iter_mut().find(|e| e.id == event.id) {
            Some(existing) => *existing = event,
            None => state.events.push(event),
        }
    }

    pub fn remove(&self, id: &EventId) {
        self.lock().events.retain(|e| &e.id != id);
    }

    pub fn get(&self, id: &EventId) -> Option<Event> {
        self.lock().events.iter().find(|e| &e.id == id).cloned()
    }

    /// Make the next `count` queries fail
    pub fn fail_next_queries(&self, count: u32) {
        self.lock().failing_queries = count;
    }

    /// Delay query results by `latency` after the rows are read
    pub fn set_query_latency(&self, latency: Duration) {
        self.lock().query_latency = Some(latency);
    }

    pub fn set_mark_notified_fails(&self, fails: bool) {
        self.lock().fail_mark_notified = fails;
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    pub fn query_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, StoreCall::Query { .. }))
            .count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }
}

#[async_trait]
impl StoreGateway for FakeStore {
    async fn query_events(
        &self,
        range: DateRange,
        notified: bool,
    ) -> Result<Vec<Event>, StoreError> {
        let (mut events, latency) = {
            let mut state = self.lock();
            state.calls.push(StoreCall::Query { range, notified });

            if state.failing_queries > 0 {
                state.failing_queries -= 1;
                return Err(StoreError::Unavailable("injected query failure".to_string()));
            }

            let events: Vec<Event> = state
                .events
                .iter()
                .filter(|e| e.notified == notified && range.contains(e.date))
                .cloned()
                .collect();
            (events, state.query_latency)
        };

        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        events.sort_by_key(|e| e.date);
        Ok(events)
    }

    async fn mark_notified(&self, id: &EventId) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.calls.push(StoreCall::MarkNotified { id: id.clone() });

        if state.fail_mark_notified {
            return Err(StoreError::Unavailable(
                "injected mark_notified failure".to_string(),
            ));
        }

        match state.events.iter_mut().find(|e| &e.id == id) {
            Some(event) => {
                event.notified = true;
                Ok(())
            }
            None => Err(StoreError::NotFound(id.clone())),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
