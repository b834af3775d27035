// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::notify::{Notifier, NotifyError};
use crate::store::{StoreError, StoreGateway};
use async_trait::async_trait;
use rmd_core::{DateRange, Event, EventId};
use tracing::Instrument;

/// Wrapper that adds tracing to any StoreGateway
#[derive(Clone)]
pub struct TracedStore<S> {
    inner: S,
}

impl<S> TracedStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: StoreGateway> StoreGateway for TracedStore<S> {
    async fn query_events(
        &self,
        range: DateRange,
        notified: bool,
    ) -> Result<Vec<Event>, StoreError> {
        let span = tracing::info_span!(
            "store.query",
            from = %range.from,
            to = %range.to,
            notified
        );

        async {
            tracing::debug!("querying");

            let start = std::time::Instant::now();
            let result = self.inner.query_events(range, notified).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(events) => tracing::info!(
                    count = events.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "query complete"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "query failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn mark_notified(&self, id: &EventId) -> Result<(), StoreError> {
        let span = tracing::info_span!("store.mark_notified", event_id = %id);

        async {
            let start = std::time::Instant::now();
            let result = self.inner.mark_notified(id).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "marked"),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "mark failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any Notifier
#[derive(Clone)]
pub struct TracedNotifier<N> {
    inner: N,
}

impl<N> TracedNotifier<N> {
    pub fn new(inner: N) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<N: Notifier> Notifier for TracedNotifier<N> {
    async fn send(&self, destination: &str, text: &str) -> Result<(), NotifyError> {
        let span = tracing::info_span!("notify.send", destination);

        async {
            tracing::debug!(text_len = text.len(), "sending");

            let start = std::time::Instant::now();
            let result = self.inner.send(destination, text).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "sent"),
                Err(e) => tracing::warn!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "send failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
