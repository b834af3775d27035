// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Once-a-day summary of each owner's pending events

use crate::cache::EventCache;
use crate::loader::LoadedDay;
use crate::scheduler::Periodic;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use rmd_adapters::Notifier;
use rmd_core::{render_digest, Clock, Event};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Outcome of a digest run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestReport {
    pub day: NaiveDate,
    /// Owners that received their digest
    pub sent: usize,
    pub failed: usize,
}

pub struct DigestSender<N, C> {
    cache: Arc<EventCache>,
    loaded: Arc<LoadedDay>,
    notifier: N,
    clock: C,
    digest_time: NaiveTime,
    last_sent: Mutex<Option<NaiveDate>>,
}

impl<N: Notifier, C: Clock> DigestSender<N, C> {
    pub fn new(
        cache: Arc<EventCache>,
        loaded: Arc<LoadedDay>,
        notifier: N,
        clock: C,
        digest_time: NaiveTime,
    ) -> Self {
        Self {
            cache,
            loaded,
            notifier,
            clock,
            digest_time,
            last_sent: Mutex::new(None),
        }
    }

    /// Last local day a digest run was recorded for
    pub fn last_sent(&self) -> Option<NaiveDate> {
        *self.last_sent.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Send today's digest if it is due and not yet sent
    ///
    /// Returns `None` when nothing was attempted.
    pub async fn send_due(&self) -> Option<DigestReport> {
        let now = self.clock.local_now();
        let today = now.date_naive();
        if now.time() < self.digest_time || self.last_sent() == Some(today) {
            return None;
        }
        if self.loaded.day() != Some(today) {
            debug!(%today, "digest waiting for today's load");
            return None;
        }

        let zone = self.clock.zone();
        let mut by_owner: BTreeMap<String, Vec<Event>> = BTreeMap::new();
        for event in self.cache.snapshot() {
            if event.notified || self.clock.local_day(event.date) != today {
                continue;
            }
            by_owner
                .entry(event.owner_reference.clone())
                .or_default()
                .push(event);
        }

        let mut report = DigestReport {
            day: today,
            sent: 0,
            failed: 0,
        };
        for (owner, events) in &by_owner {
            let text = render_digest(today, events, zone);
            match self.notifier.send(owner, &text).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    warn!(owner = %owner, error = %e, "digest not delivered");
                    report.failed += 1;
                }
            }
        }

        *self.last_sent.lock().unwrap_or_else(|e| e.into_inner()) = Some(today);
        info!(
            day = %today,
            sent = report.sent,
            failed = report.failed,
            "daily digest done"
        );
        Some(report)
    }
}

#[async_trait]
impl<N: Notifier, C: Clock> Periodic for DigestSender<N, C> {
    fn name(&self) -> &'static str {
        "digest"
    }

    async fn tick(&self) {
        self.send_due().await;
    }
}

#[cfg(test)]
#[path = "digest_tests.rs"]
mod tests;
