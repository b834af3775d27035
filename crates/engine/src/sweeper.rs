// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reminder sweep: notify due events, persist the flag, evict
//!
//! Each due event goes through notify -> mark_notified -> evict in that
//! order. The triple is not atomic: if delivery or persistence fails the
//! event stays cached and unflagged and is picked up again next tick, so a
//! reminder may be sent twice but is never silently dropped.

use crate::cache::EventCache;
use crate::scheduler::Periodic;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rmd_adapters::{Notifier, StoreGateway};
use rmd_core::{render_reminder, Clock, Event, EventId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of one sweep tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Another tick was still running; nothing was evaluated
    pub skipped: bool,
    pub scanned: usize,
    pub due: usize,
    /// Notified, persisted and evicted
    pub notified: Vec<EventId>,
    pub notify_failures: usize,
    pub persist_failures: usize,
}

/// Scans the cache and sends reminders for events inside their window
pub struct ReminderSweeper<S, N, C> {
    cache: Arc<EventCache>,
    store: S,
    notifier: N,
    clock: C,
    default_reminder_minutes: u32,
    busy: AtomicBool,
}

/// Clears the busy flag when a tick ends, however it ends
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<S, N, C> ReminderSweeper<S, N, C>
where
    S: StoreGateway,
    N: Notifier,
    C: Clock,
{
    pub fn new(
        cache: Arc<EventCache>,
        store: S,
        notifier: N,
        clock: C,
        default_reminder_minutes: u32,
    ) -> Self {
        Self {
            cache,
            store,
            notifier,
            clock,
            default_reminder_minutes,
            busy: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Run one sweep over a snapshot of the cache
    pub async fn sweep(&self) -> SweepReport {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("previous sweep still running, skipping");
            return SweepReport {
                skipped: true,
                ..SweepReport::default()
            };
        }
        let _guard = BusyGuard(&self.busy);

        let snapshot = self.cache.snapshot();
        let mut report = SweepReport {
            scanned: snapshot.len(),
            ..SweepReport::default()
        };

        for event in snapshot {
            // Evaluate each event against a fresh reading
            let now = self.clock.now();
            if event.notified || !event.is_due(now, self.default_reminder_minutes) {
                continue;
            }
            report.due += 1;
            self.remind(&event, now, &mut report).await;
        }

        if report.due > 0 {
            info!(
                scanned = report.scanned,
                due = report.due,
                notified = report.notified.len(),
                notify_failures = report.notify_failures,
                persist_failures = report.persist_failures,
                "sweep complete"
            );
        }
        report
    }

    async fn remind(&self, event: &Event, now: DateTime<Utc>, report: &mut SweepReport) {
        let text = render_reminder(event, now, self.clock.zone());

        if let Err(e) = self.notifier.send(&event.owner_reference, &text).await {
            warn!(
                event_id = %event.id,
                owner = %event.owner_reference,
                error = %e,
                "reminder not delivered, will retry next sweep"
            );
            report.notify_failures += 1;
            return;
        }

        if let Err(e) = self.store.mark_notified(&event.id).await {
            warn!(
                event_id = %event.id,
                error = %e,
                "reminder sent but flag not persisted, may be sent again"
            );
            report.persist_failures += 1;
            return;
        }

        self.cache.remove(&event.id);
        report.notified.push(event.id.clone());
    }
}

#[async_trait]
impl<S, N, C> Periodic for ReminderSweeper<S, N, C>
where
    S: StoreGateway,
    N: Notifier,
    C: Clock,
{
    fn name(&self) -> &'static str {
        "sweeper"
    }

    async fn tick(&self) {
        self.sweep().await;
    }
}

#[cfg(test)]
#[path = "sweeper_tests.rs"]
mod tests;
