// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduling runtime: wires the cache, its maintainers and the tickers
//!
//! One [`EventCache`] is shared by the loader, the change-feed listener, the
//! sweeper and the digest. Every mutation goes through the cache's own lock,
//! so feed updates may land at any point relative to a sweep.

use crate::cache::EventCache;
use crate::day_watch::DayChangeWatcher;
use crate::digest::DigestSender;
use crate::error::RuntimeError;
use crate::feed::ChangeFeedListener;
use crate::loader::CacheLoader;
use crate::scheduler::{Ticker, TickerHandle};
use crate::sweeper::ReminderSweeper;
use rmd_adapters::{Notifier, StoreGateway};
use rmd_core::{Clock, SchedulerConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

pub struct Scheduling<S, N, C> {
    config: SchedulerConfig,
    cache: Arc<EventCache>,
    loader: Arc<CacheLoader<S, C>>,
    listener: Arc<ChangeFeedListener<C>>,
    sweeper: Arc<ReminderSweeper<S, N, C>>,
    watcher: Arc<DayChangeWatcher<S, C>>,
    digest: Option<Arc<DigestSender<N, C>>>,
    tickers: Mutex<Vec<TickerHandle>>,
    started: AtomicBool,
}

impl<S, N, C> Scheduling<S, N, C>
where
    S: StoreGateway,
    N: Notifier,
    C: Clock,
{
    /// Assemble the subsystem; nothing runs until [`Scheduling::start`]
    pub fn new(
        store: S,
        notifier: N,
        clock: C,
        config: SchedulerConfig,
    ) -> Result<Self, RuntimeError> {
        if clock.zone() != config.zone {
            return Err(RuntimeError::ZoneMismatch {
                clock: clock.zone(),
                config: config.zone,
            });
        }
        for (name, period) in [
            ("sweep_interval", config.sweep_interval),
            ("day_watch_interval", config.day_watch_interval),
        ] {
            if period.is_zero() {
                return Err(RuntimeError::ZeroInterval { name });
            }
        }

        let cache = Arc::new(EventCache::new());
        let loader = Arc::new(
            CacheLoader::new(
                store.clone(),
                clock.clone(),
                Arc::clone(&cache),
                config.loader_retry,
            )
            .with_spillover_minutes(config.spillover_minutes),
        );
        let listener = Arc::new(
            ChangeFeedListener::new(Arc::clone(&cache), loader.loaded(), clock.clone())
                .with_spillover_minutes(config.spillover_minutes),
        );
        let sweeper = Arc::new(ReminderSweeper::new(
            Arc::clone(&cache),
            store,
            notifier.clone(),
            clock.clone(),
            config.default_reminder_minutes,
        ));
        let digest = config.digest_time.map(|time| {
            Arc::new(DigestSender::new(
                Arc::clone(&cache),
                loader.loaded(),
                notifier,
                clock.clone(),
                time,
            ))
        });
        let watcher = Arc::new(DayChangeWatcher::new(Arc::clone(&loader), clock));

        Ok(Self {
            config,
            cache,
            loader,
            listener,
            sweeper,
            watcher,
            digest,
            tickers: Mutex::new(Vec::new()),
            started: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<EventCache> {
        &self.cache
    }

    pub fn loader(&self) -> &Arc<CacheLoader<S, C>> {
        &self.loader
    }

    /// Entry point for change-feed payloads
    pub fn listener(&self) -> &Arc<ChangeFeedListener<C>> {
        &self.listener
    }

    pub fn sweeper(&self) -> &Arc<ReminderSweeper<S, N, C>> {
        &self.sweeper
    }

    pub fn watcher(&self) -> &Arc<DayChangeWatcher<S, C>> {
        &self.watcher
    }

    pub fn digest(&self) -> Option<&Arc<DigestSender<N, C>>> {
        self.digest.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Load today's events once, then start the periodic jobs
    ///
    /// A failed initial load is not fatal: the day watcher sees no loaded
    /// day on its first tick and reloads with retry. That first tick comes
    /// one day-watch interval after start, whatever the retry delay.
    pub async fn start(&self) -> Result<(), RuntimeError> {
        if self.started.swap(true, Ordering::AcqRel) {
            return Err(RuntimeError::AlreadyStarted);
        }

        if let Err(e) = self.loader.load().await {
            warn!(error = %e, "initial load failed, day watcher will retry");
        }

        let mut handles = vec![
            Ticker::spawn(Arc::clone(&self.sweeper), self.config.sweep_interval),
            Ticker::spawn(Arc::clone(&self.watcher), self.config.day_watch_interval),
        ];
        if let Some(digest) = &self.digest {
            handles.push(Ticker::spawn(
                Arc::clone(digest),
                self.config.day_watch_interval,
            ));
        }

        info!(
            zone = %self.config.zone,
            sweep_secs = self.config.sweep_interval.as_secs(),
            day_watch_secs = self.config.day_watch_interval.as_secs(),
            digest = self.digest.is_some(),
            "scheduling started"
        );
        *self.tickers.lock().unwrap_or_else(|e| e.into_inner()) = handles;
        Ok(())
    }

    /// Stop all tickers, waiting for in-flight ticks to finish
    pub async fn shutdown(&self) {
        let handles = {
            let mut tickers = self.tickers.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut *tickers)
        };
        for handle in handles {
            handle.stop().await;
        }
        self.started.store(false, Ordering::Release);
        info!("scheduling stopped");
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
