// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local-day rollover detection

use crate::loader::CacheLoader;
use crate::scheduler::Periodic;
use async_trait::async_trait;
use chrono::NaiveDate;
use rmd_adapters::StoreGateway;
use rmd_core::Clock;
use std::sync::Arc;
use tracing::{error, info};

/// Result of one watcher check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayCheck {
    /// The loaded day is still today
    Unchanged,
    /// Today differed from the loaded day and was reloaded
    Reloaded { day: NaiveDate, count: usize },
    /// Today differed but the reload gave up; the next check tries again
    Failed,
}

/// Reloads the cache whenever the local day no longer matches the loaded one
pub struct DayChangeWatcher<S, C> {
    loader: Arc<CacheLoader<S, C>>,
    clock: C,
}

impl<S: StoreGateway, C: Clock> DayChangeWatcher<S, C> {
    pub fn new(loader: Arc<CacheLoader<S, C>>, clock: C) -> Self {
        Self { loader, clock }
    }

    pub async fn check(&self) -> DayCheck {
        let today = self.clock.today();
        let loaded = self.loader.loaded_day();
        if loaded == Some(today) {
            return DayCheck::Unchanged;
        }

        info!(%today, loaded = ?loaded, "local day changed, reloading");
        match self.loader.load_with_retry().await {
            Ok(summary) => DayCheck::Reloaded {
                day: summary.day,
                count: summary.count,
            },
            Err(e) => {
                error!(error = %e, "day reload failed");
                DayCheck::Failed
            }
        }
    }
}

#[async_trait]
impl<S: StoreGateway, C: Clock> Periodic for DayChangeWatcher<S, C> {
    fn name(&self) -> &'static str {
        "day-watch"
    }

    async fn tick(&self) {
        self.check().await;
    }
}

#[cfg(test)]
#[path = "day_watch_tests.rs"]
mod tests;
