// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-interval background jobs
//!
//! A [`Ticker`] drives one [`Periodic`] job on its own task. The job runs
//! inline in the ticker loop, so a tick that outlasts the period delays the
//! next one instead of overlapping it. A stop request cancels an in-flight
//! tick at its next await point.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// A job run on a fixed period
#[async_trait]
pub trait Periodic: Send + Sync + 'static {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    async fn tick(&self);
}

pub struct Ticker;

impl Ticker {
    /// Run `job` every `period` until the returned handle is stopped
    ///
    /// The first tick fires one full period after spawning.
    pub fn spawn<P: Periodic>(job: Arc<P>, period: Duration) -> TickerHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let name = job.name();

        let task = tokio::spawn(async move {
            let mut timer = interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // Skip initial immediate tick
            timer.tick().await;

            info!(job = name, period_secs = period.as_secs(), "ticker started");
            loop {
                tokio::select! {
                    biased;
                    _ = stop_rx.changed() => break,
                    _ = timer.tick() => {
                        debug!(job = name, "tick");
                        tokio::select! {
                            biased;
                            _ = stop_rx.changed() => {
                                info!(job = name, "in-flight tick cancelled");
                                break;
                            }
                            _ = job.tick() => {}
                        }
                    }
                }
            }
            info!(job = name, "ticker stopped");
        });

        TickerHandle {
            name,
            stop: stop_tx,
            task,
        }
    }
}

/// Owner side of a running [`Ticker`]
pub struct TickerHandle {
    name: &'static str,
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl TickerHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the ticker, cancelling any in-flight tick
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        if let Err(e) = self.task.await {
            warn!(job = self.name, error = %e, "ticker task ended abnormally");
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
