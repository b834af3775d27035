// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Reminder engine: today's event cache and the timers that keep it fresh

mod cache;
mod day_watch;
mod digest;
mod error;
mod feed;
mod loader;
mod runtime;
mod scheduler;
mod sweeper;

pub use cache::{EventCache, Reload, Upsert};
pub use day_watch::{DayChangeWatcher, DayCheck};
pub use digest::{DigestReport, DigestSender};
pub use error::{LoadError, RuntimeError};
pub use feed::{ChangeFeedListener, FeedOutcome};
pub use loader::{CacheLoader, LoadSummary, LoadedDay};
pub use runtime::Scheduling;
pub use scheduler::{Periodic, Ticker, TickerHandle};
pub use sweeper::{ReminderSweeper, SweepReport};
