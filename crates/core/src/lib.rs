// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rmd-core: shared types for the reminder daemon
//!
//! This crate provides:
//! - The `Event` record and its identifier
//! - A clock abstraction bound to one fixed local zone
//! - Scheduler configuration and retry policy
//! - Change-feed payload parsing
//! - Reminder and digest message rendering

pub mod clock;
pub mod config;
pub mod event;
pub mod feed;
pub mod render;
pub mod retry;

pub use clock::{day_range, Clock, FakeClock, SystemClock};
pub use config::{ConfigError, SchedulerConfig};
pub use event::{DateRange, Event, EventId, DEFAULT_REMINDER_MINUTES};
pub use feed::{FeedError, FeedMessage, FeedOperation};
pub use render::{render_digest, render_reminder};
pub use retry::RetryPolicy;
