// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the system of record and message delivery

pub mod notify;
pub mod store;
pub mod traced;

pub use notify::{LogNotifier, Notifier, NotifyError, WebhookNotifier};
pub use store::{RestStore, RestStoreConfig, StoreError, StoreGateway};
pub use traced::{TracedNotifier, TracedStore};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use notify::{FakeNotifier, NotifyCall};
#[cfg(any(test, feature = "test-support"))]
pub use store::{FakeStore, StoreCall};
