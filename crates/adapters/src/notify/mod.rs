// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message delivery adapters
//!
//! Notifiers receive a destination handle and finished text; transport
//! formatting is their concern alone.

mod log;
mod webhook;

pub use self::log::LogNotifier;
pub use webhook::WebhookNotifier;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeNotifier, NotifyCall};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from notification delivery
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("delivery failed: {0}")]
    Failed(String),
    #[error("rejected by transport with status {0}")]
    Rejected(u16),
    #[error("invalid destination: {0:?}")]
    InvalidDestination(String),
}

/// Adapter for sending rendered messages
#[async_trait]
pub trait Notifier: Clone + Send + Sync + 'static {
    /// Send `text` to `destination`
    async fn send(&self, destination: &str, text: &str) -> Result<(), NotifyError>;
}
