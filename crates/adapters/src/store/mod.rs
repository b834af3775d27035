// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! System-of-record adapters
//!
//! The gateway is deliberately narrow: a ranged query filtered on the
//! notified flag, and a single-field update by id. No business rules live here.

mod rest;

pub use rest::{RestStore, RestStoreConfig};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStore, StoreCall};

use async_trait::async_trait;
use rmd_core::{DateRange, Event, EventId};
use thiserror::Error;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("event not found: {0}")]
    NotFound(EventId),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Read/write contract to the remote event store
#[async_trait]
pub trait StoreGateway: Clone + Send + Sync + 'static {
    /// Events dated within `range` with the given notified flag, ascending by date
    async fn query_events(&self, range: DateRange, notified: bool)
        -> Result<Vec<Event>, StoreError>;

    /// Durably set `notified = true` for `id`
    async fn mark_notified(&self, id: &EventId) -> Result<(), StoreError>;
}
