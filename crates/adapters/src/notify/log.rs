// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notifier that only writes to the log.

use super::{Notifier, NotifyError};
use async_trait::async_trait;

/// Notifier that logs each message and reports success.
///
/// Used when no delivery transport is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, destination: &str, text: &str) -> Result<(), NotifyError> {
        tracing::info!(destination, text, "message (log only)");
        Ok(())
    }
}
