// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake notifier for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Notifier, NotifyError};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyCall {
    pub destination: String,
    pub text: String,
}

#[derive(Default)]
struct FakeNotifierState {
    calls: Vec<NotifyCall>,
    fail_all: bool,
    failing_destinations: HashSet<String>,
    latency: Option<Duration>,
}

/// Fake notifier with call recording, failure injection and optional latency
#[derive(Clone, Default)]
pub struct FakeNotifier {
    state: Arc<Mutex<FakeNotifierState>>,
}

impl FakeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeNotifierState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Get all recorded notifications, including failed attempts
    pub fn calls(&self) -> Vec<NotifyCall> {
        self.lock().calls.clone()
    }

    pub fn calls_to(&self, destination: &str) -> Vec<NotifyCall> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.destination == destination)
            .cloned()
            .collect()
    }

    pub fn set_fails(&self, fails: bool) {
        self.lock().fail_all = fails;
    }

    pub fn fail_destination(&self, destination: impl Into<String>) {
        self.lock().failing_destinations.insert(destination.into());
    }

    /// Delay every send by `latency` (simulates a slow transport)
    pub fn set_latency(&self, latency: Duration) {
        self.lock().latency = Some(latency);
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn send(&self, destination: &str, text: &str) -> Result<(), NotifyError> {
        let (latency, fails) = {
            let mut state = self.lock();
            state.calls.push(NotifyCall {
                destination: destination.to_string(),
                text: text.to_string(),
            });
            let fails = state.fail_all || state.failing_destinations.contains(destination);
            (state.latency, fails)
        };

        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        if fails {
            return Err(NotifyError::Failed("injected failure".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
