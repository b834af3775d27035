// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Webhook notifier
//!
//! Posts `{"to": ..., "body": ...}` to a messaging gateway. ureq is blocking,
//! so sends run on the blocking pool.

use super::{Notifier, NotifyError};
use async_trait::async_trait;
use std::time::Duration;

#[derive(Clone)]
pub struct WebhookNotifier {
    agent: ureq::Agent,
    url: String,
    token: Option<String>,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, token: Option<String>, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            agent,
            url: url.into(),
            token,
        }
    }

    fn send_blocking(&self, destination: &str, text: &str) -> Result<(), NotifyError> {
        let payload = serde_json::json!({ "to": destination, "body": text }).to_string();

        let mut request = self
            .agent
            .post(&self.url)
            .header("Content-Type", "application/json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        match request.send(payload.as_str()) {
            Ok(_) => Ok(()),
            Err(ureq::Error::StatusCode(status)) => Err(NotifyError::Rejected(status)),
            Err(e) => Err(NotifyError::Failed(e.to_string())),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, destination: &str, text: &str) -> Result<(), NotifyError> {
        if destination.trim().is_empty() {
            return Err(NotifyError::InvalidDestination(destination.to_string()));
        }

        let notifier = self.clone();
        let destination = destination.to_string();
        let text = text.to_string();
        tokio::task::spawn_blocking(move || notifier.send_blocking(&destination, &text))
            .await
            .map_err(|e| NotifyError::Failed(e.to_string()))?
    }
}
