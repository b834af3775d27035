// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PostgREST-style HTTP store
//!
//! ureq is blocking, so every request runs on the blocking pool.

use super::{StoreError, StoreGateway};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rmd_core::{DateRange, Event, EventId};
use serde::Deserialize;
use std::time::Duration;

/// Connection settings for [`RestStore`]
#[derive(Debug, Clone, Deserialize)]
pub struct RestStoreConfig {
    /// Base REST URL, e.g. `https://project.example.co/rest/v1`
    pub url: String,
    /// Service key sent as `apikey` and bearer token
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_table() -> String {
    "events".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

/// Store backed by a PostgREST endpoint
#[derive(Clone)]
pub struct RestStore {
    agent: ureq::Agent,
    endpoint: String,
    api_key: Option<String>,
}

impl RestStore {
    pub fn new(config: &RestStoreConfig) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build()
            .into();
        Self {
            agent,
            endpoint: format!("{}/{}", config.url.trim_end_matches('/'), config.table),
            api_key: config.api_key.clone(),
        }
    }

    fn authorize<B>(&self, request: ureq::RequestBuilder<B>) -> ureq::RequestBuilder<B> {
        match &self.api_key {
            Some(key) => request
                .header("apikey", key)
                .header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }

    fn query_blocking(&self, range: DateRange, notified: bool) -> Result<Vec<Event>, StoreError> {
        let request = self
            .agent
            .get(&self.endpoint)
            .query("select", "*")
            .query("date", format!("gte.{}", timestamp(range.from)))
            .query("date", format!("lt.{}", timestamp(range.to)))
            .query("notified", format!("eq.{}", notified))
            .query("order", "date.asc");

        let mut response = self.authorize(request).call().map_err(request_error)?;
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))
    }

    fn mark_notified_blocking(&self, id: &EventId) -> Result<(), StoreError> {
        let request = self
            .agent
            .patch(&self.endpoint)
            .query("id", format!("eq.{}", id))
            .header("Content-Type", "application/json")
            .header("Prefer", "return=representation");

        let mut response = self
            .authorize(request)
            .send(r#"{"notified":true}"#)
            .map_err(request_error)?;
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        let rows: Vec<serde_json::Value> =
            serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))?;
        if rows.is_empty() {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl StoreGateway for RestStore {
    async fn query_events(
        &self,
        range: DateRange,
        notified: bool,
    ) -> Result<Vec<Event>, StoreError> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.query_blocking(range, notified))
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
    }

    async fn mark_notified(&self, id: &EventId) -> Result<(), StoreError> {
        let store = self.clone();
        let id = id.clone();
        tokio::task::spawn_blocking(move || store.mark_notified_blocking(&id))
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
    }
}

fn timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn request_error(error: ureq::Error) -> StoreError {
    match error {
        ureq::Error::StatusCode(status) => StoreError::Status {
            status,
            body: String::new(),
        },
        other => StoreError::Request(other.to_string()),
    }
}
