// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Change-feed payloads
//!
//! The store pushes point mutations as `{ "operation": ..., "event": {...} }`.
//! Parsing is strict about the two fields every mutation needs (`operation`
//! and `event.id`) and lenient about the rest.

use crate::event::{Event, EventId};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing operation")]
    MissingOperation,
    #[error("unknown operation: {0}")]
    UnknownOperation(String),
    #[error("missing event")]
    MissingEvent,
    #[error("missing event id")]
    MissingEventId,
    #[error("invalid event {id}: {source}")]
    InvalidEvent {
        id: String,
        source: serde_json::Error,
    },
}

/// Kind of mutation carried by a feed message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOperation {
    Insert,
    Update,
    Delete,
}

impl FeedOperation {
    pub fn parse(s: &str) -> Result<Self, FeedError> {
        match s.to_ascii_uppercase().as_str() {
            "INSERT" => Ok(Self::Insert),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            _ => Err(FeedError::UnknownOperation(s.to_string())),
        }
    }
}

impl fmt::Display for FeedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedOperation::Insert => write!(f, "INSERT"),
            FeedOperation::Update => write!(f, "UPDATE"),
            FeedOperation::Delete => write!(f, "DELETE"),
        }
    }
}

/// A validated change-feed mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedMessage {
    Insert(Event),
    Update(Event),
    Delete(EventId),
}

impl FeedMessage {
    /// Parse a raw JSON payload
    pub fn parse(payload: &str) -> Result<Self, FeedError> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_value(value)
    }

    pub fn from_value(mut value: Value) -> Result<Self, FeedError> {
        let operation = value
            .get("operation")
            .and_then(Value::as_str)
            .ok_or(FeedError::MissingOperation)
            .and_then(FeedOperation::parse)?;

        let event = value
            .get_mut("event")
            .filter(|e| e.is_object())
            .map(Value::take)
            .ok_or(FeedError::MissingEvent)?;

        let id: EventId = match event.get("id") {
            Some(raw) if !raw.is_null() => {
                serde_json::from_value(raw.clone()).map_err(|_| FeedError::MissingEventId)?
            }
            _ => return Err(FeedError::MissingEventId),
        };

        if operation == FeedOperation::Delete {
            return Ok(FeedMessage::Delete(id));
        }

        let event: Event = serde_json::from_value(event).map_err(|source| {
            FeedError::InvalidEvent {
                id: id.to_string(),
                source,
            }
        })?;

        Ok(match operation {
            FeedOperation::Insert => FeedMessage::Insert(event),
            _ => FeedMessage::Update(event),
        })
    }

    pub fn operation(&self) -> FeedOperation {
        match self {
            FeedMessage::Insert(_) => FeedOperation::Insert,
            FeedMessage::Update(_) => FeedOperation::Update,
            FeedMessage::Delete(_) => FeedOperation::Delete,
        }
    }

    pub fn id(&self) -> &EventId {
        match self {
            FeedMessage::Insert(event) | FeedMessage::Update(event) => &event.id,
            FeedMessage::Delete(id) => id,
        }
    }
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
