// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire format for the change-feed socket
//!
//! Newline-delimited JSON in both directions. Each request line is one
//! change-feed payload; each gets exactly one reply line.

use rmd_engine::FeedOutcome;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Longest accepted request line, newline included
pub const MAX_LINE_BYTES: u64 = 1024 * 1024;

/// Reply to one request line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Reply {
    pub fn applied(outcome: FeedOutcome) -> Self {
        Self {
            ok: true,
            applied: Some(outcome_label(outcome).to_string()),
            error: None,
        }
    }

    pub fn error(message: impl ToString) -> Self {
        Self {
            ok: false,
            applied: None,
            error: Some(message.to_string()),
        }
    }
}

pub fn outcome_label(outcome: FeedOutcome) -> &'static str {
    match outcome {
        FeedOutcome::Inserted => "inserted",
        FeedOutcome::Replaced => "replaced",
        FeedOutcome::Removed => "removed",
        FeedOutcome::Absent => "absent",
        FeedOutcome::Evicted { .. } => "evicted",
    }
}

/// Protocol errors
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request line exceeds {MAX_LINE_BYTES} bytes")]
    LineTooLong,

    #[error("request is not valid UTF-8")]
    InvalidUtf8,
}

/// Encode a reply as one JSON line
pub fn encode(reply: &Reply) -> Result<Vec<u8>, ProtocolError> {
    let mut bytes = serde_json::to_vec(reply)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Read the next request line, without its terminator
///
/// Returns `Ok(None)` at end of stream. An over-long or non-UTF-8 line is
/// consumed whole before its error is returned, so the caller can reply and
/// keep reading.
pub async fn read_line<R>(reader: &mut R) -> Result<Option<String>, ProtocolError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let read = (&mut *reader)
        .take(MAX_LINE_BYTES)
        .read_until(b'\n', &mut buf)
        .await?;
    if read == 0 {
        return Ok(None);
    }
    if buf.last() != Some(&b'\n') && read as u64 >= MAX_LINE_BYTES {
        discard_rest_of_line(reader).await?;
        return Err(ProtocolError::LineTooLong);
    }

    let line = String::from_utf8(buf).map_err(|_| ProtocolError::InvalidUtf8)?;
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

async fn discard_rest_of_line<R>(reader: &mut R) -> Result<(), ProtocolError>
where
    R: AsyncBufRead + Unpin,
{
    let mut chunk = Vec::new();
    loop {
        chunk.clear();
        let read = (&mut *reader)
            .take(MAX_LINE_BYTES)
            .read_until(b'\n', &mut chunk)
            .await?;
        if read == 0 || chunk.last() == Some(&b'\n') {
            return Ok(());
        }
    }
}

impl ProtocolError {
    /// Whether the connection can carry on after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::LineTooLong | Self::InvalidUtf8)
    }
}

/// Write one reply line and flush
pub async fn write_reply<W>(writer: &mut W, reply: &Reply) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    let bytes = encode(reply)?;
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
