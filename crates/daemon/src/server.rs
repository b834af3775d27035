// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Change-feed socket connections.
//!
//! A connection stays open for as many payloads as the feed sends. A bad
//! payload gets an error reply and the connection carries on.

use std::sync::Arc;

use rmd_core::Clock;
use rmd_engine::ChangeFeedListener;
use tokio::io::BufReader;
use tokio::net::UnixStream;
use tracing::{debug, warn};

use crate::protocol::{self, Reply};

/// Handle a single feed connection until the peer closes it
pub async fn handle_connection<C: Clock>(
    listener: Arc<ChangeFeedListener<C>>,
    stream: UnixStream,
) -> Result<usize, ServerError> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut applied = 0;

    loop {
        let line = match protocol::read_line(&mut reader).await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) if e.is_recoverable() => {
                warn!(error = %e, "rejected feed line");
                protocol::write_reply(&mut writer, &Reply::error(e)).await?;
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if line.trim().is_empty() {
            continue;
        }

        let reply = match listener.apply_json(&line) {
            Ok(outcome) => {
                applied += 1;
                Reply::applied(outcome)
            }
            Err(e) => Reply::error(e),
        };
        protocol::write_reply(&mut writer, &reply).await?;
    }

    debug!(applied, "feed connection closed");
    Ok(applied)
}

/// Server errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
