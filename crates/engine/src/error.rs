// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the reminder engine

use chrono_tz::Tz;
use rmd_adapters::StoreError;
use thiserror::Error;

/// Errors from (re)loading the cache
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: StoreError },
}

/// Errors from assembling or running the scheduling subsystem
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("clock zone {clock} does not match configured zone {config}")]
    ZoneMismatch { clock: Tz, config: Tz },
    #[error("{name} must be greater than zero")]
    ZeroInterval { name: &'static str },
    #[error("scheduling already started")]
    AlreadyStarted,
}
