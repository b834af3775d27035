// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler configuration
//!
//! Deserialization validates eagerly: an unknown zone or a zero interval is
//! rejected when the config is read, never at the first tick.

use crate::event::DEFAULT_REMINDER_MINUTES;
use crate::retry::RetryPolicy;
use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unknown time zone: {0}")]
    InvalidZone(String),
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
    #[error("invalid digest time (expected HH:MM): {0}")]
    InvalidDigestTime(String),
}

/// Validated scheduler settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawSchedulerConfig")]
pub struct SchedulerConfig {
    pub sweep_interval: Duration,
    pub day_watch_interval: Duration,
    pub loader_retry: RetryPolicy,
    pub default_reminder_minutes: u32,
    pub zone: Tz,
    /// Local time at which the daily digest goes out; `None` disables it
    pub digest_time: Option<NaiveTime>,
    /// Minutes of the next day included in each day's load
    pub spillover_minutes: u32,
}

impl SchedulerConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let raw: RawSchedulerConfig = toml::from_str(s)?;
        Self::try_from(raw)
    }

    pub fn with_zone(mut self, zone: Tz) -> Self {
        self.zone = zone;
        self
    }

    pub fn with_digest_time(mut self, time: NaiveTime) -> Self {
        self.digest_time = Some(time);
        self
    }

    pub fn with_loader_retry(mut self, retry: RetryPolicy) -> Self {
        self.loader_retry = retry;
        self
    }

    pub fn with_spillover_minutes(mut self, minutes: u32) -> Self {
        self.spillover_minutes = minutes;
        self
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(60),
            day_watch_interval: Duration::from_secs(60),
            loader_retry: RetryPolicy::default(),
            default_reminder_minutes: DEFAULT_REMINDER_MINUTES,
            zone: Tz::UTC,
            digest_time: None,
            spillover_minutes: 0,
        }
    }
}

/// On-disk form, accepting both snake_case and camelCase keys
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawSchedulerConfig {
    #[serde(alias = "sweepIntervalSeconds")]
    pub sweep_interval_seconds: u64,
    #[serde(alias = "dayWatchIntervalSeconds")]
    pub day_watch_interval_seconds: u64,
    #[serde(alias = "loaderRetryDelaySeconds")]
    pub loader_retry_delay_seconds: u64,
    #[serde(alias = "loaderMaxAttempts")]
    pub loader_max_attempts: Option<u32>,
    #[serde(alias = "defaultReminderMinutes")]
    pub default_reminder_minutes: u32,
    pub zone: String,
    #[serde(alias = "digestTime")]
    pub digest_time: Option<String>,
    #[serde(alias = "spilloverMinutes")]
    pub spillover_minutes: u32,
}

impl Default for RawSchedulerConfig {
    fn default() -> Self {
        Self {
            sweep_interval_seconds: 60,
            day_watch_interval_seconds: 60,
            loader_retry_delay_seconds: 120,
            loader_max_attempts: None,
            default_reminder_minutes: DEFAULT_REMINDER_MINUTES,
            zone: "UTC".to_string(),
            digest_time: None,
            spillover_minutes: 0,
        }
    }
}

impl TryFrom<RawSchedulerConfig> for SchedulerConfig {
    type Error = ConfigError;

    fn try_from(raw: RawSchedulerConfig) -> Result<Self, Self::Error> {
        if raw.sweep_interval_seconds == 0 {
            return Err(ConfigError::ZeroInterval("sweep_interval_seconds"));
        }
        if raw.day_watch_interval_seconds == 0 {
            return Err(ConfigError::ZeroInterval("day_watch_interval_seconds"));
        }

        let zone: Tz = raw
            .zone
            .parse()
            .map_err(|_| ConfigError::InvalidZone(raw.zone.clone()))?;

        let digest_time = raw
            .digest_time
            .as_deref()
            .map(|s| {
                NaiveTime::parse_from_str(s, "%H:%M")
                    .map_err(|_| ConfigError::InvalidDigestTime(s.to_string()))
            })
            .transpose()?;

        let retry_delay = Duration::from_secs(raw.loader_retry_delay_seconds);
        let loader_retry = match raw.loader_max_attempts {
            Some(max) => RetryPolicy::bounded(retry_delay, max),
            None => RetryPolicy::unbounded(retry_delay),
        };

        Ok(Self {
            sweep_interval: Duration::from_secs(raw.sweep_interval_seconds),
            day_watch_interval: Duration::from_secs(raw.day_watch_interval_seconds),
            loader_retry,
            default_reminder_minutes: raw.default_reminder_minutes,
            zone,
            digest_time,
            spillover_minutes: raw.spillover_minutes,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
