// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: configuration, startup, shutdown.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rmd_adapters::{
    LogNotifier, Notifier, NotifyError, RestStore, RestStoreConfig, TracedNotifier, TracedStore,
    WebhookNotifier,
};
use rmd_core::{SchedulerConfig, SystemClock};
use rmd_engine::{RuntimeError, Scheduling};
use serde::Deserialize;
use thiserror::Error;
use tokio::net::UnixListener;
use tracing::{info, warn};

/// Scheduling with concrete adapter types (wrapped with tracing)
pub type DaemonScheduling =
    Scheduling<TracedStore<RestStore>, TracedNotifier<DaemonNotifier>, SystemClock>;

/// Daemon configuration, read from a TOML file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    pub store: RestStoreConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub daemon: DaemonPaths,
}

/// Where reminders are delivered; no webhook means log-only
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotifyConfig {
    pub webhook_url: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            token: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DaemonPaths {
    /// Path to the change-feed Unix socket
    pub socket_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
}

impl Default for DaemonPaths {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from("rmdd.sock"),
            log_path: PathBuf::from("rmdd.log"),
        }
    }
}

impl Config {
    /// Load config from `path`; relative daemon paths resolve against its directory
    pub fn load(path: &Path) -> Result<Self, LifecycleError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| LifecycleError::ConfigRead(path.to_path_buf(), e))?;
        let mut config = Self::from_toml_str(&text)?;

        if let Some(base) = path.parent() {
            config.daemon.socket_path = base.join(&config.daemon.socket_path);
            config.daemon.log_path = base.join(&config.daemon.log_path);
        }
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, LifecycleError> {
        Ok(toml::from_str(text)?)
    }
}

/// Notifier selected by configuration
#[derive(Clone)]
pub enum DaemonNotifier {
    Webhook(WebhookNotifier),
    Log(LogNotifier),
}

impl DaemonNotifier {
    pub fn from_config(config: &NotifyConfig) -> Self {
        match &config.webhook_url {
            Some(url) => Self::Webhook(WebhookNotifier::new(
                url.clone(),
                config.token.clone(),
                Duration::from_secs(config.timeout_secs),
            )),
            None => Self::Log(LogNotifier::new()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Webhook(_) => "webhook",
            Self::Log(_) => "log",
        }
    }
}

#[async_trait]
impl Notifier for DaemonNotifier {
    async fn send(&self, destination: &str, text: &str) -> Result<(), NotifyError> {
        match self {
            Self::Webhook(notifier) => notifier.send(destination, text).await,
            Self::Log(notifier) => notifier.send(destination, text).await,
        }
    }
}

/// Daemon state during operation
pub struct DaemonState {
    pub config: Config,
    /// Change-feed socket listener
    pub listener: UnixListener,
    pub scheduling: Arc<DaemonScheduling>,
    /// When daemon started
    pub start_time: Instant,
}

impl DaemonState {
    /// Shutdown the daemon gracefully
    pub async fn shutdown(&self) -> Result<(), LifecycleError> {
        info!("Shutting down daemon...");

        self.scheduling.shutdown().await;

        let socket_path = &self.config.daemon.socket_path;
        if socket_path.exists() {
            if let Err(e) = std::fs::remove_file(socket_path) {
                warn!("Failed to remove socket file: {}", e);
            }
        }

        info!(
            uptime_secs = self.start_time.elapsed().as_secs(),
            "Daemon shutdown complete"
        );
        Ok(())
    }
}

/// Bind the feed socket and start scheduling
pub async fn startup(config: &Config) -> Result<DaemonState, LifecycleError> {
    let listener = bind_socket(&config.daemon.socket_path)?;

    let store = TracedStore::new(RestStore::new(&config.store));
    let notifier = DaemonNotifier::from_config(&config.notify);
    info!(notifier = notifier.kind(), store = %config.store.url, "adapters configured");

    let clock = SystemClock::new(config.scheduler.zone);
    let scheduling = Arc::new(Scheduling::new(
        store,
        TracedNotifier::new(notifier),
        clock,
        config.scheduler.clone(),
    )?);
    scheduling.start().await?;

    Ok(DaemonState {
        config: config.clone(),
        listener,
        scheduling,
        start_time: Instant::now(),
    })
}

/// Bind the Unix socket, replacing a stale socket file
pub fn bind_socket(path: &Path) -> Result<UnixListener, LifecycleError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    UnixListener::bind(path).map_err(|e| LifecycleError::BindFailed(path.to_path_buf(), e))
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Failed to read config at {0}: {1}")]
    ConfigRead(PathBuf, std::io::Error),

    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Log path has no parent directory or file name")]
    NoLogDir,

    #[error("Failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
