// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reminder Daemon (rmdd)
//!
//! Keeps today's events cached, sends reminders as they come due and
//! accepts change-feed payloads on a Unix socket.

use std::path::PathBuf;
use std::sync::Arc;

use rmd_daemon::lifecycle::{self, Config, LifecycleError};
use rmd_daemon::server;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let config_path = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        PathBuf::from("rmdd.toml")
    };

    // Load configuration
    let config = Config::load(&config_path)?;

    // Set up logging
    let log_guard = setup_logging(&config)?;

    info!("Starting rmdd with config {}", config_path.display());

    // Start daemon
    let daemon = match lifecycle::startup(&config).await {
        Ok(d) => d,
        Err(e) => {
            // Write error synchronously (tracing is non-blocking and may not flush in time)
            write_startup_error(&config, &e);
            error!("Failed to start daemon: {}", e);
            drop(log_guard);
            return Err(e.into());
        }
    };

    // Set up signal handlers
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!(
        "Daemon ready, listening on {}",
        config.daemon.socket_path.display()
    );

    // Signal ready for parent process (e.g., systemd)
    println!("READY");

    // Main event loop
    loop {
        tokio::select! {
            // Accept feed connections
            result = daemon.listener.accept() => {
                match result {
                    Ok((stream, _)) => {
                        let listener = Arc::clone(daemon.scheduling.listener());
                        tokio::spawn(async move {
                            match server::handle_connection(listener, stream).await {
                                Ok(applied) => debug!(applied, "feed connection done"),
                                Err(e) => error!("Error handling connection: {}", e),
                            }
                        });
                    }
                    Err(e) => {
                        error!("Error accepting connection: {}", e);
                    }
                }
            }

            // Graceful shutdown on SIGTERM
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down...");
                daemon.shutdown().await?;
                break;
            }

            // Graceful shutdown on SIGINT
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down...");
                daemon.shutdown().await?;
                break;
            }
        }
    }

    info!("Daemon stopped");
    Ok(())
}

/// Write startup error synchronously to log file.
fn write_startup_error(config: &Config, error: &LifecycleError) {
    use std::io::Write;

    let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.daemon.log_path)
    else {
        return;
    };
    let _ = writeln!(file, "ERROR Failed to start daemon: {}", error);
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_path = &config.daemon.log_path;
    let log_dir = log_path.parent().ok_or(LifecycleError::NoLogDir)?;

    // Create log directory if needed
    std::fs::create_dir_all(log_dir)?;

    // Set up file appender
    let file_appender = tracing_appender::rolling::never(
        log_dir,
        log_path.file_name().ok_or(LifecycleError::NoLogDir)?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Set up subscriber with env filter
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
