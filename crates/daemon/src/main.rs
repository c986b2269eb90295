// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dues Daemon (duesd)
//!
//! Background process that keeps one owner's obligations generated, swept
//! and notified.

use std::path::PathBuf;

use clap::Parser;
use dues_daemon::{lifecycle, DaemonConfig, LifecycleError};
use tokio::signal::unix::{signal, SignalKind};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

#[derive(Parser)]
#[command(name = "duesd", version, about = "Recurring obligation scheduler daemon")]
struct Args {
    /// Path to the daemon's TOML config
    #[arg(long, short)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration
    let config = DaemonConfig::load(&args.config)?;

    // Set up logging
    let _log_guard = setup_logging(&config)?;

    info!("Starting duesd for owner: {}", config.owner_id);

    // Start daemon
    let mut daemon = match lifecycle::startup(&config).await {
        Ok(d) => d,
        Err(e) => {
            error!("Failed to start daemon: {}", e);
            return Err(e.into());
        }
    };

    // Set up signal handlers
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    // Notifications share the periodic trigger's cadence
    let period = config.scheduler.periodic_interval;
    let mut notify_tick = interval_at(Instant::now() + period, period);
    notify_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("Daemon ready, data in {}", daemon.data_dir.display());

    // Main event loop
    loop {
        tokio::select! {
            _ = notify_tick.tick() => {
                match daemon.check_notifications().await {
                    Ok(outcome) => debug!(
                        overdue = outcome.summary.overdue_count,
                        due_today = outcome.summary.due_today_count,
                        sent = outcome.sent.is_some(),
                        "Notification check"
                    ),
                    Err(e) => error!("Error checking notifications: {}", e),
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

/// Log to the configured file, or stderr when none is set
///
/// `RUST_LOG` wins over the config's filter.
fn setup_logging(
    config: &DaemonConfig,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    let Some(log_path) = &config.log_path else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
        return Ok(None);
    };

    // Create log directory if needed
    let dir = log_path.parent().ok_or(LifecycleError::NoStateDir)?;
    std::fs::create_dir_all(dir)?;

    // Set up file appender
    let file_name = log_path.file_name().ok_or(LifecycleError::NoStateDir)?;
    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(Some(guard))
}
