// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup and shutdown.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use dues_adapters::{
    JsonFileStore, LogNotifyAdapter, StoreError, StorePaymentRecorder, TracedDocumentStore,
};
use dues_core::SystemClock;
use dues_engine::{Dues, DuesDeps, EngineError, NotificationOutcome, Triggers};
use fs2::FileExt;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::DaemonConfig;

/// Store the daemon runs against (wrapped with tracing)
pub type DaemonStore = TracedDocumentStore<JsonFileStore>;

/// Facade with the daemon's concrete adapter types
pub type DaemonDues =
    Dues<DaemonStore, LogNotifyAdapter, StorePaymentRecorder<DaemonStore>, SystemClock>;

/// How long shutdown waits for a running cycle to finish
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Daemon state during operation
pub struct DaemonState {
    pub config: DaemonConfig,
    pub data_dir: PathBuf,
    lock_path: PathBuf,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    pub dues: DaemonDues,
    triggers: Triggers<DaemonStore, SystemClock>,
    /// When daemon started
    pub start_time: Instant,
}

impl DaemonState {
    /// Evaluate the push policy and deliver a notice if one is due
    pub async fn check_notifications(&self) -> Result<NotificationOutcome, EngineError> {
        self.dues.check_notifications().await
    }

    /// Shutdown the daemon gracefully
    pub async fn shutdown(&mut self) -> Result<(), LifecycleError> {
        info!("Shutting down daemon...");

        // 1. Stop the startup and periodic timers
        self.triggers.shutdown();

        // 2. Let a cycle already under way finish its writes
        let deadline = Instant::now() + DRAIN_TIMEOUT;
        while self.dues.runner().is_in_flight() {
            if Instant::now() >= deadline {
                warn!("Cycle still running after {:?}, exiting anyway", DRAIN_TIMEOUT);
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        // 3. Remove PID file
        if self.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.lock_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }

        // 4. Lock is released when self.lock_file is dropped

        info!(
            uptime_secs = self.start_time.elapsed().as_secs(),
            "Daemon shutdown complete"
        );
        Ok(())
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Failed to read config {0}: {1}")]
    ConfigRead(PathBuf, std::io::Error),

    #[error("Invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the daemon
///
/// Must be called from within a tokio runtime; the scheduler triggers are
/// spawned onto it.
pub async fn startup(config: &DaemonConfig) -> Result<DaemonState, LifecycleError> {
    let lock_path = config.lock_path()?;
    match startup_inner(config).await {
        Ok(state) => Ok(state),
        Err(e) => {
            // A failed lock means another daemon owns the PID file
            if !matches!(e, LifecycleError::LockFailed(_)) {
                cleanup_on_failure(&lock_path);
            }
            Err(e)
        }
    }
}

/// Inner startup logic - cleanup_on_failure called if this fails
async fn startup_inner(config: &DaemonConfig) -> Result<DaemonState, LifecycleError> {
    // 1. Create data directory (holds the lock file too)
    let data_dir = config.data_dir()?;
    std::fs::create_dir_all(&data_dir)?;

    // 2. Acquire lock file FIRST - two daemons must never share a store.
    // Opened without truncation so a losing contender leaves the PID intact.
    let lock_path = config.lock_path()?;
    let mut lock_file = std::fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;

    // Write PID to lock file
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;

    // 3. Open the store (wrapped with tracing for observability)
    let store = TracedDocumentStore::new(JsonFileStore::open(&data_dir)?);

    // 4. Wire the facade and start its triggers
    let dues = Dues::new(
        DuesDeps {
            store: store.clone(),
            notify: LogNotifyAdapter::new(),
            payments: StorePaymentRecorder::new(store),
            clock: SystemClock,
        },
        config.owner_id.clone(),
        config.scheduler.clone(),
    );
    let triggers = dues.start_triggers();

    info!(
        owner_id = %config.owner_id,
        data_dir = %data_dir.display(),
        session_cap = ?config.scheduler.session_cap,
        "Daemon started"
    );

    Ok(DaemonState {
        config: config.clone(),
        data_dir,
        lock_path,
        lock_file,
        dues,
        triggers,
        start_time: Instant::now(),
    })
}

/// Clean up resources on startup failure
fn cleanup_on_failure(lock_path: &std::path::Path) {
    if lock_path.exists() {
        let _ = std::fs::remove_file(lock_path);
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
