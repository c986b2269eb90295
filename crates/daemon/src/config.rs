// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration, read from TOML
//!
//! ```toml
//! owner_id = "household"
//! data_dir = "/var/lib/dues"
//! log_path = "/var/log/dues/duesd.log"
//! log_filter = "info,dues_engine=debug"
//!
//! [scheduler]
//! min_interval = "60s"
//! session_cap = "unlimited"
//! periodic_interval = "5m"
//! ```

use crate::lifecycle::LifecycleError;
use dues_engine::SchedulerConfig;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

/// Daemon configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DaemonConfig {
    /// Owner whose obligations this daemon schedules
    pub owner_id: String,
    /// Root of the JSON document store; defaults to the state directory
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Log file; logs go to stderr when unset
    #[serde(default)]
    pub log_path: Option<PathBuf>,
    /// Filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Unlike the library defaults, a daemon has no session cap unless one
    /// is configured
    #[serde(
        default = "SchedulerConfig::unbounded",
        deserialize_with = "scheduler_table"
    )]
    pub scheduler: SchedulerConfig,
}

/// A `[scheduler]` table without `session_cap` leaves the cap off
fn scheduler_table<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<SchedulerConfig, D::Error> {
    let table = toml::Table::deserialize(deserializer)?;
    let capped = table.contains_key("session_cap");
    let mut config: SchedulerConfig = toml::Value::Table(table)
        .try_into()
        .map_err(D::Error::custom)?;
    if !capped {
        config.session_cap = None;
    }
    Ok(config)
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl DaemonConfig {
    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self, LifecycleError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| LifecycleError::ConfigRead(path.to_path_buf(), e))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, LifecycleError> {
        Ok(toml::from_str(text)?)
    }

    /// Config for an owner with every other setting defaulted
    pub fn for_owner(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            data_dir: None,
            log_path: None,
            log_filter: default_log_filter(),
            scheduler: SchedulerConfig::unbounded(),
        }
    }

    /// Store directory, falling back to the state directory
    pub fn data_dir(&self) -> Result<PathBuf, LifecycleError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(state_dir()?.join("data")),
        }
    }

    /// Path of the PID/lock file guarding the data directory
    pub fn lock_path(&self) -> Result<PathBuf, LifecycleError> {
        Ok(self.data_dir()?.join("duesd.pid"))
    }
}

/// Get the state directory for dues
fn state_dir() -> Result<PathBuf, LifecycleError> {
    // Use XDG_STATE_HOME or default to ~/.local/state
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("dues"));
    }

    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/dues"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
