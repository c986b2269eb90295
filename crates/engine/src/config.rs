// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cycles allowed per process lifetime unless configured otherwise
pub const DEFAULT_SESSION_CAP: u32 = 3;

/// Throttling and trigger timing for the scheduler
///
/// The defaults suit a host that only runs while a user session is open.
/// A long-lived host should set `session_cap` to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Minimum time between the starts of two executed cycles
    #[serde(with = "humantime_serde")]
    pub min_interval: Duration,
    /// Maximum cycles per process; `None` means unlimited
    ///
    /// Written as a count or as `"unlimited"`.
    #[serde(with = "session_cap")]
    pub session_cap: Option<u32>,
    /// Delay before the one-shot startup run
    #[serde(with = "humantime_serde")]
    pub startup_delay: Duration,
    /// Period of the background trigger
    #[serde(with = "humantime_serde")]
    pub periodic_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_secs(60),
            session_cap: Some(DEFAULT_SESSION_CAP),
            startup_delay: Duration::from_secs(2),
            periodic_interval: Duration::from_secs(5 * 60),
        }
    }
}

impl SchedulerConfig {
    /// Config with no session cap
    pub fn unbounded() -> Self {
        Self {
            session_cap: None,
            ..Self::default()
        }
    }

    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    pub fn with_session_cap(mut self, session_cap: Option<u32>) -> Self {
        self.session_cap = session_cap;
        self
    }
}

mod session_cap {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    const UNLIMITED: &str = "unlimited";

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Count(u32),
        Word(String),
    }

    pub fn serialize<S: Serializer>(cap: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error> {
        match cap {
            Some(count) => Repr::Count(*count),
            None => Repr::Word(UNLIMITED.to_string()),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Count(count) => Ok(Some(count)),
            Repr::Word(word) if word == UNLIMITED => Ok(None),
            Repr::Word(word) => Err(D::Error::custom(format!(
                "session_cap must be a count or \"{}\", got \"{}\"",
                UNLIMITED, word
            ))),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
