// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution guard for scheduler cycles
//!
//! Admission is checked in order: a cycle already in flight, the session
//! cap, then the minimum interval since the last cycle *started*. Refused
//! calls return at once; nothing is queued.

use crate::config::SchedulerConfig;
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Why a run was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another cycle is executing
    InFlight,
    /// The last cycle started less than the minimum interval ago
    TooSoon { elapsed: Duration },
    /// The session has used up its cycles
    SessionCapReached { runs: u32 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InFlight => write!(f, "cycle in flight"),
            SkipReason::TooSoon { elapsed } => {
                write!(f, "last cycle started {}s ago", elapsed.as_secs())
            }
            SkipReason::SessionCapReached { runs } => write!(f, "session cap reached after {} runs", runs),
        }
    }
}

#[derive(Debug, Default)]
struct GuardState {
    in_flight: bool,
    last_started: Option<Instant>,
    runs: u32,
}

/// Mutual exclusion plus throttling for one runner
#[derive(Debug)]
pub struct CycleGuard {
    state: Mutex<GuardState>,
    min_interval: Duration,
    session_cap: Option<u32>,
}

impl CycleGuard {
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            state: Mutex::new(GuardState::default()),
            min_interval: config.min_interval,
            session_cap: config.session_cap,
        }
    }

    /// Admit a cycle starting at `now`, or say why not
    ///
    /// Admission counts as a run and stamps its start, whatever the cycle's
    /// outcome turns out to be.
    pub fn try_acquire(&self, now: Instant) -> Result<CyclePermit<'_>, SkipReason> {
        let mut state = self.lock();

        if state.in_flight {
            return Err(SkipReason::InFlight);
        }
        if let Some(cap) = self.session_cap {
            if state.runs >= cap {
                return Err(SkipReason::SessionCapReached { runs: state.runs });
            }
        }
        if let Some(last) = state.last_started {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < self.min_interval {
                return Err(SkipReason::TooSoon { elapsed });
            }
        }

        state.in_flight = true;
        state.last_started = Some(now);
        state.runs = state.runs.saturating_add(1);
        Ok(CyclePermit { guard: self })
    }

    pub fn is_in_flight(&self) -> bool {
        self.lock().in_flight
    }

    /// Cycles admitted so far
    pub fn runs(&self) -> u32 {
        self.lock().runs
    }

    fn lock(&self) -> MutexGuard<'_, GuardState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Proof of admission; dropping it clears the in-flight flag
///
/// Release happens on every exit path, unwinding included.
#[must_use = "the cycle is considered finished as soon as the permit is dropped"]
#[derive(Debug)]
pub struct CyclePermit<'a> {
    guard: &'a CycleGuard,
}

impl Drop for CyclePermit<'_> {
    fn drop(&mut self) {
        self.guard.lock().in_flight = false;
    }
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
