// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling
//!
//! Two readings are exposed: a monotonic [`Instant`] used for throttling
//! decisions, and a local wall-clock [`NaiveDateTime`] used for calendar
//! decisions (due dates, sweeps, classification).

use chrono::{Local, NaiveDateTime, TimeDelta};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// A clock that provides the current time
pub trait Clock: Clone + Send + Sync + 'static {
    /// Monotonic time, for measuring intervals
    fn now(&self) -> Instant;

    /// Local wall-clock time, for calendar arithmetic
    fn local_now(&self) -> NaiveDateTime;
}

/// Real system clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn local_now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

struct FakeTime {
    instant: Instant,
    local: NaiveDateTime,
}

/// Fake clock for testing with controllable time
///
/// Clones share the same underlying time, so a clock handed to a runner can
/// be advanced from the test body.
#[derive(Clone)]
pub struct FakeClock {
    current: Arc<Mutex<FakeTime>>,
}

impl FakeClock {
    /// Fake clock starting at the real current local time
    pub fn new() -> Self {
        Self::at(Local::now().naive_local())
    }

    /// Fake clock starting at a fixed local time
    pub fn at(local: NaiveDateTime) -> Self {
        Self {
            current: Arc::new(Mutex::new(FakeTime {
                instant: Instant::now(),
                local,
            })),
        }
    }

    /// Advance both readings by the given duration
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        current.instant += duration;
        current.local += TimeDelta::from_std(duration).unwrap_or_else(|_| TimeDelta::zero());
    }

    /// Jump the wall clock without touching the monotonic reading
    pub fn set_local(&self, local: NaiveDateTime) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        current.local = local;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.current.lock().unwrap_or_else(|e| e.into_inner()).instant
    }

    fn local_now(&self) -> NaiveDateTime {
        self.current.lock().unwrap_or_else(|e| e.into_inner()).local
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
