// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger sites feeding one shared runner
//!
//! Every trigger goes through [`SchedulerRunner::run`], so the guard
//! decides whether anything executes. Background timers stop when the
//! [`Triggers`] value is shut down or dropped. Cycles run detached from
//! the timers, so stopping a timer never cancels a cycle in progress.

use crate::config::SchedulerConfig;
use crate::runner::{RunOutcome, SchedulerRunner, TriggerSource};
use dues_adapters::DocumentStore;
use dues_core::Clock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Owns the background trigger tasks for one runner
pub struct Triggers<S, C> {
    runner: Arc<SchedulerRunner<S, C>>,
    startup_delay: Duration,
    periodic_interval: Duration,
    mounted: AtomicBool,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl<S, C> Triggers<S, C>
where
    S: DocumentStore,
    C: Clock,
{
    pub fn new(runner: Arc<SchedulerRunner<S, C>>, config: &SchedulerConfig) -> Self {
        Self {
            runner,
            startup_delay: config.startup_delay,
            periodic_interval: config.periodic_interval,
            mounted: AtomicBool::new(false),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Mount and start the periodic timer in one go
    pub fn spawn(runner: Arc<SchedulerRunner<S, C>>, config: &SchedulerConfig) -> Self {
        let triggers = Self::new(runner, config);
        triggers.mount();
        triggers.start_periodic();
        triggers
    }

    /// Schedule the startup run after the startup delay
    ///
    /// Only the first call does anything. Returns whether this call
    /// scheduled the run.
    pub fn mount(&self) -> bool {
        if self.mounted.swap(true, Ordering::SeqCst) {
            return false;
        }
        let runner = Arc::clone(&self.runner);
        let delay = self.startup_delay;
        self.track(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = runner.trigger(TriggerSource::Startup);
        }));
        true
    }

    /// Start the periodic timer; the first tick comes one interval from now
    pub fn start_periodic(&self) {
        let runner = Arc::clone(&self.runner);
        let period = self.periodic_interval;
        self.track(tokio::spawn(async move {
            let mut timer = interval_at(Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                timer.tick().await;
                let _ = runner.trigger(TriggerSource::Periodic);
            }
        }));
    }

    /// Manual run after a template edit
    pub fn template_changed(&self) -> JoinHandle<RunOutcome> {
        self.runner.trigger(TriggerSource::TemplateChanged)
    }

    /// Manual run before reading fresh data
    pub fn refresh(&self) -> JoinHandle<RunOutcome> {
        self.runner.trigger(TriggerSource::Refresh)
    }

    pub fn runner(&self) -> &Arc<SchedulerRunner<S, C>> {
        &self.runner
    }

    /// Stop the background timers
    pub fn shutdown(&self) {
        for task in self.lock_tasks().drain(..) {
            task.abort();
        }
    }

    fn track(&self, task: JoinHandle<()>) {
        self.lock_tasks().push(task);
    }

    fn lock_tasks(&self) -> std::sync::MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<S, C> Drop for Triggers<S, C> {
    fn drop(&mut self) {
        let tasks = self.tasks.get_mut().unwrap_or_else(|e| e.into_inner());
        for task in tasks.drain(..) {
            task.abort();
        }
    }
}

#[cfg(test)]
#[path = "triggers_tests.rs"]
mod tests;
