// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Guarded scheduler cycles
//!
//! A cycle generates missing periods for every active, non-daily template
//! and then sweeps overdue instances. One runner is built per owner and
//! shared by every trigger site, so the guard state is per runner rather
//! than global.

use crate::config::SchedulerConfig;
use crate::error::EngineError;
use crate::guard::{CycleGuard, SkipReason};
use crate::obligations::{InsertOutcome, ObligationStore};
use crate::sweep::OverdueTransitioner;
use crate::templates::TemplateStore;
use chrono::NaiveDateTime;
use dues_adapters::DocumentStore;
use dues_core::{generate, Clock, RecurrenceTemplate};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

/// Which call site asked for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    /// One-shot run shortly after the host starts
    Startup,
    /// Background timer
    Periodic,
    /// A template was created, edited or deleted
    TemplateChanged,
    /// A reader wants fresh data
    Refresh,
}

impl TriggerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerSource::Startup => "startup",
            TriggerSource::Periodic => "periodic",
            TriggerSource::TemplateChanged => "template_changed",
            TriggerSource::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TriggerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts from one executed cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// Active non-daily templates considered
    pub templates_scanned: usize,
    /// Templates passed over because they still have a pending instance
    pub templates_skipped_pending: usize,
    pub instances_created: usize,
    pub duplicates_skipped: usize,
    pub generation_failures: usize,
    pub marked_overdue: usize,
}

/// Result of asking the runner to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(CycleReport),
    /// The cycle started but could not finish
    Failed(String),
    /// The guard refused the run
    Skipped(SkipReason),
}

impl RunOutcome {
    /// Whether the cycle body executed
    pub fn executed(&self) -> bool {
        !matches!(self, RunOutcome::Skipped(_))
    }
}

/// Runs guarded cycles for one owner
pub struct SchedulerRunner<S, C> {
    owner_id: String,
    templates: TemplateStore<S>,
    obligations: ObligationStore<S>,
    transitioner: OverdueTransitioner<S>,
    guard: CycleGuard,
    clock: C,
}

impl<S, C> SchedulerRunner<S, C>
where
    S: DocumentStore,
    C: Clock,
{
    pub fn new(store: S, clock: C, owner_id: impl Into<String>, config: &SchedulerConfig) -> Self {
        let obligations = ObligationStore::new(store.clone());
        Self {
            owner_id: owner_id.into(),
            templates: TemplateStore::new(store),
            transitioner: OverdueTransitioner::new(obligations.clone()),
            obligations,
            guard: CycleGuard::new(config),
            clock,
        }
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// Cycles admitted by the guard so far
    pub fn runs(&self) -> u32 {
        self.guard.runs()
    }

    pub fn is_in_flight(&self) -> bool {
        self.guard.is_in_flight()
    }

    /// Run one cycle if the guard admits it
    ///
    /// A refused call returns immediately without waiting for the cycle in
    /// flight. Failures inside the cycle are reported in the outcome; the
    /// in-flight flag is released on every path.
    pub async fn run(&self, source: TriggerSource) -> RunOutcome {
        let permit = match self.guard.try_acquire(self.clock.now()) {
            Ok(permit) => permit,
            Err(reason) => {
                tracing::debug!(owner_id = %self.owner_id, %source, %reason, "run skipped");
                return RunOutcome::Skipped(reason);
            }
        };

        // One reading per cycle keeps its decisions consistent
        let now = self.clock.local_now();
        let start = Instant::now();
        let outcome = match self.cycle(now).await {
            Ok(report) => {
                tracing::info!(
                    owner_id = %self.owner_id,
                    %source,
                    scanned = report.templates_scanned,
                    created = report.instances_created,
                    duplicates = report.duplicates_skipped,
                    failures = report.generation_failures,
                    overdue = report.marked_overdue,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "cycle completed"
                );
                RunOutcome::Completed(report)
            }
            Err(e) => {
                tracing::error!(owner_id = %self.owner_id, %source, error = %e, "cycle failed");
                RunOutcome::Failed(e.to_string())
            }
        };
        drop(permit);
        outcome
    }

    /// Fire-and-forget run on the tokio runtime
    pub fn trigger(self: &Arc<Self>, source: TriggerSource) -> JoinHandle<RunOutcome> {
        let runner = Arc::clone(self);
        tokio::spawn(async move { runner.run(source).await })
    }

    /// The cycle body, unguarded
    async fn cycle(&self, now: NaiveDateTime) -> Result<CycleReport, EngineError> {
        let templates = self.templates.list_active(&self.owner_id).await?;
        let mut report = CycleReport::default();

        for template in templates.iter().filter(|t| !t.is_daily()) {
            report.templates_scanned += 1;
            // One bad template must not block the others or the sweep
            if let Err(e) = self.generate_for(template, now, &mut report).await {
                report.generation_failures += 1;
                tracing::error!(
                    template_id = %template.id,
                    error = %e,
                    "instance generation failed"
                );
            }
        }

        let sweep = self.transitioner.sweep(&self.owner_id, now).await?;
        report.marked_overdue = sweep.marked_overdue;
        Ok(report)
    }

    async fn generate_for(
        &self,
        template: &RecurrenceTemplate,
        now: NaiveDateTime,
        report: &mut CycleReport,
    ) -> Result<(), EngineError> {
        if self.obligations.has_pending(&template.id).await? {
            report.templates_skipped_pending += 1;
            return Ok(());
        }

        for candidate in generate(template, now)? {
            match self.obligations.insert_if_absent(candidate, now).await? {
                InsertOutcome::Inserted(_) => report.instances_created += 1,
                InsertOutcome::Duplicate(_) => report.duplicates_skipped += 1,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
