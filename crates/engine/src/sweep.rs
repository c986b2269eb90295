// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Overdue sweep

use crate::error::EngineError;
use crate::obligations::ObligationStore;
use chrono::NaiveDateTime;
use dues_adapters::DocumentStore;
use serde::Serialize;

/// Counts from one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Pending instances looked at
    pub examined: usize,
    pub marked_overdue: usize,
    /// Transitions whose write failed; retried by the next sweep
    pub failures: usize,
}

/// Moves pending instances whose due day has passed to `overdue`
///
/// Re-running with the same or a later `now` never undoes or repeats a
/// transition. Paid instances are never loaded, and one paid after the
/// listing is left alone.
#[derive(Clone)]
pub struct OverdueTransitioner<S> {
    obligations: ObligationStore<S>,
}

impl<S: DocumentStore> OverdueTransitioner<S> {
    pub fn new(obligations: ObligationStore<S>) -> Self {
        Self { obligations }
    }

    pub async fn sweep(&self, owner_id: &str, now: NaiveDateTime) -> Result<SweepReport, EngineError> {
        let pending = self.obligations.list_pending(owner_id).await?;
        let mut report = SweepReport {
            examined: pending.len(),
            ..SweepReport::default()
        };

        for instance in pending.iter().filter(|i| i.is_past_due(now)) {
            match self.obligations.mark_overdue(&instance.id).await {
                Ok(true) => {
                    report.marked_overdue += 1;
                    tracing::debug!(
                        instance_id = %instance.id,
                        due_date = %instance.due_date,
                        "marked overdue"
                    );
                }
                // Paid since the listing; the payment stands
                Ok(false) => {
                    tracing::debug!(instance_id = %instance.id, "no longer pending, skipped");
                }
                Err(e) => {
                    report.failures += 1;
                    tracing::warn!(instance_id = %instance.id, error = %e, "overdue transition failed");
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
#[path = "sweep_tests.rs"]
mod tests;
