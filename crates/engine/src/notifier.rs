// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Push policy applied to an owner's open obligations

use crate::error::EngineError;
use crate::obligations::ObligationStore;
use dues_adapters::{DocumentStore, NotifyAdapter};
use dues_core::{classify, Clock, DueSummary, PushDecision, PushNotice};

/// What a notification check found and did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationOutcome {
    pub summary: DueSummary,
    pub decision: PushDecision,
    /// The push delivered, if any
    pub sent: Option<PushNotice>,
}

/// Classifies open obligations and pushes at most one notice per check
#[derive(Clone)]
pub struct Notifier<S, N, C> {
    owner_id: String,
    obligations: ObligationStore<S>,
    notify: N,
    clock: C,
}

impl<S, N, C> Notifier<S, N, C>
where
    S: DocumentStore,
    N: NotifyAdapter,
    C: Clock,
{
    pub fn new(store: S, notify: N, clock: C, owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            obligations: ObligationStore::new(store),
            notify,
            clock,
        }
    }

    /// Counts for display, without pushing anything
    pub async fn summary(&self) -> Result<DueSummary, EngineError> {
        let open = self.obligations.list_open(&self.owner_id).await?;
        Ok(classify(&open, self.clock.local_now()))
    }

    /// Classify and deliver the push the policy calls for
    ///
    /// Nothing is sent without permission; that is not an error.
    pub async fn check(&self) -> Result<NotificationOutcome, EngineError> {
        let summary = self.summary().await?;
        let decision = summary.push_decision();

        let sent = match decision.notice() {
            Some(notice) if self.notify.has_permission() => {
                self.notify
                    .send(&notice.title, &notice.body, notice.tag)
                    .await?;
                tracing::info!(owner_id = %self.owner_id, tag = notice.tag, "push sent");
                Some(notice)
            }
            Some(notice) => {
                tracing::debug!(tag = notice.tag, "push suppressed without permission");
                None
            }
            None => None,
        };

        Ok(NotificationOutcome {
            summary,
            decision,
            sent,
        })
    }
}

#[cfg(test)]
#[path = "notifier_tests.rs"]
mod tests;
