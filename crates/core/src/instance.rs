// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Obligation instances and their status lifecycle
//!
//! ```text
//! pending ──MarkOverdue──▶ overdue
//!    │                        │
//!    └────────Pay────────▶ paid ◀┘
//! ```
//!
//! `paid` is terminal. Instances are only created by the generator and are
//! never deleted except when their template is.

use crate::calendar::end_of_day;
use crate::id::{InstanceId, TemplateId};
use crate::template::{Category, RecurrenceType};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an instance is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObligationStatus {
    Pending,
    Overdue,
    Paid,
}

impl ObligationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObligationStatus::Pending => "pending",
            ObligationStatus::Overdue => "overdue",
            ObligationStatus::Paid => "paid",
        }
    }

    /// Pending or overdue
    pub fn is_open(&self) -> bool {
        !matches!(self, ObligationStatus::Paid)
    }
}

impl fmt::Display for ObligationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events that move an instance through its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObligationEvent {
    /// The due date has passed without payment
    MarkOverdue,
    /// A payment was recorded for this instance
    Pay {
        paid_at: NaiveDateTime,
        payment_id: String,
    },
}

/// An occurrence produced by the generator, not yet stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateInstance {
    pub template_id: TemplateId,
    pub owner_id: String,
    pub item_name: String,
    pub amount: Decimal,
    pub category: Category,
    pub recurrence_type: RecurrenceType,
    pub due_date: NaiveDate,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

impl CandidateInstance {
    /// A pending instance not yet assigned an id
    pub fn into_pending(self, created_at: NaiveDateTime) -> ObligationInstance {
        ObligationInstance {
            id: InstanceId::default(),
            template_id: self.template_id,
            owner_id: self.owner_id,
            item_name: self.item_name,
            amount: self.amount,
            category: self.category,
            recurrence_type: self.recurrence_type,
            due_date: self.due_date,
            status: ObligationStatus::Pending,
            period_start: self.period_start,
            period_end: self.period_end,
            created_at,
            paid_at: None,
            payment_id: None,
        }
    }
}

/// One concrete, dated occurrence of a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObligationInstance {
    #[serde(default)]
    pub id: InstanceId,
    /// Lookup only; the template may since have been renamed or deleted
    pub template_id: TemplateId,
    pub owner_id: String,
    /// Copied at generation time
    pub item_name: String,
    pub amount: Decimal,
    #[serde(default)]
    pub category: Category,
    pub recurrence_type: RecurrenceType,
    pub due_date: NaiveDate,
    pub status: ObligationStatus,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub paid_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub payment_id: Option<String>,
}

impl ObligationInstance {
    /// True once the whole due day lies before `now`
    pub fn is_past_due(&self, now: NaiveDateTime) -> bool {
        end_of_day(self.due_date) < now
    }

    /// Pure state transition
    ///
    /// Returns `None` when the event does not apply in the current status,
    /// so repeated sweeps never undo or duplicate a transition.
    pub fn transition(&self, event: ObligationEvent) -> Option<Self> {
        match (self.status, event) {
            (ObligationStatus::Pending, ObligationEvent::MarkOverdue) => Some(Self {
                status: ObligationStatus::Overdue,
                ..self.clone()
            }),
            (
                ObligationStatus::Pending | ObligationStatus::Overdue,
                ObligationEvent::Pay {
                    paid_at,
                    payment_id,
                },
            ) => Some(Self {
                status: ObligationStatus::Paid,
                paid_at: Some(paid_at),
                payment_id: Some(payment_id),
                ..self.clone()
            }),
            (ObligationStatus::Overdue, ObligationEvent::MarkOverdue)
            | (ObligationStatus::Paid, _) => None,
        }
    }
}

#[cfg(test)]
#[path = "instance_tests.rs"]
mod tests;
