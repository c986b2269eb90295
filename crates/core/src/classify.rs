// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Due-date classification and the push policy built on it
//!
//! Each instance lands in exactly one bucket, checked in order:
//! overdue, due today, due soon (within [`DUE_SOON_DAYS`]), later.

use crate::calendar::{end_of_day, start_of_day};
use crate::instance::{ObligationInstance, ObligationStatus};
use chrono::{Days, NaiveDateTime};
use serde::Serialize;

/// Width of the due-soon window after today
pub const DUE_SOON_DAYS: u64 = 3;

/// Notification tag for overdue pushes
pub const OVERDUE_TAG: &str = "dues-overdue";

/// Notification tag for due-today pushes
pub const DUE_TODAY_TAG: &str = "dues-due-today";

/// Bucket an instance falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueBucket {
    Overdue,
    DueToday,
    DueSoon,
    Later,
}

/// Counts per bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DueSummary {
    pub overdue_count: usize,
    pub due_today_count: usize,
    pub due_soon_count: usize,
    /// Every instance supplied, whatever its bucket
    pub total_pending: usize,
}

/// Which push, if any, a summary warrants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushDecision {
    Overdue { count: usize },
    DueToday { count: usize },
    None,
}

/// A push ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushNotice {
    pub title: String,
    pub body: String,
    pub tag: &'static str,
}

/// Bucket for one instance
pub fn bucket(instance: &ObligationInstance, now: NaiveDateTime) -> DueBucket {
    let today = now.date();
    if instance.status == ObligationStatus::Overdue
        || end_of_day(instance.due_date) < start_of_day(today)
    {
        DueBucket::Overdue
    } else if instance.due_date == today {
        DueBucket::DueToday
    } else if instance.due_date > today && instance.due_date <= today + Days::new(DUE_SOON_DAYS) {
        DueBucket::DueSoon
    } else {
        DueBucket::Later
    }
}

/// Classify instances the caller has already narrowed to pending/overdue
pub fn classify(instances: &[ObligationInstance], now: NaiveDateTime) -> DueSummary {
    instances.iter().fold(
        DueSummary {
            total_pending: instances.len(),
            ..DueSummary::default()
        },
        |mut summary, instance| {
            match bucket(instance, now) {
                DueBucket::Overdue => summary.overdue_count += 1,
                DueBucket::DueToday => summary.due_today_count += 1,
                DueBucket::DueSoon => summary.due_soon_count += 1,
                DueBucket::Later => {}
            }
            summary
        },
    )
}

impl DueSummary {
    /// Overdue wins over due today; due soon is never pushed
    pub fn push_decision(&self) -> PushDecision {
        if self.overdue_count > 0 {
            PushDecision::Overdue {
                count: self.overdue_count,
            }
        } else if self.due_today_count > 0 {
            PushDecision::DueToday {
                count: self.due_today_count,
            }
        } else {
            PushDecision::None
        }
    }
}

impl PushDecision {
    pub fn notice(&self) -> Option<PushNotice> {
        match *self {
            PushDecision::Overdue { count } => Some(PushNotice {
                title: "Overdue bills".to_string(),
                body: format!("You have {} overdue {}", count, plural(count)),
                tag: OVERDUE_TAG,
            }),
            PushDecision::DueToday { count } => Some(PushNotice {
                title: "Bills due today".to_string(),
                body: format!("You have {} {} due today", count, plural(count)),
                tag: DUE_TODAY_TAG,
            }),
            PushDecision::None => None,
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        "bill"
    } else {
        "bills"
    }
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
