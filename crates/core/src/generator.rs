// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Instance generation
//!
//! Expands a template into the dated candidates of its horizon:
//!
//! | kind            | horizon                    | period             |
//! |-----------------|----------------------------|--------------------|
//! | weekly          | 4 ISO weeks from this week | Monday..Sunday     |
//! | monthly         | this month + next 2        | whole month        |
//! | custom_calendar | this month                 | the due day itself |
//! | daily           | none                       | -                  |
//!
//! Candidates due before the start of today are dropped. Deduplication
//! against stored instances is the caller's job.

use crate::calendar::{
    add_months, day_in_month_clamped, days_in_month, first_of_month, last_of_month, week_start,
    weekday_offset,
};
use crate::instance::CandidateInstance;
use crate::template::{RecurrenceTemplate, RecurrenceType, ValidationError};
use chrono::{Days, NaiveDate, NaiveDateTime};

/// Weeks pre-created for weekly templates
pub const WEEKLY_HORIZON: u64 = 4;

/// Months pre-created for monthly templates, the current one included
pub const MONTHLY_HORIZON: u32 = 3;

/// A due date and the window it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Period {
    start: NaiveDate,
    end: NaiveDate,
    due: NaiveDate,
}

/// Expand `template` into candidates relative to `now`
///
/// Daily templates yield nothing. A template that fails validation yields an
/// error rather than a partial expansion.
pub fn generate(
    template: &RecurrenceTemplate,
    now: NaiveDateTime,
) -> Result<Vec<CandidateInstance>, ValidationError> {
    template.validate()?;

    let today = now.date();
    let periods = match template.recurrence_type {
        RecurrenceType::Daily => return Ok(Vec::new()),
        RecurrenceType::Weekly => {
            let week_day = template.week_day.ok_or(ValidationError::MissingWeekDay)?;
            weekly_periods(today, week_day)
        }
        RecurrenceType::Monthly => {
            let month_day = template.month_day.ok_or(ValidationError::MissingMonthDay)?;
            monthly_periods(today, month_day)
        }
        RecurrenceType::CustomCalendar => custom_periods(today, &template.custom_days),
    };
    let amount = template
        .amount
        .ok_or(ValidationError::MissingAmount(template.recurrence_type))?;

    Ok(periods
        .into_iter()
        .filter(|period| period.due >= today)
        .map(|period| CandidateInstance {
            template_id: template.id.clone(),
            owner_id: template.owner_id.clone(),
            item_name: template.name.clone(),
            amount,
            category: template.category,
            recurrence_type: template.recurrence_type,
            due_date: period.due,
            period_start: period.start,
            period_end: period.end,
        })
        .collect())
}

fn weekly_periods(today: NaiveDate, week_day: u8) -> Vec<Period> {
    let first_week = week_start(today);
    (0..WEEKLY_HORIZON)
        .map(|week| {
            let start = first_week + Days::new(week * 7);
            Period {
                start,
                end: start + Days::new(6),
                due: start + Days::new(weekday_offset(week_day)),
            }
        })
        .collect()
}

/// Days past the end of a short month are clamped to its last day
fn monthly_periods(today: NaiveDate, month_day: u8) -> Vec<Period> {
    (0..MONTHLY_HORIZON)
        .map(|offset| {
            let start = add_months(today, offset);
            Period {
                start,
                end: last_of_month(start),
                due: day_in_month_clamped(start, month_day),
            }
        })
        .collect()
}

/// Days past the end of the current month are skipped, not clamped
fn custom_periods(today: NaiveDate, days: &[u8]) -> Vec<Period> {
    let first = first_of_month(today);
    let month_len = days_in_month(today);
    days.iter()
        .filter(|day| (1..=month_len).contains(&u32::from(**day)))
        .map(|day| {
            let due = first + Days::new(u64::from(*day) - 1);
            Period {
                start: due,
                end: due,
                due,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "generator_tests.rs"]
mod tests;
