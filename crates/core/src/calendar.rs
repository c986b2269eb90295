// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Calendar arithmetic shared by the generator, the sweep and classification

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

/// Midnight at the start of `date`
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last millisecond of `date` (23:59:59.999)
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + TimeDelta::days(1) - TimeDelta::milliseconds(1)
}

/// First day of the month containing `date`
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// First day of the month `months` after the month containing `date`
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    first_of_month(date) + Months::new(months)
}

/// Number of days in the month containing `date`
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = first_of_month(date);
    let next = add_months(first, 1);
    // Always 28..=31
    (next - first).num_days() as u32
}

/// Last day of the month containing `date`
pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date) + Days::new(u64::from(days_in_month(date)) - 1)
}

/// Monday of the ISO week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

/// Offset from Monday for a week day numbered `0 = Sunday .. 6 = Saturday`
pub fn weekday_offset(week_day: u8) -> u64 {
    u64::from((week_day % 7 + 6) % 7)
}

/// Day `day` of the month containing `month`, clamped to the month length
pub fn day_in_month_clamped(month: NaiveDate, day: u8) -> NaiveDate {
    let day = u32::from(day.max(1)).min(days_in_month(month));
    first_of_month(month) + Days::new(u64::from(day) - 1)
}

#[cfg(test)]
#[path = "calendar_tests.rs"]
mod tests;
