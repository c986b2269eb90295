// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for engine tests

use chrono::{NaiveDate, NaiveDateTime};
use dues_core::{CandidateInstance, Category, RecurrenceType, TemplateId};
use rust_decimal::Decimal;

pub const OWNER: &str = "owner-1";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

/// Monthly candidate whose period is the whole month of `due`
pub fn candidate(template_id: &str, due: NaiveDate) -> CandidateInstance {
    let period_start = dues_core::calendar::first_of_month(due);
    CandidateInstance {
        template_id: TemplateId::new(template_id),
        owner_id: OWNER.to_string(),
        item_name: "Rent".to_string(),
        amount: Decimal::new(1000, 0),
        category: Category::Housing,
        recurrence_type: RecurrenceType::Monthly,
        due_date: due,
        period_start,
        period_end: dues_core::calendar::last_of_month(due),
    }
}
