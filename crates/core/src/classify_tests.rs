// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::id::TemplateId;
use crate::instance::CandidateInstance;
use crate::template::{Category, RecurrenceType};
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use yare::parameterized;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn now() -> NaiveDateTime {
    date(2024, 1, 10).and_hms_opt(9, 0, 0).unwrap()
}

fn instance(due: NaiveDate, status: ObligationStatus) -> ObligationInstance {
    let mut instance = CandidateInstance {
        template_id: TemplateId::new("tpl-1"),
        owner_id: "owner-1".to_string(),
        item_name: "Power".to_string(),
        amount: Decimal::new(80, 0),
        category: Category::Utilities,
        recurrence_type: RecurrenceType::Monthly,
        due_date: due,
        period_start: due,
        period_end: due,
    }
    .into_pending(now());
    instance.status = status;
    instance
}

#[parameterized(
    yesterday = { date(2024, 1, 9), ObligationStatus::Pending, DueBucket::Overdue },
    overdue_status_wins = { date(2024, 1, 12), ObligationStatus::Overdue, DueBucket::Overdue },
    today = { date(2024, 1, 10), ObligationStatus::Pending, DueBucket::DueToday },
    tomorrow = { date(2024, 1, 11), ObligationStatus::Pending, DueBucket::DueSoon },
    three_days_out = { date(2024, 1, 13), ObligationStatus::Pending, DueBucket::DueSoon },
    four_days_out = { date(2024, 1, 14), ObligationStatus::Pending, DueBucket::Later },
)]
fn buckets(due: NaiveDate, status: ObligationStatus, expected: DueBucket) {
    assert_eq!(bucket(&instance(due, status), now()), expected);
}

#[test]
fn overdue_suppresses_due_today_push() {
    let instances = vec![
        instance(date(2024, 1, 3), ObligationStatus::Overdue),
        instance(date(2024, 1, 10), ObligationStatus::Pending),
    ];
    let summary = classify(&instances, now());

    assert_eq!(summary.overdue_count, 1);
    assert_eq!(summary.due_today_count, 1);
    assert_eq!(summary.total_pending, 2);
    assert_eq!(summary.push_decision(), PushDecision::Overdue { count: 1 });

    let notice = summary.push_decision().notice().unwrap();
    assert_eq!(notice.tag, OVERDUE_TAG);
    assert_eq!(notice.body, "You have 1 overdue bill");
}

#[test]
fn due_today_pushed_when_nothing_overdue() {
    let instances = vec![
        instance(date(2024, 1, 10), ObligationStatus::Pending),
        instance(date(2024, 1, 10), ObligationStatus::Pending),
        instance(date(2024, 1, 12), ObligationStatus::Pending),
    ];
    let summary = classify(&instances, now());

    assert_eq!(summary.push_decision(), PushDecision::DueToday { count: 2 });
    let notice = summary.push_decision().notice().unwrap();
    assert_eq!(notice.tag, DUE_TODAY_TAG);
    assert_eq!(notice.body, "You have 2 bills due today");
}

#[test]
fn due_soon_is_never_pushed() {
    let instances = vec![instance(date(2024, 1, 12), ObligationStatus::Pending)];
    let summary = classify(&instances, now());

    assert_eq!(summary.due_soon_count, 1);
    assert_eq!(summary.push_decision(), PushDecision::None);
    assert!(summary.push_decision().notice().is_none());
}

#[test]
fn empty_input_is_all_zero() {
    assert_eq!(classify(&[], now()), DueSummary::default());
}

proptest! {
    #[test]
    fn each_instance_counted_at_most_once(
        entries in prop::collection::vec((-20i64..20, any::<bool>()), 0..40),
    ) {
        let instances: Vec<_> = entries
            .iter()
            .map(|(offset, overdue)| {
                let due = now().date() + chrono::TimeDelta::days(*offset);
                let status = if *overdue { ObligationStatus::Overdue } else { ObligationStatus::Pending };
                instance(due, status)
            })
            .collect();
        let summary = classify(&instances, now());

        prop_assert_eq!(summary.total_pending, instances.len());
        prop_assert!(
            summary.overdue_count + summary.due_today_count + summary.due_soon_count
                <= summary.total_pending
        );
        let later = instances
            .iter()
            .filter(|i| bucket(i, now()) == DueBucket::Later)
            .count();
        prop_assert_eq!(
            summary.overdue_count + summary.due_today_count + summary.due_soon_count + later,
            instances.len()
        );
    }
}
