// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
}

fn pending(due: NaiveDate) -> ObligationInstance {
    CandidateInstance {
        template_id: TemplateId::new("tpl-1"),
        owner_id: "owner-1".to_string(),
        item_name: "Rent".to_string(),
        amount: Decimal::new(1000, 0),
        category: Category::Housing,
        recurrence_type: RecurrenceType::Monthly,
        due_date: due,
        period_start: date(2024, 1, 1),
        period_end: date(2024, 1, 31),
    }
    .into_pending(at(2024, 1, 1, 0))
}

fn pay_event() -> ObligationEvent {
    ObligationEvent::Pay {
        paid_at: at(2024, 1, 4, 12),
        payment_id: "pay-1".to_string(),
    }
}

#[test]
fn candidate_becomes_pending_instance() {
    let instance = pending(date(2024, 1, 5));
    assert_eq!(instance.status, ObligationStatus::Pending);
    assert!(instance.paid_at.is_none());
    assert!(instance.payment_id.is_none());
    assert!(instance.id.as_str().is_empty());
}

#[test]
fn pending_becomes_overdue() {
    let instance = pending(date(2024, 1, 5));
    let next = instance.transition(ObligationEvent::MarkOverdue).unwrap();
    assert_eq!(next.status, ObligationStatus::Overdue);
}

#[test]
fn overdue_again_is_noop() {
    let overdue = pending(date(2024, 1, 5))
        .transition(ObligationEvent::MarkOverdue)
        .unwrap();
    assert!(overdue.transition(ObligationEvent::MarkOverdue).is_none());
}

#[test]
fn pending_and_overdue_can_be_paid() {
    let instance = pending(date(2024, 1, 5));
    let paid = instance.transition(pay_event()).unwrap();
    assert_eq!(paid.status, ObligationStatus::Paid);
    assert_eq!(paid.paid_at, Some(at(2024, 1, 4, 12)));
    assert_eq!(paid.payment_id.as_deref(), Some("pay-1"));

    let overdue = instance.transition(ObligationEvent::MarkOverdue).unwrap();
    let paid = overdue.transition(pay_event()).unwrap();
    assert_eq!(paid.status, ObligationStatus::Paid);
}

#[test]
fn paid_is_terminal() {
    let paid = pending(date(2024, 1, 5)).transition(pay_event()).unwrap();
    assert!(paid.transition(ObligationEvent::MarkOverdue).is_none());
    assert!(paid.transition(pay_event()).is_none());
}

#[test]
fn past_due_only_after_the_whole_day() {
    let instance = pending(date(2024, 1, 5));
    assert!(!instance.is_past_due(at(2024, 1, 5, 23)));
    assert!(instance.is_past_due(at(2024, 1, 6, 0)));
    assert!(instance.is_past_due(at(2024, 1, 6, 10)));
}

#[test]
fn status_serializes_snake_case() {
    assert_eq!(
        serde_json::to_value(ObligationStatus::Overdue).unwrap(),
        serde_json::json!("overdue")
    );
    assert!(ObligationStatus::Pending.is_open());
    assert!(!ObligationStatus::Paid.is_open());
}

#[test]
fn instance_serializes_dates_as_iso_strings() {
    let instance = pending(date(2024, 1, 5));
    let json = serde_json::to_value(&instance).unwrap();
    assert_eq!(json["dueDate"], "2024-01-05");
    assert_eq!(json["periodStart"], "2024-01-01");
    assert_eq!(json["templateId"], "tpl-1");
    assert_eq!(json["status"], "pending");
}
