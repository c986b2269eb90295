//! Due classification and the push policy

use crate::prelude::*;
use dues_core::{classify, PushDecision};
use proptest::prelude::*;

fn instance(id: &str, due: NaiveDate, status: ObligationStatus) -> ObligationInstance {
    let mut instance = CandidateInstance {
        template_id: TemplateId::new("t-1"),
        owner_id: OWNER.to_string(),
        item_name: "Bill".to_string(),
        amount: money(20),
        category: Category::Other,
        recurrence_type: RecurrenceType::Monthly,
        due_date: due,
        period_start: due,
        period_end: due,
    }
    .into_pending(at(2024, 1, 1, 0, 0));
    instance.id = id.into();
    instance.status = status;
    instance
}

#[test]
fn overdue_wins_over_due_today() {
    let now = at(2024, 1, 10, 9, 0);
    let instances = [
        instance("i-1", date(2024, 1, 3), ObligationStatus::Overdue),
        instance("i-2", date(2024, 1, 10), ObligationStatus::Pending),
    ];

    let summary = classify(&instances, now);

    assert_eq!(summary.overdue_count, 1);
    assert_eq!(summary.due_today_count, 1);
    assert_eq!(summary.push_decision(), PushDecision::Overdue { count: 1 });
    let notice = summary.push_decision().notice().unwrap();
    assert_eq!(notice.tag, "dues-overdue");
}

#[tokio::test]
async fn notifier_sends_only_the_overdue_push() {
    let world = World::at(at(2024, 1, 10, 9, 0));
    world.seed("t-late", date(2024, 1, 3)).await;
    world.seed("t-today", date(2024, 1, 10)).await;
    world.dues.refresh().await;

    let outcome = world.dues.check_notifications().await.unwrap();

    assert_eq!(outcome.summary.overdue_count, 1);
    assert_eq!(outcome.summary.due_today_count, 1);
    let calls = world.notify.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].tag, "dues-overdue");
}

#[tokio::test]
async fn due_soon_alone_sends_nothing() {
    let world = World::at(at(2024, 1, 10, 9, 0));
    world.seed("t-soon", date(2024, 1, 12)).await;

    let outcome = world.dues.check_notifications().await.unwrap();

    assert_eq!(outcome.summary.due_soon_count, 1);
    assert_eq!(outcome.decision, PushDecision::None);
    assert!(world.notify.calls().is_empty());
}

#[tokio::test]
async fn no_permission_means_no_push() {
    let world = World::at(at(2024, 1, 10, 9, 0));
    world.notify.set_permission(false);
    world.seed("t-today", date(2024, 1, 10)).await;

    let outcome = world.dues.check_notifications().await.unwrap();

    assert_eq!(outcome.decision, PushDecision::DueToday { count: 1 });
    assert!(outcome.sent.is_none());
    assert!(world.notify.calls().is_empty());
}

fn status() -> impl Strategy<Value = ObligationStatus> {
    prop_oneof![Just(ObligationStatus::Pending), Just(ObligationStatus::Overdue)]
}

proptest! {
    #[test]
    fn each_instance_counts_in_at_most_one_bucket(
        entries in prop::collection::vec((0u64..60, status()), 0..40),
    ) {
        let now = at(2024, 1, 30, 12, 0);
        let instances: Vec<_> = entries
            .iter()
            .enumerate()
            .map(|(n, (offset, status))| {
                let due = date(2024, 1, 1) + chrono::Days::new(*offset);
                instance(&format!("i-{}", n), due, *status)
            })
            .collect();

        let summary = classify(&instances, now);

        prop_assert!(
            summary.overdue_count + summary.due_today_count + summary.due_soon_count
                <= instances.len()
        );
        prop_assert_eq!(summary.total_pending, instances.len());
    }
}
