//! Overdue sweeps

use crate::prelude::*;
use dues_core::PayableSource;
use dues_engine::{OverdueTransitioner, PaymentDetails};

fn transitioner(world: &World) -> OverdueTransitioner<FakeDocumentStore> {
    OverdueTransitioner::new(world.dues.obligations().clone())
}

#[tokio::test]
async fn instance_past_its_due_day_becomes_overdue() {
    let world = World::at(at(2024, 1, 1, 9, 0));
    let bill = world.seed("t-water", date(2024, 1, 5)).await;

    let report = transitioner(&world)
        .sweep(OWNER, at(2024, 1, 6, 10, 0))
        .await
        .unwrap();

    assert_eq!(report.marked_overdue, 1);
    let stored = world.dues.obligations().require(&bill.id).await.unwrap();
    assert_eq!(stored.status, ObligationStatus::Overdue);
}

#[tokio::test]
async fn due_day_itself_is_not_overdue() {
    let world = World::at(at(2024, 1, 1, 9, 0));
    let bill = world.seed("t-water", date(2024, 1, 5)).await;

    transitioner(&world)
        .sweep(OWNER, at(2024, 1, 5, 23, 59))
        .await
        .unwrap();

    let stored = world.dues.obligations().require(&bill.id).await.unwrap();
    assert_eq!(stored.status, ObligationStatus::Pending);
}

#[tokio::test]
async fn sweep_moves_every_past_pending_and_leaves_paid_alone() {
    let world = World::at(at(2024, 1, 1, 9, 0));
    let past = [
        world.seed("t-a", date(2024, 1, 2)).await,
        world.seed("t-b", date(2024, 1, 3)).await,
        world.seed("t-c", date(2024, 1, 4)).await,
    ];
    let future = world.seed("t-d", date(2024, 1, 20)).await;
    let paid = world.seed("t-e", date(2024, 1, 3)).await;
    world
        .dues
        .pay(
            PayableSource::Instance(paid.clone()),
            PaymentDetails::at(at(2024, 1, 2, 8, 0)),
        )
        .await
        .unwrap();

    let now = at(2024, 1, 10, 9, 0);
    for _ in 0..2 {
        transitioner(&world).sweep(OWNER, now).await.unwrap();
    }

    let obligations = world.dues.obligations();
    for instance in &past {
        let stored = obligations.require(&instance.id).await.unwrap();
        assert_eq!(stored.status, ObligationStatus::Overdue);
    }
    let future = obligations.require(&future.id).await.unwrap();
    assert_eq!(future.status, ObligationStatus::Pending);
    let paid = obligations.require(&paid.id).await.unwrap();
    assert_eq!(paid.status, ObligationStatus::Paid);
    assert_eq!(paid.paid_at, Some(at(2024, 1, 2, 8, 0)));
}

#[tokio::test]
async fn scheduler_cycle_sweeps_after_generating() {
    let world = World::at(at(2024, 1, 10, 9, 0));
    let late = world.seed("t-water", date(2024, 1, 5)).await;

    let outcome = world.dues.refresh().await;

    assert!(outcome.executed());
    let stored = world.dues.obligations().require(&late.id).await.unwrap();
    assert_eq!(stored.status, ObligationStatus::Overdue);
}
