//! Guarded scheduler cycles

use crate::prelude::*;
use dues_engine::{RunOutcome, SkipReason, TriggerSource};

#[tokio::test]
async fn five_calls_within_ten_seconds_run_one_cycle() {
    let world = World::at(at(2024, 1, 10, 9, 0));
    world
        .dues
        .templates()
        .create(OWNER, NewTemplate::monthly("Rent", money(1000), 15), world.clock.local_now())
        .await
        .unwrap();

    let mut completed = 0;
    for _ in 0..5 {
        if let RunOutcome::Completed(_) = world.dues.refresh().await {
            completed += 1;
        }
        world.clock.advance(Duration::from_secs(2));
    }

    assert_eq!(completed, 1);
    assert_eq!(world.dues.runner().runs(), 1);
    assert_eq!(world.open().await.len(), 3);
}

#[tokio::test]
async fn template_creation_generates_in_the_background() {
    let world = World::at(at(2024, 1, 10, 9, 0));

    world
        .dues
        .create_template(NewTemplate::monthly("Rent", money(1000), 15))
        .await
        .unwrap();
    world.settle(1).await;

    let dues: Vec<_> = world.open().await.iter().map(|i| i.due_date).collect();
    assert_eq!(dues, vec![date(2024, 1, 15), date(2024, 2, 15), date(2024, 3, 15)]);
}

#[tokio::test]
async fn back_to_back_mutations_are_throttled() {
    let world = World::at(at(2024, 1, 10, 9, 0));

    world
        .dues
        .create_template(NewTemplate::monthly("Rent", money(1000), 15))
        .await
        .unwrap();
    world.settle(1).await;
    world
        .dues
        .create_template(NewTemplate::weekly("Gym", money(10), 5))
        .await
        .unwrap();
    world.drain().await;

    // The second mutation's cycle fell inside the minimum interval
    assert_eq!(world.dues.runner().runs(), 1);
    assert!(world.open().await.iter().all(|i| i.item_name == "Rent"));

    world.clock.advance(Duration::from_secs(61));
    assert!(world.dues.refresh().await.executed());
    assert_eq!(world.open().await.len(), 7);
}

#[tokio::test]
async fn session_cap_stops_cycles_after_three_runs() {
    let world = World::at(at(2024, 1, 10, 9, 0));

    for _ in 0..3 {
        assert!(world.dues.refresh().await.executed());
        world.clock.advance(Duration::from_secs(61));
    }

    let outcome = world.dues.refresh().await;
    assert!(matches!(
        outcome,
        RunOutcome::Skipped(SkipReason::SessionCapReached { runs: 3 })
    ));
}

#[tokio::test]
async fn uncapped_runner_keeps_going() {
    let world = World::with_config(at(2024, 1, 10, 9, 0), SchedulerConfig::unbounded());

    for _ in 0..5 {
        assert!(world.dues.refresh().await.executed());
        world.clock.advance(Duration::from_secs(61));
    }
    assert_eq!(world.dues.runner().runs(), 5);
}

#[tokio::test]
async fn daily_and_inactive_templates_are_not_generated() {
    let world = World::at(at(2024, 1, 10, 9, 0));
    let now = world.clock.local_now();
    let templates = world.dues.templates();
    templates
        .create(OWNER, NewTemplate::daily("Coffee").with_amount(money(4)), now)
        .await
        .unwrap();
    templates
        .create(OWNER, NewTemplate::monthly("Old lease", money(900), 1).inactive(), now)
        .await
        .unwrap();

    let RunOutcome::Completed(report) = world.dues.runner().run(TriggerSource::Refresh).await
    else {
        panic!("cycle should have run");
    };

    assert_eq!(report.templates_scanned, 0);
    assert_eq!(report.instances_created, 0);
    assert!(world.open().await.is_empty());
}
