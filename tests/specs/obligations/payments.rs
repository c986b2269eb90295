//! Paying templates and instances

use crate::prelude::*;
use dues_core::PayableSource;
use dues_engine::{EngineError, PaymentDetails, PaymentOutcome};

#[tokio::test]
async fn paying_an_instance_closes_it() {
    let world = World::at(at(2024, 1, 10, 9, 0));
    let bill = world.seed("t-water", date(2024, 1, 12)).await;

    let outcome = world
        .dues
        .pay(
            PayableSource::Instance(bill.clone()),
            PaymentDetails::at(at(2024, 1, 10, 9, 30)).with_receipt("rcpt-7"),
        )
        .await
        .unwrap();

    let PaymentOutcome::Instance(paid) = outcome else {
        panic!("expected an instance payment");
    };
    assert_eq!(paid.status, ObligationStatus::Paid);
    assert_eq!(paid.payment_id.as_deref(), Some("pay-1"));
    assert!(world.open().await.is_empty());

    let records = world.payments.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source_id, bill.id.to_string());
    assert_eq!(records[0].amount, money(50));
    assert_eq!(records[0].receipt_ref.as_deref(), Some("rcpt-7"));
}

#[tokio::test]
async fn paying_twice_is_refused() {
    let world = World::at(at(2024, 1, 10, 9, 0));
    let bill = world.seed("t-water", date(2024, 1, 12)).await;
    let details = PaymentDetails::at(at(2024, 1, 10, 9, 30));

    world
        .dues
        .pay(PayableSource::Instance(bill.clone()), details.clone())
        .await
        .unwrap();
    let again = world
        .dues
        .pay(PayableSource::Instance(bill), details)
        .await;

    assert!(matches!(again, Err(EngineError::AlreadyPaid(_))));
    assert_eq!(world.payments.records().len(), 1);
}

#[tokio::test]
async fn daily_item_payment_leaves_obligations_untouched() {
    let world = World::at(at(2024, 1, 10, 9, 0));
    let coffee = world
        .dues
        .templates()
        .create(OWNER, NewTemplate::daily("Coffee"), world.clock.local_now())
        .await
        .unwrap();

    let outcome = world
        .dues
        .pay(
            PayableSource::Template(coffee.clone()),
            PaymentDetails::at(at(2024, 1, 10, 8, 0)).with_amount(money(4)),
        )
        .await
        .unwrap();

    assert!(matches!(outcome, PaymentOutcome::DailyItem { .. }));
    assert_eq!(outcome.payment_id(), Some("pay-1"));
    assert!(world.open().await.is_empty());

    let missing = world
        .dues
        .pay(
            PayableSource::Template(coffee),
            PaymentDetails::at(at(2024, 1, 10, 8, 0)),
        )
        .await;
    assert!(matches!(missing, Err(EngineError::MissingPaymentAmount(_))));
}

#[tokio::test]
async fn rejected_payment_keeps_the_instance_open() {
    let world = World::at(at(2024, 1, 10, 9, 0));
    let bill = world.seed("t-water", date(2024, 1, 12)).await;
    world.payments.set_reject(true);

    let result = world
        .dues
        .pay(
            PayableSource::Instance(bill),
            PaymentDetails::at(at(2024, 1, 10, 9, 30)),
        )
        .await;

    assert!(matches!(result, Err(EngineError::Payment(_))));
    assert_eq!(world.open().await.len(), 1);
}
