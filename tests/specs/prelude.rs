//! Shared fixtures for the behavioral specs

#![allow(dead_code)]

pub use chrono::{NaiveDate, NaiveDateTime};
pub use dues_adapters::{FakeDocumentStore, FakeNotifyAdapter, FakePaymentAdapter};
pub use dues_core::{
    CandidateInstance, Category, Clock, FakeClock, NewTemplate, ObligationInstance,
    ObligationStatus, RecurrenceTemplate, RecurrenceType, TemplateId,
};
pub use dues_engine::{Dues, DuesDeps, InsertOutcome, ObligationStore, SchedulerConfig};
pub use rust_decimal::Decimal;
pub use std::time::Duration;

pub const OWNER: &str = "household";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

pub fn money(units: i64) -> Decimal {
    Decimal::new(units, 0)
}

/// A template as the store would hand it back
pub fn template(new: NewTemplate, id: &str, now: NaiveDateTime) -> RecurrenceTemplate {
    let mut template = new.build(OWNER, now).unwrap();
    template.id = TemplateId::new(id);
    template
}

pub type TestDues = Dues<FakeDocumentStore, FakeNotifyAdapter, FakePaymentAdapter, FakeClock>;

/// One owner's system wired to fakes
pub struct World {
    pub store: FakeDocumentStore,
    pub notify: FakeNotifyAdapter,
    pub payments: FakePaymentAdapter,
    pub clock: FakeClock,
    pub dues: TestDues,
}

impl World {
    pub fn at(now: NaiveDateTime) -> Self {
        Self::with_config(now, SchedulerConfig::default())
    }

    pub fn with_config(now: NaiveDateTime, config: SchedulerConfig) -> Self {
        let store = FakeDocumentStore::new();
        let notify = FakeNotifyAdapter::new();
        let payments = FakePaymentAdapter::new();
        let clock = FakeClock::at(now);
        let dues = Dues::new(
            DuesDeps {
                store: store.clone(),
                notify: notify.clone(),
                payments: payments.clone(),
                clock: clock.clone(),
            },
            OWNER,
            config,
        );
        Self {
            store,
            notify,
            payments,
            clock,
            dues,
        }
    }

    /// Wait for the cycle a template mutation started in the background
    pub async fn settle(&self, runs: u32) {
        let runner = self.dues.runner();
        while runner.runs() < runs || runner.is_in_flight() {
            tokio::task::yield_now().await;
        }
    }

    /// Give detached tasks a chance to finish
    pub async fn drain(&self) {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    /// Store an instance directly, bypassing the generator
    pub async fn seed(&self, template_id: &str, due: NaiveDate) -> ObligationInstance {
        let candidate = CandidateInstance {
            template_id: TemplateId::new(template_id),
            owner_id: OWNER.to_string(),
            item_name: format!("Bill {}", template_id),
            amount: money(50),
            category: Category::Utilities,
            recurrence_type: RecurrenceType::CustomCalendar,
            due_date: due,
            period_start: due,
            period_end: due,
        };
        match self
            .dues
            .obligations()
            .insert_if_absent(candidate, self.clock.local_now())
            .await
            .unwrap()
        {
            InsertOutcome::Inserted(instance) => instance,
            InsertOutcome::Duplicate(id) => panic!("seeded a duplicate of {}", id),
        }
    }

    pub async fn open(&self) -> Vec<ObligationInstance> {
        self.dues.open_obligations().await.unwrap()
    }
}
