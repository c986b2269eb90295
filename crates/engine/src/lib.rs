// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Dues scheduling engine
//!
//! Orchestrates the pure domain in `dues-core` over the adapters in
//! `dues-adapters`: template and instance stores, the overdue sweep, the
//! guarded scheduler runner and its triggers, notifications and payments.

mod config;
mod dues;
mod error;
mod guard;
mod notifier;
mod obligations;
mod payments;
mod runner;
mod sweep;
mod templates;
mod triggers;

#[cfg(test)]
mod test_helpers;

pub use config::{SchedulerConfig, DEFAULT_SESSION_CAP};
pub use dues::{Dues, DuesDeps};
pub use error::EngineError;
pub use guard::{CycleGuard, CyclePermit, SkipReason};
pub use notifier::{NotificationOutcome, Notifier};
pub use obligations::{InsertOutcome, ObligationStore, INSTANCES};
pub use payments::{PaymentDetails, PaymentOutcome, PaymentService};
pub use runner::{CycleReport, RunOutcome, SchedulerRunner, TriggerSource};
pub use sweep::{OverdueTransitioner, SweepReport};
pub use templates::{DeleteReport, TemplateStore, TEMPLATES};
pub use triggers::Triggers;
