// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dues-core: domain model for recurring household obligations
//!
//! This crate provides:
//! - Recurrence templates and their validation
//! - Obligation instances and their status state machine
//! - The pure instance generator (template + now → candidates)
//! - Due-date classification and the push policy
//! - Clock and id abstractions for testable time and identity
//!
//! Nothing here performs I/O.

pub mod calendar;
pub mod classify;
pub mod clock;
pub mod generator;
pub mod id;
pub mod instance;
pub mod payable;
pub mod template;

pub use classify::{classify, DueBucket, DueSummary, PushDecision, PushNotice};
pub use clock::{Clock, FakeClock, SystemClock};
pub use generator::generate;
pub use id::{IdGen, InstanceId, SequentialIdGen, TemplateId, UuidIdGen};
pub use instance::{CandidateInstance, ObligationEvent, ObligationInstance, ObligationStatus};
pub use payable::PayableSource;
pub use template::{
    Category, NewTemplate, RecurrenceTemplate, RecurrenceType, TemplatePatch, ValidationError,
};
