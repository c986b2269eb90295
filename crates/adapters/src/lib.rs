// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O

pub mod notify;
pub mod payment;
pub mod store;
pub mod traced;

pub use notify::{LogNotifyAdapter, NoOpNotifyAdapter, NotifyAdapter, NotifyError};
pub use payment::{PaymentAdapter, PaymentError, PaymentRecord, StorePaymentRecorder};
pub use store::{
    from_document, to_document, Direction, Document, DocumentStore, JsonFileStore, MemoryStore,
    Query, StoreError,
};
pub use traced::TracedDocumentStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use notify::{FakeNotifyAdapter, NotifyCall};
#[cfg(any(test, feature = "test-support"))]
pub use payment::FakePaymentAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use store::{FailRule, FakeDocumentStore, StoreCall, StoreOp};
