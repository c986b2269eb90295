// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Payment-recording adapters
//!
//! Recording a payment yields an opaque id that instances keep as a weak
//! `paymentId` link.

mod store;

pub use store::{StorePaymentRecorder, PAYMENTS};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakePaymentAdapter;

use crate::store::StoreError;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment rejected: {0}")]
    Rejected(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A payment to record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub owner_id: String,
    /// Template id for daily items, instance id otherwise
    pub source_id: String,
    pub name: String,
    pub amount: Decimal,
    pub paid_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Adapter for recording payments
#[async_trait]
pub trait PaymentAdapter: Clone + Send + Sync + 'static {
    /// Record a payment and return its id
    async fn record(&self, payment: &PaymentRecord) -> Result<String, PaymentError>;
}
