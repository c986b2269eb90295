// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake payment adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{PaymentAdapter, PaymentError, PaymentRecord};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Fake payment adapter for testing
///
/// Assigns ids `pay-1`, `pay-2`, ... and keeps every record it accepted.
#[derive(Clone, Default)]
pub struct FakePaymentAdapter {
    records: Arc<Mutex<Vec<PaymentRecord>>>,
    reject: Arc<AtomicBool>,
}

impl FakePaymentAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent record fail
    pub fn set_reject(&self, reject: bool) {
        self.reject.store(reject, Ordering::SeqCst);
    }

    /// Get all accepted records
    pub fn records(&self) -> Vec<PaymentRecord> {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl PaymentAdapter for FakePaymentAdapter {
    async fn record(&self, payment: &PaymentRecord) -> Result<String, PaymentError> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(PaymentError::Rejected("injected".to_string()));
        }
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.push(payment.clone());
        Ok(format!("pay-{}", records.len()))
    }
}
