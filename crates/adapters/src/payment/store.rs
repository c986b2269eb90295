// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{PaymentAdapter, PaymentError, PaymentRecord};
use crate::store::{to_document, DocumentStore};
use async_trait::async_trait;

/// Collection payment records are written to
pub const PAYMENTS: &str = "payments";

/// Records payments as documents in the shared store
#[derive(Clone)]
pub struct StorePaymentRecorder<S> {
    store: S,
}

impl<S: DocumentStore> StorePaymentRecorder<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: DocumentStore> PaymentAdapter for StorePaymentRecorder<S> {
    async fn record(&self, payment: &PaymentRecord) -> Result<String, PaymentError> {
        if payment.amount.is_sign_negative() || payment.amount.is_zero() {
            return Err(PaymentError::Rejected(format!(
                "amount must be positive, got {}",
                payment.amount
            )));
        }
        let id = self.store.insert(PAYMENTS, to_document(payment)?).await?;
        tracing::info!(
            payment_id = %id,
            source_id = %payment.source_id,
            amount = %payment.amount,
            "payment recorded"
        );
        Ok(id)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
