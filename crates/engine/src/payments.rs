// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Paying daily items and obligation instances

use crate::error::EngineError;
use crate::obligations::ObligationStore;
use chrono::NaiveDateTime;
use dues_adapters::{DocumentStore, PaymentAdapter, PaymentRecord};
use dues_core::{
    InstanceId, ObligationEvent, ObligationInstance, ObligationStatus, PayableSource,
    RecurrenceTemplate,
};
use rust_decimal::Decimal;

/// What the payer entered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDetails {
    pub paid_at: NaiveDateTime,
    /// Falls back to the source's own amount
    pub amount: Option<Decimal>,
    pub receipt_ref: Option<String>,
    pub notes: Option<String>,
}

impl PaymentDetails {
    pub fn at(paid_at: NaiveDateTime) -> Self {
        Self {
            paid_at,
            amount: None,
            receipt_ref: None,
            notes: None,
        }
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_receipt(mut self, receipt_ref: impl Into<String>) -> Self {
        self.receipt_ref = Some(receipt_ref.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Result of a payment action
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    /// A daily item was paid straight from its template
    DailyItem { payment_id: String },
    /// An instance moved to `paid`
    Instance(ObligationInstance),
}

impl PaymentOutcome {
    pub fn payment_id(&self) -> Option<&str> {
        match self {
            PaymentOutcome::DailyItem { payment_id } => Some(payment_id),
            PaymentOutcome::Instance(instance) => instance.payment_id.as_deref(),
        }
    }
}

/// Records payments and settles the matching instances
#[derive(Clone)]
pub struct PaymentService<S, P> {
    obligations: ObligationStore<S>,
    payments: P,
}

impl<S, P> PaymentService<S, P>
where
    S: DocumentStore,
    P: PaymentAdapter,
{
    pub fn new(store: S, payments: P) -> Self {
        Self {
            obligations: ObligationStore::new(store),
            payments,
        }
    }

    /// Pay whatever the source points at
    pub async fn pay(
        &self,
        source: PayableSource,
        details: PaymentDetails,
    ) -> Result<PaymentOutcome, EngineError> {
        match source {
            PayableSource::Template(template) => {
                let payment_id = self.pay_daily_item(&template, details).await?;
                Ok(PaymentOutcome::DailyItem { payment_id })
            }
            PayableSource::Instance(instance) => {
                let paid = self.mark_as_paid(&instance.id, details).await?;
                Ok(PaymentOutcome::Instance(paid))
            }
        }
    }

    /// Record a payment against a template without touching any instance
    pub async fn pay_daily_item(
        &self,
        template: &RecurrenceTemplate,
        details: PaymentDetails,
    ) -> Result<String, EngineError> {
        let amount = details
            .amount
            .or(template.amount)
            .ok_or_else(|| EngineError::MissingPaymentAmount(template.name.clone()))?;
        let record = PaymentRecord {
            owner_id: template.owner_id.clone(),
            source_id: template.id.to_string(),
            name: template.name.clone(),
            amount,
            paid_at: details.paid_at,
            receipt_ref: details.receipt_ref,
            notes: details.notes,
        };
        Ok(self.payments.record(&record).await?)
    }

    /// Record a payment for an instance and move it to `paid`
    ///
    /// The instance is reloaded first so a stale copy cannot be paid twice.
    pub async fn mark_as_paid(
        &self,
        id: &InstanceId,
        details: PaymentDetails,
    ) -> Result<ObligationInstance, EngineError> {
        let instance = self.obligations.require(id).await?;
        if instance.status == ObligationStatus::Paid {
            return Err(EngineError::AlreadyPaid(id.clone()));
        }

        let record = PaymentRecord {
            owner_id: instance.owner_id.clone(),
            source_id: instance.id.to_string(),
            name: instance.item_name.clone(),
            amount: details.amount.unwrap_or(instance.amount),
            paid_at: details.paid_at,
            receipt_ref: details.receipt_ref,
            notes: details.notes,
        };
        let payment_id = self.payments.record(&record).await?;

        let paid = instance
            .transition(ObligationEvent::Pay {
                paid_at: details.paid_at,
                payment_id: payment_id.clone(),
            })
            .ok_or_else(|| EngineError::AlreadyPaid(id.clone()))?;
        if let Err(e) = self.obligations.save_payment(&paid).await {
            tracing::error!(instance_id = %id, payment_id, error = %e, "payment recorded but instance not updated");
            return Err(e);
        }

        tracing::info!(instance_id = %id, payment_id, "instance paid");
        Ok(paid)
    }
}

#[cfg(test)]
#[path = "payments_tests.rs"]
mod tests;
