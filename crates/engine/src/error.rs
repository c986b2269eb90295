// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine

use dues_adapters::{NotifyError, PaymentError, StoreError};
use dues_core::{InstanceId, TemplateId, ValidationError};
use thiserror::Error;

/// Errors that can occur in engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("invalid template: {0}")]
    Validation(#[from] ValidationError),
    #[error("payment error: {0}")]
    Payment(#[from] PaymentError),
    #[error("notify error: {0}")]
    Notify(#[from] NotifyError),
    #[error("template not found: {0}")]
    TemplateNotFound(TemplateId),
    #[error("obligation not found: {0}")]
    ObligationNotFound(InstanceId),
    #[error("obligation already paid: {0}")]
    AlreadyPaid(InstanceId),
    #[error("no payment amount for {0}")]
    MissingPaymentAmount(String),
    #[error("corrupt document {collection}/{id}: {source}")]
    Corrupt {
        collection: &'static str,
        id: String,
        source: StoreError,
    },
}
