// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! What a payment is being made against

use crate::instance::ObligationInstance;
use crate::template::RecurrenceTemplate;
use rust_decimal::Decimal;

/// Target of a payment action
///
/// Daily items are paid straight from their template; everything else is
/// paid through one of its generated instances.
#[derive(Debug, Clone, PartialEq)]
pub enum PayableSource {
    Template(RecurrenceTemplate),
    Instance(ObligationInstance),
}

impl PayableSource {
    /// Id recorded as the payment's source
    pub fn source_id(&self) -> &str {
        match self {
            PayableSource::Template(template) => template.id.as_str(),
            PayableSource::Instance(instance) => instance.id.as_str(),
        }
    }

    /// Display name of the item being paid
    pub fn name(&self) -> &str {
        match self {
            PayableSource::Template(template) => &template.name,
            PayableSource::Instance(instance) => &instance.item_name,
        }
    }

    pub fn owner_id(&self) -> &str {
        match self {
            PayableSource::Template(template) => &template.owner_id,
            PayableSource::Instance(instance) => &instance.owner_id,
        }
    }

    /// Amount used when the payer does not supply one
    pub fn default_amount(&self) -> Option<Decimal> {
        match self {
            PayableSource::Template(template) => template.amount,
            PayableSource::Instance(instance) => Some(instance.amount),
        }
    }
}

impl From<RecurrenceTemplate> for PayableSource {
    fn from(template: RecurrenceTemplate) -> Self {
        PayableSource::Template(template)
    }
}

impl From<ObligationInstance> for PayableSource {
    fn from(instance: ObligationInstance) -> Self {
        PayableSource::Instance(instance)
    }
}
