// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence for generated obligation instances
//!
//! The dedup key is `(templateId, periodStart)`. The check-then-insert in
//! [`ObligationStore::insert_if_absent`] is not atomic: a writer outside
//! this process can still slip a duplicate in between the two calls.

use crate::error::EngineError;
use chrono::{NaiveDate, NaiveDateTime};
use dues_adapters::{from_document, to_document, Direction, Document, DocumentStore, Query};
use dues_core::{CandidateInstance, InstanceId, ObligationInstance, ObligationStatus, TemplateId};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Collection holding obligation instances
pub const INSTANCES: &str = "instances";

/// Fields a payment writes onto an instance
const PAYMENT_FIELDS: [&str; 3] = ["status", "paidAt", "paymentId"];

/// Result of a dedup-checked insert
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Inserted(ObligationInstance),
    /// An instance already covers the period
    Duplicate(InstanceId),
}

/// Typed access to the instances collection
#[derive(Clone)]
pub struct ObligationStore<S> {
    store: S,
}

impl<S: DocumentStore> ObligationStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Insert a candidate unless its period is already covered
    pub async fn insert_if_absent(
        &self,
        candidate: CandidateInstance,
        now: NaiveDateTime,
    ) -> Result<InsertOutcome, EngineError> {
        if let Some(existing) = self
            .find_by_period(&candidate.template_id, candidate.period_start)
            .await?
        {
            return Ok(InsertOutcome::Duplicate(existing.id));
        }

        let mut instance = candidate.into_pending(now);
        let id = self.store.insert(INSTANCES, to_document(&instance)?).await?;
        instance.id = InstanceId::new(id);
        tracing::debug!(
            instance_id = %instance.id,
            template_id = %instance.template_id,
            due_date = %instance.due_date,
            "instance created"
        );
        Ok(InsertOutcome::Inserted(instance))
    }

    /// The instance holding a dedup key, if any
    pub async fn find_by_period(
        &self,
        template_id: &TemplateId,
        period_start: NaiveDate,
    ) -> Result<Option<ObligationInstance>, EngineError> {
        let query = Query::new()
            .eq("templateId", template_id.as_str())
            .eq("periodStart", period_start.to_string())
            .limit(1);
        let docs = self.store.query(INSTANCES, &query).await?;
        docs.into_iter().next().map(decode).transpose()
    }

    /// Whether the template has any instance still pending
    pub async fn has_pending(&self, template_id: &TemplateId) -> Result<bool, EngineError> {
        let query = Query::new()
            .eq("templateId", template_id.as_str())
            .eq("status", ObligationStatus::Pending.as_str())
            .limit(1);
        Ok(!self.store.query(INSTANCES, &query).await?.is_empty())
    }

    /// Pending and overdue instances for an owner, earliest due first
    pub async fn list_open(&self, owner_id: &str) -> Result<Vec<ObligationInstance>, EngineError> {
        let open = [ObligationStatus::Pending, ObligationStatus::Overdue]
            .iter()
            .map(|s| Value::from(s.as_str()))
            .collect();
        let scope = Query::new()
            .eq("ownerId", owner_id)
            .order_by("dueDate", Direction::Ascending);
        self.store
            .query_by_field_in(INSTANCES, scope, "status", open)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Pending instances for an owner, earliest due first
    pub async fn list_pending(&self, owner_id: &str) -> Result<Vec<ObligationInstance>, EngineError> {
        let query = Query::new()
            .eq("ownerId", owner_id)
            .eq("status", ObligationStatus::Pending.as_str())
            .order_by("dueDate", Direction::Ascending);
        self.fetch(&query).await
    }

    /// Every instance generated from a template, earliest due first
    pub async fn list_for_template(
        &self,
        template_id: &TemplateId,
    ) -> Result<Vec<ObligationInstance>, EngineError> {
        let query = Query::new()
            .eq("templateId", template_id.as_str())
            .order_by("dueDate", Direction::Ascending);
        self.fetch(&query).await
    }

    pub async fn get(&self, id: &InstanceId) -> Result<Option<ObligationInstance>, EngineError> {
        self.store
            .get(INSTANCES, id.as_str())
            .await?
            .map(decode)
            .transpose()
    }

    /// Like [`get`](Self::get), but a missing instance is an error
    pub async fn require(&self, id: &InstanceId) -> Result<ObligationInstance, EngineError> {
        self.get(id)
            .await?
            .ok_or_else(|| EngineError::ObligationNotFound(id.clone()))
    }

    /// Move an instance to `overdue` if it is still `pending`
    ///
    /// Only the status is written, and only while the stored copy is still
    /// pending, so a payment landing mid-sweep is never rolled back. Returns
    /// whether the transition applied.
    pub async fn mark_overdue(&self, id: &InstanceId) -> Result<bool, EngineError> {
        let mut fields = Document::new();
        fields.insert(
            "status".to_string(),
            Value::from(ObligationStatus::Overdue.as_str()),
        );
        let pending = Value::from(ObligationStatus::Pending.as_str());
        Ok(self
            .store
            .update_if(INSTANCES, id.as_str(), "status", &pending, fields)
            .await?)
    }

    /// Write the payment fields of a paid instance
    ///
    /// `paid` is terminal, so these fields are safe to write over whatever
    /// a concurrent sweep left behind.
    pub async fn save_payment(&self, paid: &ObligationInstance) -> Result<(), EngineError> {
        let fields: Document = to_document(paid)?
            .into_iter()
            .filter(|(field, _)| PAYMENT_FIELDS.contains(&field.as_str()))
            .collect();
        self.store
            .update(INSTANCES, paid.id.as_str(), fields)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: &InstanceId) -> Result<(), EngineError> {
        self.store.delete(INSTANCES, id.as_str()).await?;
        Ok(())
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<ObligationInstance>, EngineError> {
        self.store
            .query(INSTANCES, query)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }
}

fn decode(doc: Document) -> Result<ObligationInstance, EngineError> {
    decode_in(INSTANCES, doc)
}

/// Decode a stored document, naming it in the error if it is malformed
pub(crate) fn decode_in<T: DeserializeOwned>(
    collection: &'static str,
    doc: Document,
) -> Result<T, EngineError> {
    let id = doc
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    from_document(doc).map_err(|source| EngineError::Corrupt {
        collection,
        id,
        source,
    })
}

#[cfg(test)]
#[path = "obligations_tests.rs"]
mod tests;
