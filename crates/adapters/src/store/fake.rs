// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake document store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Document, DocumentStore, MemoryStore, Query, StoreError, ID_FIELD};
use async_trait::async_trait;
use dues_core::SequentialIdGen;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Store operation kinds, for failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Insert,
    Update,
    Delete,
    Get,
    Query,
}

/// Recorded store call
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Insert { collection: String, doc: Document },
    Update { collection: String, id: String, fields: Document },
    Delete { collection: String, id: String },
    Get { collection: String, id: String },
    Query { collection: String, query: Query },
}

/// Makes matching calls fail with [`StoreError::Unavailable`]
///
/// A rule without a field condition matches every call of its kind on the
/// collection. With one, the call's subject must carry that field value:
/// the document for inserts, the fields or id for updates, the id for
/// deletes and gets, and an equality filter for queries.
#[derive(Debug, Clone, PartialEq)]
pub struct FailRule {
    pub op: StoreOp,
    pub collection: String,
    pub when: Option<(String, Value)>,
}

impl FailRule {
    pub fn new(op: StoreOp, collection: impl Into<String>) -> Self {
        Self {
            op,
            collection: collection.into(),
            when: None,
        }
    }

    pub fn when(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.when = Some((field.into(), value.into()));
        self
    }

    fn matches(&self, op: StoreOp, collection: &str, subject: &Document) -> bool {
        self.op == op
            && self.collection == collection
            && match &self.when {
                Some((field, value)) => subject.get(field) == Some(value),
                None => true,
            }
    }
}

#[derive(Default)]
struct FakeState {
    calls: Vec<StoreCall>,
    failures: Vec<FailRule>,
    query_delay: Option<Duration>,
    update_delay: Option<Duration>,
}

/// Fake document store for testing
///
/// Backed by a [`MemoryStore`] with sequential ids (`doc-1`, `doc-2`, ...).
#[derive(Clone)]
pub struct FakeDocumentStore {
    inner: MemoryStore<SequentialIdGen>,
    state: Arc<Mutex<FakeState>>,
}

impl Default for FakeDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDocumentStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::with_ids(SequentialIdGen::new("doc")),
            state: Arc::new(Mutex::new(FakeState::default())),
        }
    }

    /// Inject a failure rule
    pub fn fail(&self, rule: FailRule) {
        self.lock().failures.push(rule);
    }

    /// Remove all failure rules
    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    /// Delay every query, to hold a caller mid-operation
    pub fn set_query_delay(&self, delay: Duration) {
        self.lock().query_delay = Some(delay);
    }

    /// Delay every update before it applies, to widen race windows
    pub fn set_update_delay(&self, delay: Duration) {
        self.lock().update_delay = Some(delay);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Count of inserts into a collection
    pub fn insert_count(&self, collection: &str) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, StoreCall::Insert { collection: name, .. } if name == collection))
            .count()
    }

    /// Copy of every document in a collection
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.inner.documents(collection)
    }

    async fn before_update(
        &self,
        collection: &str,
        id: &str,
        fields: &Document,
    ) -> Result<(), StoreError> {
        let call = StoreCall::Update {
            collection: collection.to_string(),
            id: id.to_string(),
            fields: fields.clone(),
        };
        let mut subject = fields.clone();
        subject.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        self.check(call, StoreOp::Update, collection, &subject)?;

        let delay = self.lock().update_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record the call, then check it against the failure rules
    fn check(
        &self,
        call: StoreCall,
        op: StoreOp,
        collection: &str,
        subject: &Document,
    ) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.calls.push(call);
        if state
            .failures
            .iter()
            .any(|rule| rule.matches(op, collection, subject))
        {
            return Err(StoreError::Unavailable(format!(
                "injected {:?} failure on {}",
                op, collection
            )));
        }
        Ok(())
    }
}

fn id_subject(id: &str) -> Document {
    let mut doc = Document::new();
    doc.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    doc
}

#[async_trait]
impl DocumentStore for FakeDocumentStore {
    async fn insert(&self, collection: &str, doc: Document) -> Result<String, StoreError> {
        let call = StoreCall::Insert {
            collection: collection.to_string(),
            doc: doc.clone(),
        };
        self.check(call, StoreOp::Insert, collection, &doc)?;
        self.inner.insert(collection, doc).await
    }

    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<(), StoreError> {
        self.before_update(collection, id, &fields).await?;
        self.inner.update(collection, id, fields).await
    }

    /// Recorded and failure-checked as an [`StoreOp::Update`]
    async fn update_if(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        expected: &Value,
        fields: Document,
    ) -> Result<bool, StoreError> {
        self.before_update(collection, id, &fields).await?;
        self.inner
            .update_if(collection, id, field, expected, fields)
            .await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let call = StoreCall::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        };
        self.check(call, StoreOp::Delete, collection, &id_subject(id))?;
        self.inner.delete(collection, id).await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let call = StoreCall::Get {
            collection: collection.to_string(),
            id: id.to_string(),
        };
        self.check(call, StoreOp::Get, collection, &id_subject(id))?;
        self.inner.get(collection, id).await
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        let call = StoreCall::Query {
            collection: collection.to_string(),
            query: query.clone(),
        };
        // Equality filters stand in for the subject document
        let subject: Document = query
            .filters
            .iter()
            .filter_map(|f| match f {
                super::Filter::Eq { field, value } => Some((field.clone(), value.clone())),
                super::Filter::In { .. } => None,
            })
            .collect();
        self.check(call, StoreOp::Query, collection, &subject)?;

        let delay = self.lock().query_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.query(collection, query).await
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
