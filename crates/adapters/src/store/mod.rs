// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Document store adapters
//!
//! The store is a generic collection-of-documents collaborator. It offers
//! single-document operations and filtered queries, and makes no promise of
//! transactions across documents.

mod json;
mod memory;
mod query;

pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use query::{Direction, Filter, OrderBy, Query};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FailRule, FakeDocumentStore, StoreCall, StoreOp};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// A stored document: a JSON object keyed by field name
pub type Document = serde_json::Map<String, Value>;

/// Field every stored document carries its id under
pub const ID_FIELD: &str = "id";

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {collection}/{id}")]
    NotFound { collection: String, id: String },
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Adapter for a document store
#[async_trait]
pub trait DocumentStore: Clone + Send + Sync + 'static {
    /// Insert a new document and return the id the store assigned to it
    async fn insert(&self, collection: &str, doc: Document) -> Result<String, StoreError>;

    /// Merge `fields` into an existing document
    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<(), StoreError>;

    /// Merge `fields` only while the stored `field` still equals `expected`
    ///
    /// Returns `false` without writing when it does not. The check and the
    /// write are atomic with respect to other writers on the same store.
    async fn update_if(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        expected: &Value,
        fields: Document,
    ) -> Result<bool, StoreError>;

    /// Delete a document; deleting a missing document succeeds
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Fetch a document by id
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Run a filtered, optionally ordered query
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError>;

    /// Documents matching `scope` whose `field` is one of `values`
    ///
    /// `scope` carries any other filters plus ordering and limit.
    async fn query_by_field_in(
        &self,
        collection: &str,
        scope: Query,
        field: &str,
        values: Vec<Value>,
    ) -> Result<Vec<Document>, StoreError> {
        self.query(collection, &scope.is_in(field, values)).await
    }
}

/// Serialize a record into a document, dropping any id it carries
pub fn to_document<T: Serialize>(record: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(record)? {
        Value::Object(mut doc) => {
            doc.remove(ID_FIELD);
            Ok(doc)
        }
        _ => Err(StoreError::NotAnObject),
    }
}

/// Deserialize a stored document into a record
pub fn from_document<T: DeserializeOwned>(doc: Document) -> Result<T, StoreError> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

/// Merge `fields` into `doc`, never touching its id
pub(crate) fn merge_fields(doc: &mut Document, fields: Document) {
    for (field, value) in fields {
        if field != ID_FIELD {
            doc.insert(field, value);
        }
    }
}

/// Reject keys that could escape a collection
pub(crate) fn check_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() || key.contains(&['/', '\\'][..]) || key.starts_with('.') {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
