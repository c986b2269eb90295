// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::store::{Document, DocumentStore, Query, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Instant;
use tracing::Instrument;

/// Wrapper that adds tracing to any DocumentStore
#[derive(Clone)]
pub struct TracedDocumentStore<S> {
    inner: S,
}

impl<S> TracedDocumentStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for TracedDocumentStore<S> {
    async fn insert(&self, collection: &str, doc: Document) -> Result<String, StoreError> {
        let span = tracing::info_span!("store.insert", collection);

        async move {
            let start = Instant::now();
            let result = self.inner.insert(collection, doc).await;

            match &result {
                Ok(id) => tracing::debug!(id, elapsed_ms = elapsed_ms(start), "inserted"),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed_ms(start),
                    error = %e,
                    "insert failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<(), StoreError> {
        let span = tracing::info_span!("store.update", collection, id);

        async move {
            tracing::trace!(field_count = fields.len(), "updating");
            let start = Instant::now();
            let result = self.inner.update(collection, id, fields).await;

            match &result {
                Ok(()) => tracing::debug!(elapsed_ms = elapsed_ms(start), "updated"),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed_ms(start),
                    error = %e,
                    "update failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn update_if(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        expected: &Value,
        fields: Document,
    ) -> Result<bool, StoreError> {
        let span = tracing::info_span!("store.update_if", collection, id, field);

        async move {
            let start = Instant::now();
            let result = self
                .inner
                .update_if(collection, id, field, expected, fields)
                .await;

            match &result {
                Ok(applied) => tracing::debug!(
                    applied,
                    elapsed_ms = elapsed_ms(start),
                    "conditional update"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed_ms(start),
                    error = %e,
                    "conditional update failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let span = tracing::info_span!("store.delete", collection, id);

        async move {
            let result = self.inner.delete(collection, id).await;
            match &result {
                Ok(()) => tracing::debug!("deleted"),
                Err(e) => tracing::warn!(error = %e, "delete failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let result = self.inner.get(collection, id).await;
        tracing::trace!(
            collection,
            id,
            found = ?result.as_ref().ok().map(Option::is_some),
            "get"
        );
        result
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        let span = tracing::info_span!("store.query", collection);

        async move {
            tracing::trace!(filters = query.filters.len(), "querying");
            let start = Instant::now();
            let result = self.inner.query(collection, query).await;

            match &result {
                Ok(docs) => tracing::debug!(
                    matched = docs.len(),
                    elapsed_ms = elapsed_ms(start),
                    "queried"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed_ms(start),
                    error = %e,
                    "query failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
