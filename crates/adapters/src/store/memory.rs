// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process document store

use super::{check_key, merge_fields, Document, DocumentStore, Query, StoreError, ID_FIELD};
use async_trait::async_trait;
use dues_core::{IdGen, UuidIdGen};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

type Collections = HashMap<String, BTreeMap<String, Document>>;

/// Document store held in memory
///
/// Clones share the same contents. Useful for embedding hosts that persist
/// elsewhere, and as the backing for the fake store.
#[derive(Clone)]
pub struct MemoryStore<I = UuidIdGen> {
    collections: Arc<Mutex<Collections>>,
    ids: I,
}

impl MemoryStore<UuidIdGen> {
    pub fn new() -> Self {
        Self::with_ids(UuidIdGen)
    }
}

impl Default for MemoryStore<UuidIdGen> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: IdGen> MemoryStore<I> {
    /// Store assigning ids from the given generator
    pub fn with_ids(ids: I) -> Self {
        Self {
            collections: Arc::new(Mutex::new(HashMap::new())),
            ids,
        }
    }

    /// Number of documents in a collection
    pub fn len(&self, collection: &str) -> usize {
        self.lock().get(collection).map_or(0, BTreeMap::len)
    }

    /// Whether a collection holds no documents
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Copy of every document in a collection, ordered by id
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.lock()
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Collections> {
        self.collections.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl<I: IdGen> DocumentStore for MemoryStore<I> {
    async fn insert(&self, collection: &str, mut doc: Document) -> Result<String, StoreError> {
        let id = self.ids.next();
        check_key(&id)?;
        doc.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        self.lock()
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), doc);
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<(), StoreError> {
        let mut collections = self.lock();
        merge_fields(existing(&mut collections, collection, id)?, fields);
        Ok(())
    }

    async fn update_if(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        expected: &Value,
        fields: Document,
    ) -> Result<bool, StoreError> {
        let mut collections = self.lock();
        let doc = existing(&mut collections, collection, id)?;
        if doc.get(field) != Some(expected) {
            return Ok(false);
        }
        merge_fields(doc, fields);
        Ok(true)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        if let Some(docs) = self.lock().get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self
            .lock()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        Ok(query.apply(self.documents(collection)))
    }
}

fn existing<'a>(
    collections: &'a mut Collections,
    collection: &str,
    id: &str,
) -> Result<&'a mut Document, StoreError> {
    collections
        .get_mut(collection)
        .and_then(|docs| docs.get_mut(id))
        .ok_or_else(|| StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        })
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
