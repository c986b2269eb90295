// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON file-based document store
//!
//! Layout: `<base>/<collection>/<id>.json`, one pretty-printed document per
//! file. Queries load the whole collection and filter in memory.

use super::{check_key, merge_fields, Document, DocumentStore, Query, StoreError, ID_FIELD};
use async_trait::async_trait;
use dues_core::{IdGen, UuidIdGen};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

/// JSON file-based document store
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    base_path: PathBuf,
    ids: UuidIdGen,
    /// Serializes writers so read-merge-write updates never interleave
    writes: Arc<Mutex<()>>,
}

impl JsonFileStore {
    /// Open a store at the given path, creating it if needed
    pub fn open(base_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path)?;
        Ok(Self {
            base_path,
            ids: UuidIdGen,
            writes: Arc::new(Mutex::new(())),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn path_for(&self, collection: &str, id: &str) -> Result<PathBuf, StoreError> {
        check_key(collection)?;
        check_key(id)?;
        Ok(self
            .base_path
            .join(collection)
            .join(format!("{}.json", id)))
    }

    async fn write(&self, path: &Path, doc: &Document) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(doc)?;
        // Write-then-rename so readers never see a torn document. The temp
        // name is unique so stores sharing a directory cannot collide.
        let tmp = path.with_extension(format!("json.{}.tmp", self.ids.next()));
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, path).await?;
        Ok(())
    }

    async fn read(&self, path: &Path) -> Result<Option<Document>, StoreError> {
        match fs::read_to_string(path).await {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn existing(&self, path: &Path, collection: &str, id: &str) -> Result<Document, StoreError> {
        self.read(path).await?.ok_or_else(|| StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        })
    }

    async fn load_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        check_key(collection)?;
        let dir = self.base_path.join(collection);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut docs = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                if let Some(doc) = self.read(&path).await? {
                    docs.push(doc);
                }
            }
        }
        // Directory order is unspecified
        docs.sort_by(|a, b| {
            let a = a.get(ID_FIELD).and_then(Value::as_str).unwrap_or_default();
            let b = b.get(ID_FIELD).and_then(Value::as_str).unwrap_or_default();
            a.cmp(b)
        });
        Ok(docs)
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn insert(&self, collection: &str, mut doc: Document) -> Result<String, StoreError> {
        let id = self.ids.next();
        let path = self.path_for(collection, &id)?;
        doc.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        let _writing = self.writes.lock().await;
        self.write(&path, &doc).await?;
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<(), StoreError> {
        let path = self.path_for(collection, id)?;
        let _writing = self.writes.lock().await;
        let mut doc = self.existing(&path, collection, id).await?;
        merge_fields(&mut doc, fields);
        self.write(&path, &doc).await
    }

    async fn update_if(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        expected: &Value,
        fields: Document,
    ) -> Result<bool, StoreError> {
        let path = self.path_for(collection, id)?;
        let _writing = self.writes.lock().await;
        let mut doc = self.existing(&path, collection, id).await?;
        if doc.get(field) != Some(expected) {
            return Ok(false);
        }
        merge_fields(&mut doc, fields);
        self.write(&path, &doc).await?;
        Ok(true)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let path = self.path_for(collection, id)?;
        let _writing = self.writes.lock().await;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let path = self.path_for(collection, id)?;
        self.read(&path).await
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        Ok(query.apply(self.load_all(collection).await?))
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
