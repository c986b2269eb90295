// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CRUD for recurrence templates

use crate::error::EngineError;
use crate::obligations::{decode_in, ObligationStore};
use chrono::NaiveDateTime;
use dues_adapters::{to_document, Direction, DocumentStore, Query};
use dues_core::{NewTemplate, RecurrenceTemplate, TemplateId, TemplatePatch};

/// Collection holding recurrence templates
pub const TEMPLATES: &str = "templates";

/// What a template deletion removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub instances_deleted: usize,
    /// Instances left behind after a failed delete; logged, never retried
    pub instances_failed: usize,
}

/// Typed access to the templates collection
#[derive(Clone)]
pub struct TemplateStore<S> {
    store: S,
    obligations: ObligationStore<S>,
}

impl<S: DocumentStore> TemplateStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            obligations: ObligationStore::new(store.clone()),
            store,
        }
    }

    /// Validate and persist a new template
    ///
    /// Nothing is written when validation fails.
    pub async fn create(
        &self,
        owner_id: &str,
        new: NewTemplate,
        now: NaiveDateTime,
    ) -> Result<RecurrenceTemplate, EngineError> {
        let mut template = new.build(owner_id, now)?;
        let id = self.store.insert(TEMPLATES, to_document(&template)?).await?;
        template.id = TemplateId::new(id);
        tracing::info!(
            template_id = %template.id,
            owner_id,
            recurrence = %template.recurrence_type,
            "template created"
        );
        Ok(template)
    }

    /// Merge a patch into a stored template and re-validate the result
    pub async fn update(
        &self,
        id: &TemplateId,
        patch: TemplatePatch,
        now: NaiveDateTime,
    ) -> Result<RecurrenceTemplate, EngineError> {
        let mut template = self.require(id).await?;
        template.apply(patch, now)?;
        self.store
            .update(TEMPLATES, id.as_str(), to_document(&template)?)
            .await?;
        tracing::info!(template_id = %id, "template updated");
        Ok(template)
    }

    /// Toggle whether the scheduler considers the template
    pub async fn set_active(
        &self,
        id: &TemplateId,
        active: bool,
        now: NaiveDateTime,
    ) -> Result<RecurrenceTemplate, EngineError> {
        let mut template = self.require(id).await?;
        template.is_active = active;
        template.updated_at = now;
        self.store
            .update(TEMPLATES, id.as_str(), to_document(&template)?)
            .await?;
        tracing::info!(template_id = %id, active, "template activation changed");
        Ok(template)
    }

    /// Delete a template and, best-effort, its instances
    ///
    /// Instance deletions that fail are logged and counted but neither
    /// retried nor rolled back; the template is gone either way.
    pub async fn delete(&self, id: &TemplateId) -> Result<DeleteReport, EngineError> {
        let instances = self.obligations.list_for_template(id).await?;
        self.store.delete(TEMPLATES, id.as_str()).await?;

        let mut report = DeleteReport::default();
        for instance in instances {
            match self.obligations.delete(&instance.id).await {
                Ok(()) => report.instances_deleted += 1,
                Err(e) => {
                    report.instances_failed += 1;
                    tracing::warn!(
                        template_id = %id,
                        instance_id = %instance.id,
                        error = %e,
                        "orphaned instance after template delete"
                    );
                }
            }
        }

        tracing::info!(
            template_id = %id,
            instances_deleted = report.instances_deleted,
            instances_failed = report.instances_failed,
            "template deleted"
        );
        Ok(report)
    }

    pub async fn get(&self, id: &TemplateId) -> Result<Option<RecurrenceTemplate>, EngineError> {
        self.store
            .get(TEMPLATES, id.as_str())
            .await?
            .map(|doc| decode_in(TEMPLATES, doc))
            .transpose()
    }

    /// Like [`get`](Self::get), but a missing template is an error
    pub async fn require(&self, id: &TemplateId) -> Result<RecurrenceTemplate, EngineError> {
        self.get(id)
            .await?
            .ok_or_else(|| EngineError::TemplateNotFound(id.clone()))
    }

    /// All of an owner's templates, ordered by name
    pub async fn list(&self, owner_id: &str) -> Result<Vec<RecurrenceTemplate>, EngineError> {
        self.fetch(
            &Query::new()
                .eq("ownerId", owner_id)
                .order_by("name", Direction::Ascending),
        )
        .await
    }

    /// An owner's active templates, ordered by name
    pub async fn list_active(&self, owner_id: &str) -> Result<Vec<RecurrenceTemplate>, EngineError> {
        self.fetch(
            &Query::new()
                .eq("ownerId", owner_id)
                .eq("isActive", true)
                .order_by("name", Direction::Ascending),
        )
        .await
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<RecurrenceTemplate>, EngineError> {
        self.store
            .query(TEMPLATES, query)
            .await?
            .into_iter()
            .map(|doc| decode_in(TEMPLATES, doc))
            .collect()
    }
}

#[cfg(test)]
#[path = "templates_tests.rs"]
mod tests;
