// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One owner's view of the system

use crate::config::SchedulerConfig;
use crate::error::EngineError;
use crate::notifier::{NotificationOutcome, Notifier};
use crate::obligations::ObligationStore;
use crate::payments::{PaymentDetails, PaymentOutcome, PaymentService};
use crate::runner::{RunOutcome, SchedulerRunner, TriggerSource};
use crate::templates::{DeleteReport, TemplateStore};
use crate::triggers::Triggers;
use dues_adapters::{DocumentStore, NotifyAdapter, PaymentAdapter};
use dues_core::{
    Clock, DueSummary, NewTemplate, ObligationInstance, PayableSource, RecurrenceTemplate,
    TemplateId, TemplatePatch,
};
use std::sync::Arc;

/// Adapter dependencies
pub struct DuesDeps<S, N, P, C> {
    pub store: S,
    pub notify: N,
    pub payments: P,
    pub clock: C,
}

/// Stores, runner, notifier and payments wired for one owner
///
/// Template mutations kick off a background cycle afterwards; the runner's
/// guard decides whether it actually executes.
pub struct Dues<S, N, P, C> {
    owner_id: String,
    config: SchedulerConfig,
    clock: C,
    templates: TemplateStore<S>,
    obligations: ObligationStore<S>,
    runner: Arc<SchedulerRunner<S, C>>,
    notifier: Notifier<S, N, C>,
    payments: PaymentService<S, P>,
}

impl<S, N, P, C> Dues<S, N, P, C>
where
    S: DocumentStore,
    N: NotifyAdapter,
    P: PaymentAdapter,
    C: Clock,
{
    pub fn new(deps: DuesDeps<S, N, P, C>, owner_id: impl Into<String>, config: SchedulerConfig) -> Self {
        let owner_id = owner_id.into();
        let DuesDeps {
            store,
            notify,
            payments,
            clock,
        } = deps;
        Self {
            templates: TemplateStore::new(store.clone()),
            obligations: ObligationStore::new(store.clone()),
            runner: Arc::new(SchedulerRunner::new(
                store.clone(),
                clock.clone(),
                owner_id.clone(),
                &config,
            )),
            notifier: Notifier::new(store.clone(), notify, clock.clone(), owner_id.clone()),
            payments: PaymentService::new(store, payments),
            owner_id,
            config,
            clock,
        }
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn runner(&self) -> &Arc<SchedulerRunner<S, C>> {
        &self.runner
    }

    pub fn templates(&self) -> &TemplateStore<S> {
        &self.templates
    }

    pub fn obligations(&self) -> &ObligationStore<S> {
        &self.obligations
    }

    /// Start the startup and periodic triggers
    pub fn start_triggers(&self) -> Triggers<S, C> {
        Triggers::spawn(Arc::clone(&self.runner), &self.config)
    }

    pub async fn create_template(&self, new: NewTemplate) -> Result<RecurrenceTemplate, EngineError> {
        let template = self
            .templates
            .create(&self.owner_id, new, self.clock.local_now())
            .await?;
        self.template_changed();
        Ok(template)
    }

    pub async fn update_template(
        &self,
        id: &TemplateId,
        patch: TemplatePatch,
    ) -> Result<RecurrenceTemplate, EngineError> {
        let template = self
            .templates
            .update(id, patch, self.clock.local_now())
            .await?;
        self.template_changed();
        Ok(template)
    }

    pub async fn set_template_active(
        &self,
        id: &TemplateId,
        active: bool,
    ) -> Result<RecurrenceTemplate, EngineError> {
        let template = self
            .templates
            .set_active(id, active, self.clock.local_now())
            .await?;
        self.template_changed();
        Ok(template)
    }

    pub async fn delete_template(&self, id: &TemplateId) -> Result<DeleteReport, EngineError> {
        let report = self.templates.delete(id).await?;
        self.template_changed();
        Ok(report)
    }

    pub async fn list_templates(&self) -> Result<Vec<RecurrenceTemplate>, EngineError> {
        self.templates.list(&self.owner_id).await
    }

    /// Pending and overdue instances, earliest due first
    pub async fn open_obligations(&self) -> Result<Vec<ObligationInstance>, EngineError> {
        self.obligations.list_open(&self.owner_id).await
    }

    /// Run a cycle now, if the guard admits one
    pub async fn refresh(&self) -> RunOutcome {
        self.runner.run(TriggerSource::Refresh).await
    }

    pub async fn summary(&self) -> Result<DueSummary, EngineError> {
        self.notifier.summary().await
    }

    pub async fn check_notifications(&self) -> Result<NotificationOutcome, EngineError> {
        self.notifier.check().await
    }

    pub async fn pay(
        &self,
        source: PayableSource,
        details: PaymentDetails,
    ) -> Result<PaymentOutcome, EngineError> {
        self.payments.pay(source, details).await
    }

    fn template_changed(&self) {
        let _ = self.runner.trigger(TriggerSource::TemplateChanged);
    }
}

#[cfg(test)]
#[path = "dues_tests.rs"]
mod tests;
