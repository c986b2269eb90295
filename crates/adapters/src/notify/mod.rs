// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification adapters

mod log;

pub use log::LogNotifyAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeNotifyAdapter, NotifyCall};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from notification operations
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification permission not granted")]
    PermissionDenied,
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Adapter for delivering push notifications
///
/// A later push with the same `tag` replaces an earlier one where the
/// platform supports it.
#[async_trait]
pub trait NotifyAdapter: Clone + Send + Sync + 'static {
    /// Whether the user has granted permission to push
    fn has_permission(&self) -> bool;

    /// Deliver one notification
    async fn send(&self, title: &str, body: &str, tag: &str) -> Result<(), NotifyError>;
}

/// No-op notify adapter for hosts without a notification channel
///
/// Reports no permission, so nothing is ever pushed.
#[derive(Clone, Default)]
pub struct NoOpNotifyAdapter;

impl NoOpNotifyAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotifyAdapter for NoOpNotifyAdapter {
    fn has_permission(&self) -> bool {
        false
    }

    async fn send(&self, _title: &str, _body: &str, _tag: &str) -> Result<(), NotifyError> {
        Err(NotifyError::PermissionDenied)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
