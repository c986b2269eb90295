// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake notification adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{NotifyAdapter, NotifyError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Recorded notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyCall {
    pub title: String,
    pub body: String,
    pub tag: String,
}

/// Fake notification adapter for testing
///
/// Grants permission by default.
#[derive(Clone)]
pub struct FakeNotifyAdapter {
    calls: Arc<Mutex<Vec<NotifyCall>>>,
    permission: Arc<AtomicBool>,
    fail_sends: Arc<AtomicBool>,
}

impl Default for FakeNotifyAdapter {
    fn default() -> Self {
        Self {
            calls: Arc::default(),
            permission: Arc::new(AtomicBool::new(true)),
            fail_sends: Arc::default(),
        }
    }
}

impl FakeNotifyAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adapter whose user has not granted permission
    pub fn without_permission() -> Self {
        let adapter = Self::default();
        adapter.set_permission(false);
        adapter
    }

    pub fn set_permission(&self, granted: bool) {
        self.permission.store(granted, Ordering::SeqCst);
    }

    /// Make every send fail after being recorded
    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Get all recorded notifications
    pub fn calls(&self) -> Vec<NotifyCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl NotifyAdapter for FakeNotifyAdapter {
    fn has_permission(&self) -> bool {
        self.permission.load(Ordering::SeqCst)
    }

    async fn send(&self, title: &str, body: &str, tag: &str) -> Result<(), NotifyError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(NotifyCall {
                title: title.to_string(),
                body: body.to_string(),
                tag: tag.to_string(),
            });
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(NotifyError::SendFailed("injected".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
