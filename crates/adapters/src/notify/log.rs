// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{NotifyAdapter, NotifyError};
use async_trait::async_trait;

/// Delivers notifications to the log
///
/// Used by the daemon, where the log file is the user-facing channel.
#[derive(Clone, Default)]
pub struct LogNotifyAdapter;

impl LogNotifyAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotifyAdapter for LogNotifyAdapter {
    fn has_permission(&self) -> bool {
        true
    }

    async fn send(&self, title: &str, body: &str, tag: &str) -> Result<(), NotifyError> {
        tracing::warn!(tag, title, "{}", body);
        Ok(())
    }
}
