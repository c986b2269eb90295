// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::store::{FailRule, FakeDocumentStore, StoreOp};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::default();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

#[tokio::test]
async fn traced_store_passes_results_through() {
    let fake = FakeDocumentStore::new();
    let traced = TracedDocumentStore::new(fake.clone());

    let id = traced.insert("templates", Document::new()).await.unwrap();

    assert_eq!(id, "doc-1");
    assert!(traced.get("templates", &id).await.unwrap().is_some());
    assert_eq!(fake.documents("templates").len(), 1);
}

#[test]
fn insert_logs_span_and_timing() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedDocumentStore::new(FakeDocumentStore::new());
        traced.insert("instances", Document::new()).await
    });

    assert!(result.is_ok());
    assert!(logs.contains("store.insert"), "Should log span name. Logs:\n{}", logs);
    assert!(logs.contains("instances"), "Should log collection. Logs:\n{}", logs);
    assert!(logs.contains("inserted"), "Should log completion. Logs:\n{}", logs);
    assert!(logs.contains("elapsed_ms"), "Should log timing. Logs:\n{}", logs);
}

#[test]
fn query_logs_match_count() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedDocumentStore::new(FakeDocumentStore::new());
        traced.insert("instances", Document::new()).await.unwrap();
        traced.query("instances", &Query::new()).await
    });

    assert_eq!(result.unwrap().len(), 1);
    assert!(logs.contains("store.query"), "Should log span name. Logs:\n{}", logs);
    assert!(logs.contains("matched=1"), "Should log match count. Logs:\n{}", logs);
}

#[test]
fn failures_are_logged_with_error() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeDocumentStore::new();
        fake.fail(FailRule::new(StoreOp::Update, "instances"));
        let traced = TracedDocumentStore::new(fake);
        traced.update("instances", "doc-1", Document::new()).await
    });

    assert!(result.is_err());
    assert!(logs.contains("update failed"), "Should log failure. Logs:\n{}", logs);
    assert!(logs.contains("injected"), "Should log the error. Logs:\n{}", logs);
}

#[test]
fn delete_failure_is_a_warning() {
    let (logs, _) = with_tracing(|| async {
        let fake = FakeDocumentStore::new();
        fake.fail(FailRule::new(StoreOp::Delete, "instances"));
        TracedDocumentStore::new(fake)
            .delete("instances", "doc-1")
            .await
    });

    assert!(logs.contains("WARN"), "Should warn. Logs:\n{}", logs);
    assert!(logs.contains("delete failed"), "Should log failure. Logs:\n{}", logs);
}

#[test]
fn conditional_update_logs_outcome_inside_its_span() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeDocumentStore::new();
        let traced = TracedDocumentStore::new(fake.clone());
        let id = traced.insert("instances", Document::new()).await.unwrap();
        // The completion event fires after the inner store yields
        fake.set_update_delay(std::time::Duration::from_millis(10));
        traced
            .update_if("instances", &id, "status", &Value::from("pending"), Document::new())
            .await
    });

    assert!(!result.unwrap());
    let outcome = logs
        .lines()
        .find(|line| line.contains("applied=false"))
        .unwrap_or_default();
    assert!(outcome.contains("store.update_if{"), "Should log inside the span. Logs:\n{}", logs);
    assert!(outcome.contains("field=\"status\""), "Should log the field. Logs:\n{}", logs);
}
