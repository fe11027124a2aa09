//! Command handlers for the `isl` CLI.

use std::fs;

use anyhow::{Context, Result};
use isl_reconcile::{Intent, RawEvent, ReconciliationEngine, SlippageStats};
use serde::Serialize;
use tracing::info;

// ---------------------------------------------------------------------------
// reconcile
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ReconcileReport {
    /// `null` when nothing is filled.
    pub stats: Option<SlippageStats>,
    pub intents: Vec<Intent>,
}

/// Read a JSON array of detail records from `path`.
///
/// A leading UTF-8 BOM is tolerated; files exported from some tools carry one.
pub fn load_events(path: &str) -> Result<Vec<RawEvent>> {
    let bytes = fs::read(path).with_context(|| format!("read events file failed: {}", path))?;
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(&bytes);
    serde_json::from_slice(bytes).context("events file must contain a JSON array of events")
}

/// Replay `events` through a fresh engine.
pub fn reconcile(events: &[RawEvent]) -> ReconcileReport {
    let mut engine = ReconciliationEngine::new();
    let summary = engine.ingest_batch(events);
    info!(
        received = summary.received,
        created = summary.created,
        matched = summary.matched,
        "replayed events"
    );

    ReconcileReport {
        stats: engine.compute_statistics(),
        intents: engine.list_intents().into_iter().cloned().collect(),
    }
}
