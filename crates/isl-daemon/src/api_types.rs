//! Response types for all isl-daemon HTTP endpoints.
//!
//! Field names are camelCase to match what the dashboard already consumes.
//! Amounts inside intents and stats are decimal strings. No business logic
//! lives here.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use isl_reconcile::{Intent, SlippageStats, StatusCounts};
use serde::Serialize;

// ---------------------------------------------------------------------------
// /v1/health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// /v1/intent-slippage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlippageResponse {
    /// `null` when no intent has been filled yet.
    pub stats: Option<SlippageStats>,
    pub intents: Vec<Intent>,
    pub explorer_urls: BTreeMap<String, String>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Body returned with 502 when the upstream refresh fails.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ---------------------------------------------------------------------------
// /v1/status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub initialized: bool,
    pub intents: usize,
    #[serde(flatten)]
    pub counts: StatusCounts,
    pub seen_events: usize,
    pub cached_details: usize,
    pub last_updated: Option<DateTime<Utc>>,
}
