//! isl-feed
//!
//! Upstream boundary: fetches raw action events from the ledger-indexing
//! service and hands them, unmodified, to the reconciliation engine.
//!
//! This crate does **not** parse action text or pair intents; that is
//! `isl-reconcile`. It also has no retry policy: a failed detail fetch is
//! skipped and picked up again by the next poll.

pub mod batch;
pub mod sodaxscan;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use batch::{BatchFetcher, FetchLimits, FetchMode};
pub use isl_reconcile::RawEvent;
pub use sodaxscan::SodaxScanSource;

// ---------------------------------------------------------------------------
// Listing entry
// ---------------------------------------------------------------------------

/// One row of the upstream "latest messages" listing. Carries no action text;
/// the detail must be fetched separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: i64,
    #[serde(default)]
    pub sn: String,
    #[serde(default)]
    pub action_type: String,
    #[serde(default)]
    pub created_at: String,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that an [`EventSource`] implementation may return.
#[derive(Debug)]
pub enum FeedError {
    /// Network or transport failure.
    Transport(String),
    /// The upstream API answered with a non-success status.
    Api { status: u16, message: String },
    /// A response payload could not be decoded.
    Decode(String),
    /// A required configuration value (e.g. base URL) is missing or invalid.
    Config(String),
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::Transport(msg) => write!(f, "transport error: {msg}"),
            FeedError::Api { status, message } => {
                write!(f, "upstream api error status={status}: {message}")
            }
            FeedError::Decode(msg) => write!(f, "decode error: {msg}"),
            FeedError::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for FeedError {}

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// Upstream event source contract.
///
/// Object-safe so callers can hold an `Arc<dyn EventSource>`.
#[async_trait::async_trait]
pub trait EventSource: Send + Sync {
    /// Human-readable name identifying this source (e.g. `"sodaxscan"`).
    fn name(&self) -> &'static str;

    /// The `limit` most recent events, newest first as the upstream orders them.
    async fn fetch_latest(&self, limit: usize) -> Result<Vec<EventSummary>, FeedError>;

    /// Full record for one event id. `Ok(None)` when upstream has no such id.
    async fn fetch_detail(&self, id: i64) -> Result<Option<RawEvent>, FeedError>;
}
