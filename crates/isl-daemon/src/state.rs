//! Shared runtime state for isl-daemon.
//!
//! Handlers receive `State<Arc<AppState>>` from Axum. The engine sits behind
//! a `tokio::sync::RwLock`: a refresh ingests its whole batch under one write
//! guard, read routes share read guards. Upstream I/O always happens before
//! the write guard is taken.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use isl_config::MonitorSettings;
use isl_feed::{BatchFetcher, FeedError, FetchLimits, FetchMode, SodaxScanSource};
use isl_reconcile::{BatchSummary, FilledOlderThan, ReconciliationEngine};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// BuildInfo
// ---------------------------------------------------------------------------

/// Static build metadata included in health responses.
#[derive(Clone, Debug, Serialize)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// RefreshReport
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug)]
pub struct RefreshReport {
    pub mode: FetchMode,
    pub summary: BatchSummary,
    pub pruned: usize,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    /// Static build metadata.
    pub build: BuildInfo,
    /// The one engine instance for this process.
    pub engine: Arc<RwLock<ReconciliationEngine>>,
    /// Upstream fetcher (owns the detail cache).
    pub fetcher: Arc<BatchFetcher>,
    /// chain id -> explorer URL template, passed through untouched.
    pub explorer_urls: BTreeMap<String, String>,
    /// Filled intents older than this are pruned after each refresh.
    pub filled_max_age: Option<Duration>,
    /// Set after the first successful refresh; later refreshes are incremental.
    initialized: AtomicBool,
    last_updated: RwLock<Option<DateTime<Utc>>>,
}

impl AppState {
    pub fn new(fetcher: BatchFetcher) -> Self {
        Self {
            build: BuildInfo {
                service: "isl-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
            engine: Arc::new(RwLock::new(ReconciliationEngine::new())),
            fetcher: Arc::new(fetcher),
            explorer_urls: BTreeMap::new(),
            filled_max_age: None,
            initialized: AtomicBool::new(false),
            last_updated: RwLock::new(None),
        }
    }

    /// Wire the sodaxscan source and every tunable from configuration.
    pub fn from_settings(settings: &MonitorSettings) -> Self {
        let up = &settings.upstream;
        let source = SodaxScanSource::new_with_base_url(up.base_url.clone());
        let fetcher = BatchFetcher::new(Arc::new(source))
            .with_limits(FetchLimits {
                backfill: up.backfill_limit,
                incremental: up.incremental_limit,
            })
            .with_chunking(up.chunk_size, Duration::from_millis(up.chunk_delay_ms));

        let mut state = Self::new(fetcher);
        state.explorer_urls = settings.explorer_urls.clone();
        state.filled_max_age = settings
            .retention
            .filled_max_age_secs
            .map(Duration::from_secs);
        state
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub async fn last_updated(&self) -> Option<DateTime<Utc>> {
        *self.last_updated.read().await
    }

    /// Fetch the next page and reconcile it.
    ///
    /// The first successful call backfills; every later call is incremental.
    /// On a fetch error nothing is ingested and the engine keeps its state.
    pub async fn refresh(&self) -> Result<RefreshReport, FeedError> {
        let mode = if self.is_initialized() {
            FetchMode::Incremental
        } else {
            FetchMode::Backfill
        };

        let events = self.fetcher.fetch(mode).await?;

        let (summary, pruned) = {
            let mut engine = self.engine.write().await;
            let summary = engine.ingest_batch(&events);
            let pruned = match self.retention_policy() {
                Some(policy) => engine.prune(&policy),
                None => 0,
            };
            (summary, pruned)
        };

        self.initialized.store(true, Ordering::Release);
        *self.last_updated.write().await = Some(Utc::now());

        info!(
            source = self.fetcher.source_name(),
            mode = mode.as_str(),
            received = summary.received,
            pruned,
            "refresh"
        );
        Ok(RefreshReport {
            mode,
            summary,
            pruned,
        })
    }

    fn retention_policy(&self) -> Option<FilledOlderThan> {
        let max_age = self.filled_max_age?;
        let max_age_ms = i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX);
        Some(FilledOlderThan {
            cutoff: Utc::now().timestamp_millis().saturating_sub(max_age_ms),
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Spawn a background task that refreshes every `interval`.
///
/// Failures are logged and the next tick tries again; there is no backoff.
pub fn spawn_poller(state: Arc<AppState>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if let Err(e) = state.refresh().await {
                warn!(error = %e, "background refresh failed");
            }
        }
    });
}
