use serde::Serialize;
use tracing::info;

use crate::index::{CorrelationIndex, IngestOutcome};
use crate::slippage::{compute_statistics, SlippageStats};
use crate::types::{Intent, IntentStatus, RawEvent};

// ---------------------------------------------------------------------------
// Batch summary
// ---------------------------------------------------------------------------

/// Per-batch counters, logged by the engine and handed back to the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub received: usize,
    pub duplicates: usize,
    pub discarded: usize,
    pub created: usize,
    pub matched: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: &IngestOutcome) {
        match outcome {
            IngestOutcome::Duplicate => self.duplicates += 1,
            IngestOutcome::Discarded => self.discarded += 1,
            IngestOutcome::Created { .. } => self.created += 1,
            IngestOutcome::Matched { .. } => self.matched += 1,
        }
    }
}

/// Intent totals by status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub pending: usize,
    pub filled: usize,
    pub orphan_fill: usize,
}

// ---------------------------------------------------------------------------
// Retention hook
// ---------------------------------------------------------------------------

/// Outer-caller pruning policy. The engine never prunes on its own; matching
/// logic is unaware of retention.
pub trait RetentionPolicy {
    /// `false` drops the intent from the index.
    fn retain(&self, intent: &Intent) -> bool;
}

/// Drop `Filled` intents whose latest activity is strictly before `cutoff`
/// (epoch milliseconds, see [`crate::activity_millis`]). Pending and orphan intents,
/// and intents with an unreadable timestamp, are always kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilledOlderThan {
    pub cutoff: i64,
}

impl RetentionPolicy for FilledOlderThan {
    fn retain(&self, intent: &Intent) -> bool {
        if intent.status() != IntentStatus::Filled {
            return true;
        }
        match intent.activity_key().0 {
            Some(ts) => ts >= self.cutoff,
            None => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Owns the correlation index and exposes the batch-ingest and read APIs.
///
/// Mutation takes `&mut self` and reads take `&self`, so whoever shares the
/// engine (the daemon uses an `RwLock`) gets one critical section per batch
/// and concurrent readers that never see a half-applied leg.
#[derive(Clone, Debug, Default)]
pub struct ReconciliationEngine {
    index: CorrelationIndex,
}

impl ReconciliationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest a single event. Prefer [`ReconciliationEngine::ingest_batch`],
    /// which orders events by id first.
    pub fn ingest(&mut self, event: &RawEvent) -> IngestOutcome {
        self.index.ingest(event)
    }

    /// Ingest a batch in ascending id order. An empty batch is a no-op.
    pub fn ingest_batch(&mut self, events: &[RawEvent]) -> BatchSummary {
        let mut summary = BatchSummary {
            received: events.len(),
            ..BatchSummary::default()
        };
        if events.is_empty() {
            return summary;
        }

        let mut ordered: Vec<&RawEvent> = events.iter().collect();
        ordered.sort_by_key(|e| e.id);

        for event in ordered {
            let outcome = self.index.ingest(event);
            summary.record(&outcome);
        }

        info!(
            received = summary.received,
            duplicates = summary.duplicates,
            discarded = summary.discarded,
            created = summary.created,
            matched = summary.matched,
            intents = self.index.len(),
            "batch reconciled"
        );
        summary
    }

    /// All intents, most recent activity first.
    pub fn list_intents(&self) -> Vec<&Intent> {
        let mut out: Vec<&Intent> = self.index.intents().collect();
        out.sort_by_key(|i| std::cmp::Reverse(i.activity_key()));
        out
    }

    pub fn compute_statistics(&self) -> Option<SlippageStats> {
        compute_statistics(self.index.intents())
    }

    pub fn intent(&self, intent_id: &str) -> Option<&Intent> {
        self.index.get(intent_id)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn seen_event_count(&self) -> usize {
        self.index.seen_event_count()
    }

    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for intent in self.index.intents() {
            match intent.status() {
                IntentStatus::Pending => counts.pending += 1,
                IntentStatus::Filled => counts.filled += 1,
                IntentStatus::OrphanFill => counts.orphan_fill += 1,
            }
        }
        counts
    }

    /// Apply an outer retention policy. Returns the number of intents dropped.
    pub fn prune(&mut self, policy: &dyn RetentionPolicy) -> usize {
        let removed = self.index.retain(|intent| policy.retain(intent));
        if removed > 0 {
            info!(removed, intents = self.index.len(), "intents pruned");
        }
        removed
    }
}
