//! Correlation index: pairs quote and fill legs by match key.
//!
//! # Invariants
//!
//! - **At-most-once per event id**: an id is recorded before anything else
//!   happens, so a re-delivered event (even one that was discarded) is a no-op.
//! - **First eligible candidate wins**: candidates for a key are scanned in
//!   insertion order and the first intent whose slot for the incoming kind is
//!   empty receives the leg. This approximates FIFO pairing when several
//!   intents share amount and route.
//! - **No overwrite**: a leg of a kind the candidate already holds never
//!   replaces it; it opens a new intent instead.
//! - **Deterministic identity**: `"{match_key}#{ordinal}@{first_event_id}"`.
//! - **Monotonic growth**: nothing is removed except through [`CorrelationIndex::retain`].

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use crate::parser::parse;
use crate::types::{Intent, LegRecord, MatchKey, ParsedLeg, RawEvent};

/// What a single `ingest` call did. Informational only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Event id already consumed.
    Duplicate,
    /// Action text did not parse as a quote or fill.
    Discarded,
    /// No eligible candidate; a new intent was opened.
    Created { intent_id: String },
    /// The leg completed an existing intent.
    Matched { intent_id: String },
}

#[derive(Clone, Debug, Default)]
struct CandidateList {
    next_ordinal: u64,
    intent_ids: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct CorrelationIndex {
    intents: BTreeMap<String, Intent>,
    candidates: HashMap<MatchKey, CandidateList>,
    seen_events: HashSet<i64>,
}

impl CorrelationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one raw event. Idempotent per `event.id`.
    pub fn ingest(&mut self, event: &RawEvent) -> IngestOutcome {
        if !self.seen_events.insert(event.id) {
            return IngestOutcome::Duplicate;
        }

        let leg = match parse(&event.action_detail) {
            ParsedLeg::Quote(leg) | ParsedLeg::Fill(leg) => leg,
            ParsedLeg::Unknown { raw_text } => {
                debug!(event_id = event.id, raw = %raw_text, "unparsed action discarded");
                return IngestOutcome::Discarded;
            }
        };

        let kind = leg.kind();
        let key = leg.match_key();
        let record = LegRecord::new(event, leg);
        let list = self.candidates.entry(key.clone()).or_default();

        let eligible = list
            .intent_ids
            .iter()
            .find(|id| {
                self.intents
                    .get(id.as_str())
                    .is_some_and(|intent| intent.is_open_for(kind))
            })
            .cloned();

        let record = match eligible.as_deref().and_then(|id| self.intents.get_mut(id)) {
            Some(intent) => match intent.attach(kind, record) {
                Ok(()) => {
                    let intent_id = intent.id().to_string();
                    debug!(
                        event_id = event.id,
                        intent_id = %intent_id,
                        status = intent.status().as_str(),
                        "leg matched"
                    );
                    return IngestOutcome::Matched { intent_id };
                }
                Err(record) => record,
            },
            None => record,
        };

        let intent_id = format!("{}#{}@{}", key, list.next_ordinal, event.id);
        list.next_ordinal += 1;
        list.intent_ids.push(intent_id.clone());

        let intent = Intent::open(intent_id.clone(), key, kind, record);
        debug!(
            event_id = event.id,
            intent_id = %intent_id,
            status = intent.status().as_str(),
            "intent opened"
        );
        self.intents.insert(intent_id.clone(), intent);
        IngestOutcome::Created { intent_id }
    }

    pub fn get(&self, intent_id: &str) -> Option<&Intent> {
        self.intents.get(intent_id)
    }

    /// All intents in intent-id order.
    pub fn intents(&self) -> impl Iterator<Item = &Intent> {
        self.intents.values()
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    pub fn has_seen(&self, event_id: i64) -> bool {
        self.seen_events.contains(&event_id)
    }

    pub fn seen_event_count(&self) -> usize {
        self.seen_events.len()
    }

    /// Drop every intent for which `keep` returns `false`.
    ///
    /// Seen event ids are kept, so a re-delivered event of a dropped intent
    /// stays a no-op. Returns the number of intents removed.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&Intent) -> bool,
    {
        let before = self.intents.len();
        self.intents.retain(|_, intent| keep(intent));
        let removed = before - self.intents.len();
        if removed == 0 {
            return 0;
        }

        let intents = &self.intents;
        self.candidates.retain(|_, list| {
            list.intent_ids.retain(|id| intents.contains_key(id));
            !list.intent_ids.is_empty()
        });
        removed
    }
}
