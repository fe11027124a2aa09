use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::slippage::compute_slippage;

// ---------------------------------------------------------------------------
// Raw upstream event
// ---------------------------------------------------------------------------

/// One action log entry exactly as delivered by the indexing service.
///
/// `id` is monotonic and unique upstream; it is the only causal-order proxy
/// the engine has. `created_at` is opaque text and only ever used for
/// ordering the read view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    pub id: i64,
    #[serde(rename = "sn", default)]
    pub sequence_number: String,
    #[serde(default)]
    pub action_type: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub action_detail: String,
}

impl RawEvent {
    pub fn new(id: i64, created_at: impl Into<String>, action_detail: impl Into<String>) -> Self {
        Self {
            id,
            sequence_number: String::new(),
            action_type: String::new(),
            created_at: created_at.into(),
            action_detail: action_detail.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsed legs
// ---------------------------------------------------------------------------

/// Which half of an intent a leg describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegKind {
    Quote,
    Fill,
}

/// The leading word of a recognised action line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionWord {
    IntentSwap,
    CreateIntent,
    IntentFilled,
}

impl ActionWord {
    pub fn from_word(s: &str) -> Option<Self> {
        match s {
            "IntentSwap" => Some(ActionWord::IntentSwap),
            "CreateIntent" => Some(ActionWord::CreateIntent),
            "IntentFilled" => Some(ActionWord::IntentFilled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionWord::IntentSwap => "IntentSwap",
            ActionWord::CreateIntent => "CreateIntent",
            ActionWord::IntentFilled => "IntentFilled",
        }
    }

    pub fn kind(&self) -> LegKind {
        match self {
            ActionWord::IntentSwap | ActionWord::CreateIntent => LegKind::Quote,
            ActionWord::IntentFilled => LegKind::Fill,
        }
    }
}

/// A fully parsed swap line: `<from_amount> <from_token>(<from_chain>) -> <to_amount> <to_token>(<to_chain>)`.
///
/// Amounts keep the scale given in the text (`9.50` stays `9.50`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapLeg {
    pub action: ActionWord,
    pub from_amount: Amount,
    pub from_token: String,
    pub from_chain: String,
    pub to_amount: Amount,
    pub to_token: String,
    pub to_chain: String,
    pub raw_text: String,
}

impl SwapLeg {
    pub fn kind(&self) -> LegKind {
        self.action.kind()
    }

    /// Match key: requested side + route. The delivered amount is excluded
    /// because that is exactly what differs between quote and fill.
    pub fn match_key(&self) -> MatchKey {
        MatchKey {
            from_amount: self.from_amount.normalized().to_string(),
            from_token: self.from_token.clone(),
            from_chain: self.from_chain.clone(),
            to_token: self.to_token.clone(),
            to_chain: self.to_chain.clone(),
        }
    }
}

/// Classification of one action line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParsedLeg {
    Quote(SwapLeg),
    Fill(SwapLeg),
    Unknown {
        #[serde(rename = "rawText")]
        raw_text: String,
    },
}

impl ParsedLeg {
    pub fn kind(&self) -> Option<LegKind> {
        match self {
            ParsedLeg::Quote(_) => Some(LegKind::Quote),
            ParsedLeg::Fill(_) => Some(LegKind::Fill),
            ParsedLeg::Unknown { .. } => None,
        }
    }

    pub fn raw_text(&self) -> &str {
        match self {
            ParsedLeg::Quote(leg) | ParsedLeg::Fill(leg) => &leg.raw_text,
            ParsedLeg::Unknown { raw_text } => raw_text,
        }
    }

    pub fn into_swap(self) -> Option<SwapLeg> {
        match self {
            ParsedLeg::Quote(leg) | ParsedLeg::Fill(leg) => Some(leg),
            ParsedLeg::Unknown { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Match key
// ---------------------------------------------------------------------------

/// Swap signature used to pair a quote with its fill.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchKey {
    /// Normalized decimal string (`100.0` and `100` collapse to `100`).
    pub from_amount: String,
    pub from_token: String,
    pub from_chain: String,
    pub to_token: String,
    pub to_chain: String,
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}_{}",
            self.from_amount, self.from_token, self.from_chain, self.to_token, self.to_chain
        )
    }
}

// ---------------------------------------------------------------------------
// Intent aggregate
// ---------------------------------------------------------------------------

/// A leg attached to an intent, with the event that delivered it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegRecord {
    pub event_id: i64,
    pub timestamp: String,
    #[serde(flatten)]
    pub leg: SwapLeg,
}

impl LegRecord {
    pub fn new(event: &RawEvent, leg: SwapLeg) -> Self {
        Self {
            event_id: event.id,
            timestamp: event.created_at.clone(),
            leg,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    Pending,
    Filled,
    OrphanFill,
}

impl IntentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentStatus::Pending => "pending",
            IntentStatus::Filled => "filled",
            IntentStatus::OrphanFill => "orphan_fill",
        }
    }
}

/// Fill minus quote on the delivered side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slippage {
    #[serde(rename = "abs")]
    pub absolute: Amount,
    #[serde(rename = "pct")]
    pub percent: Amount,
}

/// One logical swap: a quote, a fill, or both.
///
/// Invariants (upheld by construction, fields are private):
/// - status is `Pending` (quote only), `OrphanFill` (fill only) or `Filled` (both)
/// - `slippage.is_some()` iff status is `Filled`
/// - legs are only ever added; an occupied slot is never overwritten
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    intent_id: String,
    #[serde(skip)]
    match_key: MatchKey,
    quote: Option<LegRecord>,
    fill: Option<LegRecord>,
    status: IntentStatus,
    slippage: Option<Slippage>,
}

impl Intent {
    pub(crate) fn open(intent_id: String, match_key: MatchKey, kind: LegKind, first: LegRecord) -> Self {
        let (quote, fill, status) = match kind {
            LegKind::Quote => (Some(first), None, IntentStatus::Pending),
            LegKind::Fill => (None, Some(first), IntentStatus::OrphanFill),
        };
        Self {
            intent_id,
            match_key,
            quote,
            fill,
            status,
            slippage: None,
        }
    }

    /// `true` if the slot for `kind` is still empty.
    pub fn is_open_for(&self, kind: LegKind) -> bool {
        match kind {
            LegKind::Quote => self.quote.is_none(),
            LegKind::Fill => self.fill.is_none(),
        }
    }

    /// Put `record` into the empty `kind` slot and recompute status.
    ///
    /// An occupied slot is left untouched and the record is handed back.
    pub(crate) fn attach(&mut self, kind: LegKind, record: LegRecord) -> Result<(), LegRecord> {
        let slot = match kind {
            LegKind::Quote => &mut self.quote,
            LegKind::Fill => &mut self.fill,
        };
        if slot.is_some() {
            return Err(record);
        }
        *slot = Some(record);
        self.refresh();
        Ok(())
    }

    fn refresh(&mut self) {
        match (&self.quote, &self.fill) {
            (Some(q), Some(f)) => {
                self.status = IntentStatus::Filled;
                self.slippage = Some(compute_slippage(&q.leg.to_amount, &f.leg.to_amount));
            }
            (None, Some(_)) => {
                self.status = IntentStatus::OrphanFill;
                self.slippage = None;
            }
            (Some(_), None) | (None, None) => {
                self.status = IntentStatus::Pending;
                self.slippage = None;
            }
        }
    }

    pub fn id(&self) -> &str {
        &self.intent_id
    }

    pub fn match_key(&self) -> &MatchKey {
        &self.match_key
    }

    pub fn quote(&self) -> Option<&LegRecord> {
        self.quote.as_ref()
    }

    pub fn fill(&self) -> Option<&LegRecord> {
        self.fill.as_ref()
    }

    pub fn status(&self) -> IntentStatus {
        self.status
    }

    pub fn slippage(&self) -> Option<&Slippage> {
        self.slippage.as_ref()
    }

    /// Timestamp of the most recent leg: fill if present, else quote.
    pub fn latest_timestamp(&self) -> Option<&str> {
        self.fill
            .as_ref()
            .or(self.quote.as_ref())
            .map(|r| r.timestamp.as_str())
    }

    /// Sort key for the read view. `None` timestamps sort below every parsed
    /// one; ties are broken by the newest event id touching the intent.
    pub fn activity_key(&self) -> (Option<i64>, i64) {
        let ts = self.latest_timestamp().and_then(activity_millis);
        let last_event = [self.quote.as_ref(), self.fill.as_ref()]
            .into_iter()
            .flatten()
            .map(|r| r.event_id)
            .max()
            .unwrap_or(i64::MIN);
        (ts, last_event)
    }
}

/// Plain integers below this are epoch seconds; at or above it, epoch
/// milliseconds. `1e11` seconds is past the year 5000, `1e11` ms is 1973.
const EPOCH_SECONDS_CEILING: i64 = 100_000_000_000;

/// Interpret an upstream `created_at` as epoch milliseconds.
///
/// Plain integers are epoch seconds or milliseconds (told apart by
/// magnitude). RFC 3339 and naive `YYYY-MM-DD HH:MM:SS` (UTC) are converted.
/// Anything else is `None`.
pub fn activity_millis(ts: &str) -> Option<i64> {
    let t = ts.trim();
    if let Ok(n) = t.parse::<i64>() {
        return Some(if n.abs() < EPOCH_SECONDS_CEILING {
            n.saturating_mul(1000)
        } else {
            n
        });
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Some(dt.timestamp_millis());
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(t, fmt).ok())
        .map(|n| n.and_utc().timestamp_millis())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
