//! Exact-decimal slippage and aggregate statistics.
//!
//! Differences and sums are exact. Quotients (percent, average) are rounded
//! to [`QUOTIENT_PRECISION`] significant digits. Every value is normalized
//! before it leaves this module, so `-5.00` is reported as `-5`. Rounding to
//! a display precision is the presentation layer's job.

use serde::Serialize;

use crate::amount::{Amount, QUOTIENT_PRECISION};
use crate::types::{Intent, IntentStatus, Slippage};

/// Slippage of a fill against its quote, on the delivered (`to`) side.
///
/// - `absolute = fill - quote`
/// - `percent = absolute * 100 / quote`, or `0` when the quote promised zero
pub fn compute_slippage(quote_to: &Amount, fill_to: &Amount) -> Slippage {
    let absolute = fill_to - quote_to;

    let percent = absolute
        .mul_int(100)
        .checked_div(quote_to)
        .unwrap_or_else(Amount::zero);

    Slippage {
        absolute: absolute.normalized(),
        percent: percent.normalized(),
    }
}

/// Aggregate over filled intents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlippageStats {
    pub count: usize,
    pub avg_pct: Amount,
    pub max_pct: Amount,
    pub min_pct: Amount,
}

/// Statistics over every `Filled` intent that carries a slippage.
///
/// Returns `None` (not a zeroed struct) when there is nothing to aggregate.
pub fn compute_statistics<'a, I>(intents: I) -> Option<SlippageStats>
where
    I: IntoIterator<Item = &'a Intent>,
{
    let pcts: Vec<&Amount> = intents
        .into_iter()
        .filter(|i| i.status() == IntentStatus::Filled)
        .filter_map(|i| i.slippage().map(|s| &s.percent))
        .collect();

    let first = *pcts.first()?;
    let (sum, max, min) = pcts.iter().skip(1).fold(
        (first.clone(), first, first),
        |(sum, max, min), &p| (&sum + p, max.max(p), min.min(p)),
    );

    let avg = sum
        .checked_div(&Amount::from_count(pcts.len()))
        .unwrap_or_else(Amount::zero);

    Some(SlippageStats {
        count: pcts.len(),
        avg_pct: avg.normalized(),
        max_pct: max.normalized(),
        min_pct: min.normalized(),
    })
}
