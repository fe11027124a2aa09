//! isl-reconcile
//!
//! Quote/fill correlation engine for cross-chain swap intents.
//!
//! Architectural decisions:
//! - Raw action text is classified into quote / fill / unknown legs
//! - Legs are paired by match key (requested amount + route), never by a global id
//! - Every event id is consumed at most once (at-least-once delivery is absorbed)
//! - Slippage is computed with exact decimal arithmetic, never f64
//!
//! Deterministic, pure logic. No IO. No upstream calls.

mod amount;
mod engine;
mod index;
mod parser;
mod slippage;
mod types;

pub use amount::{Amount, QUOTIENT_PRECISION};
pub use engine::{
    BatchSummary, FilledOlderThan, ReconciliationEngine, RetentionPolicy, StatusCounts,
};
pub use index::{CorrelationIndex, IngestOutcome};
pub use parser::parse;
pub use slippage::{compute_slippage, compute_statistics, SlippageStats};
pub use types::*;
