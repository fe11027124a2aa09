//! Final filled set does not depend on batch boundaries or delivery order
//! when per-key order is preserved.

use isl_reconcile::*;
use std::collections::BTreeMap;

fn events() -> Vec<RawEvent> {
    vec![
        RawEvent::new(1, "1", "CreateIntent 100 USDC(arbitrum) -> 10 AVAX(avax)"),
        RawEvent::new(2, "2", "IntentSwap 5 ETH(base) -> 12000 SODA(sonic)"),
        RawEvent::new(3, "3", "CreateIntent 100 USDC(arbitrum) -> 10.1 AVAX(avax)"),
        RawEvent::new(4, "4", "IntentFilled 5 ETH(base) -> 11800 SODA(sonic)"),
        RawEvent::new(5, "5", "IntentFilled 100 USDC(arbitrum) -> 9.9 AVAX(avax)"),
        RawEvent::new(6, "6", "IntentFilled 100 USDC(arbitrum) -> 10.2 AVAX(avax)"),
    ]
}

fn filled_slippage(engine: &ReconciliationEngine) -> BTreeMap<String, Slippage> {
    engine
        .list_intents()
        .into_iter()
        .filter(|i| i.status() == IntentStatus::Filled)
        .map(|i| (i.id().to_string(), i.slippage().cloned().unwrap()))
        .collect()
}

#[test]
fn scenario_one_batch_equals_many_batches() {
    let mut whole = ReconciliationEngine::new();
    whole.ingest_batch(&events());

    let mut split = ReconciliationEngine::new();
    for chunk in events().chunks(2) {
        split.ingest_batch(chunk);
    }

    assert_eq!(filled_slippage(&whole), filled_slippage(&split));
    assert_eq!(filled_slippage(&whole).len(), 3);
}

#[test]
fn scenario_shuffled_batch_is_sorted_before_ingest() {
    let mut ordered = ReconciliationEngine::new();
    ordered.ingest_batch(&events());

    let mut reversed_events = events();
    reversed_events.reverse();
    let mut reversed = ReconciliationEngine::new();
    reversed.ingest_batch(&reversed_events);

    assert_eq!(filled_slippage(&ordered), filled_slippage(&reversed));
}

#[test]
fn scenario_identical_quotes_pair_fifo() {
    let mut engine = ReconciliationEngine::new();
    engine.ingest_batch(&events());

    let first = engine.intent("100_USDC_arbitrum_AVAX_avax#0@1").unwrap();
    let second = engine.intent("100_USDC_arbitrum_AVAX_avax#1@3").unwrap();
    assert_eq!(first.fill().unwrap().event_id, 5);
    assert_eq!(second.fill().unwrap().event_id, 6);
    assert_eq!(first.slippage().unwrap().absolute.to_string(), "-0.1");
    assert_eq!(second.slippage().unwrap().absolute.to_string(), "0.1");
}
