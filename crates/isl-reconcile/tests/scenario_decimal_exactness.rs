//! Amounts must survive without f64 error or a fixed-width decimal ceiling.

use isl_reconcile::*;

#[test]
fn scenario_eighteen_digit_slippage_is_exact() {
    let mut engine = ReconciliationEngine::new();
    engine.ingest_batch(&[
        RawEvent::new(
            1,
            "1000",
            "IntentSwap 73.541165 USDC(arbitrum) -> 5.061095891887000125 AVAX(avax)",
        ),
        RawEvent::new(
            2,
            "1010",
            "IntentFilled 73.541165 USDC(arbitrum) -> 5.163011091280152576 AVAX(avax)",
        ),
    ]);

    let intent = engine.list_intents()[0];
    let s = intent.slippage().unwrap();
    assert_eq!(s.absolute.to_string(), "0.101915199393152451");

    let quote: Amount = "5.061095891887000125".parse().unwrap();
    let expected = s.absolute.mul_int(100).checked_div(&quote).unwrap().normalized();
    assert_eq!(s.percent, expected);
    assert!(s
        .percent
        .to_string()
        .starts_with("2.01369824975108231964508904"));
}

#[test]
fn scenario_thirty_digit_amounts_pair_and_report() {
    let mut engine = ReconciliationEngine::new();
    let summary = engine.ingest_batch(&[
        RawEvent::new(
            1,
            "1000",
            "IntentSwap 100000000000.123456789012345678 PEPE(ethereum) -> 1.5 USDC(sonic)",
        ),
        RawEvent::new(
            2,
            "1010",
            "IntentFilled 100000000000.123456789012345678 PEPE(ethereum) -> 1.2 USDC(sonic)",
        ),
    ]);
    assert_eq!(summary.discarded, 0);
    assert_eq!(engine.len(), 1);

    let intent = engine.list_intents()[0];
    assert_eq!(intent.status(), IntentStatus::Filled);
    assert_eq!(
        intent.id(),
        "100000000000.123456789012345678_PEPE_ethereum_USDC_sonic#0@1"
    );
    assert_eq!(intent.slippage().unwrap().percent.to_string(), "-20");
}

#[test]
fn scenario_zero_quote_reports_zero_percent() {
    let mut engine = ReconciliationEngine::new();
    engine.ingest_batch(&[
        RawEvent::new(1, "1", "CreateIntent 10 USDC(arbitrum) -> 0 AVAX(avax)"),
        RawEvent::new(2, "2", "IntentFilled 10 USDC(arbitrum) -> 0.25 AVAX(avax)"),
    ]);
    let s = engine.list_intents()[0].slippage().cloned().unwrap();
    assert_eq!(s.absolute.to_string(), "0.25");
    assert_eq!(s.percent.to_string(), "0");
}

#[test]
fn scenario_equivalent_amount_spellings_share_a_key() {
    let mut engine = ReconciliationEngine::new();
    engine.ingest_batch(&[
        RawEvent::new(1, "1", "CreateIntent 100.00 USDC(arbitrum) -> 10 AVAX(avax)"),
        RawEvent::new(2, "2", "IntentFilled 100 USDC(arbitrum) -> 10.0 AVAX(avax)"),
    ]);
    assert_eq!(engine.len(), 1);
    assert_eq!(engine.list_intents()[0].status(), IntentStatus::Filled);
    assert_eq!(
        engine.list_intents()[0].slippage().unwrap().absolute.to_string(),
        "0"
    );
}
