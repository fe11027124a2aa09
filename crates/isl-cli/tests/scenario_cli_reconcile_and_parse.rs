use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

fn isl() -> Command {
    Command::cargo_bin("isl").expect("isl binary")
}

#[test]
fn reconcile_prints_paired_intent_and_stats() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("events.json");
    fs::write(
        &path,
        r#"[
            {"id": 21, "sn": "0x2", "action_type": "SendMsg", "created_at": "2025-06-01T00:01:00Z",
             "action_detail": "IntentFilled 100 USDC(arbitrum) -> 9.5 AVAX(avax)"},
            {"id": 20, "sn": "0x1", "action_type": "SendMsg", "created_at": "2025-06-01T00:00:00Z",
             "action_detail": "CreateIntent 100 USDC(arbitrum) -> 10 AVAX(avax)"}
        ]"#,
    )?;

    let out = isl()
        .args(["reconcile", "--events", path.to_str().unwrap()])
        .output()?;
    assert!(out.status.success());

    let json: serde_json::Value = serde_json::from_slice(&out.stdout)?;
    assert_eq!(json["intents"][0]["status"], "filled");
    assert_eq!(json["intents"][0]["intentId"], "100_USDC_arbitrum_AVAX_avax#0@20");
    assert_eq!(json["stats"]["count"], 1);
    assert_eq!(json["stats"]["minPct"], "-5");
    Ok(())
}

#[test]
fn reconcile_rejects_non_array_input() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("events.json");
    fs::write(&path, r#"{"data": []}"#)?;

    isl()
        .args(["reconcile", "--events", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON array"));
    Ok(())
}

#[test]
fn parse_classifies_fill_and_unknown() {
    isl()
        .args(["parse", "IntentFilled 100 USDC(arbitrum) -> 9.50 AVAX(avax)"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""type": "fill""#))
        .stdout(predicate::str::contains(r#""toAmount": "9.50""#));

    isl()
        .args(["parse", "Transfer 5 ETH"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""type": "unknown""#));
}

#[test]
fn config_hash_prints_hash_and_canonical_json() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let base = dir.path().join("base.yaml");
    let over = dir.path().join("override.yaml");
    fs::write(&base, "upstream:\n  chunk_size: 5\n")?;
    fs::write(&over, "upstream:\n  chunk_size: 2\n")?;

    isl()
        .args(["config-hash", base.to_str().unwrap(), over.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("config_hash="))
        .stdout(predicate::str::contains(r#"{"upstream":{"chunk_size":2}}"#));
    Ok(())
}
