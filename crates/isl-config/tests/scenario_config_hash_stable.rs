//! Config hash stability: same content, same hash, regardless of key order.

use isl_config::load_layered_yaml_from_strings;

const BASE_YAML: &str = r#"
upstream:
  base_url: "https://sodaxscan.com/api"
  backfill_limit: 150
  incremental_limit: 50
daemon:
  addr: "127.0.0.1:8898"
"#;

const BASE_YAML_REORDERED: &str = r#"
daemon:
  addr: "127.0.0.1:8898"
upstream:
  incremental_limit: 50
  backfill_limit: 150
  base_url: "https://sodaxscan.com/api"
"#;

const OVERLAY_YAML: &str = r#"
upstream:
  incremental_limit: 20
"#;

#[test]
fn same_input_produces_identical_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.canonical_json, b.canonical_json);
}

#[test]
fn reordered_keys_produce_same_hash() {
    let original = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let reordered = load_layered_yaml_from_strings(&[BASE_YAML_REORDERED]).unwrap();
    assert_eq!(
        original.config_hash, reordered.config_hash,
        "reordering keys in YAML must not change the hash"
    );
}

#[test]
fn overlay_changes_hash_and_value() {
    let base = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let layered = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();
    assert_ne!(base.config_hash, layered.config_hash);
    assert_eq!(layered.config_json["upstream"]["incremental_limit"], 20);
    assert_eq!(layered.config_json["upstream"]["backfill_limit"], 150);
}

#[test]
fn hash_is_sha256_hex() {
    let loaded = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    assert_eq!(loaded.config_hash.len(), 64);
    assert!(loaded.config_hash.chars().all(|c| c.is_ascii_hexdigit()));
}
