//! Typed settings: defaults when absent, overrides when present, validation.

use std::io::Write;

use isl_config::{load_layered_yaml, load_layered_yaml_from_strings, MonitorSettings};

#[test]
fn empty_config_yields_defaults() {
    let loaded = load_layered_yaml_from_strings(&[]).unwrap();
    let s = loaded.settings().unwrap();
    assert_eq!(s, MonitorSettings::default());
    assert_eq!(s.upstream.base_url, "https://sodaxscan.com/api");
    assert_eq!(s.upstream.backfill_limit, 150);
    assert_eq!(s.upstream.incremental_limit, 50);
    assert_eq!(s.upstream.chunk_size, 5);
    assert_eq!(s.upstream.chunk_delay_ms, 1000);
    assert_eq!(s.daemon.poll_interval_secs, 0);
    assert!(s.retention.filled_max_age_secs.is_none());
    assert!(s.explorer_urls.is_empty());
}

#[test]
fn partial_overrides_keep_other_defaults() {
    let loaded = load_layered_yaml_from_strings(&[r#"
upstream:
  chunk_size: 2
retention:
  filled_max_age_secs: 86400
explorer_urls:
  sonic: "https://sonicscan.org/tx/{txHash}"
"#])
    .unwrap();
    let s = loaded.settings().unwrap();
    assert_eq!(s.upstream.chunk_size, 2);
    assert_eq!(s.upstream.backfill_limit, 150);
    assert_eq!(s.retention.filled_max_age_secs, Some(86400));
    assert_eq!(
        s.explorer_urls.get("sonic").map(String::as_str),
        Some("https://sonicscan.org/tx/{txHash}")
    );
}

#[test]
fn zero_chunk_size_is_rejected() {
    let loaded = load_layered_yaml_from_strings(&["upstream:\n  chunk_size: 0\n"]).unwrap();
    let err = loaded.settings().unwrap_err();
    assert!(err.to_string().contains("chunk_size"));
}

#[test]
fn non_http_base_url_is_rejected() {
    let loaded =
        load_layered_yaml_from_strings(&["upstream:\n  base_url: \"ftp://example\"\n"]).unwrap();
    assert!(loaded.settings().is_err());
}

#[test]
fn layered_files_on_disk_merge_in_order() {
    let mut base = tempfile::NamedTempFile::new().unwrap();
    writeln!(base, "daemon:\n  addr: \"0.0.0.0:9000\"\n  poll_interval_secs: 10").unwrap();
    let mut overlay = tempfile::NamedTempFile::new().unwrap();
    writeln!(overlay, "daemon:\n  poll_interval_secs: 30").unwrap();

    let base_path = base.path().to_str().unwrap().to_string();
    let overlay_path = overlay.path().to_str().unwrap().to_string();
    let loaded = load_layered_yaml(&[base_path.as_str(), overlay_path.as_str()]).unwrap();
    let s = loaded.settings().unwrap();
    assert_eq!(s.daemon.addr, "0.0.0.0:9000");
    assert_eq!(s.daemon.poll_interval_secs, 30);
}

#[test]
fn missing_file_is_an_error_with_path() {
    let err = load_layered_yaml(&["/definitely/not/here.yaml"]).unwrap_err();
    assert!(format!("{err:#}").contains("/definitely/not/here.yaml"));
}
