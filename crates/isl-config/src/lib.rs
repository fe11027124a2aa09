//! isl-config
//!
//! Layered YAML configuration for the slippage monitor.
//!
//! Layers are applied in order, each one overriding the keys it sets. The
//! merged tree is hashed (canonical JSON, SHA-256) so a running daemon can
//! report exactly which configuration it was started with, then read into
//! [`MonitorSettings`].

mod settings;

use std::fs;

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

pub use settings::{DaemonSettings, MonitorSettings, RetentionSettings, UpstreamSettings};

/// Environment variable holding comma-separated config paths in merge order.
pub const CONFIG_PATHS_ENV: &str = "ISL_CONFIG";

// ---------------------------------------------------------------------------
// LoadedConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Hex SHA-256 of `canonical_json`.
    pub config_hash: String,
    /// Merged tree with sorted keys and no whitespace.
    pub canonical_json: String,
    pub config_json: Value,
}

impl LoadedConfig {
    fn from_tree(config_json: Value) -> Result<Self> {
        // serde_json's default Map is a BTreeMap, so keys serialize sorted.
        let canonical_json =
            serde_json::to_string(&config_json).context("canonical json serialize failed")?;
        let config_hash = hex::encode(Sha256::digest(canonical_json.as_bytes()));
        Ok(Self {
            config_hash,
            canonical_json,
            config_json,
        })
    }

    /// Typed, validated settings. Missing keys take their defaults.
    pub fn settings(&self) -> Result<MonitorSettings> {
        let s: MonitorSettings = serde_json::from_value(self.config_json.clone())
            .context("config does not match monitor settings schema")?;
        s.validate()?;
        Ok(s)
    }

    /// Leaf pointers present in the config that `settings` does not carry,
    /// typically misspelled keys. Sorted.
    pub fn unused_keys(&self, settings: &MonitorSettings) -> Result<Vec<String>> {
        let known = serde_json::to_value(settings).context("settings serialize failed")?;
        let mut leaves = Vec::new();
        leaf_pointers(&self.config_json, String::new(), &mut leaves);
        leaves.retain(|p| known.pointer(p).is_none());
        leaves.sort();
        Ok(leaves)
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let docs = paths
        .iter()
        .map(|p| fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}")))
        .collect::<Result<Vec<_>>>()?;
    let refs: Vec<&str> = docs.iter().map(String::as_str).collect();
    load_layered_yaml_from_strings(&refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = Value::Object(Map::new());
    for (i, raw) in yaml_docs.iter().enumerate() {
        let layer: Value =
            serde_yaml::from_str(raw).with_context(|| format!("invalid yaml in layer {i}"))?;
        // An empty document is "no overrides".
        if !layer.is_null() {
            overlay(&mut merged, layer);
        }
    }
    LoadedConfig::from_tree(merged)
}

/// Load from `ISL_CONFIG` (comma-separated paths). Unset or empty means
/// "all defaults".
pub fn load_from_env() -> Result<LoadedConfig> {
    let raw = std::env::var(CONFIG_PATHS_ENV).unwrap_or_default();
    let paths: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    load_layered_yaml(&paths)
}

/// Apply `layer` on top of `base`. Maps merge key by key; anything else
/// replaces what was there.
fn overlay(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Object(base_map), Value::Object(layer_map)) => {
            for (k, v) in layer_map {
                match base_map.get_mut(&k) {
                    Some(existing) => overlay(existing, v),
                    None => {
                        base_map.insert(k, v);
                    }
                }
            }
        }
        (slot, v) => *slot = v,
    }
}

/// RFC 6901 pointers of every scalar in `v`. Empty maps and lists have none.
fn leaf_pointers(v: &Value, at: String, out: &mut Vec<String>) {
    match v {
        Value::Object(map) => {
            for (k, child) in map {
                let token = k.replace('~', "~0").replace('/', "~1");
                leaf_pointers(child, format!("{at}/{token}"), out);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                leaf_pointers(child, format!("{at}/{i}"), out);
            }
        }
        _ => out.push(at),
    }
}
