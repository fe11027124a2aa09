use std::collections::BTreeMap;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Everything the monitor reads from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    pub upstream: UpstreamSettings,
    pub daemon: DaemonSettings,
    pub retention: RetentionSettings,
    /// chain id -> explorer URL template, passed through to the presentation layer.
    pub explorer_urls: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamSettings {
    pub base_url: String,
    /// Page size for the first (startup) fetch.
    pub backfill_limit: usize,
    /// Page size for every later poll.
    pub incremental_limit: usize,
    /// Detail requests issued concurrently per chunk.
    pub chunk_size: usize,
    /// Pause between detail chunks.
    pub chunk_delay_ms: u64,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            base_url: "https://sodaxscan.com/api".to_string(),
            backfill_limit: 150,
            incremental_limit: 50,
            chunk_size: 5,
            chunk_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonSettings {
    pub addr: String,
    /// Background refresh period; `0` means refresh only when the
    /// slippage route is requested.
    pub poll_interval_secs: u64,
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8898".to_string(),
            poll_interval_secs: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionSettings {
    /// Drop filled intents whose latest leg is older than this. `None` keeps
    /// everything for the life of the process.
    pub filled_max_age_secs: Option<u64>,
}

impl MonitorSettings {
    pub fn validate(&self) -> Result<()> {
        let u = &self.upstream;
        if !(u.base_url.starts_with("http://") || u.base_url.starts_with("https://")) {
            bail!(
                "CONFIG_INVALID /upstream/base_url must be an http(s) URL, got '{}'",
                u.base_url
            );
        }
        if u.backfill_limit == 0 || u.incremental_limit == 0 {
            bail!("CONFIG_INVALID /upstream/*_limit must be > 0");
        }
        if u.chunk_size == 0 {
            bail!("CONFIG_INVALID /upstream/chunk_size must be > 0");
        }
        if self.daemon.addr.trim().is_empty() {
            bail!("CONFIG_INVALID /daemon/addr must not be empty");
        }
        Ok(())
    }
}
