//! Gateway configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CACHE_PATH: &str = "db/cache.sqlite3";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_TOKEN_URL: &str = "https://api.github.com/copilot_internal/v2/token";
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.githubcopilot.com";
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;

/// Which credential store backend is active for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Durable SQLite table at the given path.
    Sqlite(PathBuf),
    /// Transient in-process map.
    Memory,
}

/// Fully resolved gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[allow(
    clippy::struct_excessive_bools,
    reason = "Configuration struct - bools are intentional feature flags"
)]
pub struct GatewayConfig {
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Use the durable table-backed store instead of the in-memory map.
    pub cache: bool,
    /// SQLite file for the durable store.
    pub cache_path: PathBuf,
    /// Force debug-level logging.
    pub debug: bool,
    /// Enable log output at all.
    pub logging: bool,
    /// Tracing filter directive.
    pub log_level: String,
    /// Server-wide default client credential.
    #[serde(default)]
    pub copilot_token: String,
    /// Gate the default credential behind super tokens.
    #[serde(default)]
    pub enable_super_token: bool,
    /// Comma-separated super tokens.
    #[serde(default)]
    pub super_token: String,
    /// Requests per minute on the API routes; 0 disables the limit.
    #[serde(default)]
    pub rate_limit: u32,
    /// Token issuance endpoint.
    pub token_url: String,
    /// Base URL of the chat/embeddings API.
    pub upstream_url: String,
    /// Cadence of the background expiry sweep.
    pub sweep_interval_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cache: true,
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            debug: false,
            logging: true,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            copilot_token: String::new(),
            enable_super_token: false,
            super_token: String::new(),
            rate_limit: 0,
            token_url: DEFAULT_TOKEN_URL.to_string(),
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
        }
    }
}

impl GatewayConfig {
    pub fn storage_backend(&self) -> StorageBackend {
        if self.cache {
            StorageBackend::Sqlite(self.cache_path.clone())
        } else {
            StorageBackend::Memory
        }
    }

    /// Parsed super-token set; empty unless the feature is enabled.
    pub fn super_tokens(&self) -> HashSet<String> {
        if !self.enable_super_token {
            return HashSet::new();
        }
        self.super_token
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Effective tracing filter after `debug`/`logging` overrides.
    pub fn effective_log_level(&self) -> &str {
        if !self.logging {
            "off"
        } else if self.debug {
            "debug"
        } else {
            &self.log_level
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
