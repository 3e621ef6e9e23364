use clap::{ArgAction, Parser};
use copilot_types::models::config::{
    DEFAULT_CACHE_PATH, DEFAULT_HOST, DEFAULT_LOG_LEVEL, DEFAULT_PORT, DEFAULT_SWEEP_INTERVAL_SECS,
    DEFAULT_TOKEN_URL, DEFAULT_UPSTREAM_URL,
};
use copilot_types::GatewayConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "copilot-server",
    about = "Copilot Gateway - OpenAI-compatible API in front of GitHub Copilot",
    version = env!("CARGO_PKG_VERSION"),
    author
)]
pub struct Cli {
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(short, long, env = "PORT", default_value_t = i64::from(DEFAULT_PORT), allow_negative_numbers = true)]
    pub port: i64,

    #[arg(long, env = "CACHE", default_value_t = true, action = ArgAction::Set, help = "Persist the credential cache in SQLite")]
    pub cache: bool,

    #[arg(long, env = "CACHE_PATH", default_value = DEFAULT_CACHE_PATH)]
    pub cache_path: PathBuf,

    #[arg(long, env = "DEBUG", default_value_t = false, action = ArgAction::Set)]
    pub debug: bool,

    #[arg(long, env = "LOGGING", default_value_t = true, action = ArgAction::Set)]
    pub logging: bool,

    #[arg(short, long, env = "LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    #[arg(long, env = "COPILOT_TOKEN", default_value = "", hide_env_values = true)]
    pub copilot_token: String,

    #[arg(long, env = "ENABLE_SUPER_TOKEN", default_value_t = false, action = ArgAction::Set)]
    pub enable_super_token: bool,

    #[arg(long, env = "SUPER_TOKEN", default_value = "", hide_env_values = true, help = "Comma-separated super tokens")]
    pub super_token: String,

    #[arg(long, env = "RATE_LIMIT", default_value_t = 0, help = "Requests per minute on the API routes (0 = unlimited)")]
    pub rate_limit: u32,

    #[arg(long, env = "TOKEN_URL", default_value = DEFAULT_TOKEN_URL)]
    pub token_url: String,

    #[arg(long, env = "UPSTREAM_URL", default_value = DEFAULT_UPSTREAM_URL)]
    pub upstream_url: String,

    #[arg(long, env = "SWEEP_INTERVAL_SECS", default_value_t = DEFAULT_SWEEP_INTERVAL_SECS)]
    pub sweep_interval_secs: u64,
}

/// Valid listen port, or the default plus a warning.
pub fn resolve_port(raw: i64) -> (u16, Option<String>) {
    match u16::try_from(raw) {
        Ok(port) if port != 0 => (port, None),
        _ => (
            DEFAULT_PORT,
            Some(format!("Invalid port {}, falling back to {}", raw, DEFAULT_PORT)),
        ),
    }
}

impl Cli {
    /// Resolved configuration plus warnings to log once tracing is up.
    pub fn into_config(self) -> (GatewayConfig, Vec<String>) {
        let (port, port_warning) = resolve_port(self.port);
        let config = GatewayConfig {
            host: self.host,
            port,
            cache: self.cache,
            cache_path: self.cache_path,
            debug: self.debug,
            logging: self.logging,
            log_level: self.log_level,
            copilot_token: self.copilot_token,
            enable_super_token: self.enable_super_token,
            super_token: self.super_token,
            rate_limit: self.rate_limit,
            token_url: self.token_url,
            upstream_url: self.upstream_url,
            sweep_interval_secs: self.sweep_interval_secs,
        };
        (config, port_warning.into_iter().collect())
    }
}
