//! Startup checks and the configuration banner.

use copilot_core::modules::credential_store::mask_credential;
use copilot_types::GatewayConfig;
use tracing::info;

/// Configuration combinations worth warning about before serving.
pub fn startup_warnings(config: &GatewayConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    if config.enable_super_token && config.super_tokens().is_empty() {
        warnings.push(
            "Super tokens are enabled but none are configured; the default credential is unreachable"
                .to_string(),
        );
    }
    if !config.copilot_token.is_empty() && !config.enable_super_token {
        warnings.push(
            "A default credential is configured without super tokens; every caller will use it"
                .to_string(),
        );
    }
    warnings.push(
        "This service is for personal use only. Do not share it or expose it publicly".to_string(),
    );
    warnings
}

fn masked_or_unset(value: &str) -> String {
    if value.is_empty() {
        "(unset)".to_string()
    } else {
        mask_credential(value)
    }
}

pub fn log_configuration(config: &GatewayConfig) {
    info!("Configuration:");
    info!("  bind address:   {}", config.bind_address());
    if config.cache {
        info!("  cache:          sqlite ({})", config.cache_path.display());
    } else {
        info!("  cache:          in-memory");
    }
    info!("  log level:      {}", config.effective_log_level());
    info!("  copilot token:  {}", masked_or_unset(&config.copilot_token));
    info!("  super tokens:   {} configured (enabled: {})", config.super_tokens().len(), config.enable_super_token);
    if config.rate_limit > 0 {
        info!("  rate limit:     {}/min", config.rate_limit);
    } else {
        info!("  rate limit:     unlimited");
    }
    info!("  token url:      {}", config.token_url);
    info!("  upstream url:   {}", config.upstream_url);
    info!("  sweep interval: {}s", config.sweep_interval_secs);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_only_personal_use_notice() {
        let warnings = startup_warnings(&GatewayConfig::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("personal use"));
    }

    #[test]
    fn test_super_tokens_enabled_without_tokens() {
        let config = GatewayConfig { enable_super_token: true, ..GatewayConfig::default() };
        assert_eq!(startup_warnings(&config).len(), 2);
    }

    #[test]
    fn test_default_credential_without_super_tokens() {
        let config =
            GatewayConfig { copilot_token: "ghu_x".to_string(), ..GatewayConfig::default() };
        assert!(startup_warnings(&config).iter().any(|w| w.contains("every caller")));
    }

    #[test]
    fn test_masking() {
        assert_eq!(masked_or_unset(""), "(unset)");
        assert_eq!(masked_or_unset("ghu_1234567"), "ghu_12***");
    }
}
