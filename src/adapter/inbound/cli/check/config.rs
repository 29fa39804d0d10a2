//! `tradewatch check config`.

use std::path::Path;

use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Validate configuration without starting the monitor.
///
/// # Errors
/// Returns the validation error when the configuration is unusable.
pub fn execute(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!("Checking configuration: {}", config_path.display());
    } else {
        println!(
            "No config file at {}, using defaults and environment",
            config_path.display()
        );
    }
    println!();

    let config = Config::load_or_default(config_path)?;
    println!("✓ Configuration is valid");
    println!();
    for line in summary(&config) {
        println!("  {line}");
    }
    println!();

    if config.source.token.is_none() {
        println!("⚠ API_TOKEN not set; trade API requests will be unauthenticated");
    }
    if config.webhook.url.is_none() {
        println!("⚠ No webhook URL; trades will be detected but not delivered");
    } else if config.webhook.secret.is_none() {
        println!("  WEBHOOK_SECRET not set; deliveries will be unsigned");
    }
    Ok(())
}

fn summary(config: &Config) -> Vec<String> {
    vec![
        format!("Source: {}", config.source.base_url),
        format!(
            "Page size: {} (max {} concurrent)",
            config.source.page_size, config.source.max_concurrent_pages
        ),
        format!("Interval: {} ms", config.monitor.interval_ms),
        format!(
            "Webhook: {}",
            config.webhook.url.as_deref().unwrap_or("(not configured)")
        ),
        format!("Max attempts: {}", config.webhook.max_attempts),
        format!(
            "Dedup: {:?} (ttl {}s, max {} entries)",
            config.dedup.backend, config.dedup.ttl_secs, config.dedup.max_entries
        ),
        if config.server.enabled {
            format!("Control server: {}", config.server.bind)
        } else {
            "Control server: disabled".to_string()
        },
    ]
}
