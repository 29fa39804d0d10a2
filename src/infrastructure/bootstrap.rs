//! Infrastructure bootstrap helpers for runtime wiring.
//!
//! The composition root: every adapter is constructed here once and handed to
//! the application layer. Nothing downstream reaches for globals.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use url::Url;

use crate::adapter::outbound::file::FileDeliveredLog;
use crate::adapter::outbound::sqlite::SqliteDeliveredLog;
use crate::adapter::outbound::trade_api::{TradeApiClient, TradeApiSettings};
use crate::adapter::outbound::webhook::{WebhookSettings, WebhookSink};
use crate::application::{DedupStore, Dispatcher, Monitor};
use crate::error::Result;
use crate::infrastructure::config::dedup::{DedupBackend, DedupConfig};
use crate::infrastructure::config::settings::Config;
use crate::port::{DeliveredLog, DisabledSink, NotificationSink, TradeSource};

/// Build the trade API client.
///
/// # Errors
/// Returns an error if the URL is invalid or the HTTP client cannot be built.
pub fn build_source(config: &Config) -> Result<TradeApiClient> {
    TradeApiClient::new(TradeApiSettings {
        base_url: Url::parse(&config.source.base_url)?,
        token: config.source.token.clone(),
        page_size: config.source.page_size,
        timeout: Duration::from_millis(config.source.timeout_ms),
    })
}

/// Build the webhook sink, or `None` when no URL is configured.
///
/// # Errors
/// Returns an error if the URL is invalid or the HTTP client cannot be built.
pub fn build_webhook(config: &Config) -> Result<Option<WebhookSink>> {
    let Some(url) = &config.webhook.url else {
        return Ok(None);
    };
    let sink = WebhookSink::new(WebhookSettings {
        url: Url::parse(url)?,
        secret: config.webhook.secret.clone(),
        timeout: Duration::from_millis(config.webhook.timeout_ms),
    })?;
    Ok(Some(sink))
}

/// Build the notification sink, degrading to [`DisabledSink`] without a URL.
///
/// # Errors
/// Returns an error if a configured webhook cannot be built.
pub fn build_sink(config: &Config) -> Result<Arc<dyn NotificationSink>> {
    match build_webhook(config)? {
        Some(sink) => {
            info!(url = %sink.url(), signed = config.webhook.secret.is_some(), "Webhook configured");
            Ok(Arc::new(sink))
        }
        None => {
            warn!("WEBHOOK_URL not configured, trade events will not be delivered");
            Ok(Arc::new(DisabledSink))
        }
    }
}

/// Open the durable log selected by `config`, if any.
///
/// # Errors
/// Returns an error if the SQLite database cannot be opened or migrated.
pub fn build_delivered_log(config: &DedupConfig) -> Result<Option<Box<dyn DeliveredLog>>> {
    let log: Box<dyn DeliveredLog> = match config.backend {
        DedupBackend::Memory => return Ok(None),
        DedupBackend::File => Box::new(FileDeliveredLog::new(&config.path)),
        DedupBackend::Sqlite => {
            if let Some(parent) = std::path::Path::new(&config.path)
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
            {
                std::fs::create_dir_all(parent)?;
            }
            Box::new(SqliteDeliveredLog::open(&config.path)?)
        }
    };
    Ok(Some(log))
}

/// Build the dedup store, rehydrating from the durable backend.
///
/// # Errors
/// Returns an error if the backend cannot be opened or read.
pub fn build_dedup_store(config: &DedupConfig) -> Result<DedupStore> {
    match build_delivered_log(config)? {
        Some(log) => DedupStore::open(config.ttl(), config.max_entries, log),
        None => Ok(DedupStore::new(config.ttl(), config.max_entries)),
    }
}

/// Wire every component into a [`Monitor`].
///
/// # Errors
/// Returns an error if any adapter cannot be constructed.
pub fn build_monitor(config: &Config) -> Result<Monitor> {
    let source: Arc<dyn TradeSource> = Arc::new(build_source(config)?);
    let dispatcher = Dispatcher::new(build_sink(config)?);
    let dedup = Arc::new(build_dedup_store(&config.dedup)?);

    info!(
        source = %config.source.base_url,
        page_size = config.source.page_size,
        dedup_backend = dedup.stats().backend,
        "Monitor components initialized"
    );

    Ok(Monitor::new(
        source,
        dispatcher,
        dedup,
        config.monitor_settings(),
    ))
}
