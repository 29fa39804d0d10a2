//! HTTP POST delivery of trade events.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Request};
use tracing::debug;
use url::Url;

use super::signature::{sign, SIGNATURE_HEADER};
use crate::domain::event::TradeEvent;
use crate::error::{Result, SinkError};
use crate::port::{NotificationSink, SinkReceipt};

const USER_AGENT_VALUE: &str = concat!("tradewatch/", env!("CARGO_PKG_VERSION"));

/// Webhook endpoint parameters.
#[derive(Debug, Clone)]
pub struct WebhookSettings {
    pub url: Url,
    /// Shared secret for `X-Webhook-Signature`. Unsigned without one.
    pub secret: Option<String>,
    pub timeout: Duration,
}

/// [`NotificationSink`] posting JSON envelopes to a webhook URL.
pub struct WebhookSink {
    client: Client,
    settings: WebhookSettings,
}

impl WebhookSink {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(settings: WebhookSettings) -> Result<Self> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { client, settings })
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.settings.url
    }

    /// Build the POST request for `event` without sending it.
    ///
    /// The signature, when present, covers exactly the body bytes attached.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Encode`] if the event cannot be serialized.
    pub fn prepare(&self, event: &TradeEvent) -> std::result::Result<Request, SinkError> {
        let body = event
            .to_body()
            .map_err(|e| SinkError::Encode(e.to_string()))?;

        let mut builder = self
            .client
            .post(self.settings.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, USER_AGENT_VALUE);
        if let Some(secret) = &self.settings.secret {
            builder = builder.header(SIGNATURE_HEADER, sign(secret, &body)?);
        }

        builder
            .body(body)
            .build()
            .map_err(|e| SinkError::Encode(e.to_string()))
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    async fn send(&self, event: &TradeEvent) -> std::result::Result<SinkReceipt, SinkError> {
        let request = self.prepare(event)?;
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        debug!(
            trade_id = %event.data.trade.id,
            event = %event.event,
            status,
            "Webhook response"
        );
        if response.status().is_success() {
            Ok(SinkReceipt { status })
        } else {
            Err(SinkError::Rejected { status })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::webhook::verify;
    use crate::domain::trade::{EventKind, Trade};

    fn sink(secret: Option<&str>) -> WebhookSink {
        WebhookSink::new(WebhookSettings {
            url: Url::parse("https://hooks.example.com/trades").unwrap(),
            secret: secret.map(str::to_string),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn event() -> TradeEvent {
        TradeEvent::new(&Trade::new("t1", "OPEN"), EventKind::TradeOpen)
    }

    #[test]
    fn unsigned_request_has_no_signature_header() {
        let request = sink(None).prepare(&event()).unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
        assert!(request.headers().get(SIGNATURE_HEADER).is_none());
        assert!(request.headers()[USER_AGENT]
            .to_str()
            .unwrap()
            .starts_with("tradewatch/"));
    }

    #[test]
    fn signature_covers_exact_body_bytes() {
        let request = sink(Some("s3cret")).prepare(&event()).unwrap();

        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        let header = request.headers()[SIGNATURE_HEADER].to_str().unwrap();
        assert!(verify("s3cret", body, header));
    }
}
