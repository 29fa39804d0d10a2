//! Trade API REST client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use super::dto::PageResponse;
use crate::domain::trade::Trade;
use crate::error::{Result, SourceError};
use crate::port::{TradePage, TradeSource};

/// Connection parameters for the trade API.
#[derive(Debug, Clone)]
pub struct TradeApiSettings {
    pub base_url: Url,
    /// Sent as `api-token`. Requests go out unauthenticated without one.
    pub token: Option<String>,
    pub page_size: u32,
    pub timeout: Duration,
}

/// HTTP client for the paginated trade API.
pub struct TradeApiClient {
    client: Client,
    settings: TradeApiSettings,
}

impl TradeApiClient {
    /// Build a client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(settings: TradeApiSettings) -> Result<Self> {
        if settings.token.is_none() {
            warn!("API token not configured, trade API requests are unauthenticated");
        }
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("tradewatch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, settings })
    }

    fn request(&self, page: u32) -> reqwest::RequestBuilder {
        let mut request = self.client.get(self.settings.base_url.clone()).query(&[
            ("page", page),
            ("pageSize", self.settings.page_size),
        ]);
        if let Some(token) = &self.settings.token {
            request = request.header("api-token", token);
        }
        request
    }

    fn parse(page: u32, body: &[u8]) -> std::result::Result<TradePage, SourceError> {
        let response: PageResponse =
            serde_json::from_slice(body).map_err(|e| SourceError::Protocol {
                page,
                reason: format!("invalid JSON body: {e}"),
            })?;

        let records = response.data.ok_or_else(|| SourceError::Protocol {
            page,
            reason: "missing `data` array".into(),
        })?;
        let total_pages = response.last_page.ok_or_else(|| SourceError::Protocol {
            page,
            reason: "missing `lastPage`".into(),
        })?;

        let total_count = response.count.unwrap_or(records.len() as u64);
        let mut trades = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<Trade>(record) {
                Ok(trade) => trades.push(trade),
                Err(e) => warn!(page, index, error = %e, "Skipping unreadable trade record"),
            }
        }

        Ok(TradePage {
            total_count,
            trades,
            total_pages,
            current_page: response.current_page,
        })
    }
}

#[async_trait]
impl TradeSource for TradeApiClient {
    async fn fetch_page(&self, page: u32) -> std::result::Result<TradePage, SourceError> {
        let unavailable = |reason: String| SourceError::Unavailable { page, reason };

        let response = self
            .request(page)
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let status = response.status();
        debug!(page, status = status.as_u16(), "Trade API response");
        if !status.is_success() {
            return Err(unavailable(format!("HTTP {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| unavailable(e.to_string()))?;
        Self::parse(page, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_numeric_ids_and_extra_fields() {
        let body = br#"{
            "data": [{"id": 42, "status": "OPEN", "amount": 10.5, "extra": true}],
            "lastPage": 3,
            "count": 2500,
            "currentPage": 1
        }"#;

        let page = TradeApiClient::parse(1, body).unwrap();

        assert_eq!(page.trades[0].id.as_str(), "42");
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_count, 2500);
        assert_eq!(page.current_page, Some(1));
    }

    #[test]
    fn unreadable_record_is_skipped_not_fatal() {
        let body = br#"{
            "data": [
                {"id": "t1", "status": "OPEN", "isDemo": true},
                {"id": "t2", "status": "PENDING", "isDemo": 0, "fromBot": "1", "result": 12.5},
                {"id": "t3", "symbol": "EURUSD"},
                {"id": "t4", "status": "OPEN", "amount": "not a number"}
            ],
            "lastPage": 1,
            "count": 4
        }"#;

        let page = TradeApiClient::parse(1, body).unwrap();

        let ids: Vec<_> = page.trades.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2"]);
        assert_eq!(page.trades[1].is_demo, Some(false));
        assert_eq!(page.trades[1].from_bot, Some(true));
        assert_eq!(page.trades[1].result, Some(serde_json::json!(12.5)));
        assert_eq!(page.total_count, 4);
    }

    #[test]
    fn parse_rejects_missing_last_page() {
        let err = TradeApiClient::parse(2, br#"{"data": []}"#).unwrap_err();
        assert!(matches!(err, SourceError::Protocol { page: 2, .. }));
    }

    #[test]
    fn parse_rejects_missing_data() {
        let err = TradeApiClient::parse(1, br#"{"lastPage": 1}"#).unwrap_err();
        assert!(matches!(err, SourceError::Protocol { .. }));
    }

    #[test]
    fn parse_rejects_non_json() {
        let err = TradeApiClient::parse(1, b"<html>").unwrap_err();
        assert!(matches!(err, SourceError::Protocol { .. }));
    }
}
