use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;
use tradewatch::adapter::outbound::trade_api::{TradeApiClient, TradeApiSettings};
use tradewatch::adapter::outbound::webhook::{WebhookSettings, WebhookSink};
use tradewatch::application::{fetch_snapshot, Dispatcher};
use tradewatch::domain::{EventKind, TradeEvent};
use tradewatch::error::{SinkError, SourceError};
use tradewatch::port::{NotificationSink, TradeSource};
use tradewatch::testkit::trade::trade;
use url::Url;

fn trade_api(server: &MockServer, token: Option<&str>) -> TradeApiClient {
    TradeApiClient::new(TradeApiSettings {
        base_url: Url::parse(&server.url("/token/trades")).unwrap(),
        token: token.map(str::to_string),
        page_size: 2,
        timeout: Duration::from_millis(300),
    })
    .unwrap()
}

fn webhook(server: &MockServer, secret: Option<&str>) -> WebhookSink {
    WebhookSink::new(WebhookSettings {
        url: Url::parse(&server.url("/hook")).unwrap(),
        secret: secret.map(str::to_string),
        timeout: Duration::from_millis(300),
    })
    .unwrap()
}

fn page_body(ids: &[&str], last_page: u32, page: u32) -> serde_json::Value {
    json!({
        "data": ids.iter().map(|id| json!({"id": id, "status": "OPEN", "amount": 25})).collect::<Vec<_>>(),
        "lastPage": last_page,
        "count": 5,
        "currentPage": page,
    })
}

#[tokio::test]
async fn trade_api_sends_token_and_pagination() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/token/trades")
                .query_param("page", "1")
                .query_param("pageSize", "2")
                .header("api-token", "tok");
            then.status(200).json_body(page_body(&["a", "b"], 1, 1));
        })
        .await;

    let page = trade_api(&server, Some("tok")).fetch_page(1).await.unwrap();

    mock.assert_async().await;
    assert_eq!(page.trades.len(), 2);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.total_count, 5);
}

#[tokio::test]
async fn trade_api_non_2xx_is_unavailable() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/token/trades");
            then.status(503);
        })
        .await;

    let err = trade_api(&server, None).fetch_page(1).await.unwrap_err();

    assert!(matches!(err, SourceError::Unavailable { page: 1, .. }));
}

#[tokio::test]
async fn trade_api_malformed_body_is_protocol_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/token/trades");
            then.status(200).json_body(json!({"items": []}));
        })
        .await;

    let err = trade_api(&server, None).fetch_page(1).await.unwrap_err();

    assert!(matches!(err, SourceError::Protocol { .. }));
}

#[tokio::test]
async fn snapshot_over_http_counts_timed_out_page() {
    let server = MockServer::start_async().await;
    for (page, ids) in [("1", vec!["t1", "t2"]), ("2", vec!["t3", "t4"])] {
        let body = page_body(&ids, 3, page.parse().unwrap());
        server
            .mock_async(move |when, then| {
                when.method(GET).path("/token/trades").query_param("page", page);
                then.status(200).json_body(body);
            })
            .await;
    }
    server
        .mock_async(|when, then| {
            when.method(GET).path("/token/trades").query_param("page", "3");
            then.status(200)
                .delay(Duration::from_secs(2))
                .json_body(page_body(&["late"], 3, 3));
        })
        .await;

    let source = trade_api(&server, None);
    let snapshot = fetch_snapshot(&source, 10).await.unwrap();

    let ids: Vec<_> = snapshot.trades.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "t2", "t3", "t4"]);
    assert_eq!(snapshot.failed_pages, 1);
}

#[tokio::test]
async fn webhook_posts_signed_envelope() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/hook")
                .header("content-type", "application/json")
                .header_exists("x-webhook-signature")
                .json_body_partial(r#"{"event": "TRADE_OPEN", "data": {"trade": {"id": "T1", "status": "OPEN"}}}"#);
            then.status(204);
        })
        .await;

    let sink = webhook(&server, Some("s3cret"));
    let event = TradeEvent::new(&trade("T1", "OPEN"), EventKind::TradeOpen);
    let receipt = sink.send(&event).await.unwrap();

    mock.assert_async().await;
    assert_eq!(receipt.status, 204);
}

#[tokio::test]
async fn webhook_non_2xx_is_rejected() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/hook");
            then.status(500);
        })
        .await;

    let event = TradeEvent::new(&trade("T1", "OPEN"), EventKind::TradeOpen);
    let err = webhook(&server, None).send(&event).await.unwrap_err();

    assert_eq!(err, SinkError::Rejected { status: 500 });
}

#[tokio::test]
async fn webhook_timeout_is_transport_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/hook");
            then.status(200).delay(Duration::from_secs(2));
        })
        .await;

    let event = TradeEvent::new(&trade("T1", "OPEN"), EventKind::TradeOpen);
    let err = webhook(&server, None).send(&event).await.unwrap_err();

    assert!(matches!(err, SinkError::Transport(_)));
}

#[tokio::test]
async fn dispatcher_retries_against_real_endpoint() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/hook");
            then.status(502);
        })
        .await;

    let dispatcher = Dispatcher::new(Arc::new(webhook(&server, None)));
    let outcome = dispatcher
        .deliver_with_retry(&trade("T1", "OPEN"), EventKind::TradeOpen, 2)
        .await;

    mock.assert_hits_async(2).await;
    assert!(!outcome.success);
    assert_eq!(outcome.status, Some(502));
    assert_eq!(outcome.attempts, 2);
}
