//! axum router and handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use crate::error::{Error, Result};
use crate::port::{ControlAction, MonitorControl};

type Control = Arc<dyn MonitorControl>;

/// Build the control router around `control`.
pub fn router(control: Control) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/control/:action", post(control_action))
        .with_state(control)
}

/// Bind the control listener.
///
/// # Errors
/// Returns an error if the address cannot be bound.
pub async fn bind(addr: &str) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Connection(format!("failed to bind control server on {addr}: {e}")))
}

/// Serve until `shutdown` flips to `true`.
///
/// # Errors
/// Returns an error if the server fails while running.
pub async fn serve(
    listener: TcpListener,
    control: Control,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Control server listening");
    }
    axum::serve(listener, router(control))
        .with_graceful_shutdown(async move {
            while shutdown.changed().await.is_ok() {
                if *shutdown.borrow() {
                    break;
                }
            }
        })
        .await?;
    Ok(())
}

async fn health(State(control): State<Control>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "monitor": control.stats(),
    }))
}

async fn stats(State(control): State<Control>) -> Json<serde_json::Value> {
    Json(json!(control.stats()))
}

async fn control_action(State(control): State<Control>, Path(name): Path<String>) -> Response {
    let Some(action) = ControlAction::parse(&name) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("unknown action: {name}") })),
        )
            .into_response();
    };

    info!(action = %name, "Control action requested");
    // Runs detached: a start waits for its first scan and a stop for the
    // in-flight one, neither of which should hold the HTTP response.
    tokio::spawn(async move {
        match action {
            ControlAction::Start => control.start().await,
            ControlAction::Stop => control.stop().await,
            ControlAction::Restart => control.restart().await,
        }
    });

    Json(json!({ "message": action.acknowledgement() })).into_response()
}
