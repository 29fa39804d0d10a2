//! Handler for the `run` command.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info};

use super::command::RunArgs;
use crate::adapter::inbound::http;
use crate::error::Result;
use crate::infrastructure::bootstrap::build_monitor;
use crate::infrastructure::config::logging::LogFormat;
use crate::infrastructure::config::settings::Config;
use crate::port::MonitorControl;

/// Execute the run command.
///
/// Startup failures (invalid config, unopenable dedup backend, unbindable
/// control port) are returned; everything after startup is contained.
///
/// # Errors
/// Returns an error if startup fails.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let mut config = Config::load_or_default(&args.config)?;
    apply_overrides(&mut config, args);
    config.init_logging();

    info!(version = env!("CARGO_PKG_VERSION"), "tradewatch starting");

    let monitor = build_monitor(&config)?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let server = if config.server.enabled {
        let listener = http::bind(&config.server.bind).await?;
        let control: Arc<dyn MonitorControl> = Arc::new(monitor.clone());
        Some(tokio::spawn(http::serve(listener, control, shutdown_rx)))
    } else {
        None
    };

    // A signal during the first scan drops `start`; `stop` below still
    // flushes whatever was delivered before the cut.
    tokio::select! {
        () = monitor.start() => {
            shutdown_signal().await;
        }
        () = shutdown_signal() => {}
    }
    info!("Shutdown signal received");

    monitor.stop().await;
    let _ = shutdown_tx.send(true);
    if let Some(server) = server {
        match server.await {
            Ok(Err(e)) => error!(error = %e, "Control server failed"),
            Err(e) => error!(error = %e, "Control server task panicked"),
            Ok(Ok(())) => {}
        }
    }

    info!("tradewatch stopped");
    Ok(())
}

fn apply_overrides(config: &mut Config, args: &RunArgs) {
    if let Some(level) = &args.log_level {
        config.logging.level.clone_from(level);
    }
    if args.json_logs {
        config.logging.format = LogFormat::Json;
    }
    if args.no_server {
        config.server.enabled = false;
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
