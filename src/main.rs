//! v2 API gateway
//!
//! Serves the v2 administration API and translates every request into the
//! flat v1 form before handing it to a legacy handler.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────▶ http server ──▶ routing ──▶ command parse/validate ──▶ mapping
//!                 (axum)          (registry)   (CommandSchema)             (FlatParamSet)
//!                                                                              │
//!     Client Response                                                          ▼
//!     ◀────────── http response ◀──────────── LegacyResponse ◀──────── legacy handler
//!                                                                     (echo | forward)
//! ```
//!
//! The configuration file path is the first argument, or `GATEWAY_CONFIG`.
//! Without either, defaults are used.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;

use v2_gateway::config::{load_config, GatewayConfig};
use v2_gateway::dispatch::Gateway;
use v2_gateway::lifecycle::{shutdown_on_signal, Shutdown};
use v2_gateway::observability::{logging, metrics};
use v2_gateway::{build_registry, legacy_handler, HttpServer};

fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("GATEWAY_CONFIG").map(PathBuf::from))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = config_path();
    let config = match &path {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    logging::init(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?path,
        bind_address = %config.listener.bind_address,
        legacy_mode = ?config.legacy.mode,
        request_timeout_secs = config.timeouts.request_secs,
        "v2-gateway starting"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let handler = legacy_handler(&config)?;
    let registry = build_registry(handler)?;
    for endpoint in registry.endpoints() {
        tracing::debug!(
            endpoint = %endpoint.name(),
            method = %endpoint.method(),
            template = %endpoint.template(),
            "Endpoint ready"
        );
    }
    let gateway = Arc::new(Gateway::new(registry));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(shutdown_on_signal(shutdown));

    let server = HttpServer::new(config, gateway);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
