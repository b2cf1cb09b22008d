//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the health and translation handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Strip the API base path and hand requests to the gateway
//! - Bind server to listener and stop on shutdown
//! - Observability (metrics, correlation IDs)

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::dispatch::{Gateway, InboundRequest};
use crate::error::GatewayError;
use crate::http::request::{request_id, MakeUuidRequestId};
use crate::http::response::{error_response, legacy_response};
use crate::lifecycle::wait_for_shutdown;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    /// Normalized base path; empty when the API is mounted at `/`.
    pub base_path: Arc<str>,
}

/// HTTP front end for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    pub fn new(config: GatewayConfig, gateway: Arc<Gateway>) -> Self {
        let base_path = config.api.base_path.trim_end_matches('/');
        let state = AppState {
            gateway,
            base_path: Arc::from(base_path),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let api_route = format!("{}/{{*path}}", state.base_path);

        Router::new()
            .route("/health", get(health_handler))
            .route(&api_route, any(translate_handler))
            .fallback(fallback_handler)
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeUuidRequestId))
    }

    /// A clone of the fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            base_path = %self.config.api.base_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Translates a v2 request and returns the legacy handler's response.
async fn translate_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers);

    let response = match body {
        Ok(body) => {
            let body = (!body.is_empty()).then_some(body);
            let mut inbound = InboundRequest::from_uri(method.clone(), &uri, body);
            let path = uri.path();
            inbound.path = path
                .strip_prefix(&*state.base_path)
                .unwrap_or(path)
                .to_string();

            tracing::debug!(
                request_id = %request_id,
                method = %method,
                path = %inbound.path,
                "Translating request"
            );

            match state.gateway.dispatch(&inbound).await {
                Ok(rsp) => legacy_response(rsp),
                Err(e) => {
                    if matches!(e, GatewayError::Handler(_)) {
                        tracing::error!(request_id = %request_id, error = %e, "Legacy handler failed");
                    }
                    e.into_response()
                }
            }
        }
        Err(rejection) => {
            tracing::warn!(request_id = %request_id, error = %rejection, "Failed to read body");
            error_response(rejection.status(), rejection.body_text())
        }
    };

    let status = response.status().as_u16();
    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %uri.path(),
        status,
        "Request completed"
    );
    metrics::record_request(method.as_str(), status, start);
    response
}

/// Anything outside the API base path.
async fn fallback_handler(method: Method, uri: Uri) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        GatewayError::RouteNotFound {
            method,
            path: uri.path().to_string(),
        }
        .to_string(),
    )
}
