//! v2 → v1 API translation gateway.
//!
//! Structured v2 requests (path templates, JSON command bodies) are
//! rewritten into the flat query parameters a v1 handler expects and
//! dispatched to that handler.

// Translation core
pub mod command;
pub mod dispatch;
pub mod error;
pub mod mapping;
pub mod routing;

// Concrete API bundles
pub mod apis;

// Front end and cross-cutting concerns
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::GatewayConfig;
pub use dispatch::{Gateway, InboundRequest, LegacyHandler, LegacyRequest, LegacyResponse};
pub use error::{GatewayError, GatewayResult, HandlerError, RegistrationError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{EndpointRegistry, RegistryBuilder};

use std::sync::Arc;
use std::time::Duration;

use crate::config::LegacyMode;
use crate::dispatch::{EchoHandler, ForwardingHandler};

/// Legacy handler selected by `config.legacy`.
pub fn legacy_handler(config: &GatewayConfig) -> Result<Arc<dyn LegacyHandler>, url::ParseError> {
    Ok(match config.legacy.mode {
        LegacyMode::Echo => Arc::new(EchoHandler),
        LegacyMode::Forward => Arc::new(ForwardingHandler::new(
            &config.legacy.base_url,
            Duration::from_secs(config.legacy.timeout_secs),
        )?),
    })
}

/// Registry with every built-in API bundle fronting `handler`.
pub fn build_registry(handler: Arc<dyn LegacyHandler>) -> Result<EndpointRegistry, RegistrationError> {
    let mut builder = EndpointRegistry::builder();
    apis::register_shard_apis(&mut builder, handler)?;
    Ok(builder.build())
}
