//! Request assembly and dispatch.
//!
//! # Responsibilities
//! - Resolve the endpoint and path variables
//! - Parse, validate and map every command before any handler runs
//! - Merge path variables, query parameters and mapped commands
//! - Invoke the endpoint's handler once per command invocation
//!
//! # Design Decisions
//! - Precedence: path vars < query params < endpoint constants < command output
//! - No retries, timeouts or recovery; handler errors pass through
//! - Pure function of its input; no state survives a request

use std::sync::Arc;

use crate::command::{parse_commands, validate_command, ACTION_PARAM};
use crate::dispatch::request::{InboundRequest, LegacyRequest, LegacyResponse};
use crate::error::{GatewayError, GatewayResult};
use crate::mapping::{map_command, FlatParamSet};
use crate::observability::metrics;
use crate::routing::{Endpoint, EndpointRegistry, RouteMatch};

/// A fully translated request, ready to dispatch.
#[derive(Debug, Clone)]
pub struct Translation {
    pub endpoint: Arc<Endpoint>,
    /// One request per command invocation, or a single one without a body.
    pub requests: Vec<LegacyRequest>,
}

/// Translates v2 requests and dispatches them to legacy handlers.
#[derive(Debug, Clone)]
pub struct Gateway {
    registry: Arc<EndpointRegistry>,
}

impl Gateway {
    pub fn new(registry: EndpointRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    /// Run the full translation pipeline without invoking a handler.
    pub fn translate(&self, request: &InboundRequest) -> GatewayResult<Translation> {
        let route = self
            .registry
            .lookup(&request.path, &request.method)
            .inspect_err(|e| self.record_failure(request, "none", e))?;
        let endpoint = Arc::clone(&route.endpoint);

        let result = self.translate_route(request, route);
        match &result {
            Ok(_) => metrics::record_translation(endpoint.name(), "ok"),
            Err(e) => self.record_failure(request, endpoint.name(), e),
        }
        result
    }

    fn record_failure(&self, request: &InboundRequest, endpoint: &str, error: &GatewayError) {
        tracing::warn!(
            method = %request.method,
            path = %request.path,
            endpoint = %endpoint,
            error = %error,
            "Translation failed"
        );
        metrics::record_translation(endpoint, error.kind());
    }

    fn translate_route(
        &self,
        request: &InboundRequest,
        route: RouteMatch,
    ) -> GatewayResult<Translation> {
        let RouteMatch { endpoint, vars } = route;

        let commands = match &request.body {
            Some(body) => parse_commands(body)?,
            None => Vec::new(),
        };

        let mapped = commands
            .iter()
            .map(|command| {
                let spec = validate_command(command, endpoint.schema())?;
                Ok(map_command(command, spec))
            })
            .collect::<GatewayResult<Vec<_>>>()?;

        let mut base = FlatParamSet::new();
        for (var, value) in &vars {
            base.set(endpoint.legacy_name(var), value.as_str());
        }

        let mut query = FlatParamSet::new();
        for (key, value) in &request.query {
            query.add(key, value.as_str());
        }
        base.merge(&query);

        for (key, value) in endpoint.constants() {
            base.set(key, value.as_str());
        }

        let requests = if mapped.is_empty() {
            vec![LegacyRequest {
                method: request.method.clone(),
                params: base,
            }]
        } else {
            mapped
                .into_iter()
                .map(|m| {
                    let mut params = base.clone();
                    params.merge(&m.params);
                    LegacyRequest {
                        method: request.method.clone(),
                        params,
                    }
                })
                .collect()
        };

        tracing::debug!(
            endpoint = %endpoint.name(),
            invocations = requests.len(),
            "Translated request"
        );

        Ok(Translation { endpoint, requests })
    }

    /// Translate `request` and invoke the endpoint's handler.
    ///
    /// Handler calls share one response sink. A failing call stops the
    /// remaining invocations and its error is returned as-is.
    pub async fn dispatch(&self, request: &InboundRequest) -> GatewayResult<LegacyResponse> {
        let translation = self.translate(request)?;
        let endpoint = &translation.endpoint;
        let mut response = LegacyResponse::new();

        for legacy in &translation.requests {
            tracing::info!(
                endpoint = %endpoint.name(),
                method = %legacy.method,
                action = legacy.params.get(ACTION_PARAM).unwrap_or("-"),
                "Dispatching to legacy handler"
            );
            metrics::record_handler_invocation(endpoint.name());
            endpoint.handler().handle_request(legacy, &mut response).await?;
        }

        Ok(response)
    }
}
