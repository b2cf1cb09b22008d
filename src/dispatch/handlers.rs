//! Built-in legacy handlers.
//!
//! - `EchoHandler` writes the translated request back into the response
//!   (dry-run mode).
//! - `ForwardingHandler` re-issues the translated request to an upstream
//!   v1 endpoint over HTTP.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Uri};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use serde_json::{json, Value};
use url::Url;

use crate::dispatch::request::{LegacyHandler, LegacyRequest, LegacyResponse};
use crate::error::HandlerError;
use crate::mapping::FlatParamSet;

/// Upper bound on an upstream response body.
const MAX_UPSTREAM_BODY: usize = 16 * 1024 * 1024;

/// Records each translated request under `requests` in the response.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

#[async_trait]
impl LegacyHandler for EchoHandler {
    async fn handle_request(
        &self,
        req: &LegacyRequest,
        rsp: &mut LegacyResponse,
    ) -> Result<(), HandlerError> {
        let entry = json!({
            "method": req.method.as_str(),
            "params": req.params,
        });
        let mut requests = match rsp.get("requests") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };
        requests.push(entry);
        rsp.add("requests", requests);
        Ok(())
    }
}

/// Sends translated requests to a v1 endpoint.
#[derive(Clone)]
pub struct ForwardingHandler {
    base_url: Url,
    timeout: Duration,
    client: Client<HttpConnector, Body>,
}

impl ForwardingHandler {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, url::ParseError> {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Ok(Self {
            base_url: Url::parse(base_url)?,
            timeout,
            client,
        })
    }

    /// Upstream URL carrying `params` as its query string.
    pub fn request_url(&self, params: &FlatParamSet) -> Url {
        let mut url = self.base_url.clone();
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        url
    }
}

impl fmt::Debug for ForwardingHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForwardingHandler")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[async_trait]
impl LegacyHandler for ForwardingHandler {
    async fn handle_request(
        &self,
        req: &LegacyRequest,
        rsp: &mut LegacyResponse,
    ) -> Result<(), HandlerError> {
        let url = self.request_url(&req.params);
        let uri: Uri = url
            .as_str()
            .parse()
            .map_err(|e: axum::http::uri::InvalidUri| HandlerError::Internal(e.to_string()))?;

        let upstream = Request::builder()
            .method(req.method.clone())
            .uri(uri)
            .body(Body::empty())
            .map_err(|e| HandlerError::Internal(e.to_string()))?;

        tracing::debug!(method = %req.method, url = %url, "Forwarding to legacy endpoint");

        let response = tokio::time::timeout(self.timeout, self.client.request(upstream))
            .await
            .map_err(|_| HandlerError::Timeout)?
            .map_err(|e| HandlerError::Transport(e.to_string()))?;

        let status = response.status();
        let bytes = axum::body::to_bytes(Body::new(response.into_body()), MAX_UPSTREAM_BODY)
            .await
            .map_err(|e| HandlerError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(HandlerError::Upstream {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => {
                for (name, value) in map {
                    rsp.add(name, value);
                }
            }
            Ok(other) => rsp.add("response", other),
            Err(_) => rsp.add("response", String::from_utf8_lossy(&bytes).into_owned()),
        }
        Ok(())
    }
}
