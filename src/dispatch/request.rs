//! Request and response types on both sides of the gateway.

use std::fmt;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{Method, Uri};
use serde_json::{Map, Value};

use crate::error::HandlerError;
use crate::mapping::FlatParamSet;

/// A v2 request as seen by the gateway, independent of the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundRequest {
    pub method: Method,
    pub path: String,
    /// Query parameters in arrival order; keys may repeat.
    pub query: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl InboundRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Build from a request URI, decoding its query string.
    pub fn from_uri(method: Method, uri: &Uri, body: Option<Bytes>) -> Self {
        let query = uri
            .query()
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();
        Self {
            method,
            path: uri.path().to_string(),
            query,
            body,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// A v1-shaped request handed to a legacy handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyRequest {
    pub method: Method,
    pub params: FlatParamSet,
}

/// Response sink filled in by legacy handlers.
///
/// Named values keep insertion order; adding an existing name replaces it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyResponse {
    values: Map<String, Value>,
}

impl LegacyResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_values(self) -> Map<String, Value> {
        self.values
    }
}

/// A pre-existing v1 request handler.
///
/// The gateway calls it once per command invocation and never inspects or
/// alters what it writes to the response.
#[async_trait]
pub trait LegacyHandler: Send + Sync + fmt::Debug {
    async fn handle_request(
        &self,
        req: &LegacyRequest,
        rsp: &mut LegacyResponse,
    ) -> Result<(), HandlerError>;
}
