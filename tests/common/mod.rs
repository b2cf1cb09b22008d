//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use v2_gateway::dispatch::{Gateway, LegacyHandler, LegacyRequest, LegacyResponse};
use v2_gateway::mapping::FlatParamSet;
use v2_gateway::{build_registry, HandlerError};

/// Captures every legacy request it receives.
#[derive(Debug, Default)]
pub struct RecordingHandler {
    calls: Mutex<Vec<LegacyRequest>>,
}

impl RecordingHandler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<LegacyRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Params of the only call; panics unless exactly one call was made.
    pub fn single_params(&self) -> FlatParamSet {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one handler call");
        calls[0].params.clone()
    }
}

#[async_trait]
impl LegacyHandler for RecordingHandler {
    async fn handle_request(
        &self,
        req: &LegacyRequest,
        rsp: &mut LegacyResponse,
    ) -> Result<(), HandlerError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(req.clone());
        rsp.add("calls", calls.len());
        Ok(())
    }
}

/// Always fails with the given upstream status.
#[derive(Debug)]
pub struct FailingHandler(pub u16);

#[async_trait]
impl LegacyHandler for FailingHandler {
    async fn handle_request(
        &self,
        _req: &LegacyRequest,
        _rsp: &mut LegacyResponse,
    ) -> Result<(), HandlerError> {
        Err(HandlerError::Upstream {
            status: self.0,
            body: "legacy handler refused".into(),
        })
    }
}

/// Gateway with the shard APIs fronting `handler`.
pub fn shard_gateway(handler: Arc<dyn LegacyHandler>) -> Gateway {
    Gateway::new(build_registry(handler).unwrap())
}

/// Start a mock v1 endpoint on an ephemeral port.
///
/// Each request line (e.g. `GET /solr/admin/collections?action=... HTTP/1.1`)
/// is sent to the returned channel and answered with `response` as JSON.
pub async fn start_mock_legacy(
    status: u16,
    response: &'static str,
) -> (SocketAddr, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let tx = tx.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let head = String::from_utf8_lossy(&buf[..n]);
                if let Some(line) = head.lines().next() {
                    let _ = tx.send(line.to_string());
                }

                let reason = match status {
                    200 => "OK",
                    400 => "Bad Request",
                    500 => "Internal Server Error",
                    _ => "Unknown",
                };
                let reply = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    response.len(),
                    response
                );
                let _ = socket.write_all(reply.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, rx)
}
