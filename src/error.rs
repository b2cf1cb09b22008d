//! Error types for registration, translation and dispatch.
//!
//! # Design Decisions
//! - Registration errors are fatal at startup and never reach request handling
//! - Every request-time error is raised before the first handler call
//! - Handler failures are carried through untouched

use axum::http::{Method, StatusCode};
use thiserror::Error;

/// Errors raised while building the endpoint registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("invalid path template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("endpoint {method} {template} is already registered")]
    DuplicateRegistration { method: Method, template: String },

    #[error("endpoint {method} {template} is ambiguous with already registered {existing}")]
    AmbiguousRegistration {
        method: Method,
        template: String,
        existing: String,
    },
}

/// Failure reported by a legacy handler.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// The upstream answered with a non-success status.
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("upstream transport error: {0}")]
    Transport(String),

    #[error("upstream request timed out")]
    Timeout,

    #[error("handler error: {0}")]
    Internal(String),
}

impl HandlerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            HandlerError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            HandlerError::Transport(_) => StatusCode::BAD_GATEWAY,
            HandlerError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            HandlerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Request-time errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("no endpoint for {method} {path}")]
    RouteNotFound { method: Method, path: String },

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("unknown command '{command}'")]
    UnknownCommand { command: String },

    #[error("unknown parameter '{parameter}' for command '{command}'")]
    UnknownParameter { command: String, parameter: String },

    #[error("parameter '{parameter}' of command '{command}' must be {expected}")]
    InvalidParameterShape {
        command: String,
        parameter: String,
        expected: &'static str,
    },

    #[error(transparent)]
    Handler(#[from] HandlerError),
}

impl GatewayError {
    /// HTTP status this error is surfaced as.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            GatewayError::MalformedBody(_)
            | GatewayError::UnknownCommand { .. }
            | GatewayError::UnknownParameter { .. }
            | GatewayError::InvalidParameterShape { .. } => StatusCode::BAD_REQUEST,
            GatewayError::Handler(e) => e.status_code(),
        }
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::RouteNotFound { .. } => "route_not_found",
            GatewayError::MalformedBody(_) => "malformed_body",
            GatewayError::UnknownCommand { .. } => "unknown_command",
            GatewayError::UnknownParameter { .. } => "unknown_parameter",
            GatewayError::InvalidParameterShape { .. } => "invalid_parameter_shape",
            GatewayError::Handler(_) => "handler",
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
