//! Response construction.
//!
//! Successful dispatches return the legacy response values as a JSON object.
//! Errors use one envelope:
//!
//! ```json
//! {"error": {"code": 400, "msg": "unknown parameter 'x' for command 'create'"}}
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::dispatch::LegacyResponse;
use crate::error::GatewayError;

/// Build the error envelope for `status`.
pub fn error_response(status: StatusCode, msg: impl Into<String>) -> Response {
    let body = json!({
        "error": {
            "code": status.as_u16(),
            "msg": msg.into(),
        }
    });
    (status, Json(body)).into_response()
}

pub fn legacy_response(rsp: LegacyResponse) -> Response {
    (StatusCode::OK, Json(Value::Object(rsp.into_values()))).into_response()
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), self.to_string())
    }
}
