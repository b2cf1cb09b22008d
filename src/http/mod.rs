//! HTTP front end.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, limits, timeout)
//!     → request.rs (request ID generation and lookup)
//!     → dispatch::Gateway (translation + legacy handler)
//!     → response.rs (JSON body or error envelope)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id, MakeUuidRequestId, X_REQUEST_ID};
pub use response::error_response;
pub use server::{AppState, HttpServer};
