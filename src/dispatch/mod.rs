//! Request assembly and dispatch to legacy handlers.
//!
//! # Data Flow
//! ```text
//! InboundRequest (method, path, query, body?)
//!     → gateway.rs (lookup → parse → validate → map → assemble)
//!     → LegacyRequest[] (method + FlatParamSet)
//!     → LegacyHandler (handlers.rs or caller supplied)
//!     → LegacyResponse, returned untouched
//! ```

pub mod gateway;
pub mod handlers;
pub mod request;

pub use gateway::{Gateway, Translation};
pub use handlers::{EchoHandler, ForwardingHandler};
pub use request::{InboundRequest, LegacyHandler, LegacyRequest, LegacyResponse};
