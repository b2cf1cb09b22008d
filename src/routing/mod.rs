//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (endpoint lookup by method)
//!     → matcher.rs (segment-by-segment template match)
//!     → Return: RouteMatch { endpoint, path vars } or RouteNotFound
//!
//! Registration (at startup):
//!     EndpointDef[]
//!     → Parse templates
//!     → Reject duplicates and overlapping templates per method
//!     → Freeze as immutable EndpointRegistry
//! ```
//!
//! # Design Decisions
//! - Endpoints registered at startup, immutable at runtime
//! - No regex in hot path (literal/variable segments only)
//! - Deterministic: at most one template can match a path per method

pub mod matcher;
pub mod router;

pub use matcher::{PathTemplate, PathVars, Segment};
pub use router::{Endpoint, EndpointDef, EndpointRegistry, RegistryBuilder, RouteMatch};
