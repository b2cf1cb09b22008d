//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway and HTTP layer produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through the HTTP layer into log spans
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
