//! Translation of validated commands into flat v1 parameters.
//!
//! # Data Flow
//! ```text
//! ParsedCommand + CommandSpec
//!     → mapper.rs (constants, then each parameter through its rule)
//!     → MappedCommand { action, FlatParamSet }
//! ```
//!
//! # Design Decisions
//! - Rules are total over validated input; shape errors are caught earlier
//! - Output order is deterministic: constants, then body order
//! - List values join with `,` and are not escaped

pub mod mapper;
pub mod params;

pub use mapper::{map_command, MappedCommand};
pub use params::FlatParamSet;
