//! Command handling for v2 request bodies.
//!
//! # Data Flow
//! ```text
//! body bytes
//!     → parser.rs (JSON → ParsedCommand[])
//!     → validate.rs (names + shapes against the endpoint's CommandSchema)
//!     → mapping (translation rules)
//! ```
//!
//! # Design Decisions
//! - Schemas are declared at registration time and never change
//! - Parameter values are modelled by the recursive `ParamValue`
//! - A body carries exactly one command name; arrays are batches

pub mod parser;
pub mod schema;
pub mod validate;
pub mod value;

pub use parser::{parse_commands, ParsedCommand};
pub use schema::{CommandSchema, CommandSpec, TranslationRule, ACTION_PARAM};
pub use validate::validate_command;
pub use value::ParamValue;
