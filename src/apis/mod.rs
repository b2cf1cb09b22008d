//! Concrete v2 API bundles.
//!
//! Each bundle registers a family of endpoints that front one legacy
//! handler. Bundles only declare templates, schemas and constants; all
//! translation happens in the generic pipeline.

pub mod shards;

pub use shards::register_shard_apis;
