//! Shard administration endpoints.
//!
//! ```text
//! POST   /collections/{collection}/shards                    create | split | add-replica
//! POST   /collections/{collection}/shards/{shard}            force-leader | sync-shard
//! DELETE /collections/{collection}/shards/{shard}            action=deleteshard
//! DELETE /collections/{collection}/shards/{shard}/{replica}  action=deletereplica
//! ```
//!
//! Every template is also served under the `/c/...` alias.

use std::sync::Arc;

use axum::http::Method;

use crate::command::{CommandSchema, CommandSpec, ACTION_PARAM};
use crate::dispatch::LegacyHandler;
use crate::error::RegistrationError;
use crate::routing::{EndpointDef, RegistryBuilder};

/// Collection path prefixes the bundle is mounted under.
pub const COLLECTION_PREFIXES: [&str; 2] = ["/collections", "/c"];

const CORE_PROPERTY_PREFIX: &str = "property.";

/// Commands accepted on `.../shards`.
pub fn shards_schema() -> CommandSchema {
    CommandSchema::new()
        .command(
            CommandSpec::new("create")
                .action("createshard")
                .param("shard")
                .csv("nodeSet", "createNodeSet")
                .params(&[
                    "followAliases",
                    "async",
                    "waitForFinalState",
                    "replicationFactor",
                    "nrtReplicas",
                    "tlogReplicas",
                    "pullReplicas",
                ])
                .flatten("coreProperties", CORE_PROPERTY_PREFIX),
        )
        .command(
            CommandSpec::new("split")
                .action("splitshard")
                .params(&[
                    "shard",
                    "ranges",
                    "splitKey",
                    "numSubShards",
                    "splitFuzz",
                    "timing",
                    "splitByPrefix",
                    "followAliases",
                    "splitMethod",
                    "async",
                    "waitForFinalState",
                ])
                .flatten("coreProperties", CORE_PROPERTY_PREFIX),
        )
        .command(
            CommandSpec::new("add-replica")
                .action("addreplica")
                .params(&[
                    "shard",
                    "_route_",
                    "node",
                    "name",
                    "instanceDir",
                    "dataDir",
                    "ulogDir",
                    "followAliases",
                    "async",
                    "waitForFinalState",
                    "skipNodeAssignment",
                    "type",
                    "nrtReplicas",
                    "tlogReplicas",
                    "pullReplicas",
                ])
                .csv("createNodeSet", "createNodeSet")
                .flatten("coreProperties", CORE_PROPERTY_PREFIX),
        )
}

/// Commands accepted on `.../shards/{shard}`.
pub fn shard_schema() -> CommandSchema {
    CommandSchema::new()
        .command(CommandSpec::new("force-leader").action("forceleader"))
        .command(CommandSpec::new("sync-shard").action("syncshard"))
}

/// Register the shard endpoints under every collection prefix.
pub fn register_shard_apis(
    builder: &mut RegistryBuilder,
    handler: Arc<dyn LegacyHandler>,
) -> Result<(), RegistrationError> {
    for prefix in COLLECTION_PREFIXES {
        let shards = format!("{prefix}/{{collection}}/shards");
        let shard = format!("{shards}/{{shard}}");
        let replica = format!("{shard}/{{replica}}");

        builder
            .register_endpoint(
                EndpointDef::new(Method::POST, shards.as_str())
                    .name(format!("shards.commands {prefix}"))
                    .schema(shards_schema()),
                handler.clone(),
            )?
            .register_endpoint(
                EndpointDef::new(Method::POST, shard.as_str())
                    .name(format!("shard.commands {prefix}"))
                    .schema(shard_schema()),
                handler.clone(),
            )?
            .register_endpoint(
                EndpointDef::new(Method::DELETE, shard.as_str())
                    .name(format!("shard.delete {prefix}"))
                    .constant(ACTION_PARAM, "deleteshard"),
                handler.clone(),
            )?
            .register_endpoint(
                EndpointDef::new(Method::DELETE, replica.as_str())
                    .name(format!("replica.delete {prefix}"))
                    .constant(ACTION_PARAM, "deletereplica"),
                handler.clone(),
            )?;
    }

    tracing::info!(prefixes = ?COLLECTION_PREFIXES, "Registered shard APIs");
    Ok(())
}
