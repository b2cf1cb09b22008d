//! Endpoint registration and lookup.
//!
//! # Responsibilities
//! - Store endpoints keyed by (path template, method)
//! - Reject duplicate and ambiguous registrations at startup
//! - Look up the single endpoint for a concrete path + method
//!
//! # Design Decisions
//! - `RegistryBuilder` is the only mutator; `build()` freezes it
//! - Immutable after construction (thread-safe without locks)
//! - O(n) template scan per method (acceptable for typical route counts)
//! - Explicit RouteNotFound rather than silent default

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::http::Method;

use crate::command::CommandSchema;
use crate::dispatch::LegacyHandler;
use crate::error::{GatewayError, GatewayResult, RegistrationError};
use crate::routing::matcher::{PathTemplate, PathVars};

/// Declaration of an endpoint, consumed by [`RegistryBuilder::register_endpoint`].
#[derive(Debug, Clone)]
pub struct EndpointDef {
    name: Option<String>,
    template: String,
    method: Method,
    schema: Option<CommandSchema>,
    path_params: Vec<(String, String)>,
    constants: Vec<(String, String)>,
}

impl EndpointDef {
    pub fn new(method: Method, template: impl Into<String>) -> Self {
        Self {
            name: None,
            template: template.into(),
            method,
            schema: None,
            path_params: Vec::new(),
            constants: Vec::new(),
        }
    }

    /// Name used in logs and route listings.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn schema(mut self, schema: CommandSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Emit path variable `var` under the legacy name `legacy`.
    pub fn path_param(mut self, var: impl Into<String>, legacy: impl Into<String>) -> Self {
        self.path_params.push((var.into(), legacy.into()));
        self
    }

    /// Fixed legacy parameter added to every request of this endpoint.
    pub fn constant(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.constants.push((key.into(), value.into()));
        self
    }
}

/// A registered endpoint. Immutable once built.
pub struct Endpoint {
    name: String,
    template: PathTemplate,
    method: Method,
    schema: Option<CommandSchema>,
    path_params: Vec<(String, String)>,
    constants: Vec<(String, String)>,
    handler: Arc<dyn LegacyHandler>,
}

impl Endpoint {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template(&self) -> &PathTemplate {
        &self.template
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn schema(&self) -> Option<&CommandSchema> {
        self.schema.as_ref()
    }

    pub fn constants(&self) -> &[(String, String)] {
        &self.constants
    }

    pub fn handler(&self) -> &Arc<dyn LegacyHandler> {
        &self.handler
    }

    /// Legacy parameter name for a path variable.
    pub fn legacy_name<'a>(&'a self, var: &'a str) -> &'a str {
        self.path_params
            .iter()
            .find(|(v, _)| v == var)
            .map(|(_, legacy)| legacy.as_str())
            .unwrap_or(var)
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("name", &self.name)
            .field("method", &self.method)
            .field("template", &self.template.as_str())
            .field("commands", &self.schema.as_ref().map(|s| s.command_names().collect::<Vec<_>>()))
            .field("handler", &self.handler)
            .finish()
    }
}

/// Result of a successful lookup.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub endpoint: Arc<Endpoint>,
    pub vars: PathVars,
}

/// Collects endpoints during startup.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    endpoints: Vec<Arc<Endpoint>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `template` for `method`.
    pub fn register(
        &mut self,
        template: &str,
        method: Method,
        schema: Option<CommandSchema>,
        handler: Arc<dyn LegacyHandler>,
    ) -> Result<&mut Self, RegistrationError> {
        let mut def = EndpointDef::new(method, template);
        def.schema = schema;
        self.register_endpoint(def, handler)
    }

    /// Register a fully described endpoint.
    pub fn register_endpoint(
        &mut self,
        def: EndpointDef,
        handler: Arc<dyn LegacyHandler>,
    ) -> Result<&mut Self, RegistrationError> {
        let template = PathTemplate::parse(&def.template)?;

        for (var, _) in &def.path_params {
            if !template.variables().any(|v| v == var) {
                return Err(RegistrationError::InvalidTemplate {
                    template: template.to_string(),
                    reason: format!("no variable named '{}'", var),
                });
            }
        }

        for existing in self.endpoints.iter().filter(|e| e.method == def.method) {
            if existing.template == template {
                return Err(RegistrationError::DuplicateRegistration {
                    method: def.method.clone(),
                    template: template.to_string(),
                });
            }
            if existing.template.overlaps(&template) {
                return Err(RegistrationError::AmbiguousRegistration {
                    method: def.method.clone(),
                    template: template.to_string(),
                    existing: existing.template.to_string(),
                });
            }
        }

        let name = def
            .name
            .unwrap_or_else(|| format!("{} {}", def.method, template));
        tracing::debug!(endpoint = %name, method = %def.method, template = %template, "Registered endpoint");

        self.endpoints.push(Arc::new(Endpoint {
            name,
            template,
            method: def.method,
            schema: def.schema,
            path_params: def.path_params,
            constants: def.constants,
            handler,
        }));
        Ok(self)
    }

    /// Freeze the registry.
    pub fn build(self) -> EndpointRegistry {
        let mut by_method: HashMap<Method, Vec<usize>> = HashMap::new();
        for (idx, endpoint) in self.endpoints.iter().enumerate() {
            by_method.entry(endpoint.method.clone()).or_default().push(idx);
        }
        EndpointRegistry {
            endpoints: self.endpoints,
            by_method,
        }
    }
}

/// Immutable set of endpoints.
#[derive(Debug)]
pub struct EndpointRegistry {
    endpoints: Vec<Arc<Endpoint>>,
    by_method: HashMap<Method, Vec<usize>>,
}

impl EndpointRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Find the endpoint for `path` and `method`.
    pub fn lookup(&self, path: &str, method: &Method) -> GatewayResult<RouteMatch> {
        let not_found = || {
            tracing::debug!(method = %method, path = %path, "No endpoint matched");
            GatewayError::RouteNotFound {
                method: method.clone(),
                path: path.to_string(),
            }
        };

        let candidates = self.by_method.get(method).ok_or_else(not_found)?;
        // Registration rules out overlaps, so the first match is the only one.
        candidates
            .iter()
            .map(|&idx| &self.endpoints[idx])
            .find_map(|endpoint| {
                endpoint.template.matches(path).map(|vars| RouteMatch {
                    endpoint: Arc::clone(endpoint),
                    vars,
                })
            })
            .ok_or_else(not_found)
    }

    /// All endpoints in registration order.
    pub fn endpoints(&self) -> &[Arc<Endpoint>] {
        &self.endpoints
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::EchoHandler;

    fn handler() -> Arc<dyn LegacyHandler> {
        Arc::new(EchoHandler)
    }

    fn registry() -> EndpointRegistry {
        let mut builder = EndpointRegistry::builder();
        builder
            .register("/collections/{collection}/shards", Method::POST, None, handler())
            .unwrap()
            .register("/collections/{collection}/shards/{shard}", Method::POST, None, handler())
            .unwrap()
            .register("/collections/{collection}/shards/{shard}", Method::DELETE, None, handler())
            .unwrap()
            .register("/cluster", Method::GET, None, handler())
            .unwrap();
        builder.build()
    }

    #[test]
    fn test_lookup_resolves_single_endpoint() {
        let registry = registry();

        let m = registry
            .lookup("/collections/collName/shards/shardName", &Method::POST)
            .unwrap();
        assert_eq!(m.endpoint.template().as_str(), "/collections/{collection}/shards/{shard}");
        assert_eq!(m.endpoint.method(), &Method::POST);
        assert_eq!(
            m.vars,
            vec![
                ("collection".to_string(), "collName".to_string()),
                ("shard".to_string(), "shardName".to_string()),
            ]
        );

        let m = registry
            .lookup("/collections/collName/shards/shardName", &Method::DELETE)
            .unwrap();
        assert_eq!(m.endpoint.method(), &Method::DELETE);

        let m = registry.lookup("/collections/collName/shards", &Method::POST).unwrap();
        assert_eq!(m.endpoint.template().as_str(), "/collections/{collection}/shards");
    }

    #[test]
    fn test_lookup_not_found() {
        let registry = registry();
        let cases = [
            ("/collections/collName/shards", Method::GET),
            ("/collections/collName/shards", Method::DELETE),
            ("/collections/collName", Method::POST),
            ("/cluster/extra", Method::GET),
            ("/unknown", Method::PUT),
        ];
        for (path, method) in cases {
            match registry.lookup(path, &method) {
                Err(GatewayError::RouteNotFound { .. }) => {}
                other => panic!("{} {} should not resolve: {:?}", method, path, other),
            }
        }
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut builder = RegistryBuilder::new();
        builder.register("/a/{x}", Method::GET, None, handler()).unwrap();
        let err = builder
            .register("/a/{x}/", Method::GET, None, handler())
            .unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateRegistration { .. }));

        // Same template, different method is fine.
        assert!(builder.register("/a/{x}", Method::POST, None, handler()).is_ok());
    }

    #[test]
    fn test_ambiguous_registration_fails() {
        let mut builder = RegistryBuilder::new();
        builder.register("/a/{x}/b", Method::GET, None, handler()).unwrap();

        let err = builder
            .register("/a/{y}/b", Method::GET, None, handler())
            .unwrap_err();
        assert_eq!(
            err,
            RegistrationError::AmbiguousRegistration {
                method: Method::GET,
                template: "/a/{y}/b".into(),
                existing: "/a/{x}/b".into(),
            }
        );

        let err = builder
            .register("/a/literal/b", Method::GET, None, handler())
            .unwrap_err();
        assert!(matches!(err, RegistrationError::AmbiguousRegistration { .. }));

        assert!(builder.register("/a/{x}/c", Method::GET, None, handler()).is_ok());
        assert_eq!(builder.build().len(), 2);
    }

    #[test]
    fn test_path_param_must_exist() {
        let mut builder = RegistryBuilder::new();
        let def = EndpointDef::new(Method::GET, "/a/{x}").path_param("y", "why");
        assert!(matches!(
            builder.register_endpoint(def, handler()),
            Err(RegistrationError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn test_legacy_names() {
        let mut builder = RegistryBuilder::new();
        builder
            .register_endpoint(
                EndpointDef::new(Method::GET, "/c/{collection}/{shard}")
                    .name("shard-info")
                    .path_param("shard", "shard.id"),
                handler(),
            )
            .unwrap();
        let registry = builder.build();
        let endpoint = &registry.endpoints()[0];
        assert_eq!(endpoint.name(), "shard-info");
        assert_eq!(endpoint.legacy_name("shard"), "shard.id");
        assert_eq!(endpoint.legacy_name("collection"), "collection");
    }
}
