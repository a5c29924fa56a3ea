use crate::{
    config::SchemaConfig,
    error::{SchemaResult, UnsupportedTypeError},
    introspect::{Introspect, TypeHandle},
    node::SchemaNode,
    overrides::{apply_overrides, SchemaOverrides},
    registry::SchemaRegistry,
    resolver::{IntrospectResolver, TypeResolver},
    synthesizer::Synthesizer,
    tracker::Tracker,
};
use indexmap::IndexMap;
use tracing::debug;

/// A type that needs a schema, with the annotations of its call site
#[derive(Debug, Clone)]
pub struct SchemaRequest {
    /// Call site label, e.g. `POST /users request`
    pub label: String,
    pub handle: TypeHandle,
    pub overrides: SchemaOverrides,
}

impl SchemaRequest {
    pub fn new(label: &str, handle: TypeHandle) -> Self {
        Self {
            label: label.to_string(),
            handle,
            overrides: SchemaOverrides::default(),
        }
    }

    /// Request the schema of `T`
    pub fn of<T: Introspect + ?Sized>(label: &str) -> Self {
        Self::new(label, TypeHandle::of::<T>())
    }

    pub fn with_overrides(mut self, overrides: SchemaOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Output of one successful generation pass
#[derive(Debug)]
pub struct GeneratedSchemas {
    /// Per call site schemas, overrides applied, in request order
    pub schemas: Vec<(String, SchemaNode)>,
    /// Canonical component schemas
    pub registry: SchemaRegistry,
    /// Types rendered as opaque schemas
    pub warnings: Vec<UnsupportedTypeError>,
}

impl GeneratedSchemas {
    /// Schema of the first request with this label
    pub fn schema_for(&self, label: &str) -> Option<&SchemaNode> {
        self.schemas
            .iter()
            .find(|(request, _)| request == label)
            .map(|(_, schema)| schema)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Component schemas for the `components/schemas` section
    pub fn components(&self) -> IndexMap<String, SchemaNode> {
        self.registry
            .entries()
            .map(|(name, node)| (name.to_string(), node.clone()))
            .collect()
    }
}

/// Schema generator for converting Rust types to OpenAPI schemas
pub struct SchemaGenerator<R: TypeResolver = IntrospectResolver> {
    config: SchemaConfig,
    resolver: R,
}

impl SchemaGenerator<IntrospectResolver> {
    /// Create a new schema generator
    pub fn new(config: SchemaConfig) -> Self {
        let resolver = IntrospectResolver::from_config(&config);
        Self { config, resolver }
    }
}

impl Default for SchemaGenerator<IntrospectResolver> {
    fn default() -> Self {
        Self::new(SchemaConfig::default())
    }
}

impl<R: TypeResolver> SchemaGenerator<R> {
    /// Create a schema generator backed by a custom resolver
    pub fn with_resolver(config: SchemaConfig, resolver: R) -> Self {
        Self { config, resolver }
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Run one generation pass over a set of requests.
    ///
    /// Each pass owns its tracker and registry, so passes never share
    /// state. A fatal error discards everything produced so far.
    pub fn generate(&self, requests: &[SchemaRequest]) -> SchemaResult<GeneratedSchemas> {
        self.config.validate()?;
        debug!(requests = requests.len(), "starting schema generation pass");

        let mut tracker = Tracker::new(self.config.naming);
        let mut registry = SchemaRegistry::new();
        let mut synthesizer = Synthesizer::new(&self.resolver, &self.config);
        let mut schemas = Vec::with_capacity(requests.len());

        for request in requests {
            let node = synthesizer.synthesize_handle(request.handle, &mut tracker, &mut registry)?;
            let node = self.apply_request_overrides(node, &request.overrides);
            schemas.push((request.label.clone(), node));
        }

        let warnings = synthesizer.into_warnings();
        debug!(
            components = registry.len(),
            warnings = warnings.len(),
            "schema generation pass complete"
        );

        Ok(GeneratedSchemas {
            schemas,
            registry,
            warnings,
        })
    }

    /// Run a pass for a single type
    pub fn generate_for<T: Introspect + ?Sized>(&self) -> SchemaResult<GeneratedSchemas> {
        self.generate(&[SchemaRequest::of::<T>(std::any::type_name::<T>())])
    }

    /// Schema of a single type handle, without the components it references
    pub fn generate_schema(&self, handle: TypeHandle) -> SchemaResult<SchemaNode> {
        let mut generated = self.generate(&[SchemaRequest::new(handle.type_name(), handle)])?;
        Ok(generated
            .schemas
            .pop()
            .map(|(_, schema)| schema)
            .unwrap_or_default())
    }

    fn apply_request_overrides(&self, node: SchemaNode, overrides: &SchemaOverrides) -> SchemaNode {
        if overrides.is_empty() {
            return node;
        }
        if self.config.include_examples {
            apply_overrides(&node, overrides)
        } else {
            apply_overrides(&node, &overrides.clone().without_examples())
        }
    }
}
