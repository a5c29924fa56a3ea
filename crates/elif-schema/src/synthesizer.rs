/*!
Schema synthesis from type descriptors.

Primitives, arrays, maps and enums are emitted inline. Objects and sealed
unions are registered as named components and referenced, which is also what
breaks cycles: a self-referential member finds its component already in
progress and becomes a `$ref` instead of recursing again.

The depth limit counts inline nesting only. It restarts at every component,
so long chains of distinct types are not limited by it.
*/

use crate::{
    config::SchemaConfig,
    descriptor::{FieldDescriptor, Primitive, TypeDescriptor, TypeKind, UnionVariant},
    error::{SchemaError, SchemaResult, UnsupportedTypeError},
    introspect::TypeHandle,
    node::{Discriminator, SchemaNode, COMPONENTS_PREFIX},
    registry::SchemaRegistry,
    resolver::TypeResolver,
    tracker::{Entered, Tracker},
};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::warn;

/// Builds schema nodes, collecting non-fatal warnings along the way
pub struct Synthesizer<'a, R: TypeResolver + ?Sized> {
    resolver: &'a R,
    config: &'a SchemaConfig,
    warnings: Vec<UnsupportedTypeError>,
}

impl<'a, R: TypeResolver + ?Sized> Synthesizer<'a, R> {
    pub fn new(resolver: &'a R, config: &'a SchemaConfig) -> Self {
        Self {
            resolver,
            config,
            warnings: Vec::new(),
        }
    }

    /// Synthesize the schema of a type handle
    pub fn synthesize_handle(
        &mut self,
        handle: TypeHandle,
        tracker: &mut Tracker,
        registry: &mut SchemaRegistry,
    ) -> SchemaResult<SchemaNode> {
        self.node_for(handle, tracker, registry, 0)
    }

    /// Synthesize the schema of an already resolved descriptor
    pub fn synthesize(
        &mut self,
        descriptor: &TypeDescriptor,
        tracker: &mut Tracker,
        registry: &mut SchemaRegistry,
    ) -> SchemaResult<SchemaNode> {
        self.build(descriptor, tracker, registry, 0)
    }

    pub fn warnings(&self) -> &[UnsupportedTypeError] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<UnsupportedTypeError> {
        self.warnings
    }

    fn node_for(
        &mut self,
        handle: TypeHandle,
        tracker: &mut Tracker,
        registry: &mut SchemaRegistry,
        depth: usize,
    ) -> SchemaResult<SchemaNode> {
        if depth > self.config.max_depth {
            return Err(SchemaError::depth_exceeded(
                handle.type_name(),
                self.config.max_depth,
            ));
        }

        match self.resolver.resolve(handle) {
            Ok(descriptor) => self.build(&descriptor, tracker, registry, depth),
            Err(SchemaError::UnsupportedType(error)) => {
                self.record_warning(error);
                Ok(SchemaNode::any())
            }
            Err(error) => Err(error),
        }
    }

    fn build(
        &mut self,
        descriptor: &TypeDescriptor,
        tracker: &mut Tracker,
        registry: &mut SchemaRegistry,
        depth: usize,
    ) -> SchemaResult<SchemaNode> {
        let mut node = match &descriptor.kind {
            TypeKind::Primitive(primitive) => primitive_node(*primitive),
            TypeKind::Unknown => {
                self.record_warning(UnsupportedTypeError::new(
                    descriptor.identity.base(),
                    format!("{} type accepts any value", descriptor.kind.label()),
                ));
                SchemaNode::any()
            }
            TypeKind::Enum { constants } => SchemaNode {
                enum_values: constants.iter().cloned().map(Value::String).collect(),
                ..SchemaNode::of_type("string")
            },
            TypeKind::Array { element, unique } => {
                let items = self.node_for(*element, tracker, registry, depth + 1)?;
                SchemaNode {
                    items: Some(Box::new(items)),
                    unique_items: unique.then_some(true),
                    ..SchemaNode::of_type("array")
                }
            }
            // Keys are rendered as JSON object keys, so only the value schema matters.
            TypeKind::Map { value, .. } => {
                let values = self.node_for(*value, tracker, registry, depth + 1)?;
                SchemaNode {
                    additional_properties: Some(Box::new(values)),
                    ..SchemaNode::of_type("object")
                }
            }
            TypeKind::Object { .. } | TypeKind::Union { .. } => {
                self.component_reference(descriptor, tracker, registry)?
            }
        };

        if descriptor.nullable && self.config.nullable_optional {
            node.nullable = Some(true);
        }
        Ok(node)
    }

    fn record_warning(&mut self, error: UnsupportedTypeError) {
        warn!(
            type_name = %error.type_name,
            reason = %error.reason,
            "rendering type as an opaque schema"
        );
        self.warnings.push(error);
    }

    /// Register an object or union as a component (once per pass) and reference it
    fn component_reference(
        &mut self,
        descriptor: &TypeDescriptor,
        tracker: &mut Tracker,
        registry: &mut SchemaRegistry,
    ) -> SchemaResult<SchemaNode> {
        let key = descriptor.identity.non_null();
        let entered = tracker.enter(&key);

        if let Entered::Fresh(name) = &entered {
            registry.reserve(&key, name);
            let outcome = self
                .component_node(descriptor, tracker, registry)
                .and_then(|node| registry.register(&key, name, node));

            tracker.leave(&key, outcome.is_ok());
            if outcome.is_err() {
                registry.release(&key);
            }
            outcome?;
        }

        Ok(SchemaNode::reference_to(entered.name()))
    }

    /// Canonical schema of a component; members start again at depth zero
    fn component_node(
        &mut self,
        descriptor: &TypeDescriptor,
        tracker: &mut Tracker,
        registry: &mut SchemaRegistry,
    ) -> SchemaResult<SchemaNode> {
        match &descriptor.kind {
            TypeKind::Union {
                variants,
                discriminator,
            } => {
                let node =
                    self.union_node(variants, discriminator.as_deref(), tracker, registry, 0)?;
                Ok(SchemaNode {
                    title: Some(descriptor.name.clone()),
                    ..node
                })
            }
            TypeKind::Object { fields } => self.object_node(descriptor, fields, tracker, registry, 0),
            kind => unreachable!("{} schemas are emitted inline", kind.label()),
        }
    }

    fn object_node(
        &mut self,
        descriptor: &TypeDescriptor,
        fields: &[FieldDescriptor],
        tracker: &mut Tracker,
        registry: &mut SchemaRegistry,
        depth: usize,
    ) -> SchemaResult<SchemaNode> {
        let mut properties = IndexMap::with_capacity(fields.len());
        let mut required = Vec::new();

        for field in fields {
            let schema = self.node_for(field.handle, tracker, registry, depth + 1)?;
            if field.required {
                required.push(field.name.clone());
            }
            properties.insert(field.name.clone(), schema);
        }

        Ok(SchemaNode {
            title: Some(descriptor.name.clone()),
            properties,
            required,
            ..SchemaNode::of_type("object")
        })
    }

    fn union_node(
        &mut self,
        variants: &[UnionVariant],
        discriminator: Option<&str>,
        tracker: &mut Tracker,
        registry: &mut SchemaRegistry,
        depth: usize,
    ) -> SchemaResult<SchemaNode> {
        let mut one_of = Vec::with_capacity(variants.len());
        let mut mapping = IndexMap::new();

        for variant in variants {
            let schema = self.node_for(variant.handle, tracker, registry, depth + 1)?;
            if let Some(name) = schema.reference_name() {
                mapping.insert(
                    variant.name.clone(),
                    format!("{}{}", COMPONENTS_PREFIX, name),
                );
            }
            one_of.push(schema);
        }

        Ok(SchemaNode {
            one_of,
            discriminator: discriminator.map(|property| Discriminator {
                property_name: property.to_string(),
                mapping,
            }),
            ..Default::default()
        })
    }
}

fn primitive_node(primitive: Primitive) -> SchemaNode {
    let keywords = primitive.spec();
    SchemaNode {
        format: keywords.format.map(str::to_string),
        minimum: keywords.minimum,
        ..SchemaNode::of_type(keywords.schema_type)
    }
}
