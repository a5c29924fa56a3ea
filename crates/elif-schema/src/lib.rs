/*!
# elif-schema

Type-to-schema introspection engine for elif.rs OpenAPI generation.

This crate turns Rust type metadata into a normalized OpenAPI schema graph:
objects and unions become named components, cycles are broken with
references, and call-site annotations are merged onto copies without
touching the canonical components.

## Features

- Compile-time type metadata through `#[derive(Introspect)]`
- Generic instantiations resolved to distinct components
- Cycle-safe synthesis of self-referential and mutually recursive types
- Deterministic, declaration-ordered output
- Caller-local description, example and constraint overrides
- Non-fatal warnings for types without introspectable structure

## Usage

```rust,no_run
use elif_schema::{Introspect, SchemaConfig, SchemaGenerator, SchemaRequest};

#[derive(Introspect)]
struct User {
    name: String,
    email: Option<String>,
}

let generator = SchemaGenerator::new(SchemaConfig::default());
let generated = generator
    .generate(&[SchemaRequest::of::<User>("POST /users")])
    .unwrap();
let components = generated.components();
```
*/

// Re-export main types
pub use crate::{
    config::{NamingStrategy, SchemaConfig},
    descriptor::{FieldDescriptor, Primitive, TypeDescriptor, TypeKind, UnionVariant},
    error::{SchemaError, SchemaResult, UnsupportedTypeError},
    generator::{GeneratedSchemas, SchemaGenerator, SchemaRequest},
    identity::TypeIdentity,
    introspect::{
        EnumShape, FieldShape, Introspect, SealedShape, StructShape, TypeHandle, TypeShape,
        VariantShape,
    },
    node::{Discriminator, SchemaNode},
    overrides::{apply_overrides, ExampleMode, SchemaOverrides},
    registry::SchemaRegistry,
    resolver::{IntrospectResolver, TypeResolver},
    synthesizer::Synthesizer,
    tracker::{Entered, Tracker},
};

// Re-export the derive macro from the proc-macro crate
pub use elif_schema_derive::Introspect;

// Core modules
pub mod config;
pub mod error;
pub mod generator;

// Type metadata and resolution
pub mod descriptor;
pub mod identity;
pub mod introspect;
pub mod resolver;

// Schema synthesis
pub mod node;
pub mod overrides;
pub mod registry;
pub mod synthesizer;
pub mod tracker;

// Test utilities
#[cfg(test)]
mod test_utils;
