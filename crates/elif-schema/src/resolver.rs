/*!
Type descriptor resolution.

[`TypeResolver`] is the seam between the engine and whatever supplies type
metadata. The default [`IntrospectResolver`] reads the [`TypeShape`]s that
types publish through [`Introspect`](crate::introspect::Introspect).
*/

use crate::{
    config::SchemaConfig,
    descriptor::{FieldDescriptor, Primitive, TypeDescriptor, TypeKind, UnionVariant},
    error::{SchemaError, SchemaResult, UnsupportedTypeError},
    identity::{short_name, TypeIdentity},
    introspect::{TypeHandle, TypeShape},
};
use std::collections::HashMap;

/// Capability that turns type handles into normalized descriptors.
///
/// Implementations must be deterministic: the same handle always yields a
/// structurally equal descriptor. Types without introspectable structure
/// are reported as [`SchemaError::UnsupportedType`].
pub trait TypeResolver {
    /// Resolve a handle into a descriptor
    fn resolve(&self, handle: TypeHandle) -> SchemaResult<TypeDescriptor>;

    /// Compute the canonical identity of a handle
    fn identity(&self, handle: TypeHandle) -> SchemaResult<TypeIdentity>;
}

/// Default resolver driven by [`TypeShape`] metadata
#[derive(Debug, Clone)]
pub struct IntrospectResolver {
    max_depth: usize,
    custom_mappings: HashMap<String, Primitive>,
}

/// A handle with its `Option`/`Box`/newtype wrappers peeled off
struct Unwrapped {
    handle: TypeHandle,
    shape: TypeShape,
    nullable: bool,
}

impl IntrospectResolver {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            custom_mappings: HashMap::new(),
        }
    }

    pub fn from_config(config: &SchemaConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            custom_mappings: config.custom_mappings.clone(),
        }
    }

    /// Map a type, by full or short name, to a fixed primitive
    pub fn with_mapping(mut self, type_name: &str, primitive: Primitive) -> Self {
        self.custom_mappings.insert(type_name.to_string(), primitive);
        self
    }

    fn mapping_for(&self, handle: TypeHandle) -> Option<Primitive> {
        let type_name = handle.type_name();
        self.custom_mappings
            .get(type_name)
            .or_else(|| self.custom_mappings.get(short_name(type_name)))
            .copied()
    }

    /// Peel nullable and transparent wrappers off a handle.
    ///
    /// A custom mapping stops the peeling so wrappers can be mapped as a whole.
    fn unwrap(&self, handle: TypeHandle) -> SchemaResult<Unwrapped> {
        let mut current = handle;
        let mut nullable = false;

        for _ in 0..=self.max_depth {
            if let Some(primitive) = self.mapping_for(current) {
                return Ok(Unwrapped {
                    handle: current,
                    shape: TypeShape::Primitive(primitive),
                    nullable,
                });
            }

            match current.shape() {
                TypeShape::Optional(inner) => {
                    nullable = true;
                    current = inner;
                }
                TypeShape::Transparent(inner) => current = inner,
                shape => {
                    return Ok(Unwrapped {
                        handle: current,
                        shape,
                        nullable,
                    })
                }
            }
        }

        Err(SchemaError::depth_exceeded(handle.type_name(), self.max_depth))
    }

    fn identity_at(&self, handle: TypeHandle, depth: usize) -> SchemaResult<TypeIdentity> {
        if depth > self.max_depth {
            return Err(SchemaError::depth_exceeded(handle.type_name(), self.max_depth));
        }

        let unwrapped = self.unwrap(handle)?;
        let identity = match &unwrapped.shape {
            TypeShape::Primitive(_) | TypeShape::Any | TypeShape::Opaque => {
                let type_name = unwrapped.handle.type_name();
                TypeIdentity::new(type_name, short_name(type_name))
            }
            TypeShape::Sequence { element, unique } => {
                let (base, name) = if *unique { ("set", "Set") } else { ("array", "Vec") };
                TypeIdentity::new(base, name).with_args(vec![self.identity_at(*element, depth + 1)?])
            }
            TypeShape::Map { key, value } => TypeIdentity::new("map", "Map").with_args(vec![
                self.identity_at(*key, depth + 1)?,
                self.identity_at(*value, depth + 1)?,
            ]),
            TypeShape::Struct(shape) => TypeIdentity::new(shape.path, shape.name)
                .with_args(self.generic_identities(&shape.generics, depth)?),
            TypeShape::Enum(shape) => TypeIdentity::new(shape.path, shape.name),
            TypeShape::Sealed(shape) => TypeIdentity::new(shape.path, shape.name)
                .with_args(self.generic_identities(&shape.generics, depth)?),
            TypeShape::Optional(_) | TypeShape::Transparent(_) => {
                unreachable!("wrappers are removed by unwrap")
            }
        };

        Ok(identity.with_nullable(unwrapped.nullable))
    }

    fn generic_identities(
        &self,
        generics: &[TypeHandle],
        depth: usize,
    ) -> SchemaResult<Vec<TypeIdentity>> {
        generics
            .iter()
            .map(|handle| self.identity_at(*handle, depth + 1))
            .collect()
    }
}

impl Default for IntrospectResolver {
    fn default() -> Self {
        Self::from_config(&SchemaConfig::default())
    }
}

impl TypeResolver for IntrospectResolver {
    fn resolve(&self, handle: TypeHandle) -> SchemaResult<TypeDescriptor> {
        let Unwrapped {
            handle: inner,
            shape,
            nullable,
        } = self.unwrap(handle)?;

        let kind = match shape {
            TypeShape::Primitive(primitive) => TypeKind::Primitive(primitive),
            TypeShape::Any => TypeKind::Unknown,
            TypeShape::Sequence { element, unique } => TypeKind::Array { element, unique },
            TypeShape::Map { key, value } => TypeKind::Map { key, value },
            TypeShape::Struct(shape) => {
                let fields = shape
                    .fields
                    .iter()
                    .map(|field| {
                        Ok(FieldDescriptor {
                            name: field.name.to_string(),
                            handle: field.handle,
                            required: !self.unwrap(field.handle)?.nullable,
                        })
                    })
                    .collect::<SchemaResult<Vec<_>>>()?;
                TypeKind::Object { fields }
            }
            TypeShape::Enum(shape) => TypeKind::Enum {
                constants: shape.constants.iter().map(|c| c.to_string()).collect(),
            },
            TypeShape::Sealed(shape) => TypeKind::Union {
                variants: shape
                    .variants
                    .iter()
                    .map(|variant| UnionVariant {
                        name: variant.name.to_string(),
                        handle: variant.handle,
                    })
                    .collect(),
                discriminator: shape.discriminator.map(str::to_string),
            },
            TypeShape::Opaque => {
                return Err(UnsupportedTypeError::new(
                    inner.type_name(),
                    "type exposes no introspectable structure",
                )
                .into());
            }
            TypeShape::Optional(_) | TypeShape::Transparent(_) => {
                unreachable!("wrappers are removed by unwrap")
            }
        };

        let identity = self.identity(handle)?;
        Ok(TypeDescriptor {
            name: identity.name().to_string(),
            identity,
            nullable,
            kind,
        })
    }

    fn identity(&self, handle: TypeHandle) -> SchemaResult<TypeIdentity> {
        self.identity_at(handle, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Document, Node, RawBuffer, Shape, Status, User};
    use std::collections::{BTreeSet, HashMap};

    fn resolver() -> IntrospectResolver {
        IntrospectResolver::default()
    }

    #[test]
    fn test_resolve_primitive() {
        let descriptor = resolver().resolve(TypeHandle::of::<String>()).unwrap();
        assert_eq!(descriptor.kind, TypeKind::Primitive(Primitive::String));
        assert!(!descriptor.nullable);
        assert_eq!(descriptor.name, "String");
    }

    #[test]
    fn test_resolve_unwraps_nullable_wrappers() {
        let descriptor = resolver()
            .resolve(TypeHandle::of::<Option<Box<Option<i64>>>>())
            .unwrap();
        assert_eq!(descriptor.kind, TypeKind::Primitive(Primitive::Int64));
        assert!(descriptor.nullable);
        assert!(descriptor.identity.is_nullable());
    }

    #[test]
    fn test_resolve_containers() {
        let descriptor = resolver().resolve(TypeHandle::of::<Vec<User>>()).unwrap();
        assert_eq!(
            descriptor.kind,
            TypeKind::Array {
                element: TypeHandle::of::<User>(),
                unique: false
            }
        );

        let descriptor = resolver()
            .resolve(TypeHandle::of::<BTreeSet<String>>())
            .unwrap();
        assert!(matches!(descriptor.kind, TypeKind::Array { unique: true, .. }));

        let descriptor = resolver()
            .resolve(TypeHandle::of::<HashMap<String, User>>())
            .unwrap();
        assert!(
            matches!(descriptor.kind, TypeKind::Map { value, .. } if value == TypeHandle::of::<User>())
        );
    }

    #[test]
    fn test_resolve_object_fields_in_declaration_order() {
        let descriptor = resolver().resolve(TypeHandle::of::<User>()).unwrap();
        let TypeKind::Object { fields } = descriptor.kind else {
            panic!("expected object descriptor");
        };

        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "age", "email", "tags"]);

        let required: Vec<_> = fields.iter().map(|f| f.required).collect();
        assert_eq!(required, vec![true, true, false, true]);
    }

    #[test]
    fn test_resolve_self_referential_object() {
        let descriptor = resolver().resolve(TypeHandle::of::<Node>()).unwrap();
        let TypeKind::Object { fields } = descriptor.kind else {
            panic!("expected object descriptor");
        };
        assert_eq!(fields[1].name, "next");
        assert!(!fields[1].required);
    }

    #[test]
    fn test_resolve_enum_and_union() {
        let descriptor = resolver().resolve(TypeHandle::of::<Status>()).unwrap();
        assert_eq!(
            descriptor.kind,
            TypeKind::Enum {
                constants: vec!["ACTIVE".to_string(), "INACTIVE".to_string()]
            }
        );

        let descriptor = resolver().resolve(TypeHandle::of::<Shape>()).unwrap();
        let TypeKind::Union {
            variants,
            discriminator,
        } = descriptor.kind
        else {
            panic!("expected union descriptor");
        };
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].name, "circle");
        assert_eq!(discriminator.as_deref(), Some("kind"));
    }

    #[test]
    fn test_resolve_opaque_type_is_unsupported() {
        let error = resolver()
            .resolve(TypeHandle::of::<RawBuffer>())
            .unwrap_err();
        assert!(matches!(error, SchemaError::UnsupportedType(_)));
        assert!(!error.is_fatal());
    }

    #[test]
    fn test_custom_mapping_rescues_opaque_type() {
        let resolver = resolver().with_mapping("RawBuffer", Primitive::Binary);
        let descriptor = resolver
            .resolve(TypeHandle::of::<Option<RawBuffer>>())
            .unwrap();
        assert_eq!(descriptor.kind, TypeKind::Primitive(Primitive::Binary));
        assert!(descriptor.nullable);
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let first = resolver().resolve(TypeHandle::of::<Document<User>>()).unwrap();
        let second = resolver().resolve(TypeHandle::of::<Document<User>>()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.identity.args().len(), 1);
        assert_eq!(first.identity.reference_candidate(), "Document_User");
    }

    #[test]
    fn test_surface_wrappers_share_identity() {
        let resolver = resolver();
        let plain = resolver.identity(TypeHandle::of::<User>()).unwrap();
        let boxed = resolver.identity(TypeHandle::of::<Box<User>>()).unwrap();
        let shared = resolver.identity(TypeHandle::of::<std::sync::Arc<User>>()).unwrap();
        assert_eq!(plain, boxed);
        assert_eq!(plain, shared);
    }

    #[test]
    fn test_generic_nesting_beyond_limit_fails() {
        let resolver = IntrospectResolver::new(2);
        let error = resolver
            .identity(TypeHandle::of::<Vec<Vec<Vec<Vec<String>>>>>())
            .unwrap_err();
        assert!(matches!(error, SchemaError::CycleDepthExceeded { limit: 2, .. }));
    }
}
