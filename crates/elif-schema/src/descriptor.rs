/*!
Normalized, language-neutral type descriptions produced by the resolver.
*/

use crate::{identity::TypeIdentity, introspect::TypeHandle};
use serde::{Deserialize, Serialize};

/// Built-in primitive kinds with a fixed schema representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Primitive {
    String,
    Boolean,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Float,
    Double,
    Date,
    DateTime,
    Time,
    Uuid,
    Binary,
}

/// Fixed `(type, format)` pair of a primitive, plus its implied lower bound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitiveSpec {
    pub schema_type: &'static str,
    pub format: Option<&'static str>,
    pub minimum: Option<f64>,
}

impl PrimitiveSpec {
    const fn new(schema_type: &'static str, format: Option<&'static str>) -> Self {
        Self {
            schema_type,
            format,
            minimum: None,
        }
    }

    const fn unsigned(format: &'static str) -> Self {
        Self {
            schema_type: "integer",
            format: Some(format),
            minimum: Some(0.0),
        }
    }
}

impl Primitive {
    /// Static lookup table from primitive kind to schema representation
    pub const fn spec(self) -> PrimitiveSpec {
        match self {
            Primitive::String => PrimitiveSpec::new("string", None),
            Primitive::Boolean => PrimitiveSpec::new("boolean", None),
            Primitive::Int32 => PrimitiveSpec::new("integer", Some("int32")),
            Primitive::Int64 => PrimitiveSpec::new("integer", Some("int64")),
            Primitive::Uint32 => PrimitiveSpec::unsigned("int32"),
            Primitive::Uint64 => PrimitiveSpec::unsigned("int64"),
            Primitive::Float => PrimitiveSpec::new("number", Some("float")),
            Primitive::Double => PrimitiveSpec::new("number", Some("double")),
            Primitive::Date => PrimitiveSpec::new("string", Some("date")),
            Primitive::DateTime => PrimitiveSpec::new("string", Some("date-time")),
            Primitive::Time => PrimitiveSpec::new("string", Some("time")),
            Primitive::Uuid => PrimitiveSpec::new("string", Some("uuid")),
            Primitive::Binary => PrimitiveSpec::new("string", Some("binary")),
        }
    }
}

/// Normalized description of one type occurrence.
///
/// Member types (fields, elements, values, variants) are kept as lazy
/// [`TypeHandle`]s and resolved on demand, which is what lets a descriptor
/// describe a type that contains itself.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    pub identity: TypeIdentity,
    /// Display name
    pub name: String,
    pub nullable: bool,
    pub kind: TypeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Primitive(Primitive),
    Enum { constants: Vec<String> },
    Array { element: TypeHandle, unique: bool },
    Map { key: TypeHandle, value: TypeHandle },
    Object { fields: Vec<FieldDescriptor> },
    Union {
        variants: Vec<UnionVariant>,
        discriminator: Option<String>,
    },
    /// Accepts any value
    Unknown,
}

impl TypeKind {
    pub fn label(&self) -> &'static str {
        match self {
            TypeKind::Primitive(_) => "primitive",
            TypeKind::Enum { .. } => "enum",
            TypeKind::Array { .. } => "array",
            TypeKind::Map { .. } => "map",
            TypeKind::Object { .. } => "object",
            TypeKind::Union { .. } => "union",
            TypeKind::Unknown => "unknown",
        }
    }
}

/// A member field of an object type, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub handle: TypeHandle,
    /// False when the field type is nullable/optional
    pub required: bool,
}

/// One known subtype of a sealed hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct UnionVariant {
    /// Discriminator value for this variant
    pub name: String,
    pub handle: TypeHandle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_lookup_table() {
        let int = Primitive::Int32.spec();
        assert_eq!(int.schema_type, "integer");
        assert_eq!(int.format, Some("int32"));
        assert_eq!(int.minimum, None);

        let unsigned = Primitive::Uint64.spec();
        assert_eq!(unsigned.format, Some("int64"));
        assert_eq!(unsigned.minimum, Some(0.0));

        assert_eq!(Primitive::DateTime.spec().format, Some("date-time"));
        assert_eq!(Primitive::Binary.spec().schema_type, "string");
        assert_eq!(Primitive::Boolean.spec().format, None);
    }

    #[test]
    fn test_primitive_config_names() {
        let primitive: Primitive = serde_json::from_str("\"date-time\"").unwrap();
        assert_eq!(primitive, Primitive::DateTime);

        let primitive: Primitive = serde_json::from_str("\"uint32\"").unwrap();
        assert_eq!(primitive, Primitive::Uint32);
    }
}
