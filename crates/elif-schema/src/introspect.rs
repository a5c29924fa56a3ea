/*!
Compile-time type metadata.

Types describe themselves one level deep through the [`Introspect`] trait,
normally via `#[derive(Introspect)]`. Member types are referenced through
[`TypeHandle`]s, which are plain function pointers, so a type can mention
itself without the metadata ever being expanded recursively.
*/

use crate::descriptor::Primitive;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Trait for types that can describe their structure to the schema resolver
pub trait Introspect: 'static {
    /// One-level description of this type
    fn shape() -> TypeShape;
}

/// Opaque, copyable handle to an introspectable type
#[derive(Clone, Copy)]
pub struct TypeHandle {
    type_name: &'static str,
    shape: fn() -> TypeShape,
}

impl TypeHandle {
    pub fn of<T: Introspect + ?Sized>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            shape: T::shape,
        }
    }

    /// Full Rust type name
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn shape(&self) -> TypeShape {
        (self.shape)()
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeHandle").field(&self.type_name).finish()
    }
}

// Handles compare by type name; two handles to the same type always agree.
impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
    }
}

impl Eq for TypeHandle {}

/// Raw, un-normalized description of a type
#[derive(Debug, Clone)]
pub enum TypeShape {
    Primitive(Primitive),
    /// Any JSON value
    Any,
    /// `Option<T>`-like wrapper
    Optional(TypeHandle),
    /// Wrapper with the same wire shape as its inner type (`Box<T>`, newtypes)
    Transparent(TypeHandle),
    Sequence { element: TypeHandle, unique: bool },
    Map { key: TypeHandle, value: TypeHandle },
    Struct(StructShape),
    Enum(EnumShape),
    Sealed(SealedShape),
    /// No introspectable structure
    Opaque,
}

/// Object type with named fields
#[derive(Debug, Clone)]
pub struct StructShape {
    /// Fully qualified path, used for identity
    pub path: &'static str,
    /// Display name
    pub name: &'static str,
    pub generics: Vec<TypeHandle>,
    /// Fields in declaration order
    pub fields: Vec<FieldShape>,
}

impl StructShape {
    pub fn new(path: &'static str, name: &'static str) -> Self {
        Self {
            path,
            name,
            generics: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn with_generic(mut self, handle: TypeHandle) -> Self {
        self.generics.push(handle);
        self
    }

    pub fn with_field(mut self, name: &'static str, handle: TypeHandle) -> Self {
        self.fields.push(FieldShape::new(name, handle));
        self
    }
}

#[derive(Debug, Clone)]
pub struct FieldShape {
    pub name: &'static str,
    pub handle: TypeHandle,
}

impl FieldShape {
    pub fn new(name: &'static str, handle: TypeHandle) -> Self {
        Self { name, handle }
    }
}

/// Enum with unit constants only
#[derive(Debug, Clone)]
pub struct EnumShape {
    pub path: &'static str,
    pub name: &'static str,
    /// Constant names in declaration order
    pub constants: Vec<&'static str>,
}

/// Closed polymorphic hierarchy
#[derive(Debug, Clone)]
pub struct SealedShape {
    pub path: &'static str,
    pub name: &'static str,
    pub generics: Vec<TypeHandle>,
    pub variants: Vec<VariantShape>,
    /// Property that tells variants apart, if any
    pub discriminator: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub struct VariantShape {
    pub name: &'static str,
    pub handle: TypeHandle,
}

impl VariantShape {
    pub fn new(name: &'static str, handle: TypeHandle) -> Self {
        Self { name, handle }
    }
}

macro_rules! impl_primitive {
    ($primitive:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl Introspect for $ty {
                fn shape() -> TypeShape {
                    TypeShape::Primitive($primitive)
                }
            }
        )+
    };
}

impl_primitive!(Primitive::String => String, str, char, std::path::PathBuf);
impl_primitive!(Primitive::Boolean => bool);
impl_primitive!(Primitive::Int32 => i8, i16, i32);
impl_primitive!(Primitive::Int64 => i64, i128, isize);
impl_primitive!(Primitive::Uint32 => u8, u16, u32);
impl_primitive!(Primitive::Uint64 => u64, u128, usize);
impl_primitive!(Primitive::Float => f32);
impl_primitive!(Primitive::Double => f64);
impl_primitive!(Primitive::Date => chrono::NaiveDate);
impl_primitive!(Primitive::DateTime => chrono::NaiveDateTime);
impl_primitive!(Primitive::Time => chrono::NaiveTime);
impl_primitive!(Primitive::Uuid => uuid::Uuid);

impl<Tz: chrono::TimeZone + 'static> Introspect for chrono::DateTime<Tz> {
    fn shape() -> TypeShape {
        TypeShape::Primitive(Primitive::DateTime)
    }
}

impl Introspect for serde_json::Value {
    fn shape() -> TypeShape {
        TypeShape::Any
    }
}

impl<T: Introspect> Introspect for Option<T> {
    fn shape() -> TypeShape {
        TypeShape::Optional(TypeHandle::of::<T>())
    }
}

macro_rules! impl_transparent {
    ($($wrapper:ident),+) => {
        $(
            impl<T: Introspect + ?Sized> Introspect for $wrapper<T> {
                fn shape() -> TypeShape {
                    TypeShape::Transparent(TypeHandle::of::<T>())
                }
            }
        )+
    };
}

impl_transparent!(Box, Rc, Arc);

macro_rules! impl_sequence {
    ($unique:expr => $($collection:ident),+) => {
        $(
            impl<T: Introspect> Introspect for $collection<T> {
                fn shape() -> TypeShape {
                    TypeShape::Sequence {
                        element: TypeHandle::of::<T>(),
                        unique: $unique,
                    }
                }
            }
        )+
    };
}

impl_sequence!(false => Vec, VecDeque);
impl_sequence!(true => BTreeSet);

impl<T: Introspect, S: 'static> Introspect for HashSet<T, S> {
    fn shape() -> TypeShape {
        TypeShape::Sequence {
            element: TypeHandle::of::<T>(),
            unique: true,
        }
    }
}

impl<T: Introspect> Introspect for [T] {
    fn shape() -> TypeShape {
        TypeShape::Sequence {
            element: TypeHandle::of::<T>(),
            unique: false,
        }
    }
}

impl<T: Introspect, const N: usize> Introspect for [T; N] {
    fn shape() -> TypeShape {
        TypeShape::Sequence {
            element: TypeHandle::of::<T>(),
            unique: false,
        }
    }
}

impl<K: Introspect, V: Introspect, S: 'static> Introspect for HashMap<K, V, S> {
    fn shape() -> TypeShape {
        TypeShape::Map {
            key: TypeHandle::of::<K>(),
            value: TypeHandle::of::<V>(),
        }
    }
}

impl<K: Introspect, V: Introspect> Introspect for BTreeMap<K, V> {
    fn shape() -> TypeShape {
        TypeShape::Map {
            key: TypeHandle::of::<K>(),
            value: TypeHandle::of::<V>(),
        }
    }
}

impl<K: Introspect, V: Introspect, S: 'static> Introspect for indexmap::IndexMap<K, V, S> {
    fn shape() -> TypeShape {
        TypeShape::Map {
            key: TypeHandle::of::<K>(),
            value: TypeHandle::of::<V>(),
        }
    }
}

impl<T: ?Sized + 'static> Introspect for *const T {
    fn shape() -> TypeShape {
        TypeShape::Opaque
    }
}

impl<T: ?Sized + 'static> Introspect for *mut T {
    fn shape() -> TypeShape {
        TypeShape::Opaque
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_shapes() {
        assert!(matches!(
            TypeHandle::of::<String>().shape(),
            TypeShape::Primitive(Primitive::String)
        ));
        assert!(matches!(
            TypeHandle::of::<u16>().shape(),
            TypeShape::Primitive(Primitive::Uint32)
        ));
        assert!(matches!(
            TypeHandle::of::<chrono::DateTime<chrono::Utc>>().shape(),
            TypeShape::Primitive(Primitive::DateTime)
        ));
        assert!(matches!(
            TypeHandle::of::<uuid::Uuid>().shape(),
            TypeShape::Primitive(Primitive::Uuid)
        ));
    }

    #[test]
    fn test_wrapper_shapes_point_at_inner_type() {
        match TypeHandle::of::<Option<i64>>().shape() {
            TypeShape::Optional(inner) => assert_eq!(inner, TypeHandle::of::<i64>()),
            other => panic!("unexpected shape: {:?}", other),
        }

        match TypeHandle::of::<Arc<str>>().shape() {
            TypeShape::Transparent(inner) => assert_eq!(inner.type_name(), "str"),
            other => panic!("unexpected shape: {:?}", other),
        }
    }

    #[test]
    fn test_collection_shapes() {
        match TypeHandle::of::<BTreeSet<String>>().shape() {
            TypeShape::Sequence { unique, .. } => assert!(unique),
            other => panic!("unexpected shape: {:?}", other),
        }

        match TypeHandle::of::<HashMap<String, bool>>().shape() {
            TypeShape::Map { value, .. } => assert_eq!(value, TypeHandle::of::<bool>()),
            other => panic!("unexpected shape: {:?}", other),
        }
    }

    #[test]
    fn test_raw_pointers_are_opaque() {
        assert!(matches!(
            TypeHandle::of::<*const u8>().shape(),
            TypeShape::Opaque
        ));
    }
}
