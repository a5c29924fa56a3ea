//! Hand-written introspection fixtures shared by unit tests.
#![allow(dead_code)]

use crate::introspect::{
    EnumShape, Introspect, SealedShape, StructShape, TypeHandle, TypeShape, VariantShape,
};

pub struct User {
    pub name: String,
    pub age: i32,
    pub email: Option<String>,
    pub tags: Vec<String>,
}

impl Introspect for User {
    fn shape() -> TypeShape {
        TypeShape::Struct(
            StructShape::new(concat!(module_path!(), "::User"), "User")
                .with_field("name", TypeHandle::of::<String>())
                .with_field("age", TypeHandle::of::<i32>())
                .with_field("email", TypeHandle::of::<Option<String>>())
                .with_field("tags", TypeHandle::of::<Vec<String>>()),
        )
    }
}

/// Singly linked list node
pub struct Node {
    pub value: String,
    pub next: Option<Box<Node>>,
}

impl Introspect for Node {
    fn shape() -> TypeShape {
        TypeShape::Struct(
            StructShape::new(concat!(module_path!(), "::Node"), "Node")
                .with_field("value", TypeHandle::of::<String>())
                .with_field("next", TypeHandle::of::<Option<Box<Node>>>()),
        )
    }
}

pub struct Tree {
    pub label: String,
    pub children: Vec<Tree>,
}

impl Introspect for Tree {
    fn shape() -> TypeShape {
        TypeShape::Struct(
            StructShape::new(concat!(module_path!(), "::Tree"), "Tree")
                .with_field("label", TypeHandle::of::<String>())
                .with_field("children", TypeHandle::of::<Vec<Tree>>()),
        )
    }
}

pub struct Employee {
    pub name: String,
    pub department: Option<Box<Department>>,
}

impl Introspect for Employee {
    fn shape() -> TypeShape {
        TypeShape::Struct(
            StructShape::new(concat!(module_path!(), "::Employee"), "Employee")
                .with_field("name", TypeHandle::of::<String>())
                .with_field("department", TypeHandle::of::<Option<Box<Department>>>()),
        )
    }
}

pub struct Department {
    pub name: String,
    pub manager: Option<Box<Employee>>,
    pub members: Vec<Employee>,
}

impl Introspect for Department {
    fn shape() -> TypeShape {
        TypeShape::Struct(
            StructShape::new(concat!(module_path!(), "::Department"), "Department")
                .with_field("name", TypeHandle::of::<String>())
                .with_field("manager", TypeHandle::of::<Option<Box<Employee>>>())
                .with_field("members", TypeHandle::of::<Vec<Employee>>()),
        )
    }
}

pub enum Status {
    Active,
    Inactive,
}

impl Introspect for Status {
    fn shape() -> TypeShape {
        TypeShape::Enum(EnumShape {
            path: concat!(module_path!(), "::Status"),
            name: "Status",
            constants: vec!["ACTIVE", "INACTIVE"],
        })
    }
}

pub struct Circle {
    pub radius: f64,
}

impl Introspect for Circle {
    fn shape() -> TypeShape {
        TypeShape::Struct(
            StructShape::new(concat!(module_path!(), "::Circle"), "Circle")
                .with_field("radius", TypeHandle::of::<f64>()),
        )
    }
}

pub struct Square {
    pub side: f64,
}

impl Introspect for Square {
    fn shape() -> TypeShape {
        TypeShape::Struct(
            StructShape::new(concat!(module_path!(), "::Square"), "Square")
                .with_field("side", TypeHandle::of::<f64>()),
        )
    }
}

pub enum Shape {
    Circle(Circle),
    Square(Square),
}

impl Introspect for Shape {
    fn shape() -> TypeShape {
        TypeShape::Sealed(SealedShape {
            path: concat!(module_path!(), "::Shape"),
            name: "Shape",
            generics: Vec::new(),
            variants: vec![
                VariantShape::new("circle", TypeHandle::of::<Circle>()),
                VariantShape::new("square", TypeHandle::of::<Square>()),
            ],
            discriminator: Some("kind"),
        })
    }
}

pub struct Literal {
    pub value: f64,
}

impl Introspect for Literal {
    fn shape() -> TypeShape {
        TypeShape::Struct(
            StructShape::new(concat!(module_path!(), "::Literal"), "Literal")
                .with_field("value", TypeHandle::of::<f64>()),
        )
    }
}

pub struct Add {
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

impl Introspect for Add {
    fn shape() -> TypeShape {
        TypeShape::Struct(
            StructShape::new(concat!(module_path!(), "::Add"), "Add")
                .with_field("left", TypeHandle::of::<Box<Expr>>())
                .with_field("right", TypeHandle::of::<Box<Expr>>()),
        )
    }
}

/// Expression tree whose variants refer back to it
pub enum Expr {
    Literal(Literal),
    Add(Add),
}

impl Introspect for Expr {
    fn shape() -> TypeShape {
        TypeShape::Sealed(SealedShape {
            path: concat!(module_path!(), "::Expr"),
            name: "Expr",
            generics: Vec::new(),
            variants: vec![
                VariantShape::new("Literal", TypeHandle::of::<Literal>()),
                VariantShape::new("Add", TypeHandle::of::<Add>()),
            ],
            discriminator: None,
        })
    }
}

/// Nested headings whose branches hold the enum itself
pub enum Outline {
    Heading(String),
    Section(Vec<Outline>),
}

impl Introspect for Outline {
    fn shape() -> TypeShape {
        TypeShape::Sealed(SealedShape {
            path: concat!(module_path!(), "::Outline"),
            name: "Outline",
            generics: Vec::new(),
            variants: vec![
                VariantShape::new("Heading", TypeHandle::of::<String>()),
                VariantShape::new("Section", TypeHandle::of::<Vec<Outline>>()),
            ],
            discriminator: None,
        })
    }
}

pub struct Matrix {
    pub cells: Vec<Vec<Vec<f64>>>,
}

impl Introspect for Matrix {
    fn shape() -> TypeShape {
        TypeShape::Struct(
            StructShape::new(concat!(module_path!(), "::Matrix"), "Matrix")
                .with_field("cells", TypeHandle::of::<Vec<Vec<Vec<f64>>>>()),
        )
    }
}

/// Platform buffer with no introspectable structure
pub struct RawBuffer(pub *mut u8);

impl Introspect for RawBuffer {
    fn shape() -> TypeShape {
        TypeShape::Opaque
    }
}

pub struct Wrapper {
    pub label: String,
    pub buffer: RawBuffer,
}

impl Introspect for Wrapper {
    fn shape() -> TypeShape {
        TypeShape::Struct(
            StructShape::new(concat!(module_path!(), "::Wrapper"), "Wrapper")
                .with_field("label", TypeHandle::of::<String>())
                .with_field("buffer", TypeHandle::of::<RawBuffer>()),
        )
    }
}

pub struct Document<T> {
    pub title: String,
    pub body: T,
}

impl<T: Introspect> Introspect for Document<T> {
    fn shape() -> TypeShape {
        TypeShape::Struct(
            StructShape::new(concat!(module_path!(), "::Document"), "Document")
                .with_generic(TypeHandle::of::<T>())
                .with_field("title", TypeHandle::of::<String>())
                .with_field("body", TypeHandle::of::<T>()),
        )
    }
}

pub mod billing {
    use super::*;

    pub struct Address {
        pub street: String,
        pub city: String,
    }

    impl Introspect for Address {
        fn shape() -> TypeShape {
            TypeShape::Struct(
                StructShape::new(concat!(module_path!(), "::Address"), "Address")
                    .with_field("street", TypeHandle::of::<String>())
                    .with_field("city", TypeHandle::of::<String>()),
            )
        }
    }
}

pub mod shipping {
    use super::*;

    pub struct Address {
        pub street: String,
        pub recipient: String,
        pub instructions: Option<String>,
    }

    impl Introspect for Address {
        fn shape() -> TypeShape {
            TypeShape::Struct(
                StructShape::new(concat!(module_path!(), "::Address"), "Address")
                    .with_field("street", TypeHandle::of::<String>())
                    .with_field("recipient", TypeHandle::of::<String>())
                    .with_field("instructions", TypeHandle::of::<Option<String>>()),
            )
        }
    }
}
