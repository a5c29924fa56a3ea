/*!
Canonical type identities.

A [`TypeIdentity`] is the key under which a type occurrence is cached and
registered: the fully qualified base type, its resolved generic arguments
and its nullability. Two surface types with the same identity share one
schema.
*/

use std::fmt;
use std::hash::{Hash, Hasher};

/// Canonical key for a type occurrence
#[derive(Debug, Clone)]
pub struct TypeIdentity {
    base: String,
    name: String,
    args: Vec<TypeIdentity>,
    nullable: bool,
}

impl TypeIdentity {
    /// Create an identity from a fully qualified base path and a display name
    pub fn new(base: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            name: name.into(),
            args: Vec::new(),
            nullable: false,
        }
    }

    /// Set the resolved generic arguments
    pub fn with_args(mut self, args: Vec<TypeIdentity>) -> Self {
        self.args = args;
        self
    }

    /// Set the nullability flag
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Fully qualified base path, e.g. `app::models::User`
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Display name without module path, e.g. `User`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[TypeIdentity] {
        &self.args
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// The same identity with nullability stripped.
    ///
    /// Registered schemas are keyed by the non-null identity; nullability is
    /// carried by each referencing site instead.
    pub fn non_null(&self) -> TypeIdentity {
        Self {
            nullable: false,
            ..self.clone()
        }
    }

    /// Reference name this identity asks for before collision handling.
    ///
    /// `User` stays `User`, `Page<Vec<User>>` becomes `Page_Vec_User` and a
    /// nullable argument is prefixed with `Option_`.
    pub fn reference_candidate(&self) -> String {
        let mut candidate = String::new();
        self.write_candidate(&mut candidate);
        candidate
    }

    fn write_candidate(&self, out: &mut String) {
        out.push_str(&sanitize(&self.name));
        for arg in &self.args {
            out.push('_');
            if arg.nullable {
                out.push_str("Option_");
            }
            arg.write_candidate(out);
        }
    }
}

/// Keep only characters valid in a component name
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

// Display names are derived from the base path, so they take no part in equality.
impl PartialEq for TypeIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base && self.args == other.args && self.nullable == other.nullable
    }
}

impl Eq for TypeIdentity {}

impl Hash for TypeIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.base.hash(state);
        self.args.hash(state);
        self.nullable.hash(state);
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (index, arg) in self.args.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", arg)?;
            }
            f.write_str(">")?;
        }
        if self.nullable {
            f.write_str("?")?;
        }
        Ok(())
    }
}

/// Display name for a Rust type name: generics and module path removed
pub(crate) fn short_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit("::").next().unwrap_or(base)
}
