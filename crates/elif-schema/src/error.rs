use crate::identity::TypeIdentity;
use thiserror::Error;

/// Result type for schema introspection operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// A type that exposes no structure the resolver can turn into a schema.
///
/// This is a recoverable condition: the synthesizer renders the offending
/// type as an opaque `{}` schema and keeps the error as a warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported type `{type_name}`: {reason}")]
pub struct UnsupportedTypeError {
    /// Full Rust type name of the offending type
    pub type_name: String,
    /// Why the type could not be introspected
    pub reason: String,
}

impl UnsupportedTypeError {
    pub fn new<N: ToString, R: ToString>(type_name: N, reason: R) -> Self {
        Self {
            type_name: type_name.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Errors that can occur during schema introspection
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The resolver could not decompose a type
    #[error(transparent)]
    UnsupportedType(#[from] UnsupportedTypeError),

    /// Two different type structures claimed the same reference name
    #[error(
        "Schema conflict on `{name}`: `{existing}` and `{incoming}` map to the same reference name with different content"
    )]
    SchemaConflict {
        name: String,
        existing: TypeIdentity,
        incoming: TypeIdentity,
    },

    /// Type nesting went deeper than the configured recursion limit
    #[error("Recursion limit of {limit} exceeded while resolving `{type_name}`")]
    CycleDepthExceeded { type_name: String, limit: usize },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error while loading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl SchemaError {
    /// Create a new schema conflict error
    pub fn conflict<T: ToString>(name: T, existing: TypeIdentity, incoming: TypeIdentity) -> Self {
        Self::SchemaConflict {
            name: name.to_string(),
            existing,
            incoming,
        }
    }

    /// Create a new recursion limit error
    pub fn depth_exceeded<T: ToString>(type_name: T, limit: usize) -> Self {
        Self::CycleDepthExceeded {
            type_name: type_name.to_string(),
            limit,
        }
    }

    /// Create a new configuration error
    pub fn config_error<T: ToString>(msg: T) -> Self {
        Self::Config(msg.to_string())
    }

    /// Whether this error aborts a generation pass
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::UnsupportedType(_))
    }
}
