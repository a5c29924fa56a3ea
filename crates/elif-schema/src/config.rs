use crate::{
    descriptor::Primitive,
    error::{SchemaError, SchemaResult},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Default recursion limit for type nesting
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// How reference names are derived from type identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingStrategy {
    /// Display name, with a numeric suffix when another identity already owns it
    #[default]
    Qualified,
    /// Display name only; colliding identities surface as schema conflicts
    Simple,
}

/// Configuration for schema generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Emit `nullable: true` for Option<T>
    pub nullable_optional: bool,

    /// Keep example values from caller overrides
    pub include_examples: bool,

    /// Maximum type nesting depth before a pass is aborted
    pub max_depth: usize,

    /// Reference naming strategy
    pub naming: NamingStrategy,

    /// Custom type mappings, keyed by full or short Rust type name
    pub custom_mappings: HashMap<String, Primitive>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            nullable_optional: true,
            include_examples: true,
            max_depth: DEFAULT_MAX_DEPTH,
            naming: NamingStrategy::default(),
            custom_mappings: HashMap::new(),
        }
    }
}

impl SchemaConfig {
    /// Create new configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML document
    pub fn from_toml_str(content: &str) -> SchemaResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> SchemaResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check configuration invariants
    pub fn validate(&self) -> SchemaResult<()> {
        if self.max_depth == 0 {
            return Err(SchemaError::config_error("max_depth must be at least 1"));
        }
        Ok(())
    }

    /// Set nullable option handling
    pub fn with_nullable_optional(mut self, nullable: bool) -> Self {
        self.nullable_optional = nullable;
        self
    }

    /// Set example inclusion
    pub fn with_examples(mut self, include: bool) -> Self {
        self.include_examples = include;
        self
    }

    /// Set the recursion limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the reference naming strategy
    pub fn with_naming(mut self, naming: NamingStrategy) -> Self {
        self.naming = naming;
        self
    }

    /// Add custom type mapping
    pub fn with_custom_mapping(mut self, type_name: &str, primitive: Primitive) -> Self {
        self.custom_mappings.insert(type_name.to_string(), primitive);
        self
    }
}
