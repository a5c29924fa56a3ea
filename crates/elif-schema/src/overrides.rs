/*!
Caller-declared schema attributes.

Overrides are merged onto a copy of a synthesized node. The canonical node
held by the registry is never touched, so an annotation made at one call
site cannot leak into another usage of the same type.
*/

use crate::node::SchemaNode;
use serde_json::Value;

/// How an example collection combines with existing examples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExampleMode {
    #[default]
    Append,
    Replace,
}

/// Immutable set of attribute overrides for one usage of a type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaOverrides {
    pub description: Option<String>,
    /// Single example, last writer wins
    pub example: Option<Value>,
    pub examples: Vec<Value>,
    pub example_mode: ExampleMode,
    pub format: Option<String>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
    /// Only ever sets the flag; an override cannot un-deprecate a schema
    pub deprecated: bool,
}

impl SchemaOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_example(mut self, example: Value) -> Self {
        self.example = Some(example);
        self
    }

    pub fn with_examples(mut self, examples: Vec<Value>, mode: ExampleMode) -> Self {
        self.examples = examples;
        self.example_mode = mode;
        self
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    pub fn with_minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn with_maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// The same overrides with every example dropped
    pub fn without_examples(mut self) -> Self {
        self.example = None;
        self.examples.clear();
        self.example_mode = ExampleMode::Append;
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Merge overrides onto a copy of `node`.
///
/// The merge is shallow: only the top level of `node` changes, nested
/// property schemas are left as they are.
pub fn apply_overrides(node: &SchemaNode, overrides: &SchemaOverrides) -> SchemaNode {
    let mut merged = node.clone();

    if let Some(description) = &overrides.description {
        merged.description = Some(description.clone());
    }
    if let Some(example) = &overrides.example {
        merged.example = Some(example.clone());
    }
    match overrides.example_mode {
        ExampleMode::Append => merged.examples.extend(overrides.examples.iter().cloned()),
        ExampleMode::Replace => merged.examples = overrides.examples.clone(),
    }
    if let Some(format) = &overrides.format {
        merged.format = Some(format.clone());
    }
    if let Some(minimum) = overrides.minimum {
        merged.minimum = Some(minimum);
    }
    if let Some(maximum) = overrides.maximum {
        merged.maximum = Some(maximum);
    }
    if let Some(min_length) = overrides.min_length {
        merged.min_length = Some(min_length);
    }
    if let Some(max_length) = overrides.max_length {
        merged.max_length = Some(max_length);
    }
    if let Some(pattern) = &overrides.pattern {
        merged.pattern = Some(pattern.clone());
    }
    if overrides.deprecated {
        merged.deprecated = Some(true);
    }

    merged
}
