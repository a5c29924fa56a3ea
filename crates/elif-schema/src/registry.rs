/*!
Pass-scoped store of named component schemas.

Entries keep first-registration order so the emitted `components/schemas`
section is deterministic. An object's slot is reserved before its fields
are synthesized, which places a parent ahead of the types it references.
*/

use crate::{
    error::{SchemaError, SchemaResult},
    identity::TypeIdentity,
    node::SchemaNode,
};
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone)]
struct Slot {
    identity: TypeIdentity,
    /// `None` while the schema is still being synthesized
    node: Option<SchemaNode>,
}

/// Registry of finalized, canonical component schemas
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    slots: IndexMap<String, Slot>,
    names: HashMap<TypeIdentity, String>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a placeholder slot for an identity about to be synthesized.
    ///
    /// A name already held by another identity is left alone; whether the
    /// two can share it is decided by [`register`](Self::register).
    pub fn reserve(&mut self, identity: &TypeIdentity, name: &str) {
        if !self.slots.contains_key(name) {
            self.slots.insert(
                name.to_string(),
                Slot {
                    identity: identity.clone(),
                    node: None,
                },
            );
            self.names.insert(identity.clone(), name.to_string());
        }
    }

    /// Register the canonical schema of an identity.
    ///
    /// Registering identical content under a name again is a no-op.
    /// Different content under an existing name is a [`SchemaError::SchemaConflict`].
    pub fn register(
        &mut self,
        identity: &TypeIdentity,
        name: &str,
        node: SchemaNode,
    ) -> SchemaResult<()> {
        match self.slots.get_mut(name) {
            None => {
                self.slots.insert(
                    name.to_string(),
                    Slot {
                        identity: identity.clone(),
                        node: Some(node),
                    },
                );
            }
            Some(slot) => {
                if slot.node.is_none() && slot.identity == *identity {
                    slot.node = Some(node);
                } else if slot.node.as_ref() != Some(&node) {
                    return Err(SchemaError::conflict(
                        name,
                        slot.identity.clone(),
                        identity.clone(),
                    ));
                }
            }
        }

        debug!(schema = name, identity = %identity, "registered component schema");
        self.names.insert(identity.clone(), name.to_string());
        Ok(())
    }

    /// Drop the unfilled placeholder of an identity whose synthesis failed
    pub fn release(&mut self, identity: &TypeIdentity) {
        let Some(name) = self.names.get(identity) else {
            return;
        };
        let unfilled = self
            .slots
            .get(name)
            .is_some_and(|slot| slot.node.is_none() && slot.identity == *identity);
        if unfilled {
            self.slots.shift_remove(name);
            self.names.remove(identity);
        }
    }

    /// Canonical schema of an identity, once finalized
    pub fn get(&self, identity: &TypeIdentity) -> Option<&SchemaNode> {
        self.names
            .get(identity)
            .and_then(|name| self.get_by_name(name))
    }

    pub fn get_by_name(&self, name: &str) -> Option<&SchemaNode> {
        self.slots.get(name).and_then(|slot| slot.node.as_ref())
    }

    pub fn reference_name(&self, identity: &TypeIdentity) -> Option<&str> {
        self.names.get(identity).map(String::as_str)
    }

    pub fn contains(&self, identity: &TypeIdentity) -> bool {
        self.get(identity).is_some()
    }

    /// Finalized entries in first-registered order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.slots
            .iter()
            .filter_map(|(name, slot)| slot.node.as_ref().map(|node| (name.as_str(), node)))
    }

    /// Number of finalized entries
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.names.clear();
    }

    /// Finalized entries as an ordered `components/schemas` map
    pub fn into_components(self) -> IndexMap<String, SchemaNode> {
        self.slots
            .into_iter()
            .filter_map(|(name, slot)| slot.node.map(|node| (name, node)))
            .collect()
    }
}
