/*!
Cycle and identity tracking for one generation pass.

The tracker assigns each identity its reference name and records whether
the identity is being synthesized (somewhere up the current recursion
path) or already finished. Identities in progress always form a stack.
*/

use crate::{config::NamingStrategy, identity::TypeIdentity};
use std::collections::HashMap;
use tracing::{trace, warn};

/// Outcome of entering an identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entered {
    /// First encounter: the caller synthesizes and must call [`Tracker::leave`]
    Fresh(String),
    /// Cycle: the identity is being synthesized higher up the stack
    InProgress(String),
    /// Already synthesized in this pass
    Resolved(String),
}

impl Entered {
    /// Reference name of the entered identity
    pub fn name(&self) -> &str {
        match self {
            Entered::Fresh(name) | Entered::InProgress(name) | Entered::Resolved(name) => name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    InProgress,
    Resolved,
}

#[derive(Debug, Default)]
pub struct Tracker {
    naming: NamingStrategy,
    names: HashMap<TypeIdentity, String>,
    owners: HashMap<String, TypeIdentity>,
    states: HashMap<TypeIdentity, State>,
    stack: Vec<TypeIdentity>,
}

impl Tracker {
    pub fn new(naming: NamingStrategy) -> Self {
        Self {
            naming,
            ..Default::default()
        }
    }

    pub fn enter(&mut self, identity: &TypeIdentity) -> Entered {
        let name = self.name_for(identity);
        match self.states.get(identity) {
            Some(State::InProgress) => {
                trace!(identity = %identity, "cycle detected, emitting reference");
                Entered::InProgress(name)
            }
            Some(State::Resolved) => Entered::Resolved(name),
            None => {
                trace!(identity = %identity, depth = self.stack.len(), "entering");
                self.states.insert(identity.clone(), State::InProgress);
                self.stack.push(identity.clone());
                Entered::Fresh(name)
            }
        }
    }

    /// Leave an identity entered as [`Entered::Fresh`].
    ///
    /// On success the identity becomes resolved; on failure it is forgotten
    /// so a later attempt in the same pass starts over.
    pub fn leave(&mut self, identity: &TypeIdentity, succeeded: bool) {
        let well_nested = self.stack.last() == Some(identity);
        if well_nested {
            self.stack.pop();
        } else {
            warn!(
                identity = %identity,
                top = ?self.stack.last().map(ToString::to_string),
                "tracker leave is not well-nested"
            );
            self.stack.retain(|entry| entry != identity);
        }
        debug_assert!(
            well_nested,
            "leave({}) does not match the top of the stack",
            identity
        );

        if succeeded {
            self.states.insert(identity.clone(), State::Resolved);
        } else {
            self.states.remove(identity);
        }
        trace!(identity = %identity, succeeded, "left");
    }

    /// Identities currently being synthesized, outermost first
    pub fn path(&self) -> &[TypeIdentity] {
        &self.stack
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn reference_name(&self, identity: &TypeIdentity) -> Option<&str> {
        self.names.get(identity).map(String::as_str)
    }

    /// Deterministic reference name for an identity
    fn name_for(&mut self, identity: &TypeIdentity) -> String {
        if let Some(name) = self.names.get(identity) {
            return name.clone();
        }

        let candidate = identity.reference_candidate();
        let name = match self.naming {
            NamingStrategy::Simple => candidate,
            NamingStrategy::Qualified => {
                let mut name = candidate.clone();
                let mut suffix = 2;
                while self.owners.contains_key(&name) {
                    name = format!("{}{}", candidate, suffix);
                    suffix += 1;
                }
                name
            }
        };

        self.owners
            .entry(name.clone())
            .or_insert_with(|| identity.clone());
        self.names.insert(identity.clone(), name.clone());
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(path: &str) -> TypeIdentity {
        TypeIdentity::new(path, crate::identity::short_name(path))
    }

    #[test]
    fn test_enter_fresh_then_in_progress_then_resolved() {
        let mut tracker = Tracker::default();
        let node = identity("app::Node");

        assert_eq!(tracker.enter(&node), Entered::Fresh("Node".to_string()));
        assert_eq!(tracker.enter(&node), Entered::InProgress("Node".to_string()));

        tracker.leave(&node, true);
        assert_eq!(tracker.enter(&node), Entered::Resolved("Node".to_string()));
        assert_eq!(tracker.depth(), 0);
    }

    #[test]
    fn test_in_progress_identities_form_a_stack() {
        let mut tracker = Tracker::default();
        let outer = identity("app::Outer");
        let inner = identity("app::Inner");

        tracker.enter(&outer);
        tracker.enter(&inner);
        assert_eq!(tracker.path(), &[outer.clone(), inner.clone()]);

        tracker.leave(&inner, true);
        tracker.leave(&outer, true);
        assert!(tracker.path().is_empty());
    }

    #[test]
    fn test_failed_leave_forgets_identity() {
        let mut tracker = Tracker::default();
        let broken = identity("app::Broken");

        tracker.enter(&broken);
        tracker.leave(&broken, false);
        assert_eq!(tracker.enter(&broken), Entered::Fresh("Broken".to_string()));
    }

    #[test]
    fn test_qualified_naming_disambiguates_collisions() {
        let mut tracker = Tracker::new(NamingStrategy::Qualified);
        let billing = identity("billing::Address");
        let shipping = identity("shipping::Address");

        assert_eq!(tracker.enter(&billing).name(), "Address");
        assert_eq!(tracker.enter(&shipping).name(), "Address2");
        assert_eq!(tracker.reference_name(&billing), Some("Address"));
        assert_eq!(tracker.reference_name(&shipping), Some("Address2"));
    }

    #[test]
    fn test_simple_naming_keeps_display_name() {
        let mut tracker = Tracker::new(NamingStrategy::Simple);
        assert_eq!(tracker.enter(&identity("billing::Address")).name(), "Address");
        assert_eq!(tracker.enter(&identity("shipping::Address")).name(), "Address");
    }

    #[test]
    fn test_names_are_stable_across_reentry() {
        let mut tracker = Tracker::default();
        let user = identity("app::User");
        let name = tracker.enter(&user).name().to_string();
        tracker.leave(&user, false);
        assert_eq!(tracker.enter(&user).name(), name);
    }
}
