//! Registry of user-visible node identifiers.
//!
//! Identifiers are stored without their `@+id/` or `@id/` prefix. The
//! registry is a back-reference only: destroying a node does not release its
//! identifier on its own, the caller must do it (see
//! [`IdentifierRegistry::release_subtree`]).

use std::collections::HashMap;

use crate::attribute::strip_id_prefix;
use crate::error::{IdentifierError, NodeResult};
use crate::logging::targets;
use crate::node::{NodeId, NodeTree};

/// Bidirectional node ↔ identifier map enforcing uniqueness.
#[derive(Debug, Clone, Default)]
pub struct IdentifierRegistry {
    by_node: HashMap<NodeId, String>,
    by_name: HashMap<String, NodeId>,
}

impl IdentifierRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign an identifier to `node`, replacing any it already held.
    ///
    /// `value` may carry either prefix. Returns the node's previous
    /// identifier.
    pub fn assign(&mut self, node: NodeId, value: &str) -> Result<Option<String>, IdentifierError> {
        let name = strip_id_prefix(value);
        if name.is_empty() {
            return Err(IdentifierError::Empty(value.to_owned()));
        }
        if let Some(&holder) = self.by_name.get(name) {
            if holder != node {
                return Err(IdentifierError::Conflict {
                    identifier: name.to_owned(),
                    holder,
                });
            }
            return Ok(Some(name.to_owned()));
        }

        let previous = self.by_node.insert(node, name.to_owned());
        if let Some(old) = &previous {
            self.by_name.remove(old);
        }
        self.by_name.insert(name.to_owned(), node);
        tracing::trace!(target: targets::IDENTIFIER, ?node, identifier = name, ?previous, "assigned identifier");
        Ok(previous)
    }

    /// Release the identifier held by `node`.
    pub fn release(&mut self, node: NodeId) -> Option<String> {
        let name = self.by_node.remove(&node)?;
        self.by_name.remove(&name);
        tracing::trace!(target: targets::IDENTIFIER, ?node, identifier = %name, "released identifier");
        Some(name)
    }

    /// Release the identifiers of `node` and all its descendants.
    pub fn release_subtree(&mut self, tree: &NodeTree, node: NodeId) -> NodeResult<Vec<String>> {
        Ok(tree
            .depth_first_preorder(node)?
            .into_iter()
            .filter_map(|id| self.release(id))
            .collect())
    }

    /// Whether any node holds `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(strip_id_prefix(name))
    }

    /// The node holding `name`.
    pub fn node_for(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(strip_id_prefix(name)).copied()
    }

    /// The identifier held by `node`.
    pub fn name_of(&self, node: NodeId) -> Option<&str> {
        self.by_node.get(&node).map(String::as_str)
    }

    /// All identifiers, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Forget every identifier.
    pub fn clear(&mut self) {
        self.by_node.clear();
        self.by_name.clear();
    }

    pub fn len(&self) -> usize {
        self.by_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }
}
