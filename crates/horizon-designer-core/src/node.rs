//! The live node tree.
//!
//! Nodes live in a slot arena. A [`NodeId`] is a stable *slot*: it survives
//! reparenting and instance swaps and only becomes invalid when the node is
//! destroyed. Each slot owns:
//!
//! - its concrete type name and role
//! - a parent link and an ordered child list
//! - an [`AttributeStore`]
//! - the live [`Widget`] instance (absent for the document root and the
//!   drag placeholder)
//! - the bounds last reported by the host, used for drop hit testing
//!
//! Every tree carries two reserved nodes created with it: the document root
//! container, which is never serialized, and a detached placeholder that the
//! drag protocol inserts to mark a prospective drop position.

use std::fmt;

use slotmap::{new_key_type, SlotMap};

use crate::attribute::AttributeStore;
use crate::capability::Widget;
use crate::error::{NodeError, NodeResult};
use crate::geometry::{LayoutAxis, Rect};
use crate::logging::targets;

new_key_type! {
    /// A stable handle to a node slot.
    ///
    /// Handles stay valid across reparenting and instance replacement, and
    /// become invalid when the node is destroyed.
    pub struct NodeId;
}

impl NodeId {
    /// Convert the NodeId to a raw u64 value.
    ///
    /// Useful for hosts that key their own widget maps numerically.
    #[inline]
    pub fn as_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }

    /// Create a NodeId from a raw u64 value.
    ///
    /// This does not check that the node exists in any tree.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self::from(slotmap::KeyData::from_ffi(raw))
    }
}

/// Type name of the synthetic document root container.
pub const ROOT_TYPE: &str = "designer.DocumentRoot";

/// Type name of the drag placeholder.
pub const PLACEHOLDER_TYPE: &str = "designer.Placeholder";

/// What a slot represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// The synthetic document root.
    Root,
    /// A user-visible widget.
    Widget,
    /// The transient drop marker.
    Placeholder,
}

struct NodeData {
    type_name: String,
    role: NodeRole,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: AttributeStore,
    instance: Option<Box<dyn Widget>>,
    bounds: Option<Rect>,
    /// Bumped every time the instance behind the slot is replaced.
    generation: u32,
}

impl NodeData {
    fn reserved(type_name: &str, role: NodeRole) -> Self {
        Self {
            type_name: type_name.to_owned(),
            role,
            parent: None,
            children: Vec::new(),
            attributes: AttributeStore::new(),
            instance: None,
            bounds: None,
            generation: 0,
        }
    }
}

/// Arena of nodes forming one document.
pub struct NodeTree {
    nodes: SlotMap<NodeId, NodeData>,
    root: NodeId,
    placeholder: NodeId,
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTree {
    /// Create a tree holding only the document root and the detached
    /// placeholder.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(NodeData::reserved(ROOT_TYPE, NodeRole::Root));
        let placeholder = nodes.insert(NodeData::reserved(PLACEHOLDER_TYPE, NodeRole::Placeholder));
        Self {
            nodes,
            root,
            placeholder,
        }
    }

    /// The document root container.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The drag placeholder slot.
    pub fn placeholder(&self) -> NodeId {
        self.placeholder
    }

    /// The single top-level node under the root, if any.
    pub fn top_level(&self) -> Option<NodeId> {
        self.nodes
            .get(self.root)
            .and_then(|root| root.children.iter().copied().find(|&c| c != self.placeholder))
    }

    /// Number of slots, including the two reserved nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds any widget node.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 2
    }

    /// Insert a detached widget node and return its slot.
    pub fn insert(&mut self, instance: Box<dyn Widget>, attributes: AttributeStore) -> NodeId {
        let type_name = instance.type_name().to_owned();
        let id = self.nodes.insert(NodeData {
            type_name,
            role: NodeRole::Widget,
            parent: None,
            children: Vec::new(),
            attributes,
            instance: Some(instance),
            bounds: None,
            generation: 0,
        });
        tracing::trace!(target: targets::NODE, ?id, type_name = %self.nodes[id].type_name, "inserted node");
        id
    }

    /// Check if a node exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    fn data(&self, id: NodeId) -> NodeResult<&NodeData> {
        self.nodes.get(id).ok_or(NodeError::InvalidNodeId(id))
    }

    fn data_mut(&mut self, id: NodeId) -> NodeResult<&mut NodeData> {
        self.nodes.get_mut(id).ok_or(NodeError::InvalidNodeId(id))
    }

    /// Role of a node.
    pub fn role(&self, id: NodeId) -> NodeResult<NodeRole> {
        self.data(id).map(|d| d.role)
    }

    /// Concrete type name of a node.
    pub fn type_name(&self, id: NodeId) -> NodeResult<&str> {
        self.data(id).map(|d| d.type_name.as_str())
    }

    /// Parent of a node, `None` when detached (or for the root).
    pub fn parent(&self, id: NodeId) -> NodeResult<Option<NodeId>> {
        self.data(id).map(|d| d.parent)
    }

    /// Children of a node in order.
    pub fn children(&self, id: NodeId) -> NodeResult<&[NodeId]> {
        self.data(id).map(|d| d.children.as_slice())
    }

    /// Position of a node among its siblings.
    pub fn sibling_index(&self, id: NodeId) -> NodeResult<Option<usize>> {
        let data = self.data(id)?;
        match data.parent {
            Some(parent_id) => {
                let parent = self.data(parent_id)?;
                Ok(parent.children.iter().position(|&c| c == id))
            }
            None => Ok(None),
        }
    }

    /// Whether the node is reachable from the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.root || self.is_ancestor_of(self.root, id)
    }

    /// Check if `potential_ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_of(&self, potential_ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == potential_ancestor {
                return true;
            }
            current = self.nodes.get(current_id).and_then(|d| d.parent);
        }
        false
    }

    /// Ancestors of a node, nearest first.
    pub fn ancestors(&self, id: NodeId) -> NodeResult<Vec<NodeId>> {
        let mut result = Vec::new();
        let mut current = self.data(id)?.parent;
        while let Some(current_id) = current {
            result.push(current_id);
            current = self.nodes.get(current_id).and_then(|d| d.parent);
        }
        Ok(result)
    }

    /// Attach `id` under `parent` at `index` (clamped), detaching it from
    /// any previous parent first. `None` appends.
    pub fn attach(&mut self, id: NodeId, parent: NodeId, index: Option<usize>) -> NodeResult<()> {
        if id == self.root {
            return Err(NodeError::ReservedNode(id));
        }
        self.data(id)?;
        self.data(parent)?;
        if self.is_ancestor_of(id, parent) {
            return Err(NodeError::CircularParentage);
        }

        self.detach(id)?;
        let siblings = &mut self.data_mut(parent)?.children;
        let position = index.map_or(siblings.len(), |i| i.min(siblings.len()));
        siblings.insert(position, id);
        self.data_mut(id)?.parent = Some(parent);

        tracing::trace!(target: targets::NODE, ?id, ?parent, position, "attached node");
        Ok(())
    }

    /// Detach `id` from its parent, returning the former parent and index.
    pub fn detach(&mut self, id: NodeId) -> NodeResult<Option<(NodeId, usize)>> {
        if id == self.root {
            return Err(NodeError::ReservedNode(id));
        }
        let Some(parent_id) = self.data(id)?.parent else {
            return Ok(None);
        };
        let parent = self.data_mut(parent_id)?;
        let index = parent.children.iter().position(|&c| c == id);
        parent.children.retain(|&c| c != id);
        self.data_mut(id)?.parent = None;

        tracing::trace!(target: targets::NODE, ?id, parent = ?parent_id, "detached node");
        Ok(index.map(|i| (parent_id, i)))
    }

    /// Destroy a node and its whole subtree.
    ///
    /// Returns the destroyed slots, descendants before the node itself, so
    /// callers can release anything keyed by them.
    #[tracing::instrument(skip(self), target = "horizon_designer_core::node", level = "trace")]
    pub fn destroy(&mut self, id: NodeId) -> NodeResult<Vec<NodeId>> {
        if id == self.root || id == self.placeholder {
            return Err(NodeError::ReservedNode(id));
        }
        let mut doomed = self.collect_descendants(id)?;
        // The placeholder may be parked inside the subtree; keep it alive.
        if let Some(pos) = doomed.iter().position(|&c| c == self.placeholder) {
            doomed.remove(pos);
            self.detach(self.placeholder)?;
        }
        self.detach(id)?;
        doomed.push(id);
        for &node in &doomed {
            self.nodes.remove(node);
        }
        tracing::trace!(target: targets::NODE, ?id, count = doomed.len(), "destroyed subtree");
        Ok(doomed)
    }

    fn collect_descendants(&self, id: NodeId) -> NodeResult<Vec<NodeId>> {
        let mut result = Vec::new();
        self.collect_descendants_recursive(id, &mut result)?;
        Ok(result)
    }

    fn collect_descendants_recursive(&self, id: NodeId, result: &mut Vec<NodeId>) -> NodeResult<()> {
        for &child in &self.data(id)?.children {
            self.collect_descendants_recursive(child, result)?;
            result.push(child);
        }
        Ok(())
    }

    /// `id` followed by its descendants in depth-first pre-order.
    pub fn depth_first_preorder(&self, id: NodeId) -> NodeResult<Vec<NodeId>> {
        let mut result = Vec::new();
        self.preorder_recursive(id, &mut result)?;
        Ok(result)
    }

    fn preorder_recursive(&self, id: NodeId, result: &mut Vec<NodeId>) -> NodeResult<()> {
        result.push(id);
        for &child in &self.data(id)?.children {
            self.preorder_recursive(child, result)?;
        }
        Ok(())
    }

    /// Every widget slot in the arena, attached or not.
    pub fn widget_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(|(_, d)| d.role == NodeRole::Widget)
            .map(|(id, _)| id)
    }

    /// Attribute store of a node.
    pub fn attributes(&self, id: NodeId) -> NodeResult<&AttributeStore> {
        self.data(id).map(|d| &d.attributes)
    }

    /// Mutable attribute store of a node.
    pub fn attributes_mut(&mut self, id: NodeId) -> NodeResult<&mut AttributeStore> {
        self.data_mut(id).map(|d| &mut d.attributes)
    }

    /// The live widget behind a slot.
    pub fn instance(&self, id: NodeId) -> NodeResult<&dyn Widget> {
        self.data(id)?
            .instance
            .as_deref()
            .ok_or(NodeError::NoInstance(id))
    }

    /// The live widget behind a slot, mutably.
    pub fn instance_mut(&mut self, id: NodeId) -> NodeResult<&mut (dyn Widget + 'static)> {
        self.data_mut(id)?
            .instance
            .as_deref_mut()
            .ok_or(NodeError::NoInstance(id))
    }

    /// Swap the widget behind a slot, returning the previous one.
    ///
    /// Tree position, children, attributes and bounds are untouched.
    pub fn replace_instance(&mut self, id: NodeId, instance: Box<dyn Widget>) -> NodeResult<Box<dyn Widget>> {
        let data = self.data_mut(id)?;
        let old = data.instance.take().ok_or(NodeError::NoInstance(id))?;
        data.type_name = instance.type_name().to_owned();
        data.instance = Some(instance);
        data.generation = data.generation.wrapping_add(1);
        tracing::trace!(target: targets::NODE, ?id, generation = data.generation, "replaced instance");
        Ok(old)
    }

    /// How many times the instance behind a slot has been replaced.
    pub fn generation(&self, id: NodeId) -> NodeResult<u32> {
        self.data(id).map(|d| d.generation)
    }

    /// Bounds last reported for a node.
    pub fn bounds(&self, id: NodeId) -> NodeResult<Option<Rect>> {
        self.data(id).map(|d| d.bounds)
    }

    /// Record the host-laid-out bounds of a node.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Option<Rect>) -> NodeResult<()> {
        self.data_mut(id).map(|d| d.bounds = bounds)
    }

    /// Stacking axis of a container. The document root stacks vertically.
    pub fn layout_axis(&self, id: NodeId) -> NodeResult<Option<LayoutAxis>> {
        let data = self.data(id)?;
        Ok(match data.role {
            NodeRole::Root => Some(LayoutAxis::Vertical),
            _ => data.instance.as_ref().and_then(|w| w.layout_axis()),
        })
    }
}

impl fmt::Debug for NodeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeTree")
            .field("nodes", &self.nodes.len())
            .field("root", &self.root)
            .field("top_level", &self.top_level())
            .finish()
    }
}
