//! Drag-and-drop protocol.
//!
//! A drag session moves through `Idle → Started → Hovering → Idle`:
//!
//! - [`Document::begin_drag`] starts a session for an existing node or a
//!   palette template. An existing node is lifted out of the tree right
//!   away, unless its container orders its own items, in which case it
//!   stays put until the pointer enters a container that does not.
//! - [`Document::drag_over`] parks the placeholder at the insertion index
//!   under the pointer. The placeholder only moves when that index changes.
//! - [`Document::drag_exit`] removes the placeholder, puts a lifted node
//!   back where it came from and records a snapshot.
//! - [`Document::drop_payload`] inserts the payload and records a snapshot.
//! - [`Document::cancel_drag`] ends the session; an existing payload is
//!   destroyed.

use horizon_designer_core::logging::targets;
use horizon_designer_core::{
    AttributeStore, CapabilityError, NodeError, NodeId, NodeRole, Point,
};

use crate::document::Document;
use crate::error::{DesignerError, Result};
use crate::palette::PaletteTemplate;

/// Width and height every dropped template starts with.
const DEFAULT_LAYOUT_SIZE: [(&str, &str); 2] = [
    ("android:layout_width", "wrap_content"),
    ("android:layout_height", "wrap_content"),
];

/// What is being dragged.
#[derive(Debug, Clone, PartialEq)]
pub enum DragPayload {
    /// A node already in the document, being repositioned.
    Existing(NodeId),
    /// A new node to build from a palette template.
    Template(PaletteTemplate),
}

/// Observable state of the drag session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Started,
    /// The placeholder sits at `index` among `container`'s children.
    Hovering { container: NodeId, index: usize },
}

/// Where a drop landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropOutcome {
    pub node: NodeId,
    pub container: NodeId,
    pub index: usize,
}

#[derive(Debug, Default)]
pub(crate) struct DragSession {
    state: DragState,
    payload: Option<DragPayload>,
    /// Where an existing payload was taken from.
    origin: Option<(NodeId, usize)>,
    /// The existing payload is still attached at its origin.
    deferred: bool,
}

impl DragSession {
    pub(crate) fn state(&self) -> DragState {
        self.state
    }

    fn existing(&self) -> Option<NodeId> {
        match self.payload {
            Some(DragPayload::Existing(node)) => Some(node),
            _ => None,
        }
    }
}

impl Document {
    pub fn drag_state(&self) -> DragState {
        self.drag.state
    }

    pub fn drag_payload(&self) -> Option<&DragPayload> {
        self.drag.payload.as_ref()
    }

    fn is_container(&self, node: NodeId) -> Result<bool> {
        Ok(match self.tree.role(node)? {
            NodeRole::Root => true,
            NodeRole::Widget => self.registry.traits(self.tree.type_name(node)?).container,
            NodeRole::Placeholder => false,
        })
    }

    fn manages_items(&self, node: NodeId) -> Result<bool> {
        Ok(self.tree.role(node)? == NodeRole::Widget
            && self.registry.traits(self.tree.type_name(node)?).manages_items)
    }

    /// Start dragging `payload`.
    pub fn begin_drag(&mut self, payload: DragPayload) -> Result<()> {
        if self.drag.state != DragState::Idle {
            return Err(DesignerError::DragInProgress);
        }

        let mut session = DragSession {
            state: DragState::Started,
            ..DragSession::default()
        };
        match &payload {
            DragPayload::Existing(node) => {
                let node = *node;
                if self.tree.role(node)? != NodeRole::Widget {
                    return Err(NodeError::ReservedNode(node).into());
                }
                if let Some(parent) = self.tree.parent(node)? {
                    let index = self.tree.sibling_index(node)?.unwrap_or_default();
                    session.origin = Some((parent, index));
                    session.deferred = self.manages_items(parent)?;
                }
                if !session.deferred {
                    self.tree.detach(node)?;
                }
            }
            DragPayload::Template(template) => {
                if !self.registry.can_construct(&template.concrete_type) {
                    return Err(CapabilityError::UnknownNodeType(template.concrete_type.clone()).into());
                }
            }
        }

        tracing::debug!(target: targets::DRAG, ?payload, deferred = session.deferred, "drag started");
        session.payload = Some(payload);
        self.drag = session;
        Ok(())
    }

    /// Fail unless `container` accepts the payload.
    fn check_target(&self, container: NodeId) -> Result<()> {
        if !self.is_container(container)? {
            return Err(DesignerError::NotAContainer(container));
        }
        if let Some(node) = self.drag.existing() {
            if self.tree.is_ancestor_of(node, container) {
                return Err(NodeError::CircularParentage.into());
            }
        }
        Ok(())
    }

    /// Detach an existing payload that is still in the tree.
    fn lift_payload(&mut self) -> Result<()> {
        if let Some(node) = self.drag.existing() {
            if self.tree.contains(node) && self.tree.parent(node)?.is_some() {
                self.tree.detach(node)?;
            }
        }
        self.drag.deferred = false;
        Ok(())
    }

    /// Children of `container` that count for positioning: everything but
    /// the placeholder and the payload.
    fn positioned_children(&self, container: NodeId) -> Result<Vec<NodeId>> {
        let placeholder = self.tree.placeholder();
        let payload = self.drag.existing();
        Ok(self
            .tree
            .children(container)?
            .iter()
            .copied()
            .filter(|&c| c != placeholder && Some(c) != payload)
            .collect())
    }

    /// Number of positioned children whose trailing edge precedes `point`
    /// along the container's axis. Children without reported bounds never
    /// precede it; containers without an axis append.
    fn insertion_index(&self, container: NodeId, point: Point) -> Result<usize> {
        let siblings = self.positioned_children(container)?;
        let Some(axis) = self.tree.layout_axis(container)? else {
            return Ok(siblings.len());
        };
        let pointer = point.along(axis);
        let mut index = 0;
        for sibling in siblings {
            match self.tree.bounds(sibling)? {
                Some(bounds) if bounds.trailing_edge(axis) < pointer => index += 1,
                _ => {}
            }
        }
        Ok(index)
    }

    /// Translate an index among positioned children into an index among
    /// all children except the placeholder.
    fn raw_index(&self, container: NodeId, index: usize) -> Result<usize> {
        let placeholder = self.tree.placeholder();
        let payload = self.drag.existing();
        let mut seen = 0;
        let mut raw = 0;
        for &child in self.tree.children(container)? {
            if child == placeholder {
                continue;
            }
            if Some(child) != payload {
                if seen == index {
                    return Ok(raw);
                }
                seen += 1;
            }
            raw += 1;
        }
        Ok(raw)
    }

    /// Track the pointer over `container` and return the insertion index.
    pub fn drag_over(&mut self, container: NodeId, point: Point) -> Result<usize> {
        if self.drag.state == DragState::Idle {
            return Err(DesignerError::NoActiveDrag);
        }
        self.check_target(container)?;
        if !(self.drag.deferred && self.manages_items(container)?) {
            self.lift_payload()?;
        }

        let index = self.insertion_index(container, point)?;
        let target = DragState::Hovering { container, index };
        if self.drag.state != target {
            let raw = self.raw_index(container, index)?;
            self.tree.attach(self.tree.placeholder(), container, Some(raw))?;
            tracing::trace!(target: targets::DRAG, ?container, index, "placeholder moved");
        }
        self.drag.state = target;
        Ok(index)
    }

    /// The pointer left every container without dropping.
    pub fn drag_exit(&mut self) -> Result<()> {
        match self.drag.state {
            DragState::Idle => return Err(DesignerError::NoActiveDrag),
            DragState::Started => return Ok(()),
            DragState::Hovering { .. } => {}
        }
        self.tree.detach(self.tree.placeholder())?;
        if let (Some(node), Some((parent, index))) = (self.drag.existing(), self.drag.origin) {
            if self.tree.contains(parent) && self.tree.parent(node)?.is_none() {
                self.tree.attach(node, parent, Some(index))?;
            }
        }
        self.drag.state = DragState::Started;
        tracing::debug!(target: targets::DRAG, "drag exited");
        self.record_snapshot()
    }

    /// Drop the payload into `container` at the pointer.
    ///
    /// Dropping on the document root while it holds a top-level widget
    /// redirects into that widget if it is a container, and is rejected
    /// with [`DesignerError::TooManyRootChildren`] otherwise. A rejected
    /// payload is discarded and the session ends.
    pub fn drop_payload(&mut self, container: NodeId, point: Point) -> Result<DropOutcome> {
        if self.drag.state == DragState::Idle {
            return Err(DesignerError::NoActiveDrag);
        }
        self.check_target(container)?;

        let index = match self.drag.state {
            DragState::Hovering { container: hovered, index } if hovered == container => index,
            _ => self.insertion_index(container, point)?,
        };
        self.tree.detach(self.tree.placeholder())?;
        self.lift_payload()?;
        let raw = self.raw_index(container, index)?;
        let session = std::mem::take(&mut self.drag);
        let Some(payload) = session.payload else {
            return Err(DesignerError::NoActiveDrag);
        };

        let (target, position) = if container == self.tree.root() {
            match self.tree.top_level() {
                Some(top) if !self.is_container(top)? => {
                    tracing::warn!(target: targets::DRAG, ?top, "root already holds a widget that cannot take children");
                    if let DragPayload::Existing(node) = payload {
                        self.discard_subtree(node)?;
                    }
                    return Err(DesignerError::TooManyRootChildren);
                }
                Some(top) => (top, None),
                None => (container, Some(0)),
            }
        } else {
            (container, Some(raw))
        };

        let node = match payload {
            DragPayload::Existing(node) => {
                self.tree.attach(node, target, position)?;
                node
            }
            DragPayload::Template(template) => self.instantiate(&template, target, position)?,
        };

        let index = self.tree.sibling_index(node)?.unwrap_or_default();
        tracing::debug!(target: targets::DRAG, ?node, container = ?target, index, "dropped");
        self.record_snapshot()?;
        Ok(DropOutcome {
            node,
            container: target,
            index,
        })
    }

    fn instantiate(
        &mut self,
        template: &PaletteTemplate,
        parent: NodeId,
        position: Option<usize>,
    ) -> Result<NodeId> {
        let mut instance = self.registry.construct(&template.concrete_type)?;
        instance.set_minimum_size(self.minimum_size());
        let store: AttributeStore = DEFAULT_LAYOUT_SIZE.into_iter().collect();
        let node = self.tree.insert(instance, store);
        self.tree.attach(node, parent, position)?;

        for (key, value) in &template.default_attributes {
            match self.lookup_attribute(node, key) {
                Ok(definition) => {
                    if let Err(err) = self.apply_definition(node, &definition, value) {
                        tracing::warn!(target: targets::DRAG, ?node, key = %key, %err, "template default not applied");
                    }
                }
                Err(err) => {
                    tracing::warn!(target: targets::DRAG, ?node, key = %key, %err, "template default skipped");
                }
            }
        }
        Ok(node)
    }

    /// End the session without dropping. An existing payload is destroyed
    /// with its subtree. Calling this with no drag in progress does nothing.
    pub fn cancel_drag(&mut self) -> Result<()> {
        if self.drag.state == DragState::Idle {
            return Ok(());
        }
        self.tree.detach(self.tree.placeholder())?;
        let session = std::mem::take(&mut self.drag);
        if let Some(DragPayload::Existing(node)) = session.payload {
            if self.tree.contains(node) {
                self.discard_subtree(node)?;
            }
        }
        tracing::debug!(target: targets::DRAG, "drag cancelled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DesignerConfig;
    use crate::families::types;
    use horizon_designer_core::Rect;

    fn template(type_name: &str) -> DragPayload {
        DragPayload::Template(PaletteTemplate::new(type_name, type_name))
    }

    /// A vertical column holding three 40-high buttons, laid out top to
    /// bottom.
    fn setup() -> (Document, NodeId, Vec<NodeId>) {
        let mut doc = Document::standard(DesignerConfig::default()).unwrap();
        doc.open_markup(
            r#"<android.widget.LinearLayout android:orientation="vertical">
                <android.widget.Button android:id="@+id/a"/>
                <android.widget.Button android:id="@+id/b"/>
                <android.widget.Button android:id="@+id/c"/>
            </android.widget.LinearLayout>"#,
        )
        .unwrap();
        let column = doc.top_level().unwrap();
        let buttons = doc.children(column).unwrap().to_vec();
        for (i, &button) in buttons.iter().enumerate() {
            let bounds = Rect::new(0.0, 40.0 * i as f32, 100.0, 40.0);
            doc.set_node_bounds(button, Some(bounds)).unwrap();
        }
        (doc, column, buttons)
    }

    #[test]
    fn test_insertion_index_follows_trailing_edges() {
        let (mut doc, column, buttons) = setup();
        doc.begin_drag(template(types::TEXT_VIEW)).unwrap();
        assert_eq!(doc.drag_over(column, Point::new(5.0, 10.0)).unwrap(), 0);
        assert_eq!(doc.drag_over(column, Point::new(5.0, 50.0)).unwrap(), 1);
        assert_eq!(doc.drag_over(column, Point::new(5.0, 500.0)).unwrap(), 3);

        let children = doc.children(column).unwrap();
        assert_eq!(children.len(), 4);
        assert_eq!(children[3], doc.tree().placeholder());
        assert_eq!(&children[..3], &buttons[..]);
    }

    #[test]
    fn test_placeholder_stays_when_index_unchanged() {
        let (mut doc, column, _) = setup();
        doc.begin_drag(template(types::TEXT_VIEW)).unwrap();
        doc.drag_over(column, Point::new(5.0, 50.0)).unwrap();
        doc.drag_over(column, Point::new(5.0, 60.0)).unwrap();
        assert_eq!(
            doc.drag_state(),
            DragState::Hovering { container: column, index: 1 }
        );
        assert_eq!(doc.tree().sibling_index(doc.tree().placeholder()).unwrap(), Some(1));
    }

    #[test]
    fn test_reposition_existing_node() {
        let (mut doc, column, buttons) = setup();
        doc.begin_drag(DragPayload::Existing(buttons[0])).unwrap();
        assert_eq!(doc.children(column).unwrap().len(), 2);

        doc.drag_over(column, Point::new(5.0, 500.0)).unwrap();
        let outcome = doc.drop_payload(column, Point::new(5.0, 500.0)).unwrap();
        assert_eq!(outcome.node, buttons[0]);
        assert_eq!(doc.children(column).unwrap(), &[buttons[1], buttons[2], buttons[0]]);
        assert_eq!(doc.identifier(buttons[0]), Some("a"));
        assert_eq!(doc.drag_state(), DragState::Idle);
    }

    #[test]
    fn test_exit_restores_and_records() {
        let (mut doc, column, buttons) = setup();
        let before = doc.generate().unwrap();
        let history = doc.history().len();

        doc.begin_drag(DragPayload::Existing(buttons[1])).unwrap();
        doc.drag_over(column, Point::new(5.0, 10.0)).unwrap();
        doc.drag_exit().unwrap();

        assert_eq!(doc.drag_state(), DragState::Started);
        assert_eq!(doc.generate().unwrap(), before);
        assert_eq!(doc.history().len(), history + 1);
        assert!(!doc.tree().is_attached(doc.tree().placeholder()));
    }

    #[test]
    fn test_cancel_destroys_existing_payload() {
        let (mut doc, column, buttons) = setup();
        let history = doc.history().len();
        doc.begin_drag(DragPayload::Existing(buttons[2])).unwrap();
        doc.drag_over(column, Point::new(5.0, 10.0)).unwrap();
        doc.cancel_drag().unwrap();
        doc.cancel_drag().unwrap();

        assert!(!doc.tree().contains(buttons[2]));
        assert!(!doc.identifiers().contains("c"));
        assert_eq!(doc.children(column).unwrap(), &buttons[..2]);
        assert_eq!(doc.history().len(), history);
        assert_eq!(doc.drag_state(), DragState::Idle);
    }

    #[test]
    fn test_second_leaf_at_root_is_rejected() {
        let mut doc = Document::standard(DesignerConfig::default()).unwrap();
        let root = doc.root();
        doc.begin_drag(template(types::BUTTON)).unwrap();
        doc.drop_payload(root, Point::default()).unwrap();
        let before = doc.generate().unwrap();

        doc.begin_drag(template(types::TEXT_VIEW)).unwrap();
        let err = doc.drop_payload(root, Point::default()).unwrap_err();
        assert!(matches!(err, DesignerError::TooManyRootChildren));
        assert_eq!(doc.generate().unwrap(), before);
        assert_eq!(doc.drag_state(), DragState::Idle);
    }

    #[test]
    fn test_drop_on_root_redirects_into_top_container() {
        let (mut doc, column, _) = setup();
        let root = doc.root();
        doc.begin_drag(template(types::SWITCH)).unwrap();
        let outcome = doc.drop_payload(root, Point::default()).unwrap();
        assert_eq!(outcome.container, column);
        assert_eq!(outcome.index, 3);
    }

    #[test]
    fn test_drop_into_leaf_is_refused() {
        let (mut doc, _, buttons) = setup();
        doc.begin_drag(template(types::TEXT_VIEW)).unwrap();
        assert!(matches!(
            doc.drag_over(buttons[0], Point::default()),
            Err(DesignerError::NotAContainer(_))
        ));
        assert!(matches!(doc.drag_state(), DragState::Started));
    }

    #[test]
    fn test_drop_into_own_subtree_is_refused() {
        let (mut doc, column, _) = setup();
        doc.begin_drag(DragPayload::Existing(column)).unwrap();
        assert!(matches!(
            doc.drag_over(column, Point::default()),
            Err(DesignerError::Node(NodeError::CircularParentage))
        ));
        doc.cancel_drag().unwrap();
        assert!(doc.top_level().is_none());
    }

    #[test]
    fn test_item_managing_container_defers_detach() {
        let mut doc = Document::standard(DesignerConfig::default()).unwrap();
        doc.open_markup(
            r#"<android.widget.LinearLayout>
                <android.widget.ListView>
                    <android.widget.TextView android:id="@+id/row"/>
                </android.widget.ListView>
                <android.widget.FrameLayout/>
            </android.widget.LinearLayout>"#,
        )
        .unwrap();
        let top = doc.top_level().unwrap();
        let list = doc.children(top).unwrap()[0];
        let frame = doc.children(top).unwrap()[1];
        let row = doc.node_for_identifier("row").unwrap();

        doc.begin_drag(DragPayload::Existing(row)).unwrap();
        assert_eq!(doc.parent(row).unwrap(), Some(list));
        doc.drag_over(list, Point::default()).unwrap();
        assert_eq!(doc.parent(row).unwrap(), Some(list));
        doc.drag_over(frame, Point::default()).unwrap();
        assert_eq!(doc.parent(row).unwrap(), None);

        doc.drop_payload(frame, Point::default()).unwrap();
        assert_eq!(doc.parent(row).unwrap(), Some(frame));
    }

    #[test]
    fn test_protocol_guards() {
        let (mut doc, column, _) = setup();
        assert!(matches!(doc.drag_over(column, Point::default()), Err(DesignerError::NoActiveDrag)));
        assert!(matches!(doc.drag_exit(), Err(DesignerError::NoActiveDrag)));
        doc.begin_drag(template(types::BUTTON)).unwrap();
        assert!(matches!(
            doc.begin_drag(template(types::BUTTON)),
            Err(DesignerError::DragInProgress)
        ));
        assert!(matches!(
            Document::standard(DesignerConfig::default())
                .unwrap()
                .begin_drag(template("android.widget.Unknown")),
            Err(DesignerError::Capability(CapabilityError::UnknownNodeType(_)))
        ));
    }
}
