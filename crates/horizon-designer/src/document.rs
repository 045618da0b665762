//! The editable layout document.
//!
//! A [`Document`] owns one node tree together with everything needed to edit
//! it: the identifier registry, the attribute schema, the capability
//! registry, the undo history and the drag session. All mutation goes
//! through `&mut self` methods, so a single owner (or a
//! [`SharedDocument`](crate::SharedDocument)) serializes every entry point.
//!
//! Attribute edits follow one path: resolve the definition for the node,
//! store the raw value, then push it into the live widget through the
//! definition's setter. Setter failures are logged and returned, but the
//! stored value is kept.
//!
//! # Example
//!
//! ```
//! use horizon_designer::{Document, DesignerConfig, DragPayload, PaletteTemplate};
//! use horizon_designer::families::types;
//! use horizon_designer_core::Point;
//!
//! let mut doc = Document::standard(DesignerConfig::default()).unwrap();
//! assert_eq!(doc.generate().unwrap(), "");
//!
//! doc.begin_drag(DragPayload::Template(PaletteTemplate::new("Frame", types::FRAME_LAYOUT)))
//!     .unwrap();
//! let root = doc.root();
//! let dropped = doc.drop_payload(root, Point::new(10.0, 10.0)).unwrap();
//! assert_eq!(doc.top_level(), Some(dropped.node));
//! ```

use std::sync::Arc;

use horizon_designer_core::logging::{span_names, targets};
use horizon_designer_core::{
    id_reference, lookup_by_key, strip_id_prefix, AttributeDefinition, AttributeSchema,
    AttributeStore, CapabilityRegistry, IdentifierRegistry, NodeError, NodeId, NodeTree,
    NodeTreeDebug, PerfSpan, Rect, Signal, Size, TreeFormatOptions, Widget, ID_ATTRIBUTE,
    NEW_ID_PREFIX,
};

use crate::config::DesignerConfig;
use crate::drag::DragSession;
use crate::error::{DesignerError, Result};
use crate::families::{standard_registry, standard_schema};
use crate::history::{HistoryState, UndoRedoHistory};
use crate::markup::{self, MarkupContext};

/// An editable layout with its history and drag session.
pub struct Document {
    pub(crate) tree: NodeTree,
    pub(crate) identifiers: IdentifierRegistry,
    schema: Arc<AttributeSchema>,
    pub(crate) registry: Arc<CapabilityRegistry>,
    config: DesignerConfig,
    history: UndoRedoHistory,
    pub(crate) drag: DragSession,
    changed: Signal<Arc<str>>,
    history_changed: Signal<HistoryState>,
}

impl Document {
    /// Create an empty document.
    pub fn new(
        schema: Arc<AttributeSchema>,
        registry: Arc<CapabilityRegistry>,
        config: DesignerConfig,
    ) -> Self {
        let history = UndoRedoHistory::new(config.history_capacity, config.history_dedupe);
        Self {
            tree: NodeTree::new(),
            identifiers: IdentifierRegistry::new(),
            schema,
            registry,
            config,
            history,
            drag: DragSession::default(),
            changed: Signal::new(),
            history_changed: Signal::new(),
        }
    }

    /// Create an empty document over the standard families and schema.
    pub fn standard(config: DesignerConfig) -> Result<Self> {
        let schema = standard_schema()?;
        Ok(Self::new(
            Arc::new(schema),
            Arc::new(standard_registry()),
            config,
        ))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    pub fn identifiers(&self) -> &IdentifierRegistry {
        &self.identifiers
    }

    pub fn schema(&self) -> &AttributeSchema {
        &self.schema
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    pub fn config(&self) -> &DesignerConfig {
        &self.config
    }

    pub fn history(&self) -> &UndoRedoHistory {
        &self.history
    }

    /// Emitted with the new markup after every recorded change, load, undo
    /// and redo.
    pub fn changed(&self) -> &Signal<Arc<str>> {
        &self.changed
    }

    /// Emitted whenever undo/redo availability may have changed.
    pub fn history_changed(&self) -> &Signal<HistoryState> {
        &self.history_changed
    }

    /// The synthetic document root.
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// The single top-level widget, if any.
    pub fn top_level(&self) -> Option<NodeId> {
        self.tree.top_level()
    }

    pub fn children(&self, node: NodeId) -> Result<&[NodeId]> {
        Ok(self.tree.children(node)?)
    }

    pub fn parent(&self, node: NodeId) -> Result<Option<NodeId>> {
        Ok(self.tree.parent(node)?)
    }

    pub fn type_name(&self, node: NodeId) -> Result<&str> {
        Ok(self.tree.type_name(node)?)
    }

    pub fn attributes(&self, node: NodeId) -> Result<&AttributeStore> {
        Ok(self.tree.attributes(node)?)
    }

    pub fn instance(&self, node: NodeId) -> Result<&dyn Widget> {
        Ok(self.tree.instance(node)?)
    }

    /// The live widget behind `node`, if it is a `T`.
    pub fn widget_as<T: Widget>(&self, node: NodeId) -> Option<&T> {
        self.tree
            .instance(node)
            .ok()
            .and_then(|w| w.as_any().downcast_ref::<T>())
    }

    /// The identifier held by `node`, without prefix.
    pub fn identifier(&self, node: NodeId) -> Option<&str> {
        self.identifiers.name_of(node)
    }

    /// The node holding an identifier; either prefix is accepted.
    pub fn node_for_identifier(&self, name: &str) -> Option<NodeId> {
        self.identifiers.node_for(name)
    }

    /// Every widget below the root in depth-first pre-order.
    pub fn preorder(&self) -> Result<Vec<NodeId>> {
        match self.tree.top_level() {
            Some(top) => Ok(self.tree.depth_first_preorder(top)?),
            None => Ok(Vec::new()),
        }
    }

    /// Record the bounds the host laid `node` out at.
    pub fn set_node_bounds(&mut self, node: NodeId, bounds: Option<Rect>) -> Result<()> {
        Ok(self.tree.set_bounds(node, bounds)?)
    }

    /// Render the tree for debugging.
    pub fn dump_tree(&self, options: TreeFormatOptions) -> Result<String> {
        Ok(NodeTreeDebug::with_options(options).format_tree(&self.tree, Some(&self.identifiers))?)
    }

    pub(crate) fn minimum_size(&self) -> Size {
        Size::square(self.config.minimum_node_size_dp)
    }

    // =========================================================================
    // Attribute resolution
    // =========================================================================

    /// Type of the container granting attributes to `node`; `None` under the
    /// root or when detached.
    fn container_type(&self, node: NodeId) -> Result<Option<String>> {
        match self.tree.parent(node)? {
            Some(parent) if parent != self.tree.root() => {
                Ok(Some(self.tree.type_name(parent)?.to_owned()))
            }
            _ => Ok(None),
        }
    }

    /// Definitions applicable to `node`: container-contributed entries
    /// first, then own-type entries, each from the most general family to
    /// the most specific.
    pub fn resolve_attributes(&self, node: NodeId) -> Result<Vec<Arc<AttributeDefinition>>> {
        let container = self.container_type(node)?;
        Ok(self
            .schema
            .resolve(&self.registry, self.tree.type_name(node)?, container.as_deref()))
    }

    /// Resolved definitions whose key is not yet set on `node`.
    pub fn available_attributes(&self, node: NodeId) -> Result<Vec<Arc<AttributeDefinition>>> {
        let store = self.tree.attributes(node)?;
        Ok(self
            .resolve_attributes(node)?
            .into_iter()
            .filter(|def| !store.contains(&def.name))
            .collect())
    }

    /// The definition of `key` for `node`.
    pub fn lookup_attribute(&self, node: NodeId, key: &str) -> Result<Arc<AttributeDefinition>> {
        let resolved = self.resolve_attributes(node)?;
        lookup_by_key(key, &resolved)
            .cloned()
            .ok_or_else(|| DesignerError::UnknownAttribute {
                node,
                key: key.to_owned(),
            })
    }

    // =========================================================================
    // Attribute mutation
    // =========================================================================

    /// Set `key` to `value` on `node`.
    ///
    /// Fails before any mutation if the key is unknown for the node or the
    /// value claims an identifier another node holds. A failing setter is
    /// reported after the value has been stored.
    pub fn apply_attribute(&mut self, node: NodeId, key: &str, value: &str) -> Result<()> {
        let definition = self.lookup_attribute(node, key)?;
        self.apply_definition(node, &definition, value)
    }

    pub(crate) fn apply_definition(
        &mut self,
        node: NodeId,
        definition: &AttributeDefinition,
        value: &str,
    ) -> Result<()> {
        if definition.name == ID_ATTRIBUTE {
            let previous = self.identifiers.name_of(node).map(str::to_owned);
            self.identifiers.assign(node, value)?;
            if let Some(old) = previous.filter(|_| value.starts_with(NEW_ID_PREFIX)) {
                let new = strip_id_prefix(value);
                if old != new {
                    self.repair_references(node, &old, new)?;
                }
            }
            self.tree.attributes_mut(node)?.put(ID_ATTRIBUTE, value);
            self.tree
                .instance_mut(node)?
                .set_identifier(Some(strip_id_prefix(value)));
            tracing::debug!(target: targets::DOCUMENT, ?node, identifier = strip_id_prefix(value), "identifier assigned");
            return Ok(());
        }

        self.tree.attributes_mut(node)?.put(&definition.name, value);
        tracing::debug!(target: targets::DOCUMENT, ?node, key = %definition.name, value, "attribute stored");
        self.invoke_setter(node, definition, value)
    }

    fn invoke_setter(&mut self, node: NodeId, definition: &AttributeDefinition, value: &str) -> Result<()> {
        let instance = self.tree.instance_mut(node)?;
        self.registry
            .invoke(definition, instance, value)
            .map_err(|err| {
                tracing::warn!(target: targets::DOCUMENT, ?node, key = %definition.name, %err, "setter failed");
                err.into()
            })
    }

    /// Rewrite references to `old` into references to `new` on every node
    /// but `renamed`, re-applying each rewritten attribute.
    fn repair_references(&mut self, renamed: NodeId, old: &str, new: &str) -> Result<()> {
        let old_reference = id_reference(old);
        let new_reference = id_reference(new);
        let holders: Vec<NodeId> = self.tree.widget_nodes().filter(|&id| id != renamed).collect();

        for holder in holders {
            let store = self.tree.attributes_mut(holder)?;
            let keys: Vec<String> = store
                .iter()
                .filter(|(_, value)| *value == old_reference)
                .map(|(key, _)| key.to_owned())
                .collect();
            if keys.is_empty() {
                continue;
            }
            store.replace_values(&old_reference, &new_reference);
            tracing::debug!(target: targets::DOCUMENT, node = ?holder, old, new, count = keys.len(), "repaired identifier references");

            let resolved = self.resolve_attributes(holder)?;
            for key in keys {
                if let Some(definition) = lookup_by_key(&key, &resolved) {
                    // Setter failures are already logged; the reference text is
                    // what matters for the document.
                    let _ = self.invoke_setter(holder, definition, &new_reference);
                }
            }
        }
        Ok(())
    }

    /// Remove every reference to identifier `name` from nodes outside
    /// `skip`, rebuilding each node that lost one.
    fn clear_references(&mut self, name: &str, skip: &[NodeId]) -> Result<()> {
        let reference = id_reference(name);
        let holders: Vec<NodeId> = self
            .tree
            .widget_nodes()
            .filter(|id| !skip.contains(id))
            .collect();
        for holder in holders {
            let removed = self.tree.attributes_mut(holder)?.remove_values(&reference);
            if !removed.is_empty() {
                tracing::debug!(target: targets::DOCUMENT, node = ?holder, identifier = name, keys = ?removed, "cleared identifier references");
                self.reconstruct(holder)?;
            }
        }
        Ok(())
    }

    /// Replace the widget behind `node` with a fresh instance and re-apply
    /// its stored attributes.
    ///
    /// The slot, tree position, children, identifier and bounds are kept.
    #[tracing::instrument(skip(self), target = "horizon_designer::document", level = "debug")]
    pub(crate) fn reconstruct(&mut self, node: NodeId) -> Result<()> {
        let _perf = PerfSpan::new(span_names::RECONSTRUCT);
        let type_name = self.tree.type_name(node)?.to_owned();
        let mut instance = self.registry.construct(&type_name)?;
        instance.set_minimum_size(self.minimum_size());
        self.tree.replace_instance(node, instance)?;

        let resolved = self.resolve_attributes(node)?;
        let store = self.tree.attributes(node)?;
        let identifier = store.get(ID_ATTRIBUTE).map(|value| strip_id_prefix(value).to_owned());
        let entries: Vec<(String, String)> = store
            .iter()
            .filter(|(key, _)| *key != ID_ATTRIBUTE)
            .map(|(key, value)| (key.to_owned(), value.to_owned()))
            .collect();
        if let Some(identifier) = identifier {
            self.tree.instance_mut(node)?.set_identifier(Some(&identifier));
        }

        for (key, value) in entries {
            match lookup_by_key(&key, &resolved) {
                Some(definition) => {
                    let _ = self.invoke_setter(node, definition, &value);
                }
                None => {
                    tracing::warn!(target: targets::DOCUMENT, ?node, key = %key, "stored attribute has no definition, not re-applied");
                }
            }
        }
        Ok(())
    }

    /// Remove `key` from `node` and return the slot to keep editing.
    ///
    /// Non-deletable attributes and absent keys are left alone. Removing the
    /// identifier releases it and clears references to it elsewhere; any
    /// other key rebuilds the widget so the setter's effect is undone. The
    /// returned slot is always `node`.
    pub fn remove_attribute(&mut self, node: NodeId, key: &str) -> Result<NodeId> {
        if self.remove_attribute_inner(node, key)? {
            self.record_snapshot()?;
        }
        Ok(node)
    }

    fn remove_attribute_inner(&mut self, node: NodeId, key: &str) -> Result<bool> {
        let resolved = self.resolve_attributes(node)?;
        if lookup_by_key(key, &resolved).is_some_and(|def| !def.deletable) {
            tracing::debug!(target: targets::DOCUMENT, ?node, key, "attribute is not deletable");
            return Ok(false);
        }
        if !self.tree.attributes(node)?.contains(key) {
            return Ok(false);
        }

        if key == ID_ATTRIBUTE {
            self.tree.attributes_mut(node)?.remove(key);
            self.tree.instance_mut(node)?.set_identifier(None);
            if let Some(name) = self.identifiers.release(node) {
                self.clear_references(&name, &[node])?;
            }
        } else {
            self.tree.attributes_mut(node)?.remove(key);
            self.reconstruct(node)?;
        }
        tracing::debug!(target: targets::DOCUMENT, ?node, key, "attribute removed");
        Ok(true)
    }

    /// Commit a value from an attribute editor.
    ///
    /// A value equal to the definition's default removes the attribute
    /// instead. One snapshot is recorded either way.
    pub fn commit_attribute_edit(&mut self, node: NodeId, key: &str, value: &str) -> Result<()> {
        let definition = self.lookup_attribute(node, key)?;
        let outcome = if definition.default_value.as_deref() == Some(value) {
            self.remove_attribute_inner(node, key).map(|_| ())
        } else {
            self.apply_definition(node, &definition, value)
        };
        match outcome {
            Err(DesignerError::Identifier(err)) => Err(err.into()),
            other => {
                self.record_snapshot()?;
                other
            }
        }
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Delete `node` and its subtree, releasing identifiers and clearing
    /// references to them.
    pub fn delete_node(&mut self, node: NodeId) -> Result<()> {
        if node == self.tree.root() || node == self.tree.placeholder() {
            return Err(NodeError::ReservedNode(node).into());
        }
        self.discard_subtree(node)?;
        self.record_snapshot()
    }

    pub(crate) fn discard_subtree(&mut self, node: NodeId) -> Result<()> {
        let doomed = self.tree.depth_first_preorder(node)?;
        let released = self.identifiers.release_subtree(&self.tree, node)?;
        for name in &released {
            self.clear_references(name, &doomed)?;
        }
        let destroyed = self.tree.destroy(node)?;
        tracing::debug!(target: targets::DOCUMENT, ?node, nodes = destroyed.len(), identifiers = released.len(), "subtree discarded");
        Ok(())
    }

    // =========================================================================
    // Markup and history
    // =========================================================================

    fn markup_context(&self) -> MarkupContext<'_> {
        MarkupContext {
            schema: &self.schema,
            registry: &self.registry,
            config: &self.config,
        }
    }

    /// Serialize the document.
    pub fn generate(&self) -> Result<String> {
        let _perf = PerfSpan::new(span_names::GENERATE);
        Ok(markup::generate(&self.tree, &self.markup_context())?)
    }

    /// Replace the document with parsed markup without recording history.
    ///
    /// On error the document is unchanged. Any drag in progress is dropped
    /// since its nodes belong to the old tree.
    pub fn load_markup(&mut self, text: &str) -> Result<()> {
        let _perf = PerfSpan::new(span_names::LOAD);
        let layout = markup::parse(text, &self.markup_context())?;
        self.tree = layout.tree;
        self.identifiers = layout.identifiers;
        self.drag = DragSession::default();
        tracing::debug!(target: targets::DOCUMENT, identifiers = self.identifiers.len(), "document loaded");
        Ok(())
    }

    /// Load markup and record it as a new history entry.
    pub fn open_markup(&mut self, text: &str) -> Result<()> {
        self.load_markup(text)?;
        self.record_snapshot()
    }

    /// Serialize the document into the history and notify listeners.
    pub fn record_snapshot(&mut self) -> Result<()> {
        let snapshot: Arc<str> = Arc::from(self.generate()?);
        self.history.record(Arc::clone(&snapshot));
        self.changed.emit(snapshot);
        self.history_changed.emit(self.history.state());
        Ok(())
    }

    /// Step back one snapshot. Returns `false` at the oldest entry.
    pub fn undo(&mut self) -> Result<bool> {
        let Some(snapshot) = self.history.undo() else {
            return Ok(false);
        };
        self.restore(snapshot)?;
        Ok(true)
    }

    /// Step forward one snapshot. Returns `false` at the newest entry.
    pub fn redo(&mut self) -> Result<bool> {
        let Some(snapshot) = self.history.redo() else {
            return Ok(false);
        };
        self.restore(snapshot)?;
        Ok(true)
    }

    fn restore(&mut self, snapshot: Arc<str>) -> Result<()> {
        self.load_markup(&snapshot)?;
        self.changed.emit(snapshot);
        self.history_changed.emit(self.history.state());
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Forget every snapshot.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.history_changed.emit(self.history.state());
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("tree", &self.tree)
            .field("identifiers", &self.identifiers.len())
            .field("history", &self.history.len())
            .field("drag", &self.drag.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::families::{types, StandardWidget};
    use crate::drag::DragPayload;
    use crate::palette::PaletteTemplate;
    use horizon_designer_core::Point;

    fn setup() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::standard(DesignerConfig::default()).unwrap();
        doc.open_markup(
            r#"<android.widget.LinearLayout android:layout_width="match_parent"
                    android:layout_height="wrap_content" android:orientation="vertical">
                <android.widget.Button android:id="@+id/ok" android:text="OK"/>
                <android.widget.TextView android:text="@id/ok" android:textSize="18sp"/>
            </android.widget.LinearLayout>"#,
        )
        .unwrap();
        let top = doc.top_level().unwrap();
        let children = doc.children(top).unwrap().to_vec();
        (doc, top, children[0], children[1])
    }

    #[test]
    fn test_resolution_order_and_stability() {
        let (doc, _, button, _) = setup();
        let first = doc.resolve_attributes(button).unwrap();
        let names: Vec<_> = first.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names[0], "android:layout_margin");
        assert!(names.iter().position(|n| *n == "android:layout_weight").unwrap()
            < names.iter().position(|n| *n == "android:id").unwrap());
        assert_eq!(names.last(), Some(&"android:textStyle"));
        assert_eq!(first, doc.resolve_attributes(button).unwrap());
    }

    #[test]
    fn test_top_level_has_no_container_entries() {
        let (doc, top, _, _) = setup();
        let names: Vec<_> = doc
            .resolve_attributes(top)
            .unwrap()
            .iter()
            .map(|d| d.name.clone())
            .collect();
        assert_eq!(names[0], ID_ATTRIBUTE);
        assert!(!names.iter().any(|n| n == "android:layout_weight"));
    }

    #[test]
    fn test_available_attributes_excludes_set_keys() {
        let (doc, _, button, _) = setup();
        let available = doc.available_attributes(button).unwrap();
        assert!(!available.iter().any(|d| d.name == "android:text"));
        assert!(available.iter().any(|d| d.name == "android:textColor"));
    }

    #[test]
    fn test_unknown_attribute() {
        let (mut doc, _, button, _) = setup();
        let err = doc.apply_attribute(button, "android:orientation", "vertical").unwrap_err();
        assert!(matches!(err, DesignerError::UnknownAttribute { .. }));
        assert!(!doc.attributes(button).unwrap().contains("android:orientation"));
    }

    #[test]
    fn test_setter_failure_keeps_stored_value() {
        let (mut doc, _, button, _) = setup();
        let err = doc.apply_attribute(button, "android:alpha", "lots").unwrap_err();
        assert!(matches!(err, DesignerError::Capability(_)));
        assert_eq!(doc.attributes(button).unwrap().get("android:alpha"), Some("lots"));
    }

    #[test]
    fn test_identifier_conflict_mutates_nothing() {
        let (mut doc, _, _, text) = setup();
        let err = doc.apply_attribute(text, ID_ATTRIBUTE, "@+id/ok").unwrap_err();
        assert!(matches!(err, DesignerError::Identifier(_)));
        assert!(!doc.attributes(text).unwrap().contains(ID_ATTRIBUTE));
        assert_eq!(doc.identifier(text), None);
    }

    #[test]
    fn test_rename_repairs_references() {
        let (mut doc, _, button, text) = setup();
        doc.apply_attribute(button, ID_ATTRIBUTE, "@+id/confirm").unwrap();
        assert_eq!(doc.attributes(text).unwrap().get("android:text"), Some("@id/confirm"));
        assert_eq!(doc.attributes(text).unwrap().get("android:textSize"), Some("18sp"));
        assert_eq!(doc.node_for_identifier("confirm"), Some(button));
        assert_eq!(doc.node_for_identifier("ok"), None);
        let widget = doc.widget_as::<StandardWidget>(text).unwrap();
        assert_eq!(widget.text.as_ref().unwrap().text, "@id/confirm");
        let widget = doc.widget_as::<StandardWidget>(button).unwrap();
        assert_eq!(widget.view.id.as_deref(), Some("confirm"));
    }

    #[test]
    fn test_remove_attribute_rebuilds_in_place() {
        let (mut doc, top, button, _) = setup();
        doc.apply_attribute(button, "android:alpha", "0.5").unwrap();
        let generation = doc.tree().generation(button).unwrap();

        let kept = doc.remove_attribute(button, "android:alpha").unwrap();
        assert_eq!(kept, button);
        assert_eq!(doc.tree().generation(button).unwrap(), generation + 1);
        assert_eq!(doc.children(top).unwrap()[0], button);
        assert_eq!(doc.identifier(button), Some("ok"));
        assert!(!doc.attributes(button).unwrap().contains("android:alpha"));

        let widget = doc.widget_as::<StandardWidget>(button).unwrap();
        assert_eq!(widget.view.alpha, 1.0);
        assert_eq!(widget.view.id.as_deref(), Some("ok"));
        assert_eq!(widget.text.as_ref().unwrap().text, "OK");
    }

    #[test]
    fn test_non_deletable_attribute_is_kept() {
        let (mut doc, top, _, _) = setup();
        let before = doc.history().len();
        doc.remove_attribute(top, "android:layout_width").unwrap();
        assert_eq!(doc.attributes(top).unwrap().get("android:layout_width"), Some("match_parent"));
        assert_eq!(doc.history().len(), before);
    }

    #[test]
    fn test_remove_identifier_clears_references() {
        let (mut doc, _, button, text) = setup();
        doc.remove_attribute(button, ID_ATTRIBUTE).unwrap();
        assert!(!doc.identifiers().contains("ok"));
        assert!(!doc.attributes(button).unwrap().contains(ID_ATTRIBUTE));
        assert!(!doc.attributes(text).unwrap().contains("android:text"));
        assert_eq!(doc.attributes(text).unwrap().get("android:textSize"), Some("18sp"));
        assert_eq!(doc.widget_as::<StandardWidget>(button).unwrap().view.id, None);
    }

    #[test]
    fn test_commit_default_value_removes() {
        let (mut doc, _, _, text) = setup();
        let before = doc.history().len();
        doc.commit_attribute_edit(text, "android:textSize", "14sp").unwrap();
        assert!(!doc.attributes(text).unwrap().contains("android:textSize"));
        assert_eq!(doc.history().len(), before + 1);

        doc.commit_attribute_edit(text, "android:textColor", "#FF0000").unwrap();
        assert_eq!(doc.attributes(text).unwrap().get("android:textColor"), Some("#FF0000"));
        assert_eq!(doc.history().len(), before + 2);
    }

    #[test]
    fn test_delete_node_releases_identifiers() {
        let (mut doc, top, button, text) = setup();
        doc.delete_node(button).unwrap();
        assert_eq!(doc.children(top).unwrap(), &[text]);
        assert!(!doc.identifiers().contains("ok"));
        assert!(!doc.attributes(text).unwrap().contains("android:text"));
        assert!(doc.delete_node(doc.root()).is_err());
    }

    #[test]
    fn test_undo_redo_restores_markup() {
        let (mut doc, _, button, _) = setup();
        let original = doc.generate().unwrap();
        doc.commit_attribute_edit(button, "android:text", "Apply").unwrap();
        let edited = doc.generate().unwrap();

        assert!(doc.undo().unwrap());
        assert_eq!(doc.generate().unwrap(), original);
        assert!(!doc.undo().unwrap());
        assert!(doc.redo().unwrap());
        assert_eq!(doc.generate().unwrap(), edited);
        assert!(!doc.redo().unwrap());
    }

    #[test]
    fn test_failed_load_keeps_document() {
        let (mut doc, _, _, _) = setup();
        let before = doc.generate().unwrap();
        assert!(doc.load_markup("<android.widget.Nope/>").is_err());
        assert_eq!(doc.generate().unwrap(), before);
    }

    #[test]
    fn test_signals_fire_on_snapshot() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let (mut doc, _, button, _) = setup();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        doc.changed().connect(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        doc.commit_attribute_edit(button, "android:text", "Go").unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_template_drop_seeds_defaults() {
        let mut doc = Document::standard(DesignerConfig::default()).unwrap();
        let template = PaletteTemplate::new("Column", types::LINEAR_LAYOUT_DESIGN)
            .with_attribute("android:orientation", "vertical");
        doc.begin_drag(DragPayload::Template(template)).unwrap();
        let root = doc.root();
        let outcome = doc.drop_payload(root, Point::new(0.0, 0.0)).unwrap();

        let keys: Vec<_> = doc.attributes(outcome.node).unwrap().keys().collect();
        assert_eq!(
            keys,
            vec!["android:layout_width", "android:layout_height", "android:orientation"]
        );
        assert_eq!(
            doc.tree().layout_axis(outcome.node).unwrap(),
            Some(horizon_designer_core::LayoutAxis::Vertical)
        );
    }
}
