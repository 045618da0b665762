use horizon_designer_core::logging::targets;
use horizon_designer_core::{
    lookup_by_key, strip_id_prefix, AttributeStore, IdentifierRegistry, NodeId, NodeTree, Size,
    ID_ATTRIBUTE,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{MarkupContext, MarkupError};

/// A tree rebuilt from markup, with its identifier registry.
#[derive(Debug)]
pub struct ParsedLayout {
    pub tree: NodeTree,
    pub identifiers: IdentifierRegistry,
}

/// Parse markup into a fresh tree.
///
/// Nothing outside the returned layout is touched, so a failed parse leaves
/// the caller's document as it was. Empty text yields an empty tree.
///
/// Stored attributes are applied through their setters after the whole
/// document is read, in reverse declaration order per node. The identifier
/// is assigned to the instance directly beforehand. Attributes without a
/// resolved definition stay in the store but reach no setter.
#[tracing::instrument(skip_all, target = "horizon_designer::markup", level = "debug")]
pub fn parse(text: &str, cx: &MarkupContext<'_>) -> Result<ParsedLayout, MarkupError> {
    let mut tree = NodeTree::new();
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack = vec![tree.root()];
    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let id = open_element(&mut tree, cx, &start)?;
                stack.push(id);
            }
            Event::Empty(start) => {
                let id = open_element(&mut tree, cx, &start)?;
                close_element(&mut tree, &stack, id)?;
            }
            Event::End(end) => {
                if stack.len() < 2 {
                    let name = end.name();
                    return Err(MarkupError::Unbalanced(std::str::from_utf8(name.as_ref())?.to_owned()));
                }
                let id = stack.pop().unwrap_or_else(|| tree.root());
                close_element(&mut tree, &stack, id)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }
    if let Some(&open) = stack.get(1) {
        return Err(MarkupError::Unbalanced(tree.type_name(open)?.to_owned()));
    }

    let identifiers = rebuild_identifiers(&tree)?;
    apply_stored_attributes(&mut tree, cx)?;

    tracing::debug!(
        target: targets::MARKUP,
        nodes = tree.len() - 2,
        identifiers = identifiers.len(),
        "parsed markup"
    );
    Ok(ParsedLayout { tree, identifiers })
}

fn open_element(
    tree: &mut NodeTree,
    cx: &MarkupContext<'_>,
    start: &BytesStart<'_>,
) -> Result<NodeId, MarkupError> {
    let name = start.name();
    let type_name = std::str::from_utf8(name.as_ref())?;
    let mut instance = cx.registry.construct(type_name)?;
    instance.set_minimum_size(Size::square(cx.config.minimum_node_size_dp));

    let mut store = AttributeStore::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        store.put(key, attr.unescape_value()?);
    }
    Ok(tree.insert(instance, store))
}

/// Append `id` to the element now on top of the stack.
fn close_element(tree: &mut NodeTree, stack: &[NodeId], id: NodeId) -> Result<(), MarkupError> {
    let parent = stack.last().copied().unwrap_or_else(|| tree.root());
    if parent == tree.root() && tree.top_level().is_some() {
        return Err(MarkupError::MultipleRoots(tree.type_name(id)?.to_owned()));
    }
    tree.attach(id, parent, None)?;
    Ok(())
}

fn rebuild_identifiers(tree: &NodeTree) -> Result<IdentifierRegistry, MarkupError> {
    let mut identifiers = IdentifierRegistry::new();
    let Some(top) = tree.top_level() else {
        return Ok(identifiers);
    };
    for id in tree.depth_first_preorder(top)? {
        if let Some(value) = tree.attributes(id)?.get(ID_ATTRIBUTE) {
            identifiers.assign(id, value)?;
        }
    }
    Ok(identifiers)
}

fn apply_stored_attributes(tree: &mut NodeTree, cx: &MarkupContext<'_>) -> Result<(), MarkupError> {
    let Some(top) = tree.top_level() else {
        return Ok(());
    };
    for id in tree.depth_first_preorder(top)? {
        let container = match tree.parent(id)? {
            Some(parent) if parent != tree.root() => Some(tree.type_name(parent)?.to_owned()),
            _ => None,
        };
        let resolved = cx
            .schema
            .resolve(cx.registry, tree.type_name(id)?, container.as_deref());

        let store = tree.attributes(id)?;
        let identifier = store.get(ID_ATTRIBUTE).map(|value| strip_id_prefix(value).to_owned());
        let pending: Vec<(String, String)> = store
            .iter()
            .rev()
            .filter(|(key, _)| *key != ID_ATTRIBUTE)
            .map(|(key, value)| (key.to_owned(), value.to_owned()))
            .collect();

        let instance = tree.instance_mut(id)?;
        if let Some(identifier) = identifier {
            instance.set_identifier(Some(&identifier));
        }
        for (key, value) in pending {
            let Some(definition) = lookup_by_key(&key, &resolved) else {
                tracing::warn!(target: targets::MARKUP, node = ?id, key = %key, "attribute has no definition here, skipped");
                continue;
            };
            if let Err(err) = cx.registry.invoke(definition, instance, &value) {
                tracing::warn!(target: targets::MARKUP, node = ?id, key = %key, %err, "setter failed during load");
            }
        }
    }
    Ok(())
}
