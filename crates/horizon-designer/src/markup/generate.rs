use std::io::Write;

use horizon_designer_core::logging::targets;
use horizon_designer_core::{NodeId, NodeResult, NodeTree};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use super::{MarkupContext, ANDROID_NAMESPACE, APP_NAMESPACE};

/// Serialize the document below the root.
///
/// An empty tree yields empty text. The drag placeholder is never written,
/// and opaque containers are written self-closed without their children.
#[tracing::instrument(skip_all, target = "horizon_designer::markup", level = "debug")]
pub fn generate(tree: &NodeTree, cx: &MarkupContext<'_>) -> NodeResult<String> {
    let Some(top) = tree.top_level() else {
        return Ok(String::new());
    };

    let (indent_char, indent_size) = cx.config.indent.unit();
    let mut writer = Writer::new_with_indent(Vec::new(), indent_char, indent_size);
    let decl = BytesDecl::new("1.0", Some("utf-8"), None);
    let _ = writer.write_event(Event::Decl(decl));
    write_node(tree, cx, top, true, &mut writer)?;

    let text = String::from_utf8(writer.into_inner()).unwrap_or_default();
    tracing::debug!(target: targets::MARKUP, bytes = text.len(), "generated markup");
    Ok(text)
}

fn element_name<'t>(tree: &'t NodeTree, cx: &MarkupContext<'t>, id: NodeId) -> NodeResult<&'t str> {
    let type_name = tree.type_name(id)?;
    Ok(if cx.config.portable_type_names {
        cx.registry.portable_type_name(type_name)
    } else {
        type_name
    })
}

fn write_node<W: Write>(
    tree: &NodeTree,
    cx: &MarkupContext<'_>,
    id: NodeId,
    top: bool,
    writer: &mut Writer<W>,
) -> NodeResult<()> {
    let type_name = tree.type_name(id)?;
    let name = element_name(tree, cx, id)?;
    let mut start = BytesStart::new(name);

    if top {
        start.push_attribute(("xmlns:android", ANDROID_NAMESPACE));
        start.push_attribute(("xmlns:app", APP_NAMESPACE));
    }
    for (key, value) in tree.attributes(id)?.iter() {
        start.push_attribute((key, value));
    }

    let opaque = cx.config.is_opaque(type_name) || cx.registry.traits(type_name).opaque;
    let children: Vec<NodeId> = tree
        .children(id)?
        .iter()
        .copied()
        .filter(|&c| c != tree.placeholder())
        .collect();

    if opaque || children.is_empty() {
        let _ = writer.write_event(Event::Empty(start));
        return Ok(());
    }

    let _ = writer.write_event(Event::Start(start));
    for child in children {
        write_node(tree, cx, child, false, writer)?;
    }
    let _ = writer.write_event(Event::End(BytesEnd::new(name)));
    Ok(())
}
