//! Logging and debugging facilities for Horizon Designer.
//!
//! The designer uses the `tracing` crate throughout. Nothing is printed
//! unless the host installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_designer=debug,horizon_designer_core=trace")
//!     .init();
//! ```
//!
//! [`NodeTreeDebug`] renders a node tree for inspection:
//!
//! ```ignore
//! let text = NodeTreeDebug::new().format_tree(&tree, Some(&identifiers))?;
//! println!("{text}");
//! ```

use crate::error::NodeResult;
use crate::identifier::IdentifierRegistry;
use crate::node::{NodeId, NodeRole, NodeTree};

/// Span names used for tracing.
pub mod span_names {
    /// Markup generation.
    pub const GENERATE: &str = "horizon_designer::generate";
    /// Markup loading.
    pub const LOAD: &str = "horizon_designer::load";
    /// Node reconstruction after attribute removal.
    pub const RECONSTRUCT: &str = "horizon_designer::reconstruct";
}

/// Target names for log filtering.
pub mod targets {
    /// Core model target.
    pub const CORE: &str = "horizon_designer_core";
    /// Node arena target.
    pub const NODE: &str = "horizon_designer_core::node";
    /// Attribute schema target.
    pub const SCHEMA: &str = "horizon_designer_core::schema";
    /// Capability registry target.
    pub const CAPABILITY: &str = "horizon_designer_core::capability";
    /// Identifier registry target.
    pub const IDENTIFIER: &str = "horizon_designer_core::identifier";
    /// Signal target.
    pub const SIGNAL: &str = "horizon_designer_core::signal";
    /// Document editing target.
    pub const DOCUMENT: &str = "horizon_designer::document";
    /// Drag protocol target.
    pub const DRAG: &str = "horizon_designer::drag";
    /// Markup codec target.
    pub const MARKUP: &str = "horizon_designer::markup";
    /// Undo history target.
    pub const HISTORY: &str = "horizon_designer::history";
    /// Configuration target.
    pub const CONFIG: &str = "horizon_designer::config";
    /// Standard families target.
    pub const FAMILIES: &str = "horizon_designer::families";
    /// Palette target.
    pub const PALETTE: &str = "horizon_designer::palette";
    /// Performance span target.
    pub const PERF: &str = "horizon_designer::perf";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    pub style: TreeStyle,
    /// Show slot keys.
    pub show_ids: bool,
    /// Show identifiers from the identifier registry.
    pub show_identifiers: bool,
    /// List each node's attributes beneath it.
    pub show_attributes: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: false,
            show_identifiers: true,
            show_attributes: false,
            max_depth: None,
        }
    }
}

impl TreeFormatOptions {
    /// Everything, including attributes and slot keys.
    pub fn detailed() -> Self {
        Self {
            show_ids: true,
            show_attributes: true,
            ..Default::default()
        }
    }

    /// Type names only.
    pub fn minimal() -> Self {
        Self {
            show_identifiers: false,
            ..Default::default()
        }
    }
}

/// Renders a [`NodeTree`] as indented text.
#[derive(Debug, Clone, Default)]
pub struct NodeTreeDebug {
    options: TreeFormatOptions,
}

impl NodeTreeDebug {
    /// Create a visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format the whole document below the root.
    pub fn format_tree(&self, tree: &NodeTree, identifiers: Option<&IdentifierRegistry>) -> NodeResult<String> {
        let mut output = String::from("Layout:\n");
        match tree.top_level() {
            Some(top) => self.format_node(tree, identifiers, top, &mut Vec::new(), &mut output)?,
            None => output.push_str("  (empty)\n"),
        }
        Ok(output)
    }

    /// Format the subtree rooted at `node`.
    pub fn format_subtree(
        &self,
        tree: &NodeTree,
        identifiers: Option<&IdentifierRegistry>,
        node: NodeId,
    ) -> NodeResult<String> {
        let mut output = String::new();
        self.format_node(tree, identifiers, node, &mut Vec::new(), &mut output)?;
        Ok(output)
    }

    /// `lasts` records, per ancestor level, whether that ancestor was the
    /// last of its siblings.
    fn format_node(
        &self,
        tree: &NodeTree,
        identifiers: Option<&IdentifierRegistry>,
        id: NodeId,
        lasts: &mut Vec<bool>,
        output: &mut String,
    ) -> NodeResult<()> {
        if self.options.max_depth.is_some_and(|max| lasts.len() > max) {
            return Ok(());
        }

        let prefix = self.prefix(lasts);
        output.push_str(&prefix);

        let type_name = tree.type_name(id)?;
        let short_type = type_name.rsplit('.').next().unwrap_or(type_name);
        match tree.role(id)? {
            NodeRole::Placeholder => output.push_str("<placeholder>"),
            _ => output.push_str(short_type),
        }

        if self.options.show_identifiers {
            if let Some(name) = identifiers.and_then(|ids| ids.name_of(id)) {
                output.push_str(&format!(" #{name}"));
            }
        }
        if self.options.show_ids {
            output.push_str(&format!(" [{id:?}]"));
        }
        output.push('\n');

        if self.options.show_attributes {
            let indent = self.continuation(lasts);
            for (key, value) in tree.attributes(id)?.iter() {
                output.push_str(&format!("{indent}    .{key} = {value}\n"));
            }
        }

        let children = tree.children(id)?;
        let count = children.len();
        for (i, &child) in children.iter().enumerate() {
            lasts.push(i + 1 == count);
            self.format_node(tree, identifiers, child, lasts, output)?;
            lasts.pop();
        }
        Ok(())
    }

    fn glyphs(&self) -> (&'static str, &'static str, &'static str) {
        match self.options.style {
            TreeStyle::Ascii => ("|   ", "+-- ", "`-- "),
            TreeStyle::Unicode => ("\u{2502}   ", "\u{251c}\u{2500}\u{2500} ", "\u{2514}\u{2500}\u{2500} "),
        }
    }

    fn prefix(&self, lasts: &[bool]) -> String {
        let Some((&last, ancestors)) = lasts.split_last() else {
            return String::new();
        };
        let (_, tee, corner) = self.glyphs();
        let mut prefix = self.continuation(ancestors);
        prefix.push_str(if last { corner } else { tee });
        prefix
    }

    fn continuation(&self, lasts: &[bool]) -> String {
        let (branch, _, _) = self.glyphs();
        lasts
            .iter()
            .map(|&last| if last { "    " } else { branch })
            .collect()
    }
}

/// A guard that keeps a tracing span entered and logs the elapsed time
/// when dropped.
#[derive(Debug)]
pub struct PerfSpan {
    name: &'static str,
    started: std::time::Instant,
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: targets::PERF, "perf", operation = name);
        Self {
            name,
            started: std::time::Instant::now(),
            _span: span.entered(),
        }
    }
}

impl Drop for PerfSpan {
    fn drop(&mut self) {
        tracing::trace!(
            target: targets::PERF,
            operation = self.name,
            elapsed_us = self.started.elapsed().as_micros() as u64,
            "operation finished"
        );
    }
}
