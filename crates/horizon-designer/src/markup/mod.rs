//! Markup codec: node tree ↔ XML layout text.
//!
//! The markup form is the at-rest and undo-snapshot representation of a
//! document. Element names are widget type names, attributes are the node's
//! attribute store in order, and nesting is containment:
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <android.widget.LinearLayout
//!     xmlns:android="http://schemas.android.com/apk/res/android"
//!     android:layout_width="match_parent" android:layout_height="wrap_content">
//!     <android.widget.Button android:id="@+id/ok" android:text="OK"/>
//! </android.widget.LinearLayout>
//! ```
//!
//! [`generate`] writes a tree; [`parse`] rebuilds a fresh tree and identifier
//! registry from text. Namespace declarations are written on the top-level
//! element and ignored when reading.

mod generate;
mod parse;

pub use generate::generate;
pub use parse::{parse, ParsedLayout};

use horizon_designer_core::{
    AttributeSchema, CapabilityError, CapabilityRegistry, IdentifierError, NodeError,
};

use crate::config::DesignerConfig;

/// Namespace of framework attributes.
pub const ANDROID_NAMESPACE: &str = "http://schemas.android.com/apk/res/android";

/// Namespace of application-defined attributes.
pub const APP_NAMESPACE: &str = "http://schemas.android.com/apk/res-auto";

/// Everything the codec reads besides the tree itself.
#[derive(Debug, Clone, Copy)]
pub struct MarkupContext<'a> {
    pub schema: &'a AttributeSchema,
    pub registry: &'a CapabilityRegistry,
    pub config: &'a DesignerConfig,
}

/// Errors raised while parsing markup.
#[derive(Debug, thiserror::Error)]
pub enum MarkupError {
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    #[error("utf8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// An element could not be instantiated.
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// Two elements declare the same identifier.
    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    #[error(transparent)]
    Node(#[from] NodeError),

    /// A close tag without an open tag, or an element left open at the end.
    #[error("unbalanced element '{0}'")]
    Unbalanced(String),

    /// More than one top-level element.
    #[error("layout has more than one top-level element ('{0}')")]
    MultipleRoots(String),
}
