//! Error types for the designer engine.

use horizon_designer_core::{
    CapabilityError, IdentifierError, NodeError, NodeId, SchemaError,
};

use crate::config::ConfigError;
use crate::markup::MarkupError;

/// The main error type for designer operations.
#[derive(Debug, thiserror::Error)]
pub enum DesignerError {
    /// Node arena error.
    #[error("node error: {0}")]
    Node(#[from] NodeError),
    /// Attribute schema could not be loaded.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
    /// Constructor or setter lookup failed.
    #[error("capability error: {0}")]
    Capability(#[from] CapabilityError),
    /// Identifier conflict or malformed identifier.
    #[error("identifier error: {0}")]
    Identifier(#[from] IdentifierError),
    /// Markup could not be parsed.
    #[error("markup error: {0}")]
    Markup(#[from] MarkupError),
    /// Configuration could not be loaded or saved.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// Palette file could not be read.
    #[error("palette error: {0}")]
    Palette(#[from] serde_json::Error),
    /// File access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The key is not among the attributes resolved for the node.
    #[error("attribute '{key}' is not available on node {node:?}")]
    UnknownAttribute { node: NodeId, key: String },
    /// The document root already holds a non-container child.
    #[error("the layout already has a top-level widget that cannot hold children")]
    TooManyRootChildren,
    /// The drop target does not accept children.
    #[error("node {0:?} does not accept children")]
    NotAContainer(NodeId),
    /// A drag operation was required but none is in progress.
    #[error("no drag in progress")]
    NoActiveDrag,
    /// A drag was started while another one is in progress.
    #[error("a drag is already in progress")]
    DragInProgress,
}

/// Result type for designer operations.
pub type Result<T> = std::result::Result<T, DesignerError>;
