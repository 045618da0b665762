//! Error types for the designer core.
//!
//! Each concern has its own error enum so callers can match on the failure
//! they care about. The editing crate aggregates these into a single
//! `DesignerError`.

use crate::node::NodeId;

/// Errors raised by the node arena.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeError {
    /// The node ID is invalid or the node has been destroyed.
    #[error("invalid or destroyed node ID: {0:?}")]
    InvalidNodeId(NodeId),
    /// Attempted to make a node its own parent or ancestor.
    #[error("cannot attach a node beneath itself or one of its descendants")]
    CircularParentage,
    /// The node is owned by the tree itself (the document root or the drag
    /// placeholder) and cannot be moved or destroyed this way.
    #[error("node {0:?} is reserved by the tree")]
    ReservedNode(NodeId),
    /// The operation needs a live widget instance but the node has none
    /// (document root or drag placeholder).
    #[error("node {0:?} carries no widget instance")]
    NoInstance(NodeId),
}

/// Errors raised while loading an attribute schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The schema document is not valid JSON or has the wrong shape.
    #[error("malformed schema: {0}")]
    Json(#[from] serde_json::Error),
    /// Reading the schema file failed.
    #[error("failed to read schema: {0}")]
    Io(#[from] std::io::Error),
    /// An `argumentType` value names no known argument kind.
    #[error("unknown argument kind '{kind}' on attribute '{attribute}'")]
    UnknownArgumentKind {
        /// The attribute carrying the bad kind.
        attribute: String,
        /// The unrecognised kind text.
        kind: String,
    },
}

/// Errors produced by setter implementations.
///
/// Setters are supplied per widget family and report failures through this
/// type; the registry wraps it in [`CapabilityError::SetterInvocation`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetterError {
    /// The value could not be interpreted for this setter.
    #[error("invalid value '{value}': expected {expected}")]
    InvalidValue {
        /// The offending value text.
        value: String,
        /// Human-readable description of what was expected.
        expected: &'static str,
    },
    /// The widget instance does not support this setter.
    #[error("widget type '{type_name}' does not support this setter")]
    Unsupported {
        /// Concrete type of the widget the setter was applied to.
        type_name: String,
    },
}

impl SetterError {
    /// Shorthand for an [`SetterError::InvalidValue`].
    pub fn invalid(value: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidValue {
            value: value.into(),
            expected,
        }
    }

    /// Shorthand for an [`SetterError::Unsupported`].
    pub fn unsupported(type_name: impl Into<String>) -> Self {
        Self::Unsupported {
            type_name: type_name.into(),
        }
    }
}

/// Errors raised by the capability registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    /// No setter is registered for the owner/method pair.
    #[error("no setter registered for {owner}::{method}")]
    SetterNotFound {
        /// Family that should own the setter.
        owner: String,
        /// Method key looked up.
        method: String,
    },
    /// The setter ran and reported a failure.
    #[error("setter {owner}::{method} failed: {source}")]
    SetterInvocation {
        /// Family owning the setter.
        owner: String,
        /// Method key invoked.
        method: String,
        /// The failure reported by the setter.
        #[source]
        source: SetterError,
    },
    /// No constructor is registered for the type name.
    #[error("unknown node type '{0}'")]
    UnknownNodeType(String),
}

/// Errors raised by the identifier registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    /// Another node already holds the identifier.
    #[error("identifier '{identifier}' is already used by another node")]
    Conflict {
        /// The contested identifier.
        identifier: String,
        /// The node currently holding it.
        holder: NodeId,
    },
    /// The identifier is empty after stripping its prefix.
    #[error("identifier value '{0}' is empty")]
    Empty(String),
}

/// Result type for node arena operations.
pub type NodeResult<T> = std::result::Result<T, NodeError>;
