//! Core document model for Horizon Designer.
//!
//! This crate holds the toolkit-independent pieces of the layout designer:
//!
//! - **Node Tree**: an arena of nodes with stable slot handles, parent/child
//!   links, per-node attribute stores and swappable widget instances
//! - **Attribute Store**: ordered key/value attribute maps
//! - **Attribute Schema**: own-type and container-contributed attribute
//!   definitions, and the resolution order that combines them
//! - **Capability Registry**: widget families, constructors and setters
//!   supplied by collaborators
//! - **Identifier Registry**: unique user-visible node identifiers
//! - **Signals**: change notification for hosts
//!
//! The editing engine (documents, drag protocol, markup codec, history)
//! lives in the `horizon-designer` crate.
//!
//! # Example
//!
//! ```
//! use horizon_designer_core::{AttributeStore, NodeTree};
//!
//! let tree = NodeTree::new();
//! assert!(tree.is_empty());
//!
//! let mut store = AttributeStore::new();
//! store.put("android:layout_width", "wrap_content");
//! assert_eq!(store.index_of("android:layout_width"), Some(0));
//! ```

pub mod attribute;
pub mod capability;
mod error;
pub mod geometry;
pub mod identifier;
pub mod logging;
pub mod node;
pub mod schema;
pub mod signal;

pub use attribute::{
    AttributeStore, ID_ATTRIBUTE, ID_REF_PREFIX, NEW_ID_PREFIX, id_reference, strip_id_prefix,
};
pub use capability::{CapabilityRegistry, ConstructorFn, Family, FamilyTraits, SetterFn, Widget};
pub use error::{CapabilityError, IdentifierError, NodeError, NodeResult, SchemaError, SetterError};
pub use geometry::{LayoutAxis, Point, Rect, Size};
pub use identifier::IdentifierRegistry;
pub use logging::{NodeTreeDebug, PerfSpan, TreeFormatOptions, TreeStyle};
pub use node::{NodeId, NodeRole, NodeTree, PLACEHOLDER_TYPE, ROOT_TYPE};
pub use schema::{ArgumentKind, AttributeDefinition, AttributeSchema, EditorKind, lookup_by_key};
pub use signal::{ConnectionId, Signal};
