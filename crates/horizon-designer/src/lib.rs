//! Horizon Designer - an editing engine for declarative UI layouts.
//!
//! A layout is a tree of widget nodes, each carrying an ordered store of
//! string attributes. This crate edits such trees the way a visual layout
//! designer does:
//!
//! - [`Document`] owns the tree and applies attribute edits through each
//!   widget family's setters, keeping identifiers unique and references to
//!   them consistent across renames and removals.
//! - The drag protocol ([`Document::begin_drag`], [`Document::drag_over`],
//!   [`Document::drop_payload`]) positions existing nodes and palette
//!   templates with a placeholder.
//! - [`markup`] converts trees to and from XML layout text, which is also
//!   the form stored in the bounded [`UndoRedoHistory`].
//! - [`families`] provides the standard widget families and the bundled
//!   attribute schema.
//!
//! The node tree, schema, capability registry and identifier registry live
//! in `horizon-designer-core`.
//!
//! # Example
//!
//! ```
//! use horizon_designer::{DesignerConfig, Document};
//!
//! let mut doc = Document::standard(DesignerConfig::default()).unwrap();
//! doc.open_markup(
//!     r#"<android.widget.LinearLayout android:orientation="vertical">
//!            <android.widget.Button android:id="@+id/ok" android:text="OK"/>
//!        </android.widget.LinearLayout>"#,
//! )
//! .unwrap();
//!
//! let ok = doc.node_for_identifier("ok").unwrap();
//! doc.commit_attribute_edit(ok, "android:text", "Done").unwrap();
//! assert!(doc.generate().unwrap().contains(r#"android:text="Done""#));
//!
//! doc.undo().unwrap();
//! assert!(doc.generate().unwrap().contains(r#"android:text="OK""#));
//! ```

mod config;
mod document;
mod drag;
mod error;
pub mod families;
mod history;
pub mod markup;
mod palette;
mod shared;

pub use config::{
    ConfigError, ConfigFormat, DesignerConfig, HistoryDedupe, IndentStyle,
    DEFAULT_OPAQUE_CONTAINERS,
};
pub use document::Document;
pub use drag::{DragPayload, DragState, DropOutcome};
pub use error::{DesignerError, Result};
pub use history::{HistoryState, UndoRedoHistory, DEFAULT_CAPACITY};
pub use markup::MarkupError;
pub use palette::{load_palette, parse_palette, standard_palette, PaletteTemplate};
pub use shared::SharedDocument;
