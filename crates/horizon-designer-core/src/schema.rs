//! Attribute schema and resolution.
//!
//! The schema is two read-only tables of [`AttributeDefinition`]s keyed by
//! fully-qualified type name:
//!
//! - the **own-type** table lists attributes a widget family defines for
//!   itself
//! - the **container-contributed** table lists attributes a container family
//!   grants to its direct children (layout weight, margins and so on)
//!
//! Both are loaded once from JSON of the form
//! `{ "typeName": [ { "attributeName": ..., ... }, ... ] }` and never change
//! afterwards. [`AttributeSchema::resolve`] combines them into the ordered
//! list of definitions applicable to one node.

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Deserialize;

use crate::capability::CapabilityRegistry;
use crate::error::SchemaError;
use crate::logging::targets;

/// The kind of value an attribute accepts, used to pick an editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentKind {
    /// `match_parent`, `wrap_content` or a dimension.
    Size,
    /// A number with a `dp`/`sp` unit.
    Dimension,
    /// A new identifier (`@+id/...`).
    Id,
    /// A reference to another node's identifier (`@id/...`).
    NodeRef,
    Boolean,
    /// A drawable resource reference.
    Drawable,
    /// A string resource reference (`@string/...`).
    StringRef,
    /// Literal text.
    Text,
    Int,
    Float,
    /// One or more options from `arguments`, joined with `|`.
    FlagSet,
    /// Exactly one option from `arguments`.
    Enum,
    /// `#RRGGBB` or `#AARRGGBB`.
    Color,
}

static COLOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[a-fA-F0-9]{6,8}$").expect("color pattern is valid"));
static DRAWABLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@drawable/.*$").expect("drawable pattern is valid"));
static STRING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@string/.*$").expect("string pattern is valid"));

impl ArgumentKind {
    /// Parse the schema spelling of a kind.
    pub fn parse(text: &str) -> Option<Self> {
        Some(match text {
            "size" => Self::Size,
            "dimension" => Self::Dimension,
            "id" => Self::Id,
            "view" => Self::NodeRef,
            "boolean" => Self::Boolean,
            "drawable" => Self::Drawable,
            "string" => Self::StringRef,
            "text" => Self::Text,
            "int" => Self::Int,
            "float" => Self::Float,
            "flag" => Self::FlagSet,
            "enum" => Self::Enum,
            "color" => Self::Color,
            _ => return None,
        })
    }

    /// The schema spelling of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Dimension => "dimension",
            Self::Id => "id",
            Self::NodeRef => "view",
            Self::Boolean => "boolean",
            Self::Drawable => "drawable",
            Self::StringRef => "string",
            Self::Text => "text",
            Self::Int => "int",
            Self::Float => "float",
            Self::FlagSet => "flag",
            Self::Enum => "enum",
            Self::Color => "color",
        }
    }

    fn pattern(&self) -> Option<&'static Regex> {
        match self {
            Self::Color => Some(&*COLOR_PATTERN),
            Self::Drawable => Some(&*DRAWABLE_PATTERN),
            Self::StringRef => Some(&*STRING_PATTERN),
            _ => None,
        }
    }

    /// Infer which of `candidates` an existing value was written as.
    ///
    /// Only color, drawable and string-ref kinds are recognisable by
    /// shape; anything else falls back to [`ArgumentKind::Text`].
    pub fn infer(value: &str, candidates: &[ArgumentKind]) -> ArgumentKind {
        candidates
            .iter()
            .copied()
            .find(|kind| kind.pattern().is_some_and(|re| re.is_match(value)))
            .unwrap_or(ArgumentKind::Text)
    }
}

impl fmt::Display for ArgumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which editor a host should open for an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorKind {
    /// Open the editor for this kind directly.
    Single(ArgumentKind),
    /// The attribute accepts several kinds and has no value yet; the user
    /// picks one first.
    Choose(Vec<ArgumentKind>),
}

/// One settable attribute of a widget family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDefinition {
    /// Markup key, e.g. `android:layout_width`.
    pub name: String,
    /// Display title shown in attribute lists.
    pub title: String,
    /// Family whose setter applies this attribute.
    pub owner_type: String,
    /// Setter key within the owner family.
    pub method_name: String,
    /// Accepted value kinds, in schema order. Never empty.
    pub argument_kinds: Vec<ArgumentKind>,
    pub default_value: Option<String>,
    pub constant_value: Option<String>,
    /// Whether the user may remove this attribute once set.
    pub deletable: bool,
    /// Options for enum and flag-set kinds.
    pub arguments: Vec<String>,
}

impl AttributeDefinition {
    /// The first (primary) argument kind.
    pub fn primary_kind(&self) -> ArgumentKind {
        self.argument_kinds
            .first()
            .copied()
            .unwrap_or(ArgumentKind::Text)
    }

    /// Pick the editor for this attribute given its current value.
    pub fn editor_kind(&self, current: Option<&str>) -> EditorKind {
        if self.argument_kinds.len() <= 1 {
            return EditorKind::Single(self.primary_kind());
        }
        match current {
            Some(value) if !value.is_empty() => {
                EditorKind::Single(ArgumentKind::infer(value, &self.argument_kinds))
            }
            _ => EditorKind::Choose(self.argument_kinds.clone()),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDefinition {
    attribute_name: String,
    #[serde(default)]
    name: Option<String>,
    class_name: String,
    method_name: String,
    argument_type: String,
    #[serde(default)]
    default_value: Option<String>,
    #[serde(default)]
    constant: Option<String>,
    #[serde(default = "default_deletable")]
    can_delete: bool,
    #[serde(default)]
    arguments: Vec<String>,
}

fn default_deletable() -> bool {
    true
}

impl RawDefinition {
    fn into_definition(self) -> Result<AttributeDefinition, SchemaError> {
        let argument_kinds = self
            .argument_type
            .split('|')
            .map(|part| {
                ArgumentKind::parse(part.trim()).ok_or_else(|| SchemaError::UnknownArgumentKind {
                    attribute: self.attribute_name.clone(),
                    kind: part.to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AttributeDefinition {
            title: self.name.unwrap_or_else(|| self.attribute_name.clone()),
            name: self.attribute_name,
            owner_type: self.class_name,
            method_name: self.method_name,
            argument_kinds,
            default_value: self.default_value,
            constant_value: self.constant,
            deletable: self.can_delete,
            arguments: self.arguments,
        })
    }
}

type SchemaTable = HashMap<String, Vec<Arc<AttributeDefinition>>>;

fn parse_table(json: &str) -> Result<SchemaTable, SchemaError> {
    let raw: HashMap<String, Vec<RawDefinition>> = serde_json::from_str(json)?;
    raw.into_iter()
        .map(|(type_name, defs)| {
            let defs = defs
                .into_iter()
                .map(|d| d.into_definition().map(Arc::new))
                .collect::<Result<Vec<_>, _>>()?;
            Ok((type_name, defs))
        })
        .collect()
}

/// The own-type and container-contributed attribute tables.
#[derive(Debug, Clone, Default)]
pub struct AttributeSchema {
    own: SchemaTable,
    contributed: SchemaTable,
}

impl AttributeSchema {
    /// A schema with no definitions.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a schema from the two JSON documents.
    pub fn from_json_str(own: &str, contributed: &str) -> Result<Self, SchemaError> {
        let schema = Self {
            own: parse_table(own)?,
            contributed: parse_table(contributed)?,
        };
        tracing::debug!(
            target: targets::SCHEMA,
            own_types = schema.own.len(),
            container_types = schema.contributed.len(),
            "attribute schema loaded"
        );
        Ok(schema)
    }

    /// Build a schema from two readers yielding JSON.
    pub fn from_readers(mut own: impl Read, mut contributed: impl Read) -> Result<Self, SchemaError> {
        let mut own_text = String::new();
        own.read_to_string(&mut own_text)?;
        let mut contributed_text = String::new();
        contributed.read_to_string(&mut contributed_text)?;
        Self::from_json_str(&own_text, &contributed_text)
    }

    /// Load a schema from two JSON files.
    pub fn load(own: impl AsRef<Path>, contributed: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let own_text = std::fs::read_to_string(own)?;
        let contributed_text = std::fs::read_to_string(contributed)?;
        Self::from_json_str(&own_text, &contributed_text)
    }

    /// Own-type definitions declared directly on `type_name`.
    pub fn own_entries(&self, type_name: &str) -> &[Arc<AttributeDefinition>] {
        self.own.get(type_name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Definitions `type_name` contributes to its children.
    pub fn contributed_entries(&self, type_name: &str) -> &[Arc<AttributeDefinition>] {
        self.contributed
            .get(type_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Resolve the ordered definitions applicable to a node of `own_type`
    /// nested in `container_type`.
    ///
    /// Pass `None` as the container when the node sits directly under the
    /// document root. The result lists container-contributed entries first,
    /// then own-type entries, each group running from the most general
    /// ancestor family to the most specific.
    pub fn resolve(
        &self,
        families: &CapabilityRegistry,
        own_type: &str,
        container_type: Option<&str>,
    ) -> Vec<Arc<AttributeDefinition>> {
        let mut resolved = Vec::new();
        if let Some(container) = container_type {
            for family in families.lineage(container).iter().rev() {
                resolved.extend(self.contributed_entries(family).iter().cloned());
            }
        }
        for family in families.lineage(own_type).iter().rev() {
            resolved.extend(self.own_entries(family).iter().cloned());
        }
        resolved
    }
}

/// Find the definition for `key` in a resolved list.
pub fn lookup_by_key<'a>(
    key: &str,
    resolved: &'a [Arc<AttributeDefinition>],
) -> Option<&'a Arc<AttributeDefinition>> {
    resolved.iter().find(|def| def.name == key)
}
