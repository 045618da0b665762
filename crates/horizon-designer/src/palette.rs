//! Palette templates: the widgets a user can drag into a layout.
//!
//! A palette is a JSON array of templates:
//!
//! ```json
//! [{"name": "Button", "className": "designer.ButtonDesign",
//!   "defaultAttributes": {"android:text": "Button"}}]
//! ```
//!
//! Default attributes keep their file order; they are applied in that order
//! when a template is dropped.

use std::path::Path;

use indexmap::IndexMap;
use horizon_designer_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::error::Result;

const STANDARD_PALETTE: &str = include_str!("../assets/palette.json");

/// A widget recipe offered for dragging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteTemplate {
    /// Display name.
    pub name: String,
    /// Family constructed on drop.
    #[serde(rename = "className")]
    pub concrete_type: String,
    /// Attributes applied to the new node, in order.
    #[serde(default)]
    pub default_attributes: IndexMap<String, String>,
}

impl PaletteTemplate {
    /// A template with no default attributes.
    pub fn new(name: impl Into<String>, concrete_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            concrete_type: concrete_type.into(),
            default_attributes: IndexMap::new(),
        }
    }

    /// Add a default attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_attributes.insert(key.into(), value.into());
        self
    }
}

/// Parse a palette from JSON text.
pub fn parse_palette(json: &str) -> Result<Vec<PaletteTemplate>> {
    Ok(serde_json::from_str(json)?)
}

/// Load a palette from a JSON file.
pub fn load_palette(path: impl AsRef<Path>) -> Result<Vec<PaletteTemplate>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let palette = parse_palette(&text)?;
    tracing::debug!(target: targets::PALETTE, path = %path.display(), templates = palette.len(), "loaded palette");
    Ok(palette)
}

/// The palette matching the standard families.
pub fn standard_palette() -> Result<Vec<PaletteTemplate>> {
    parse_palette(STANDARD_PALETTE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::families::standard_registry;

    #[test]
    fn test_default_attributes_keep_file_order() {
        let palette = parse_palette(
            r#"[{"name": "Row", "className": "x.Row",
                "defaultAttributes": {"z": "1", "a": "2", "m": "3"}}]"#,
        )
        .unwrap();
        let keys: Vec<_> = palette[0].default_attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_missing_defaults_are_empty() {
        let palette = parse_palette(r#"[{"name": "Frame", "className": "x.Frame"}]"#).unwrap();
        assert!(palette[0].default_attributes.is_empty());
        assert_eq!(palette[0], PaletteTemplate::new("Frame", "x.Frame"));
    }

    #[test]
    fn test_standard_palette_is_constructible() {
        let registry = standard_registry();
        let palette = standard_palette().unwrap();
        assert!(!palette.is_empty());
        for template in &palette {
            assert!(registry.can_construct(&template.concrete_type), "{}", template.name);
        }
    }

    #[test]
    fn test_load_palette_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("palette.json");
        std::fs::write(&path, STANDARD_PALETTE).unwrap();
        assert_eq!(load_palette(&path).unwrap(), standard_palette().unwrap());
        assert!(load_palette(dir.path().join("missing.json")).is_err());
    }
}
