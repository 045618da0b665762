//! Designer configuration.
//!
//! [`DesignerConfig`] gathers the tunables of a document session. It can be
//! built in code or persisted as JSON or TOML; the format is chosen from the
//! file extension.
//!
//! ```toml
//! history_capacity = 20
//! history_dedupe = "identity"
//! minimum_node_size_dp = 20.0
//! portable_type_names = false
//! indent = "tab"
//! ```

use std::path::{Path, PathBuf};

use horizon_designer_core::logging::targets;
use serde::{Deserialize, Serialize};

/// How the history decides a snapshot repeats the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryDedupe {
    /// Only the very same snapshot allocation is a repeat. Freshly generated
    /// markup is therefore always recorded.
    #[default]
    Identity,
    /// Snapshots with equal text are repeats.
    Value,
}

/// Indentation used when generating markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndentStyle {
    /// One tab per nesting level.
    #[default]
    Tab,
    /// This many spaces per nesting level.
    Spaces(u8),
}

impl IndentStyle {
    /// Character and repetition count for the XML writer.
    pub fn unit(self) -> (u8, usize) {
        match self {
            Self::Tab => (b'\t', 1),
            Self::Spaces(n) => (b' ', usize::from(n)),
        }
    }
}

/// Families always written self-closed, their children omitted.
pub const DEFAULT_OPAQUE_CONTAINERS: &[&str] = &[
    "android.widget.CalendarView",
    "android.widget.SearchView",
    "com.google.android.material.navigation.NavigationView",
    "com.google.android.material.bottomnavigation.BottomNavigationView",
    "com.google.android.material.tabs.TabLayout",
];

/// Tunables for a designer session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignerConfig {
    /// Maximum number of undo snapshots kept.
    pub history_capacity: usize,
    pub history_dedupe: HistoryDedupe,
    /// Minimum width and height given to every new or rebuilt widget.
    pub minimum_node_size_dp: f32,
    /// Write the nearest non-specialized family name instead of design-time
    /// specializations.
    pub portable_type_names: bool,
    pub indent: IndentStyle,
    /// Container families serialized without their children.
    pub opaque_containers: Vec<String>,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            history_capacity: 20,
            history_dedupe: HistoryDedupe::default(),
            minimum_node_size_dp: 20.0,
            portable_type_names: false,
            indent: IndentStyle::default(),
            opaque_containers: DEFAULT_OPAQUE_CONTAINERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// File format for configuration persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Pick a format from a path's extension; anything but `.toml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// Errors loading or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("failed to encode TOML config: {0}")]
    TomlEncode(#[from] toml::ser::Error),
}

impl DesignerConfig {
    /// Whether `type_name` is serialized without children.
    pub fn is_opaque(&self, type_name: &str) -> bool {
        self.opaque_containers.iter().any(|t| t == type_name)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load from a JSON or TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = match ConfigFormat::from_path(path) {
            ConfigFormat::Json => Self::from_json_str(&text)?,
            ConfigFormat::Toml => Self::from_toml_str(&text)?,
        };
        tracing::debug!(target: targets::CONFIG, path = %path.display(), "loaded designer config");
        Ok(config)
    }

    /// Save to a JSON or TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = match ConfigFormat::from_path(path) {
            ConfigFormat::Json => self.to_json_string()?,
            ConfigFormat::Toml => self.to_toml_string()?,
        };
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DesignerConfig::default();
        assert_eq!(config.history_capacity, 20);
        assert_eq!(config.history_dedupe, HistoryDedupe::Identity);
        assert!(config.is_opaque("android.widget.CalendarView"));
        assert!(!config.is_opaque("android.widget.LinearLayout"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = DesignerConfig::from_toml_str(
            "history_dedupe = \"value\"\nindent = { spaces = 4 }\n",
        )
        .unwrap();
        assert_eq!(config.history_dedupe, HistoryDedupe::Value);
        assert_eq!(config.indent, IndentStyle::Spaces(4));
        assert_eq!(config.history_capacity, 20);
        assert_eq!(config.indent.unit(), (b' ', 4));
    }

    #[test]
    fn test_json_rejects_bad_types() {
        assert!(matches!(
            DesignerConfig::from_json_str(r#"{"history_capacity": "many"}"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_save_and_load_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let config = DesignerConfig {
            portable_type_names: true,
            minimum_node_size_dp: 24.0,
            ..Default::default()
        };

        for name in ["designer.json", "designer.toml"] {
            let path = dir.path().join(name);
            config.save(&path).unwrap();
            assert_eq!(DesignerConfig::load(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = DesignerConfig::load("/nonexistent/designer.toml").unwrap_err();
        assert!(err.to_string().contains("designer.toml"));
    }
}
