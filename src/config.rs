//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/graphnav/graphnav.toml`
//! 3. Local config: `<dir>/.graphnav.toml` (usually the current directory)
//! 4. Environment variables: `GRAPHNAV_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, IoResultExt};

/// Output formatting settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Indent width for JSON output
    pub indent: usize,
    /// Colored terminal output (NO_COLOR still wins)
    pub color: bool,
    /// Properties shown next to each node in tree output
    pub label_properties: Vec<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            indent: 4,
            color: true,
            label_properties: vec!["name".into()],
        }
    }
}

/// Raw display config for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawDisplayConfig {
    pub indent: Option<usize>,
    pub color: Option<bool>,
    pub label_properties: Option<Vec<String>>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub responses_dir: Option<PathBuf>,
    #[serde(default)]
    pub display: RawDisplayConfig,
}

impl DisplayConfig {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are appended to base, keeping first-seen order
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Duplicates are de-duplicated
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&["a", "b"], &["c"])       // → ["a", "b", "c"]
    /// merge_array(&["a", "b"], &["!a", "c"]) // → ["b", "c"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let removed: Vec<&str> = overlay
            .iter()
            .filter_map(|item| item.strip_prefix('!'))
            .collect();

        base.iter()
            .chain(overlay.iter().filter(|item| !item.starts_with('!')))
            .filter(|item| !removed.contains(&item.as_str()))
            .unique()
            .cloned()
            .collect()
    }

    /// Overlay wins for scalars; arrays union with negation support.
    pub fn merge(&self, overlay: &RawDisplayConfig) -> Self {
        Self {
            indent: overlay.indent.unwrap_or(self.indent),
            color: overlay.color.unwrap_or(self.color),
            label_properties: overlay
                .label_properties
                .as_ref()
                .map(|o| Self::merge_array(&self.label_properties, o))
                .unwrap_or_else(|| self.label_properties.clone()),
        }
    }

    /// Apply global config onto defaults: arrays are REPLACED, not merged.
    pub fn apply_global(&self, global: &RawDisplayConfig) -> Self {
        Self {
            indent: global.indent.unwrap_or(self.indent),
            color: global.color.unwrap_or(self.color),
            label_properties: global
                .label_properties
                .clone()
                .unwrap_or_else(|| self.label_properties.clone()),
        }
    }
}

/// Unified configuration for graphnav.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory searched for response files given by relative name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses_dir: Option<PathBuf>,
    pub display: DisplayConfig,
}

/// Get the XDG config directory for graphnav.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "graphnav").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("graphnav.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".graphnav.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).with_path_context("read config", path)?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; leaves the input unchanged on failure.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    fn expand_paths(&mut self) {
        if let Some(dir) = &self.responses_dir {
            self.responses_dir = Some(PathBuf::from(expand_env_vars(&dir.to_string_lossy())));
        }
    }

    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            responses_dir: overlay
                .responses_dir
                .clone()
                .or_else(|| self.responses_dir.clone()),
            display: self.display.merge(&overlay.display),
        }
    }

    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            responses_dir: global
                .responses_dir
                .clone()
                .or_else(|| self.responses_dir.clone()),
            display: self.display.apply_global(&global.display),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.graphnav.toml`
    ///
    /// # Array Merge Semantics
    /// - Defaults → Global: REPLACE
    /// - Global → Local: UNION with negation support
    /// - Any → Env vars: REPLACE
    #[instrument(level = "debug")]
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                let raw = load_raw_settings(&global_path)?;
                current = current.apply_global(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("local config: {}", local_path.display());
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply GRAPHNAV_* environment variables as explicit overrides.
    ///
    /// Nested keys use `__`, lists use `,`:
    /// `GRAPHNAV_DISPLAY__LABEL_PROPERTIES=name,age`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("GRAPHNAV")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("display.label_properties")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("responses_dir") {
            settings.responses_dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_int("display.indent") {
            settings.display.indent = usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("display.indent must not be negative: {val}"),
            })?;
        }
        if let Ok(val) = config.get_bool("display.color") {
            settings.display.color = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("display.label_properties") {
            settings.display.label_properties = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# graphnav configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/graphnav/graphnav.toml  (defines your baseline)
#   Local:  ./.graphnav.toml                  (directory-specific additions)
#   Env:    GRAPHNAV_* environment variables  (explicit overrides)
#
# Array Merge Semantics:
#   Global config REPLACES compiled defaults.
#   Local config UNIONS with global.
#   Use "!item" in local config to REMOVE an inherited item:
#     label_properties = ["age", "!name"]

# Directory searched for response dumps given by relative name
# responses_dir = "~/dumps"

[display]
# Indent width for JSON output
# indent = 4

# Colored output (NO_COLOR in the environment disables it as well)
# color = true

# Properties shown next to each node in tree output
# label_properties = ["name"]
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn given_default_display_config_when_created_then_labels_by_name() {
        let display = DisplayConfig::default();
        assert_eq!(display.indent, 4);
        assert!(display.color);
        assert_eq!(display.label_properties, strings(&["name"]));
    }

    #[test]
    fn given_tilde_in_responses_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            responses_dir: Some(PathBuf::from("~/dumps")),
            display: DisplayConfig::default(),
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let dir = settings.responses_dir.expect("responses_dir kept");
        assert!(dir.to_string_lossy().starts_with(&home));
        assert!(!dir.to_string_lossy().contains('~'));
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("template parses");
        assert!(raw.responses_dir.is_none());
        assert!(raw.display.label_properties.is_none());
    }

    // ========================================
    // Tests for merge_array union semantics
    // ========================================

    #[test]
    fn test_merge_array_union_keeps_order() {
        let result = DisplayConfig::merge_array(&strings(&["b", "a"]), &strings(&["c"]));
        assert_eq!(result, strings(&["b", "a", "c"]));
    }

    #[test]
    fn test_merge_array_negation() {
        let result = DisplayConfig::merge_array(&strings(&["a", "b"]), &strings(&["!a", "c"]));
        assert_eq!(result, strings(&["b", "c"]));
    }

    #[test]
    fn test_merge_array_negation_nonexistent() {
        let result = DisplayConfig::merge_array(&strings(&["a", "b"]), &strings(&["!x"]));
        assert_eq!(result, strings(&["a", "b"]));
    }

    #[test]
    fn test_merge_array_duplicates() {
        let result = DisplayConfig::merge_array(&strings(&["a", "b"]), &strings(&["a", "c"]));
        assert_eq!(result, strings(&["a", "b", "c"]));
    }

    #[test]
    fn test_merge_display_config() {
        let base = DisplayConfig::default();
        let overlay = RawDisplayConfig {
            indent: Some(2),
            color: None,
            label_properties: Some(strings(&["age"])),
        };

        let result = base.merge(&overlay);

        assert_eq!(result.indent, 2);
        assert!(result.color);
        assert_eq!(result.label_properties, strings(&["name", "age"]));
    }

    #[test]
    fn test_apply_global_replaces_arrays() {
        let base = DisplayConfig::default();
        let global = RawDisplayConfig {
            indent: None,
            color: Some(false),
            label_properties: Some(strings(&["title"])),
        };

        let result = base.apply_global(&global);

        assert_eq!(result.indent, 4);
        assert!(!result.color);
        assert_eq!(result.label_properties, strings(&["title"]));
    }
}
