//! recipe-dag configuration
//!
//! Config is stored in `~/.config/recipe-dag/config.toml`.
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. Environment variables (`RECIPE_DAG_SPLINES`, `RECIPE_DAG_DRAW_TRIVIAL_EDGES`)
//! 2. Config file (`--config PATH`, else `~/.config/recipe-dag/config.toml`)
//! 3. Defaults

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RecipeError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecipeDagConfig {
    #[serde(default)]
    pub render: RenderOptions,
}

/// DOT rendering options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderOptions {
    /// Graphviz `splines` attribute (`false`, `true`, `ortho`, ...)
    pub splines: String,

    /// Draw start -> ingredient edges
    pub draw_trivial_edges: bool,

    /// Graphviz `rankdir` (`TB`, `LR`, ...)
    pub rankdir: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            splines: "false".to_string(),
            draw_trivial_edges: false,
            rankdir: None,
        }
    }
}

impl RecipeDagConfig {
    /// Returns `~/.config/recipe-dag/` on Unix, `%APPDATA%/recipe-dag/` on Windows
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recipe-dag")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load from the default location
    ///
    /// Returns default config if file doesn't exist.
    /// Returns error if file exists but is malformed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path (must exist)
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");
        let content = fs::read_to_string(path).map_err(|e| RecipeError::Config {
            reason: format!("Failed to read {}: {}", path.display(), e),
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| RecipeError::Config {
            reason: format!("Failed to parse config file: {}", e),
        })
    }

    /// Merge with environment variables
    ///
    /// Environment variables take precedence over config file values.
    pub fn with_env(self) -> Result<Self> {
        self.with_vars(|key| std::env::var(key).ok())
    }

    fn with_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(splines) = var("RECIPE_DAG_SPLINES").filter(|v| !v.is_empty()) {
            self.render.splines = splines;
        }

        if let Some(raw) = var("RECIPE_DAG_DRAW_TRIVIAL_EDGES").filter(|v| !v.is_empty()) {
            self.render.draw_trivial_edges = parse_bool(&raw).ok_or_else(|| RecipeError::Config {
                reason: format!("RECIPE_DAG_DRAW_TRIVIAL_EDGES must be true or false, got '{raw}'"),
            })?;
        }

        Ok(self)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_hide_trivial_edges() {
        let config = RecipeDagConfig::default();
        assert_eq!(config.render.splines, "false");
        assert!(!config.render.draw_trivial_edges);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = RecipeDagConfig::from_toml("[render]\nrankdir = \"LR\"\n").unwrap();
        assert_eq!(config.render.rankdir.as_deref(), Some("LR"));
        assert_eq!(config.render.splines, "false");
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = RecipeDagConfig::from_toml("[render\n").unwrap_err();
        assert!(err.to_string().contains("RDAG-003"));
    }

    #[test]
    fn env_overrides_file() {
        let vars: HashMap<&str, &str> = [
            ("RECIPE_DAG_SPLINES", "ortho"),
            ("RECIPE_DAG_DRAW_TRIVIAL_EDGES", "yes"),
        ]
        .into_iter()
        .collect();
        let config = RecipeDagConfig::default()
            .with_vars(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.render.splines, "ortho");
        assert!(config.render.draw_trivial_edges);
    }

    #[test]
    fn bad_bool_is_rejected() {
        let result = RecipeDagConfig::default().with_vars(|key| {
            (key == "RECIPE_DAG_DRAW_TRIVIAL_EDGES").then(|| "maybe".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn save_format_round_trips_through_toml() {
        let mut config = RecipeDagConfig::default();
        config.render.rankdir = Some("LR".into());
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(RecipeDagConfig::from_toml(&text).unwrap(), config);
    }
}
