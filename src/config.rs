//! Configuration management for nextcomp.
//!
//! Configuration is loaded from `~/.config/nextcomp/config.toml`.

use crate::form::Selection;
use crate::synth::GenerationMode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Which command shape to generate.
    #[serde(default)]
    pub mode: GenerationMode,
    /// Initial form values.
    #[serde(default)]
    pub defaults: FormDefaults,
}

/// Values the form starts with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDefaults {
    #[serde(default = "default_root_folder")]
    pub root_folder: String,
    #[serde(default = "default_project_name")]
    pub project_name: String,
    #[serde(default = "default_view_folder")]
    pub view_folder: String,
    #[serde(default = "Selection::all")]
    pub formatting: Selection,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            root_folder: default_root_folder(),
            project_name: default_project_name(),
            view_folder: default_view_folder(),
            formatting: Selection::all(),
        }
    }
}

fn default_root_folder() -> String {
    "features".to_string()
}

fn default_project_name() -> String {
    "my-feature".to_string()
}

fn default_view_folder() -> String {
    "FeatureList".to_string()
}

impl Config {
    /// Get the config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("nextcomp"))
            .context("Could not determine config directory")
    }

    /// Get the config file path.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location, using defaults if not found.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, using defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}
