//! Configuration file support for persistent settings.
//!
//! This module provides support for loading configuration from a TOML file
//! located at `~/.config/git-project-index/config.toml` (or the platform-specific
//! equivalent). Configuration file values serve as defaults that can be
//! overridden by CLI arguments.
//!
//! # Layering
//!
//! The precedence order is: **CLI argument > config file > hardcoded default**.
//!
//! The `[global]` table becomes the global config layer of every project and
//! each `[projects."<path>"]` table becomes the override layer of the project
//! at that relative path.
//!
//! # Example config
//!
//! ```toml
//! project_root = "~/git"
//! exported_only = true
//! max_depth = 32
//! follow_links = false
//!
//! [global]
//! compat = false
//!
//! [projects."group/proj2"]
//! description = "Second project"
//! owner = "Release Team"
//! ```

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use super::ConfigLayer;

/// Top-level configuration file structure.
///
/// Scalar fields are `Option<T>` so we can detect which values are present in
/// the config file and apply layered configuration (CLI > config file > defaults).
#[derive(Deserialize, Default, Debug)]
pub struct FileConfig {
    /// Directory holding the repositories
    pub project_root: Option<PathBuf>,

    /// Only list repositories marked for export
    pub exported_only: Option<bool>,

    /// Maximum directory depth to descend below the project root
    pub max_depth: Option<usize>,

    /// Whether to follow symbolic links while scanning (on when unset)
    pub follow_links: Option<bool>,

    /// Explicit list of project paths; when present no directory walk happens
    pub project_list: Option<Vec<String>>,

    /// Global configuration layer
    #[serde(default)]
    pub global: ConfigLayer,

    /// Per-project override layers keyed by relative project path
    #[serde(default)]
    pub projects: BTreeMap<String, ConfigLayer>,
}

/// Expand a leading `~` in a path to the user's home directory.
///
/// Paths that don't start with `~` are returned unchanged.
///
/// # Examples
///
/// ```
/// # use std::path::PathBuf;
/// # use git_project_index::config::file::expand_tilde;
/// let absolute = PathBuf::from("/absolute/path");
/// assert_eq!(expand_tilde(&absolute), PathBuf::from("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

impl FileConfig {
    /// Returns the path where the configuration file is expected.
    ///
    /// The configuration file is located at `<config_dir>/git-project-index/config.toml`,
    /// where `<config_dir>` is the platform-specific configuration directory
    /// (e.g., `~/.config` on Linux, `%APPDATA%` on Windows).
    ///
    /// # Returns
    ///
    /// `Some(PathBuf)` with the config file path, or `None` if the config
    /// directory cannot be determined.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("git-project-index").join("config.toml"))
    }

    /// Load configuration from the default config file location.
    ///
    /// If the config file doesn't exist, returns a default (empty) configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> anyhow::Result<Self> {
        let Some(path) = Self::config_path() else {
            return Ok(Self::default());
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from an explicit file.
    ///
    /// Unlike [`FileConfig::load`], a missing file is an error here since the
    /// caller asked for this path specifically.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file at {}: {e}", path.display())
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file at {}: {e}", path.display())
        })?;

        Ok(config)
    }

    /// Per-project override layers with their keys normalized to the form the
    /// scanner produces (no leading or trailing slash).
    #[must_use]
    pub fn project_overrides(&self) -> BTreeMap<String, ConfigLayer> {
        self.projects
            .iter()
            .map(|(path, layer)| (path.trim_matches('/').to_owned(), layer.clone()))
            .collect()
    }
}
