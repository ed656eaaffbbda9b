//! Core project data structures.
//!
//! This module defines [`ProjectRecord`], the immutable description of one
//! discovered repository.

use std::fmt::{Display, Formatter, Result};

use serde::Serialize;

use crate::config::EffectiveConfig;

/// One discovered repository.
///
/// Records are built once by a project source and never mutated afterwards;
/// a rescan builds new records.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProjectRecord {
    /// Path relative to the project root, `/`-separated, without leading or
    /// trailing slash
    path: String,

    /// Parent directory of `path`, or empty when the project sits at the root
    category: String,

    /// Whether the repository is marked for export
    exported: bool,

    /// Merged global, repository and override configuration
    config: EffectiveConfig,
}

impl ProjectRecord {
    /// Create a record, deriving its category from `path`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use git_project_index::{config::EffectiveConfig, project::ProjectRecord};
    /// let record = ProjectRecord::new("group/proj2", true, EffectiveConfig::default());
    /// assert_eq!(record.category(), "group");
    /// ```
    #[must_use]
    pub fn new(path: impl Into<String>, exported: bool, config: EffectiveConfig) -> Self {
        let path = path.into();
        let category = derive_category(&path);

        Self {
            path,
            category,
            exported,
            config,
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub const fn exported(&self) -> bool {
        self.exported
    }

    #[must_use]
    pub const fn config(&self) -> &EffectiveConfig {
        &self.config
    }

    /// The `description` setting, if any layer provides one.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.config.get_str("description")
    }

    /// The `owner` setting, if any layer provides one.
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.config.get_str("owner")
    }
}

/// Derive the category of a project from its relative path.
///
/// The category is the trimmed parent directory with empty components
/// collapsed. Projects at the root, and parents with any component that
/// starts with `.`, have no category.
#[must_use]
pub fn derive_category(path: &str) -> String {
    let parent = path.rsplit_once('/').map_or("", |(parent, _)| parent.trim());
    let components: Vec<&str> = parent.split('/').filter(|c| !c.is_empty()).collect();

    if components.iter().any(|c| c.starts_with('.')) {
        String::new()
    } else {
        components.join("/")
    }
}

impl Display for ProjectRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self.description() {
            Some(description) => write!(f, "📁 {} - {description}", self.path),
            None => write!(f, "📁 {}", self.path),
        }
    }
}
