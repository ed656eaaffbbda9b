//! Opening repositories found during discovery.
//!
//! Discovery only knows a repository by its path. A [`RepositoryLoader`] turns
//! that path into a [`Repository`] exposing the two facts discovery needs: the
//! export signal and the repository-native configuration layer.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use toml::Value;

use crate::{config::ConfigLayer, error::ProjectError};

/// Marker file whose presence allows a repository to be exported.
pub const EXPORT_MARKER: &str = "git-daemon-export-ok";

/// Text `git init` writes into the `description` file.
const DESCRIPTION_PLACEHOLDER: &str =
    "Unnamed repository; edit this file 'description' to name the repository.";

/// An opened repository.
pub trait Repository {
    /// Path relative to the project root
    fn path(&self) -> &str;

    /// Whether the repository is marked for public listing
    fn export_enabled(&self) -> bool;

    /// Settings stored inside the repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository's settings cannot be read or parsed.
    fn native_config(&self) -> Result<ConfigLayer, ProjectError>;
}

/// Opens repositories by relative path.
pub trait RepositoryLoader {
    type Repo: Repository;

    /// Open the repository at `path` below `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` does not hold a usable repository.
    fn open(&self, root: &Path, path: &str) -> Result<Self::Repo, ProjectError>;
}

/// Loads repositories from bare or non-bare git directories on disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct GitDirLoader;

/// A git directory opened by [`GitDirLoader`].
#[derive(Clone, Debug)]
pub struct GitRepository {
    dir: PathBuf,
    path: String,
}

impl RepositoryLoader for GitDirLoader {
    type Repo = GitRepository;

    fn open(&self, root: &Path, path: &str) -> Result<GitRepository, ProjectError> {
        let dir = root.join(path);

        if !dir.join("HEAD").is_file() {
            return Err(ProjectError::NotARepository { path: dir });
        }

        Ok(GitRepository {
            dir,
            path: path.to_owned(),
        })
    }
}

impl GitRepository {
    fn read_optional(&self, name: &str) -> Result<Option<String>, ProjectError> {
        let file = self.dir.join(name);

        match fs::read_to_string(&file) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ProjectError::Io { path: file, source }),
        }
    }
}

impl Repository for GitRepository {
    fn path(&self) -> &str {
        &self.path
    }

    fn export_enabled(&self) -> bool {
        self.dir.join(EXPORT_MARKER).is_file()
    }

    fn native_config(&self) -> Result<ConfigLayer, ProjectError> {
        let mut layer = match self.read_optional("config")? {
            Some(content) => parse_git_config(&content, &self.dir.join("config"))?,
            None => ConfigLayer::new(),
        };

        if let Some(description) = self.read_optional("description")? {
            let description = description.trim();
            if !description.is_empty() && description != DESCRIPTION_PLACEHOLDER {
                layer.insert("description", description);
            }
        }

        Ok(layer)
    }
}

/// Flatten a git config file into a single layer.
///
/// `[section]` keys become `section.key`, `[section "sub"]` keys become
/// `section.sub.key`. Section and key names are lowercased, subsections kept
/// verbatim. When a key repeats, the last value wins.
///
/// # Errors
///
/// Returns [`ProjectError::MalformedConfig`] when the file is not valid git
/// config syntax.
pub fn parse_git_config(content: &str, file: &Path) -> Result<ConfigLayer, ProjectError> {
    let config: gix_config::File<'static> =
        content.parse().map_err(|source| ProjectError::MalformedConfig {
            path: file.to_path_buf(),
            source,
        })?;

    let mut layer = ConfigLayer::new();

    for section in config.sections() {
        let header = section.header();
        let prefix = match header.subsection_name() {
            Some(sub) => format!("{}.{sub}", header.name().to_string().to_lowercase()),
            None => header.name().to_string().to_lowercase(),
        };

        let names: Vec<String> = section
            .value_names()
            .map(|name| name.to_string().to_lowercase())
            .collect();

        for name in names {
            // A key without `=` is an implicit `true`.
            let value = match section.value_implicit(&name) {
                Some(Some(raw)) => typed_value(&raw.to_string()),
                Some(None) => Value::Boolean(true),
                None => continue,
            };
            layer.insert(format!("{prefix}.{name}"), value);
        }
    }

    Ok(layer)
}

/// Git's boolean words become booleans; everything else stays a string.
fn typed_value(raw: &str) -> Value {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Value::Boolean(true),
        "false" | "no" | "off" => Value::Boolean(false),
        _ => Value::String(raw.to_owned()),
    }
}
