//! Project discovery strategies.
//!
//! Every strategy implements [`ProjectSource`] and feeds candidate paths
//! through the same instantiation step: open the repository, apply the export
//! filter, merge the configuration layers, then insert into the collection
//! unless the path is already present.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use crate::{
    config::{ConfigLayer, ScanOptions, resolve},
    error::ScanError,
    observer::{ScanEvent, ScanObserver},
    project::{GitDirLoader, ProjectCollection, ProjectRecord, Repository, RepositoryLoader},
};

/// A way of producing the set of projects.
pub trait ProjectSource {
    /// Build the collection of projects.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] only when the project root itself is unusable.
    /// Problems with individual repositories or subdirectories are reported
    /// to `observer` and skipped.
    fn populate(&self, observer: &dyn ScanObserver) -> Result<ProjectCollection, ScanError>;
}

/// Configuration layers supplied by whoever configured the scan.
#[derive(Clone, Debug, Default)]
pub struct ProjectSettings {
    /// Applied to every project, below the repository's own settings
    pub global: ConfigLayer,

    /// Applied to the project with the matching relative path, above
    /// everything else
    pub overrides: BTreeMap<String, ConfigLayer>,
}

/// Fail unless `root` is a directory we can list.
pub(crate) fn check_root(root: &Path) -> Result<(), ScanError> {
    let unreadable = |source| ScanError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(root).map_err(unreadable)?;
    if !metadata.is_dir() {
        return Err(unreadable(io::Error::new(
            io::ErrorKind::NotADirectory,
            "not a directory",
        )));
    }

    fs::read_dir(root).map(drop).map_err(unreadable)
}

/// Turns candidate paths into records, shared by every strategy.
pub(crate) struct Instantiator<'a, L> {
    pub(crate) root: &'a Path,
    pub(crate) loader: &'a L,
    pub(crate) exported_only: bool,
    pub(crate) settings: &'a ProjectSettings,
}

impl<L: RepositoryLoader> Instantiator<'_, L> {
    /// Instantiate `path` and insert it, skipping paths already present.
    pub(crate) fn add_candidate(
        &self,
        projects: &mut ProjectCollection,
        path: String,
        observer: &dyn ScanObserver,
    ) {
        if projects.contains(&path) {
            return;
        }

        if let Some(record) = self.instantiate(&path, observer) {
            observer.on_event(&ScanEvent::FoundProject { path });
            projects.insert(record);
        }
    }

    fn instantiate(&self, path: &str, observer: &dyn ScanObserver) -> Option<ProjectRecord> {
        let failed = |reason: String| {
            observer.on_event(&ScanEvent::InstantiationFailed {
                path: path.to_owned(),
                reason,
            });
        };

        let repository = match self.loader.open(self.root, path) {
            Ok(repository) => repository,
            Err(e) => {
                failed(e.to_string());
                return None;
            }
        };

        let exported = repository.export_enabled();
        if self.exported_only && !exported {
            observer.on_event(&ScanEvent::NotExported {
                path: path.to_owned(),
            });
            return None;
        }

        let native = match repository.native_config() {
            Ok(layer) => layer,
            Err(e) => {
                failed(e.to_string());
                return None;
            }
        };

        let config = resolve(
            &self.settings.global,
            &native,
            self.settings.overrides.get(path),
        );

        Some(ProjectRecord::new(path, exported, config))
    }
}

/// Projects named explicitly instead of discovered by walking.
///
/// Each listed path still has to hold a repository; paths that don't are
/// reported as failed instantiations.
pub struct ListedProjects<L = GitDirLoader> {
    root: PathBuf,
    paths: Vec<String>,
    exported_only: bool,
    settings: ProjectSettings,
    loader: L,
}

impl ListedProjects<GitDirLoader> {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, paths: Vec<String>, options: &ScanOptions) -> Self {
        Self {
            root: root.into(),
            paths,
            exported_only: options.exported_only,
            settings: ProjectSettings::default(),
            loader: GitDirLoader,
        }
    }
}

impl<L> ListedProjects<L> {
    #[must_use]
    pub fn with_settings(mut self, settings: ProjectSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn with_loader<M>(self, loader: M) -> ListedProjects<M> {
        ListedProjects {
            root: self.root,
            paths: self.paths,
            exported_only: self.exported_only,
            settings: self.settings,
            loader,
        }
    }
}

impl<L: RepositoryLoader> ProjectSource for ListedProjects<L> {
    fn populate(&self, observer: &dyn ScanObserver) -> Result<ProjectCollection, ScanError> {
        check_root(&self.root)?;

        let instantiator = Instantiator {
            root: &self.root,
            loader: &self.loader,
            exported_only: self.exported_only,
            settings: &self.settings,
        };

        let mut projects = ProjectCollection::new();
        for listed in &self.paths {
            match normalize_listed_path(listed) {
                Ok(Some(path)) => instantiator.add_candidate(&mut projects, path, observer),
                Ok(None) => {}
                Err(reason) => observer.on_event(&ScanEvent::InstantiationFailed {
                    path: listed.clone(),
                    reason: reason.to_owned(),
                }),
            }
        }

        Ok(projects)
    }
}

/// Bring a listed path into the form the scanner produces: `/`-separated
/// components below the root, with no empty, `.` or `..` components and no
/// hidden directories. Blank entries give `None`.
fn normalize_listed_path(listed: &str) -> Result<Option<String>, &'static str> {
    let mut components = Vec::new();

    for component in listed.trim().split('/').filter(|c| !c.is_empty()) {
        match component {
            "." | ".." => return Err("path must stay below the project root"),
            _ if component.starts_with('.') => return Err("path crosses a hidden directory"),
            _ => components.push(component),
        }
    }

    Ok((!components.is_empty()).then(|| components.join("/")))
}
