//! Directory scanning and repository detection.
//!
//! This module walks the project root depth-first and turns every directory
//! holding a `HEAD` file into a project. The walk follows three rules:
//!
//! - directories whose name starts with `.` are never entered or listed,
//! - a directory holding `HEAD` is a repository leaf and is never descended into,
//! - any other directory is walked recursively.
//!
//! Symlinked directories are followed by default, so a linked repository is
//! listed under the link's path. Unreadable subdirectories, symlink loops and
//! broken repositories are reported to the observer and skipped; only an
//! unusable root fails the scan.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::{
    config::ScanOptions,
    error::ScanError,
    observer::{ScanEvent, ScanObserver},
    project::{GitDirLoader, ProjectCollection, RepositoryLoader},
    source::{Instantiator, ProjectSettings, ProjectSource, check_root},
};

/// Name of the file that marks a directory as a repository.
pub const REPOSITORY_MARKER: &str = "HEAD";

/// Recursive directory scanner for git repositories.
///
/// The `Scanner` owns everything a scan needs: the project root, the scanning
/// options, the configuration layers to merge into each project and the
/// loader used to open repositories.
pub struct Scanner<L = GitDirLoader> {
    /// Directory to search for repositories
    root: PathBuf,

    /// Configuration options for scanning behavior
    scan_options: ScanOptions,

    /// Global and per-project configuration layers
    settings: ProjectSettings,

    /// Opens repositories once found
    loader: L,
}

impl Scanner<GitDirLoader> {
    /// Create a new scanner for `root` with the specified options.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use git_project_index::{config::ScanOptions, observer::TracingObserver};
    /// # use git_project_index::{scanner::Scanner, source::ProjectSource};
    /// let scanner = Scanner::new("/srv/git", ScanOptions::default());
    /// let projects = scanner.populate(&TracingObserver)?;
    /// println!("Found {} projects", projects.len());
    /// # Ok::<(), git_project_index::error::ScanError>(())
    /// ```
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, scan_options: ScanOptions) -> Self {
        Self {
            root: root.into(),
            scan_options,
            settings: ProjectSettings::default(),
            loader: GitDirLoader,
        }
    }
}

impl<L> Scanner<L> {
    /// Use the given global and per-project configuration layers.
    #[must_use]
    pub fn with_settings(mut self, settings: ProjectSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Open repositories with a different loader.
    #[must_use]
    pub fn with_loader<M>(self, loader: M) -> Scanner<M> {
        Scanner {
            root: self.root,
            scan_options: self.scan_options,
            settings: self.settings,
            loader,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a directory entry should be skipped as hidden.
    fn is_hidden(entry: &DirEntry) -> bool {
        entry.file_name().to_string_lossy().starts_with('.')
    }

    /// Whether a directory is a repository leaf.
    fn is_repository(path: &Path) -> bool {
        path.join(REPOSITORY_MARKER).is_file()
    }

    /// Path of `path` relative to the scan root, with `/` separators.
    fn relative_project_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let joined = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        (!joined.is_empty()).then_some(joined)
    }

    fn walker(&self) -> WalkDir {
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(self.scan_options.follow_links);

        match self.scan_options.max_depth {
            Some(depth) => walker.max_depth(depth),
            None => walker,
        }
    }
}

impl<L: RepositoryLoader> ProjectSource for Scanner<L> {
    fn populate(&self, observer: &dyn ScanObserver) -> Result<ProjectCollection, ScanError> {
        check_root(&self.root)?;

        let instantiator = Instantiator {
            root: &self.root,
            loader: &self.loader,
            exported_only: self.scan_options.exported_only,
            settings: &self.settings,
        };

        let mut projects = ProjectCollection::new();

        observer.on_event(&ScanEvent::SearchingDirectory {
            path: self.root.clone(),
        });

        let mut entries = self.walker().into_iter();
        while let Some(entry) = entries.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    observer.on_event(&ScanEvent::SubtreeUnreadable {
                        path: e.path().map(Path::to_path_buf),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                if entry.path_is_symlink() && entry.path().is_dir() {
                    observer.on_event(&ScanEvent::SkippedSymlink {
                        path: entry.path().to_path_buf(),
                    });
                }
                continue;
            }

            if Self::is_hidden(&entry) {
                observer.on_event(&ScanEvent::SkippedHidden {
                    path: entry.path().to_path_buf(),
                });
                entries.skip_current_dir();
                continue;
            }

            if !Self::is_repository(entry.path()) {
                observer.on_event(&ScanEvent::SearchingDirectory {
                    path: entry.path().to_path_buf(),
                });
                continue;
            }

            // Repository leaf: never look inside.
            entries.skip_current_dir();

            if let Some(path) = self.relative_project_path(entry.path()) {
                instantiator.add_candidate(&mut projects, path, observer);
            }
        }

        Ok(projects)
    }
}
