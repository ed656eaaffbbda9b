//! Error types for project discovery.
//!
//! Only [`ScanError`] ever reaches the caller of a scan. [`ProjectError`] is
//! raised while opening a single repository and is absorbed by the scan,
//! which reports it to the observer and drops the candidate.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure that aborts a whole scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The project root cannot be opened as a directory
    #[error("project root {} is not a readable directory: {source}", path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure to load one repository's metadata.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("{} is not a git repository", path.display())]
    NotARepository { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed config {}: {source}", path.display())]
    MalformedConfig {
        path: PathBuf,
        #[source]
        source: gix_config::parse::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_unreadable_message_names_path() {
        let err = ScanError::RootUnreadable {
            path: PathBuf::from("/srv/git"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };

        let message = err.to_string();
        assert!(message.contains("/srv/git"));
        assert!(message.contains("gone"));
    }
}
