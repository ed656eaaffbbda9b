//! Scanning configuration for project discovery.
//!
//! This module defines the options that control how the project root is
//! traversed and which discovered repositories are kept.

/// Configuration for directory scanning behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanOptions {
    /// Drop repositories that are not marked for export
    pub exported_only: bool,

    /// Maximum depth below the project root to descend, unbounded when `None`
    pub max_depth: Option<usize>,

    /// Whether to follow symbolic links while walking.
    ///
    /// On by default, so a linked repository is found under the link's own
    /// path. Directory loops are detected and reported as unreadable subtrees
    /// instead of being walked forever. When disabled, each symlinked
    /// directory is reported as skipped.
    pub follow_links: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            exported_only: false,
            max_depth: None,
            follow_links: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_options_default() {
        let options = ScanOptions::default();

        assert!(!options.exported_only);
        assert!(options.max_depth.is_none());
        assert!(options.follow_links);
    }

    #[test]
    fn test_scan_options_clone() {
        let options = ScanOptions {
            exported_only: true,
            max_depth: Some(4),
            follow_links: false,
        };

        assert_eq!(options.clone(), options);
    }
}
