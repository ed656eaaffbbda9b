//! Scan progress reporting.
//!
//! Scans never log directly. They hand every notable event to a
//! [`ScanObserver`] passed in by the caller, so the binary can forward events
//! to `tracing` while tests record them for assertions.

use std::{cell::RefCell, path::PathBuf};

/// Something that happened while discovering projects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanEvent {
    /// A directory is about to be listed
    SearchingDirectory { path: PathBuf },

    /// A dot-prefixed directory was skipped without descending
    SkippedHidden { path: PathBuf },

    /// A repository was discovered and added to the collection
    FoundProject { path: String },

    /// A symlinked directory was not entered because link following is off
    SkippedSymlink { path: PathBuf },

    /// A directory below the root could not be read; its branch was skipped
    SubtreeUnreadable {
        path: Option<PathBuf>,
        reason: String,
    },

    /// A repository's metadata could not be loaded; the candidate was dropped
    InstantiationFailed { path: String, reason: String },

    /// A repository is not marked for export and exported-only mode is on
    NotExported { path: String },
}

/// Receiver for [`ScanEvent`]s.
pub trait ScanObserver {
    fn on_event(&self, event: &ScanEvent);
}

/// Forwards scan events to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl ScanObserver for TracingObserver {
    fn on_event(&self, event: &ScanEvent) {
        match event {
            ScanEvent::SearchingDirectory { path } => {
                tracing::debug!(path = %path.display(), "searching directory");
            }
            ScanEvent::SkippedHidden { path } => {
                tracing::debug!(path = %path.display(), "skipping hidden directory");
            }
            ScanEvent::FoundProject { path } => {
                tracing::debug!(project = %path, "found project");
            }
            ScanEvent::SkippedSymlink { path } => {
                tracing::debug!(path = %path.display(), "not following symlinked directory");
            }
            ScanEvent::SubtreeUnreadable { path, reason } => match path {
                Some(path) => {
                    tracing::warn!(path = %path.display(), "skipping unreadable directory: {reason}");
                }
                None => tracing::warn!("skipping unreadable directory: {reason}"),
            },
            ScanEvent::InstantiationFailed { path, reason } => {
                tracing::warn!(project = %path, "failed to load project: {reason}");
            }
            ScanEvent::NotExported { path } => {
                tracing::info!(project = %path, "project not enabled for export");
            }
        }
    }
}

/// Keeps every event it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: RefCell<Vec<ScanEvent>>,
}

impl RecordingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of the events received so far.
    #[must_use]
    pub fn events(&self) -> Vec<ScanEvent> {
        self.events.borrow().clone()
    }

    /// Count of recorded events matching a predicate.
    pub fn count(&self, predicate: impl Fn(&ScanEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| predicate(e)).count()
    }
}

impl ScanObserver for RecordingObserver {
    fn on_event(&self, event: &ScanEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
