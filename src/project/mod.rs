//! Project records and their collection.
//!
//! ## Main Parts
//!
//! - [`ProjectRecord`] - One discovered repository with its effective configuration
//! - [`ProjectCollection`] - Insertion-ordered, path-unique set of records
//! - [`RepositoryLoader`] - Opens a repository to read its export signal and settings

#[allow(clippy::module_inception)]
pub mod project;
pub mod projects;
pub mod repository;

pub use project::{ProjectRecord, derive_category};
pub use projects::{ProjectCollection, group_by_category};
pub use repository::{GitDirLoader, GitRepository, Repository, RepositoryLoader};
