//! # git-project-index
//!
//! Discovery and routing core of a git repository browser.
//!
//! This library finds git repositories below a project root, merges each
//! repository's configuration from global, repository-native and per-project
//! layers, and routes viewer actions to the handler kind that serves them.
//!
//! ## Main Parts
//!
//! - [`scanner::Scanner`] - Recursive directory walk that discovers repositories
//! - [`source::ListedProjects`] - Discovery from an explicit list of paths
//! - [`project::ProjectCollection`] - The discovered projects, unique by path
//! - [`config::resolve`] - Configuration layering
//! - [`router::resolve`] - Action token to handler routing

pub mod config;
pub mod error;
pub mod observer;
pub mod project;
pub mod router;
pub mod scanner;
pub mod source;
