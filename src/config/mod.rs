//! Configuration types and options for the application.
//!
//! This module contains the configuration layers merged into each project's
//! effective configuration, the scanning options, and the settings file.

pub mod file;
pub mod layer;
pub mod scan;

pub use file::FileConfig;
pub use layer::{ConfigLayer, EffectiveConfig, LayerKind, Setting, resolve};
pub use scan::ScanOptions;
