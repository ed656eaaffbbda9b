use std::path::PathBuf;

use clap::{Parser, Subcommand};
use git_project_index::config::{FileConfig, ScanOptions, file::expand_tilde};

#[derive(Parser)]
pub(crate) struct ScanningArgs {
    /// Only list repositories marked for export (git-daemon-export-ok)
    #[arg(short = 'e', long)]
    exported_only: bool,

    /// Maximum directory depth to descend below the project root
    #[arg(long)]
    max_depth: Option<usize>,

    /// Do not enter symlinked directories while scanning
    #[arg(long)]
    no_follow_links: bool,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Discover repositories and list them grouped by category
    Scan {
        /// The directory to search for repositories
        dir: Option<PathBuf>,

        /// Scanning options
        #[command(flatten)]
        scanning: ScanningArgs,

        /// Only show projects in this category (use "" for the root)
        #[arg(short = 'c', long)]
        category: Option<String>,

        /// Only show projects whose path or description contains this text
        #[arg(short = 's', long)]
        search: Option<String>,

        /// Print the projects as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show which handler an action is routed to
    Route {
        /// The action token, as found in the request
        action: String,

        /// Project selected by the request
        #[arg(short = 'p', long)]
        project: Option<String>,

        /// The directory to search for repositories
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Scanning options
        #[command(flatten)]
        scanning: ScanningArgs,

        /// Print the routing result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Parser)]
#[command(name = "git-project-index")]
#[command(about = "Discover git repositories under a project root and route viewer actions")]
pub(crate) struct Cli {
    /// Settings file to use instead of the default location
    #[arg(long, global = true)]
    pub(crate) config: Option<PathBuf>,

    /// Log scan progress and skipped directories
    #[arg(short = 'v', long, global = true)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

impl Command {
    fn dir_arg(&self) -> Option<&PathBuf> {
        match self {
            Self::Scan { dir, .. } | Self::Route { dir, .. } => dir.as_ref(),
        }
    }

    fn scanning(&self) -> &ScanningArgs {
        match self {
            Self::Scan { scanning, .. } | Self::Route { scanning, .. } => scanning,
        }
    }

    pub(crate) const fn json(&self) -> bool {
        match self {
            Self::Scan { json, .. } | Self::Route { json, .. } => *json,
        }
    }

    /// Project root: CLI argument, then settings file, then the current directory.
    pub(crate) fn directory(&self, file_config: &FileConfig) -> PathBuf {
        self.dir_arg()
            .cloned()
            .or_else(|| file_config.project_root.as_deref().map(expand_tilde))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub(crate) fn scan_options(&self, file_config: &FileConfig) -> ScanOptions {
        let scanning = self.scanning();

        ScanOptions {
            exported_only: scanning.exported_only || file_config.exported_only.unwrap_or(false),
            max_depth: scanning.max_depth.or(file_config.max_depth),
            follow_links: !scanning.no_follow_links && file_config.follow_links.unwrap_or(true),
        }
    }
}
