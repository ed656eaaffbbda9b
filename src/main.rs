//! # git-project-index
//!
//! Discover git repositories under a project root and route viewer actions.
//!
//! The tool walks a directory tree looking for repositories (any directory
//! holding a `HEAD` file), merges each repository's configuration with the
//! global and per-project settings from the config file, and shows which
//! handler a viewer action would be routed to.
//!
//! ## Usage
//!
//! ```bash
//! # List repositories under ~/git
//! git-project-index scan ~/git
//!
//! # Only repositories marked for export, as JSON
//! git-project-index scan ~/git --exported-only --json
//!
//! # Which handler serves the `shortlog` action of a project
//! git-project-index route shortlog --project group/proj2
//! ```

mod cli;
mod output;

use std::{path::Path, process::exit, time::Duration};

use anyhow::{Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use colored::Colorize;
use git_project_index::{
    config::{FileConfig, ScanOptions},
    observer::TracingObserver,
    project::ProjectCollection,
    router,
    scanner::Scanner,
    source::{ListedProjects, ProjectSettings, ProjectSource},
};
use indicatif::{ProgressBar, ProgressStyle};
use output::RouteOutput;
use tracing_subscriber::EnvFilter;

/// Entry point for the git-project-index application.
///
/// This function handles all errors gracefully by calling [`inner_main`] and printing
/// any errors to stderr before exiting with a non-zero status code.
fn main() {
    if let Err(err) = inner_main() {
        eprintln!("Error: {err}");

        exit(1);
    }
}

/// Install the `tracing` subscriber, writing to stderr.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects `debug`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic that can return errors.
///
/// # Errors
///
/// This function can return errors from:
/// - Loading an explicitly requested settings file
/// - Scanning an unreadable project root
/// - JSON serialization
fn inner_main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let json_mode = args.command.json();

    let file_config = match &args.config {
        Some(path) => FileConfig::load_from(path)?,
        None => FileConfig::load().unwrap_or_else(|e| {
            if !json_mode {
                eprintln!("{} {e}", "Warning: Failed to load config file:".yellow());
            }
            FileConfig::default()
        }),
    };

    let dir = args.command.directory(&file_config);
    let scan_options = args.command.scan_options(&file_config);

    match &args.command {
        Command::Scan {
            category, search, ..
        } => {
            let projects = discover(&dir, &scan_options, &file_config, json_mode)?;
            run_scan(&projects, category.as_deref(), search.as_deref(), json_mode)
        }
        Command::Route {
            action, project, ..
        } => run_route(
            action,
            project.as_deref(),
            || discover(&dir, &scan_options, &file_config, true),
            json_mode,
        ),
    }
}

/// Build the project collection from the settings file's project list, or by
/// walking `dir` when there is none.
fn discover(
    dir: &Path,
    scan_options: &ScanOptions,
    file_config: &FileConfig,
    quiet: bool,
) -> Result<ProjectCollection> {
    let settings = ProjectSettings {
        global: file_config.global.clone(),
        overrides: file_config.project_overrides(),
    };

    let source: Box<dyn ProjectSource> = match &file_config.project_list {
        Some(paths) => Box::new(
            ListedProjects::new(dir, paths.clone(), scan_options).with_settings(settings),
        ),
        None => Box::new(Scanner::new(dir, scan_options.clone()).with_settings(settings)),
    };

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message("Scanning for repositories...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    };

    let projects = source.populate(&TracingObserver);
    progress.finish_and_clear();

    Ok(projects?)
}

fn run_scan(
    projects: &ProjectCollection,
    category: Option<&str>,
    search: Option<&str>,
    json_mode: bool,
) -> Result<()> {
    let mut selected = match search {
        Some(text) => projects.search(text),
        None => projects.iter().collect(),
    };

    if let Some(category) = category {
        selected.retain(|record| record.category() == category.trim_matches('/'));
    }

    if json_mode {
        println!("{}", serde_json::to_string_pretty(&selected)?);
        return Ok(());
    }

    if selected.is_empty() {
        println!("{}", "✨ No repositories found!".green());
        return Ok(());
    }

    println!("Found {} projects", selected.len());
    output::print_projects(&selected);

    Ok(())
}

fn run_route(
    action: &str,
    project: Option<&str>,
    discover: impl FnOnce() -> Result<ProjectCollection>,
    json_mode: bool,
) -> Result<()> {
    let dispatch = router::resolve(action, project.is_some());

    // Only touch the filesystem when the handler needs projects.
    let projects = if project.is_some() || dispatch.kind.needs_project_list() {
        Some(discover()?)
    } else {
        None
    };

    let record = match (project, &projects) {
        (Some(path), Some(projects)) if dispatch.kind.needs_project() => {
            let path = path.trim_matches('/');
            match projects.get(path) {
                Some(record) => Some(record),
                None => bail!("project {path} not found"),
            }
        }
        _ => None,
    };

    let project_count = projects
        .as_ref()
        .filter(|_| dispatch.kind.needs_project_list())
        .map(ProjectCollection::len);

    if json_mode {
        let output = RouteOutput {
            action,
            dispatch: &dispatch,
            project: record,
            project_count,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    output::print_dispatch(action, &dispatch);

    if let Some(record) = record {
        println!("  {record}");
    }

    if let Some(count) = project_count {
        println!("  {} projects available", count.to_string().bold());
    }

    Ok(())
}
