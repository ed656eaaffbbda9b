//! Terminal and JSON output for the command-line interface.

use std::fmt::Write;

use colored::Colorize;
use git_project_index::{
    project::{ProjectRecord, group_by_category},
    router::Dispatch,
};
use serde::Serialize;

/// JSON document printed by `route --json`.
#[derive(Serialize)]
pub(crate) struct RouteOutput<'a> {
    pub(crate) action: &'a str,
    pub(crate) dispatch: &'a Dispatch,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) project: Option<&'a ProjectRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) project_count: Option<usize>,
}

/// Print projects grouped by category, root projects first.
pub(crate) fn print_projects(projects: &[&ProjectRecord]) {
    for (category, records) in group_by_category(projects.iter().copied()) {
        if category.is_empty() {
            println!("\n{}", "(no category)".dimmed());
        } else {
            println!("\n{}", category.bold());
        }

        for record in records {
            print_record(record);
        }
    }
}

fn print_record(record: &ProjectRecord) {
    let mut line = format!("  {record}");

    if let Some(owner) = record.owner() {
        let _ = write!(line, " {}", format!("[{owner}]").cyan());
    }

    if record.exported() {
        println!("{line}");
    } else {
        println!("{line} {}", "(not exported)".yellow());
    }
}

pub(crate) fn print_dispatch(action: &str, dispatch: &Dispatch) {
    let params = dispatch
        .params
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join(", ");

    if params.is_empty() {
        println!("{} → {}", action.bold(), dispatch.kind.to_string().green());
    } else {
        println!(
            "{} → {} ({params})",
            action.bold(),
            dispatch.kind.to_string().green()
        );
    }
}
