//! Check command handler.

use std::path::Path;

use anyhow::{Result, bail};

use super::load_graph;
use crate::domain::{Severity, ValidationIssue, ValidationSummary};

pub fn handle_check(notes_dir: &Path) -> Result<()> {
    // 1. Load the graph, collecting store and link problems
    let (graph, issues) = load_graph(notes_dir)?;
    if graph.is_empty() && issues.is_empty() {
        println!("No zettels found.");
        return Ok(());
    }

    // 2. Add isolated zettels as warnings
    let mut summary: ValidationSummary = issues.into_iter().collect();
    for id in graph.isolated() {
        summary.add(ValidationIssue::isolated(id.clone()));
    }

    // 3. Display results
    if summary.is_ok() {
        println!("All {} zettel(s) OK.", graph.len());
        return Ok(());
    }

    for issue in summary.issues_by_severity() {
        let prefix = match issue.severity() {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        println!("{}: {}", prefix, issue);
    }
    println!(
        "\nFound {} issue(s): {} error(s), {} warning(s)",
        summary.total(),
        summary.error_count(),
        summary.warning_count()
    );

    // 4. Exit code: fail only if there are errors
    if summary.has_errors() {
        bail!("check failed");
    }
    Ok(())
}
