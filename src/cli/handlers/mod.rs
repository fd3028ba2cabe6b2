//! Command handlers for the CLI.

mod check;
mod links;
mod new;
mod query;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, warn};

use crate::domain::ValidationIssue;
use crate::graph::ZettelGraph;
use crate::infra::DirectoryStore;

// Re-export public items
pub use check::handle_check;
pub use links::{handle_backlinks, handle_uplinks};
pub use new::{NewZettelPlan, handle_new, plan_new_zettel};
pub use query::{handle_graph, handle_query, handle_search};

// ===========================================
// Shared Utilities
// ===========================================

/// Loads every zettel under `notes_dir` into a graph.
///
/// Build problems are returned rather than printed; commands other than
/// `check` log them and carry on.
pub(crate) fn load_graph(notes_dir: &Path) -> Result<(ZettelGraph, Vec<ValidationIssue>)> {
    let store = DirectoryStore::open(notes_dir)
        .with_context(|| format!("failed to open zettelkasten at {}", notes_dir.display()))?;
    let (graph, issues) = ZettelGraph::load(&store)
        .with_context(|| format!("failed to load zettels from {}", notes_dir.display()))?;
    debug!(
        zettels = graph.len(),
        edges = graph.edge_count(),
        issues = issues.len(),
        "loaded graph"
    );
    Ok((graph, issues))
}

/// Loads the graph and logs any build problems as warnings.
pub(crate) fn load_graph_quietly(notes_dir: &Path) -> Result<ZettelGraph> {
    let (graph, issues) = load_graph(notes_dir)?;
    for issue in &issues {
        warn!("{}", issue);
    }
    Ok(graph)
}
