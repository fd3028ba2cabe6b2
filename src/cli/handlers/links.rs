//! Link-related command handlers (backlinks, uplinks).

use anyhow::{Context, Result, bail};
use std::path::Path;
use tracing::debug;

use super::load_graph_quietly;
use crate::cli::output::{emit, render_edges, render_zettels};
use crate::cli::{BacklinksArgs, UplinksArgs};
use crate::domain::{Zettel, ZettelId};
use crate::graph::{QueryResolver, QueryResult, ZettelGraph};
use crate::query::GraphQuery;

fn parse_id(text: &str) -> Result<ZettelId> {
    ZettelId::parse(text).with_context(|| format!("invalid zettel ID '{}'", text))
}

/// A missing zettel is not an error; it simply has no links.
fn note_if_missing(graph: &ZettelGraph, id: &ZettelId) {
    if !graph.contains(id) {
        debug!(id = %id, "zettel not found, links are empty");
    }
}

pub fn handle_backlinks(args: &BacklinksArgs, notes_dir: &Path) -> Result<()> {
    let id = parse_id(&args.id)?;
    let graph = load_graph_quietly(notes_dir)?;
    note_if_missing(&graph, &id);

    let edges = match graph.resolve_graph(&GraphQuery::backlinks_of(id, args.connection)) {
        QueryResult::Edges(edges) => edges,
        other => bail!("unexpected {} result for a backlinks query", other.shape()),
    };
    emit(args.format, &edges, |edges| render_edges(edges))
}

pub fn handle_uplinks(args: &UplinksArgs, notes_dir: &Path) -> Result<()> {
    let id = parse_id(&args.id)?;
    let graph = load_graph_quietly(notes_dir)?;
    note_if_missing(&graph, &id);

    let parents: Vec<Zettel> = graph.uplinks(&id).into_iter().cloned().collect();
    emit(args.format, &parents, |zettels| render_zettels(zettels))
}
