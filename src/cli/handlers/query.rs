//! Query, search and graph command handlers.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use super::load_graph_quietly;
use crate::cli::output::{Output, emit, render_result};
use crate::cli::{QueryArgs, SearchArgs};
use crate::domain::TagPattern;
use crate::graph::QueryResolver;
use crate::query::{SearchOptions, SortBy, TagQuery, ZettelQuery, parse_query_link};

pub fn handle_query(args: &QueryArgs, notes_dir: &Path) -> Result<()> {
    let query = parse_query_link(&args.link)
        .with_context(|| format!("invalid query link '{}'", args.link))?;
    debug!(query = %query, shape = %query.shape(), "parsed query link");

    let graph = load_graph_quietly(notes_dir)?;
    let result = graph.resolve(&query);
    emit(args.format, &result, render_result)
}

/// Builds the tag query behind `neuron search`.
///
/// No `--tag` at all matches every zettel.
pub(crate) fn search_query(args: &SearchArgs) -> Result<ZettelQuery> {
    let patterns = args
        .tags
        .iter()
        .map(|t| TagPattern::new(t).with_context(|| format!("invalid tag pattern '{}'", t)))
        .collect::<Result<Vec<_>>>()?;

    let tags = if args.all {
        TagQuery::all(patterns)
    } else {
        TagQuery::any(patterns)
    };
    let sort = if args.timeline {
        SortBy::Timeline
    } else {
        SortBy::Id
    };

    Ok(ZettelQuery::by_tag(tags).with_options(SearchOptions::sorted_by(sort).with_limit(args.limit)))
}

pub fn handle_search(args: &SearchArgs, notes_dir: &Path) -> Result<()> {
    let query = search_query(args)?;
    let graph = load_graph_quietly(notes_dir)?;
    let result = graph.resolve_zettel(&query);
    emit(args.format, &result, render_result)
}

pub fn handle_graph(notes_dir: &Path) -> Result<()> {
    let graph = load_graph_quietly(notes_dir)?;
    let output = Output::new(graph.snapshot());
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
