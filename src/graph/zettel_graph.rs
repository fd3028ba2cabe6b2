//! In-memory zettel graph built from stored notes.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, trace, warn};

use crate::domain::{Connection, ValidationIssue, Zettel, ZettelId};
use crate::graph::{Edge, GraphSnapshot, QueryResolver, QueryResult};
use crate::infra::{NoteStore, RawLink, StoreError, StoredNote};
use crate::query::{GraphQuery, Query, SearchOptions, SortBy, TagQuery, ZettelQuery};

/// A directed graph of zettels with [`Connection`]-typed edges.
///
/// Immutable once built. At most one edge exists per ordered pair; repeated
/// links merge with [`Connection::merge`].
#[derive(Debug, Clone, Default)]
pub struct ZettelGraph {
    graph: DiGraph<ZettelId, Connection>,
    nodes: HashMap<ZettelId, NodeIndex>,
    zettels: BTreeMap<ZettelId, Zettel>,
}

impl ZettelGraph {
    /// Builds the graph from notes, returning any link problems found.
    ///
    /// - Wiki-links and `ById` query links connect to their target
    /// - `ByTag` query links connect to every zettel they select, except the
    ///   linking zettel itself, which never counts against the limit
    /// - Graph query links add no edges
    /// - Self-links are ignored
    ///
    /// A link to a missing zettel yields a broken link issue, and link text
    /// that failed to parse yields an invalid link issue.
    pub fn build(notes: impl IntoIterator<Item = StoredNote>) -> (Self, Vec<ValidationIssue>) {
        let mut graph = Self::default();
        let mut pending = Vec::new();

        for note in notes {
            let id = note.id().clone();
            if graph.zettels.contains_key(&id) {
                warn!(id = %id, "ignoring repeated zettel");
                continue;
            }
            let index = graph.graph.add_node(id.clone());
            graph.nodes.insert(id.clone(), index);
            graph.zettels.insert(id.clone(), note.zettel);
            pending.push((id, note.links));
        }

        let mut issues = Vec::new();
        for (source, links) in pending {
            let mut broken = BTreeSet::new();
            for link in links {
                match link {
                    RawLink::Zettel { id, connection } => {
                        graph.link_to(&source, &id, connection, &mut broken);
                    }
                    RawLink::Query(Query::Zettel(ZettelQuery::ById { id, connection })) => {
                        graph.link_to(&source, &id, connection.unwrap_or_default(), &mut broken);
                    }
                    RawLink::Query(Query::Zettel(ZettelQuery::ByTag {
                        tags,
                        connection,
                        options,
                    })) => {
                        let limit = options.limit.map_or(usize::MAX, |n| n.get());
                        let targets: Vec<ZettelId> = graph
                            .search(&tags, &SearchOptions::sorted_by(options.sort))
                            .into_iter()
                            .map(|z| z.id().clone())
                            .filter(|id| *id != source)
                            .take(limit)
                            .collect();
                        for target in targets {
                            graph.add_edge(&source, &target, connection.unwrap_or_default());
                        }
                    }
                    RawLink::Query(Query::Graph(_)) => {}
                    RawLink::Invalid { text, error } => {
                        issues.push(ValidationIssue::invalid_link(source.clone(), text, error));
                    }
                }
            }
            issues.extend(
                broken
                    .into_iter()
                    .map(|target| ValidationIssue::broken_link(source.clone(), target)),
            );
        }

        debug!(
            zettels = graph.graph.node_count(),
            edges = graph.graph.edge_count(),
            issues = issues.len(),
            "built zettel graph"
        );
        (graph, issues)
    }

    /// Reads every note from a store and builds the graph.
    ///
    /// Notes that cannot be read are reported as unreadable and left out.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` only if the store cannot list its notes.
    pub fn load<S: NoteStore + ?Sized>(
        store: &S,
    ) -> Result<(Self, Vec<ValidationIssue>), StoreError> {
        let mut issues = store.scan_issues();
        let mut notes = Vec::new();

        for id in store.list_ids()? {
            match store.read_note(&id) {
                Ok(note) => notes.push(note),
                Err(e) => {
                    warn!(id = %id, error = %e, "skipping unreadable zettel");
                    issues.push(ValidationIssue::unreadable(id, e));
                }
            }
        }

        let (graph, link_issues) = Self::build(notes);
        issues.extend(link_issues);
        Ok((graph, issues))
    }

    fn link_to(
        &mut self,
        source: &ZettelId,
        target: &ZettelId,
        connection: Connection,
        broken: &mut BTreeSet<ZettelId>,
    ) {
        if !self.nodes.contains_key(target) {
            broken.insert(target.clone());
            return;
        }
        self.add_edge(source, target, connection);
    }

    fn add_edge(&mut self, source: &ZettelId, target: &ZettelId, connection: Connection) {
        if source == target {
            return;
        }
        let (Some(&from), Some(&to)) = (self.nodes.get(source), self.nodes.get(target)) else {
            return;
        };
        trace!(from = %source, to = %target, connection = %connection, "edge");
        match self.graph.find_edge(from, to) {
            Some(edge) => self.graph[edge] = self.graph[edge].merge(connection),
            None => {
                self.graph.add_edge(from, to, connection);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.zettels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zettels.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: &ZettelId) -> bool {
        self.zettels.contains_key(id)
    }

    pub fn zettel(&self, id: &ZettelId) -> Option<&Zettel> {
        self.zettels.get(id)
    }

    /// Iterates zettels in ID order.
    pub fn zettels(&self) -> impl Iterator<Item = &Zettel> {
        self.zettels.values()
    }

    /// Returns every edge, sorted.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self
            .graph
            .edge_references()
            .map(|e| self.edge(e.source(), e.target(), *e.weight()))
            .collect();
        edges.sort();
        edges
    }

    /// Returns the edges pointing at `id`, sorted by source.
    ///
    /// Empty when `id` is not in the graph.
    pub fn backlinks(&self, id: &ZettelId, filter: Option<Connection>) -> Vec<Edge> {
        self.edges_of(id, Direction::Incoming, filter)
    }

    /// Returns the edges leaving `id`, sorted by target.
    pub fn forward_links(&self, id: &ZettelId, filter: Option<Connection>) -> Vec<Edge> {
        self.edges_of(id, Direction::Outgoing, filter)
    }

    /// Zettels that `id` follows from (folgezettel parents).
    pub fn uplinks(&self, id: &ZettelId) -> Vec<&Zettel> {
        self.backlinks(id, Some(Connection::Folgezettel))
            .iter()
            .filter_map(|e| self.zettels.get(&e.from))
            .collect()
    }

    /// Zettels that follow from `id` (folgezettel children).
    pub fn downlinks(&self, id: &ZettelId) -> Vec<&Zettel> {
        self.forward_links(id, Some(Connection::Folgezettel))
            .iter()
            .filter_map(|e| self.zettels.get(&e.to))
            .collect()
    }

    /// IDs of zettels with no edges in either direction.
    pub fn isolated(&self) -> Vec<&ZettelId> {
        self.zettels
            .keys()
            .filter(|id| {
                self.nodes.get(*id).is_some_and(|&ix| {
                    self.graph.neighbors_undirected(ix).next().is_none()
                })
            })
            .collect()
    }

    /// Selects zettels by tag, ordered and truncated per `options`.
    pub fn search(&self, tags: &TagQuery, options: &SearchOptions) -> Vec<Zettel> {
        let mut found: Vec<Zettel> = self
            .zettels
            .values()
            .filter(|z| tags.matches(z.tags()))
            .cloned()
            .collect();

        match options.sort {
            SortBy::Id => {}
            SortBy::Timeline => found.sort_by(|a, b| b.date().cmp(&a.date())),
            SortBy::Title => found.sort_by(|a, b| a.title().cmp(b.title())),
        }
        if let Some(limit) = options.limit {
            found.truncate(limit.get());
        }
        found
    }

    /// Returns every zettel and every edge.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            zettels: self.zettels.values().cloned().collect(),
            edges: self.edges(),
        }
    }

    fn edges_of(
        &self,
        id: &ZettelId,
        direction: Direction,
        filter: Option<Connection>,
    ) -> Vec<Edge> {
        let Some(&ix) = self.nodes.get(id) else {
            return Vec::new();
        };
        let mut edges: Vec<Edge> = self
            .graph
            .edges_directed(ix, direction)
            .filter(|e| filter.is_none_or(|k| *e.weight() == k))
            .map(|e| self.edge(e.source(), e.target(), *e.weight()))
            .collect();
        edges.sort();
        edges
    }

    fn edge(&self, from: NodeIndex, to: NodeIndex, connection: Connection) -> Edge {
        Edge::new(self.graph[from].clone(), self.graph[to].clone(), connection)
    }
}

impl QueryResolver for ZettelGraph {
    fn resolve_zettel(&self, query: &ZettelQuery) -> QueryResult {
        match query {
            ZettelQuery::ById { id, connection } => QueryResult::Zettel {
                connection: *connection,
                zettel: self.zettel(id).cloned(),
            },
            ZettelQuery::ByTag {
                tags,
                connection,
                options,
            } => QueryResult::Zettels {
                connection: *connection,
                zettels: self.search(tags, options),
            },
        }
    }

    fn resolve_graph(&self, query: &GraphQuery) -> QueryResult {
        match query {
            GraphQuery::Id => QueryResult::Graph(self.snapshot()),
            GraphQuery::BacklinksOf { connection, id } => {
                QueryResult::Edges(self.backlinks(id, *connection))
            }
        }
    }
}
