//! Query evaluation contract and result types.

use serde::Serialize;

use crate::domain::{Connection, Zettel, ZettelId};
use crate::query::{GraphQuery, Query, ResultShape, ZettelQuery};

/// A directed, typed edge between two zettels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Edge {
    pub from: ZettelId,
    pub to: ZettelId,
    pub connection: Connection,
}

impl Edge {
    pub fn new(from: ZettelId, to: ZettelId, connection: Connection) -> Self {
        Self {
            from,
            to,
            connection,
        }
    }
}

/// Every zettel and every edge; enough to rebuild the graph without further
/// lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphSnapshot {
    pub zettels: Vec<Zettel>,
    pub edges: Vec<Edge>,
}

/// The value a query evaluates to.
///
/// Each variant corresponds to one [`ResultShape`], and a resolver always
/// returns the variant matching the query's shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", content = "result")]
pub enum QueryResult {
    #[serde(rename = "single-zettel")]
    Zettel {
        connection: Option<Connection>,
        zettel: Option<Zettel>,
    },
    #[serde(rename = "zettel-set")]
    Zettels {
        connection: Option<Connection>,
        zettels: Vec<Zettel>,
    },
    #[serde(rename = "edge-set")]
    Edges(Vec<Edge>),
    #[serde(rename = "graph-snapshot")]
    Graph(GraphSnapshot),
}

impl QueryResult {
    pub fn shape(&self) -> ResultShape {
        match self {
            QueryResult::Zettel { .. } => ResultShape::SingleZettel,
            QueryResult::Zettels { .. } => ResultShape::ZettelSet,
            QueryResult::Edges(_) => ResultShape::EdgeSet,
            QueryResult::Graph(_) => ResultShape::GraphSnapshot,
        }
    }

    /// Returns true if the result holds no zettels and no edges.
    pub fn is_empty(&self) -> bool {
        match self {
            QueryResult::Zettel { zettel, .. } => zettel.is_none(),
            QueryResult::Zettels { zettels, .. } => zettels.is_empty(),
            QueryResult::Edges(edges) => edges.is_empty(),
            QueryResult::Graph(snapshot) => snapshot.zettels.is_empty(),
        }
    }
}

/// Evaluates queries against a zettel graph.
///
/// Implementations must honor these rules:
///
/// - `ById` yields zero or one zettel
/// - `ByTag` yields every zettel the tag query matches, ordered and
///   truncated per its search options
/// - `Id` yields a complete snapshot
/// - `BacklinksOf(filter, id)` yields every edge into `id` whose kind
///   passes the filter, and an empty set when `id` is absent
///
/// Missing data is an empty result, never an error.
pub trait QueryResolver {
    fn resolve_zettel(&self, query: &ZettelQuery) -> QueryResult;

    fn resolve_graph(&self, query: &GraphQuery) -> QueryResult;

    fn resolve(&self, query: &Query) -> QueryResult {
        match query {
            Query::Zettel(q) => self.resolve_zettel(q),
            Query::Graph(q) => self.resolve_graph(q),
        }
    }
}
