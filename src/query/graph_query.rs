//! Queries over the graph structure itself.

use crate::domain::{Connection, ZettelId};
use crate::query::ResultShape;

/// A query that returns edges or the whole graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphQuery {
    /// The whole graph: every zettel and every edge.
    Id,
    /// Every edge pointing at `id`, optionally restricted to one kind.
    ///
    /// An unfiltered query returns a superset of any filtered one.
    BacklinksOf {
        connection: Option<Connection>,
        id: ZettelId,
    },
}

impl GraphQuery {
    pub fn backlinks_of(id: ZettelId, connection: Option<Connection>) -> Self {
        GraphQuery::BacklinksOf { connection, id }
    }

    /// Folgezettel backlinks: the zettels `id` follows from.
    pub fn uplinks_of(id: ZettelId) -> Self {
        Self::backlinks_of(id, Some(Connection::Folgezettel))
    }

    pub fn shape(&self) -> ResultShape {
        match self {
            GraphQuery::Id => ResultShape::GraphSnapshot,
            GraphQuery::BacklinksOf { .. } => ResultShape::EdgeSet,
        }
    }
}
