//! Query algebra over the zettel graph and the `neuron://` link language.
//!
//! A [`Query`] is an immutable value. Evaluating it is the job of a
//! [`QueryResolver`](crate::graph::QueryResolver); this module only builds,
//! parses, and renders queries.

mod graph_query;
mod link;
mod zettel_query;

pub use graph_query::GraphQuery;
pub use link::{QueryLinkError, SCHEME, parse_query_link};
pub use zettel_query::{
    ParseSortByError, PatternSet, SearchOptions, SortBy, TagQuery, ZettelQuery,
};

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The shape of the value a query evaluates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultShape {
    /// Zero or one zettel.
    SingleZettel,
    /// A set of zettels.
    ZettelSet,
    /// A set of directed edges.
    EdgeSet,
    /// Every zettel and every edge.
    GraphSnapshot,
}

impl fmt::Display for ResultShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResultShape::SingleZettel => "single-zettel",
            ResultShape::ZettelSet => "zettel-set",
            ResultShape::EdgeSet => "edge-set",
            ResultShape::GraphSnapshot => "graph-snapshot",
        };
        f.write_str(label)
    }
}

/// Any query the link language can express.
///
/// # Examples
///
/// ```
/// use neuron::query::{Query, ResultShape};
///
/// let query: Query = "neuron://backlinks?id=abc123".parse().unwrap();
/// assert_eq!(query.shape(), ResultShape::EdgeSet);
/// assert_eq!(query.to_string(), "neuron://backlinks?id=abc123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Zettel(ZettelQuery),
    Graph(GraphQuery),
}

impl Query {
    /// Returns the shape of the result this query evaluates to.
    pub fn shape(&self) -> ResultShape {
        match self {
            Query::Zettel(q) => q.shape(),
            Query::Graph(q) => q.shape(),
        }
    }

    /// Renders the canonical `neuron://` link for this query.
    ///
    /// Default parameters are omitted, so two links that parse to the same
    /// query render identically.
    pub fn to_uri(&self) -> String {
        link::render(self)
    }
}

impl From<ZettelQuery> for Query {
    fn from(q: ZettelQuery) -> Self {
        Query::Zettel(q)
    }
}

impl From<GraphQuery> for Query {
    fn from(q: GraphQuery) -> Self {
        Query::Graph(q)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uri())
    }
}

impl FromStr for Query {
    type Err = QueryLinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_query_link(s)
    }
}

impl Serialize for Query {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_uri())
    }
}
