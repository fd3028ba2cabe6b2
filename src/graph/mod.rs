//! Query evaluation over an in-memory zettel graph

mod resolver;
mod zettel_graph;

pub use resolver::{Edge, GraphSnapshot, QueryResolver, QueryResult};
pub use zettel_graph::ZettelGraph;
