//! Edge kinds between zettels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The kind of a directed edge from one zettel to another.
///
/// `Ordinary` is an unmarked reference. `Folgezettel` is a hierarchical
/// "follows from" link; the folgezettel backlinks of a zettel are its uplinks.
///
/// # Examples
///
/// ```
/// use neuron::domain::Connection;
///
/// assert_eq!(Connection::default(), Connection::Ordinary);
/// assert_eq!(Connection::Folgezettel.label(), "folgezettel");
/// assert_eq!("folgezettel".parse::<Connection>().unwrap(), Connection::Folgezettel);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connection {
    #[default]
    Ordinary,
    Folgezettel,
}

/// Error returned when parsing an unknown connection label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown connection '{0}': expected 'ordinary' or 'folgezettel'")]
pub struct ParseConnectionError(String);

impl Connection {
    /// All connection kinds.
    pub const ALL: [Connection; 2] = [Connection::Ordinary, Connection::Folgezettel];

    /// Returns the stable text label used in query links and output.
    pub fn label(self) -> &'static str {
        match self {
            Connection::Ordinary => "ordinary",
            Connection::Folgezettel => "folgezettel",
        }
    }

    /// Combines two connections between the same pair of zettels.
    ///
    /// A folgezettel link is the stronger claim and absorbs an ordinary one.
    pub fn merge(self, other: Connection) -> Connection {
        match (self, other) {
            (Connection::Ordinary, Connection::Ordinary) => Connection::Ordinary,
            _ => Connection::Folgezettel,
        }
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Connection {
    type Err = ParseConnectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Connection::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseConnectionError(s.to_string()))
    }
}
