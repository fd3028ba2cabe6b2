//! The note store abstraction the graph is loaded from.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::{Connection, ValidationIssue, Zettel, ZettelId};
use crate::infra::frontmatter::ParseError;
use crate::query::Query;

/// A link found in a zettel body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawLink {
    /// A wiki-link to one zettel.
    Zettel { id: ZettelId, connection: Connection },
    /// A `neuron://` query link.
    Query(Query),
    /// Link-like text that did not parse.
    Invalid { text: String, error: String },
}

/// A zettel as read from storage: summary, body and extracted links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredNote {
    pub zettel: Zettel,
    pub body: String,
    pub links: Vec<RawLink>,
}

impl StoredNote {
    pub fn id(&self) -> &ZettelId {
        self.zettel.id()
    }
}

/// Errors during note store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("zettel not found: {id}")]
    NotFound { id: ZettelId },

    #[error("zettel {id} already exists at {path}")]
    AlreadyExists { id: ZettelId, path: PathBuf },

    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("invalid encoding in {path}: {encoding}")]
    InvalidEncoding { path: PathBuf, encoding: String },

    #[error("failed to serialize front matter for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("atomic write failed for {path}: {source}")]
    AtomicWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read access to a collection of zettels.
pub trait NoteStore {
    /// Reads one zettel with its body and links.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no zettel has this ID.
    fn read_note(&self, id: &ZettelId) -> Result<StoredNote, StoreError>;

    /// Lists every zettel ID in ascending order.
    fn list_ids(&self) -> Result<Vec<ZettelId>, StoreError>;

    /// Problems found while discovering notes, such as duplicate IDs.
    fn scan_issues(&self) -> Vec<ValidationIssue> {
        Vec::new()
    }

    /// Reads the summary of every zettel.
    ///
    /// # Errors
    ///
    /// Fails on the first zettel that cannot be read.
    fn list_all(&self) -> Result<Vec<Zettel>, StoreError> {
        self.list_ids()?
            .iter()
            .map(|id| self.read_note(id).map(|note| note.zettel))
            .collect()
    }
}
