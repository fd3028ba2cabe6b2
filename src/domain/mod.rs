//! Core types: ZettelId, IdScheme, Connection, Tag, TagPattern, Zettel

mod connection;
mod tag;
mod validation;
mod zettel;
mod zettel_id;

pub use connection::{Connection, ParseConnectionError};
pub use tag::{ParseTagError, ParseTagPatternError, Tag, TagPattern};
pub use validation::{Severity, ValidationIssue, ValidationKind, ValidationSummary};
pub use zettel::{Zettel, ZettelBuilder};
pub use zettel_id::{Entropy, IdScheme, ZettelId, ZettelIdError};
