//! Zettel identifiers: parsing, formatting, and generation from an ID scheme.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ulid::Ulid;

use crate::infra::slugify;

/// A stable identifier for a zettel.
///
/// The identifier is also the note's file stem (`<id>.md`) and appears in
/// wiki-links and query links, so its alphabet is restricted to characters
/// that are safe in file names and URLs:
///
/// - ASCII letters and digits
/// - `-`, `_` and `.`
/// - must be non-empty and must not start with `.`
///
/// # Examples
///
/// ```
/// use neuron::domain::ZettelId;
///
/// let id: ZettelId = "abc123".parse().unwrap();
/// assert_eq!(id.as_str(), "abc123");
/// assert!("has space".parse::<ZettelId>().is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZettelId(String);

/// How a new zettel ID is derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdScheme {
    /// Time-sortable random token (a ULID).
    Hash,
    /// Slug of a user-supplied title.
    Custom(String),
}

/// Errors produced while parsing or generating a zettel ID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZettelIdError {
    #[error("malformed zettel ID '{value}': {reason}")]
    Malformed { value: String, reason: &'static str },

    #[error("title '{title}' does not produce a valid zettel ID")]
    InvalidTitle { title: String },
}

impl ZettelIdError {
    /// Returns the text that was rejected.
    pub fn invalid_value(&self) -> &str {
        match self {
            ZettelIdError::Malformed { value, .. } => value,
            ZettelIdError::InvalidTitle { title } => title,
        }
    }
}

/// A source of random bits for [`IdScheme::Hash`] generation.
///
/// Implemented for every [`rand::RngCore`], so callers pass `rand::thread_rng()`
/// in production and a seeded RNG in tests.
pub trait Entropy {
    fn next_u128(&mut self) -> u128;
}

impl<R: rand::RngCore + ?Sized> Entropy for R {
    fn next_u128(&mut self) -> u128 {
        (u128::from(self.next_u64()) << 64) | u128::from(self.next_u64())
    }
}

impl ZettelId {
    /// Parses identifier text, rejecting anything outside the ID grammar.
    ///
    /// # Errors
    ///
    /// Returns `ZettelIdError::Malformed` for empty text, text starting with `.`,
    /// or text containing whitespace, `/`, or any other disallowed character.
    pub fn parse(s: &str) -> Result<Self, ZettelIdError> {
        let malformed = |reason| ZettelIdError::Malformed {
            value: s.to_string(),
            reason,
        };

        if s.is_empty() {
            return Err(malformed("identifier cannot be empty"));
        }
        if s.starts_with('.') {
            return Err(malformed("identifier cannot start with '.'"));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(malformed("identifier cannot contain whitespace"));
        }
        if s.contains('/') || s.contains('\\') {
            return Err(malformed("identifier cannot contain path separators"));
        }
        if !s.chars().all(is_id_char) {
            return Err(malformed(
                "identifier must contain only ASCII letters, digits, '-', '_' and '.'",
            ));
        }

        Ok(Self(s.to_string()))
    }

    /// Generates a new identifier according to `scheme`.
    ///
    /// `Hash` encodes the millisecond timestamp and 80 bits from `entropy` as a
    /// ULID; timestamps before the Unix epoch are clamped to the epoch.
    /// `Custom` slugifies the title and ignores both timestamp and entropy.
    ///
    /// # Errors
    ///
    /// Returns `ZettelIdError::InvalidTitle` if a custom title slugifies to nothing.
    pub fn generate<E: Entropy + ?Sized>(
        scheme: &IdScheme,
        timestamp: DateTime<Utc>,
        entropy: &mut E,
    ) -> Result<Self, ZettelIdError> {
        match scheme {
            IdScheme::Hash => {
                let millis = u64::try_from(timestamp.timestamp_millis()).unwrap_or(0);
                let ulid = Ulid::from_parts(millis, entropy.next_u128());
                Ok(Self(ulid.to_string()))
            }
            IdScheme::Custom(title) => {
                let invalid = || ZettelIdError::InvalidTitle {
                    title: title.clone(),
                };
                let slug = slugify(title);
                if slug.is_empty() {
                    return Err(invalid());
                }
                Self::parse(&slug).map_err(|_| invalid())
            }
        }
    }

    /// Returns the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the creation time embedded in a hash-scheme identifier.
    ///
    /// Only the canonical uppercase ULID form counts as a hash identifier.
    /// Custom identifiers carry no timestamp and return `None`, even when
    /// their text happens to decode as Crockford base32.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let ulid = Ulid::from_string(&self.0).ok()?;
        if ulid.to_string() != self.0 {
            return None;
        }
        let millis = i64::try_from(ulid.timestamp_ms()).ok()?;
        DateTime::from_timestamp_millis(millis)
    }
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

impl fmt::Display for ZettelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ZettelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ZettelId(\"{}\")", self.0)
    }
}

impl FromStr for ZettelId {
    type Err = ZettelIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ZettelId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ZettelId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
