//! Hierarchical tags and glob patterns over them.

use globset::{GlobBuilder, GlobMatcher};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// Characters with glob meaning; never allowed in a tag.
const GLOB_META: &[char] = &['*', '?', '[', ']', '{', '}', '\\'];

/// A slash-delimited hierarchical label such as `project/alpha`.
///
/// # Validation Rules
/// - Non-empty after normalization
/// - Segments contain no whitespace, control characters, or glob
///   metacharacters (`* ? [ ] { } \`)
/// - Case-sensitive: `Rust` ≠ `rust`
///
/// # Normalization
/// - Surrounding whitespace is trimmed
/// - Leading/trailing slashes are stripped
/// - Consecutive slashes are collapsed
///
/// # Examples
///
/// ```
/// use neuron::domain::Tag;
///
/// let tag = Tag::new("/project//alpha/").unwrap();
/// assert_eq!(tag.as_str(), "project/alpha");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(String);

/// Error returned when parsing an invalid tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid tag '{value}': {reason}")]
pub struct ParseTagError {
    value: String,
    reason: &'static str,
}

impl Tag {
    /// Creates a new Tag from a string.
    ///
    /// # Errors
    ///
    /// Returns `ParseTagError` if the tag is empty after normalization or any
    /// segment contains a disallowed character.
    pub fn new(s: &str) -> Result<Self, ParseTagError> {
        let error = |reason| ParseTagError {
            value: s.to_string(),
            reason,
        };

        let segments: Vec<&str> = s.trim().split('/').filter(|seg| !seg.is_empty()).collect();
        if segments.is_empty() {
            return Err(error("tag cannot be empty"));
        }

        for seg in &segments {
            if seg.chars().any(|c| c.is_whitespace() || c.is_control()) {
                return Err(error("tag segments cannot contain whitespace"));
            }
            if seg.contains(GLOB_META) {
                return Err(error("tag segments cannot contain glob characters"));
            }
        }

        Ok(Self(segments.join("/")))
    }

    /// Returns the normalized tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag(\"{}\")", self.0)
    }
}

impl FromStr for Tag {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for Tag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A glob pattern matched against whole tags.
///
/// - `*` matches any run of characters within one segment
/// - `?` matches one character within one segment
/// - `**` as a whole segment matches zero or more segments
///
/// `project/*` matches `project/alpha` but not `project/alpha/beta`;
/// `project/**` matches both, but not `project` itself; `**/alpha` matches
/// `alpha` and `x/alpha`. A pattern without wildcards matches only the
/// identical tag.
///
/// # Examples
///
/// ```
/// use neuron::domain::{Tag, TagPattern};
///
/// let pattern = TagPattern::new("project/*").unwrap();
/// assert!(pattern.matches(&Tag::new("project/alpha").unwrap()));
/// assert!(!pattern.matches(&Tag::new("project/alpha/beta").unwrap()));
/// ```
#[derive(Clone)]
pub struct TagPattern {
    source: String,
    matcher: GlobMatcher,
}

/// Error returned when a tag pattern violates the pattern grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid tag pattern '{pattern}': {reason}")]
pub struct ParseTagPatternError {
    pattern: String,
    reason: String,
}

impl ParseTagPatternError {
    fn new(pattern: &str, reason: impl Into<String>) -> Self {
        Self {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns the pattern text that was rejected.
    pub fn invalid_value(&self) -> &str {
        &self.pattern
    }
}

impl TagPattern {
    /// Compiles a tag pattern.
    ///
    /// The pattern is normalized like a [`Tag`] (trimmed, outer slashes
    /// stripped, repeated slashes collapsed) before compilation.
    ///
    /// # Errors
    ///
    /// Returns `ParseTagPatternError` if the pattern is empty, contains
    /// whitespace or bracket/brace/backslash syntax, or uses `**` inside a
    /// segment with other characters.
    pub fn new(s: &str) -> Result<Self, ParseTagPatternError> {
        let segments: Vec<&str> = s.trim().split('/').filter(|seg| !seg.is_empty()).collect();
        if segments.is_empty() {
            return Err(ParseTagPatternError::new(s, "pattern cannot be empty"));
        }

        for seg in &segments {
            if seg.chars().any(|c| c.is_whitespace() || c.is_control()) {
                return Err(ParseTagPatternError::new(
                    s,
                    "pattern cannot contain whitespace",
                ));
            }
            if seg.contains(['[', ']', '{', '}', '\\']) {
                return Err(ParseTagPatternError::new(
                    s,
                    "only '*', '?' and '**' wildcards are supported",
                ));
            }
            if seg.contains("**") && *seg != "**" {
                return Err(ParseTagPatternError::new(
                    s,
                    "'**' must be a whole segment",
                ));
            }
        }

        let source = segments.join("/");
        let matcher = GlobBuilder::new(&source)
            .literal_separator(true)
            .build()
            .map_err(|e| ParseTagPatternError::new(s, e.to_string()))?
            .compile_matcher();

        Ok(Self { source, matcher })
    }

    /// Returns a pattern that matches exactly `tag`.
    pub fn literal(tag: &Tag) -> Self {
        // Tags never contain glob metacharacters, so the tag text is its own glob.
        Self::new(tag.as_str()).unwrap_or_else(|_| unreachable!("tags are valid literal patterns"))
    }

    /// Returns whether the pattern matches the whole tag.
    pub fn matches(&self, tag: &Tag) -> bool {
        self.matcher.is_match(tag.as_str())
    }

    /// Returns the normalized pattern text.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl PartialEq for TagPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for TagPattern {}

impl Hash for TagPattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
    }
}

impl fmt::Display for TagPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl fmt::Debug for TagPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TagPattern(\"{}\")", self.source)
    }
}

impl FromStr for TagPattern {
    type Err = ParseTagPatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
