//! Queries that select zettels: by ID or by tag.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::{Connection, Tag, TagPattern, ZettelId};
use crate::query::ResultShape;

/// A predicate over a zettel's tags.
///
/// `Any` and `All` carry a [`PatternSet`], which is never empty, so every
/// value has exactly one meaning. [`TagQuery::any`] with no patterns yields
/// [`TagQuery::Everything`]: a search with no tag filter returns every
/// zettel. Use [`TagQuery::any_or_nothing`] or [`TagQuery::Nothing`] when an
/// empty filter should select nothing.
///
/// # Examples
///
/// ```
/// use neuron::domain::{Tag, TagPattern};
/// use neuron::query::TagQuery;
///
/// let tags = vec![Tag::new("project/alpha").unwrap()];
///
/// assert!(TagQuery::any(vec![]).matches(&tags));
/// assert!(!TagQuery::any_or_nothing(vec![]).matches(&tags));
///
/// let query = TagQuery::any(vec![TagPattern::new("project/*").unwrap()]);
/// assert!(query.matches(&tags));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TagQuery {
    /// Matches every zettel, tagged or not.
    #[default]
    Everything,
    /// Matches no zettel.
    Nothing,
    /// Matches when some pattern matches some tag.
    Any(PatternSet),
    /// Matches when every pattern matches some tag.
    All(PatternSet),
}

/// A non-empty list of distinct tag patterns, in first-seen order.
///
/// Built only through the [`TagQuery`] constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSet(Vec<TagPattern>);

impl PatternSet {
    fn new(patterns: Vec<TagPattern>) -> Option<Self> {
        let mut unique = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            if !unique.contains(&pattern) {
                unique.push(pattern);
            }
        }
        if unique.is_empty() {
            None
        } else {
            Some(Self(unique))
        }
    }

    pub fn as_slice(&self) -> &[TagPattern] {
        &self.0
    }
}

impl TagQuery {
    /// Matches zettels where at least one pattern matches.
    ///
    /// An empty pattern list means "no filter" and yields
    /// [`TagQuery::Everything`].
    pub fn any(patterns: Vec<TagPattern>) -> Self {
        PatternSet::new(patterns).map_or(TagQuery::Everything, TagQuery::Any)
    }

    /// Like [`TagQuery::any`], but an empty pattern list yields
    /// [`TagQuery::Nothing`].
    pub fn any_or_nothing(patterns: Vec<TagPattern>) -> Self {
        PatternSet::new(patterns).map_or(TagQuery::Nothing, TagQuery::Any)
    }

    /// Matches zettels where every pattern matches some tag.
    ///
    /// An empty pattern list is vacuously true and yields
    /// [`TagQuery::Everything`].
    pub fn all(patterns: Vec<TagPattern>) -> Self {
        PatternSet::new(patterns).map_or(TagQuery::Everything, TagQuery::All)
    }

    /// Evaluates the predicate against a zettel's tags.
    pub fn matches(&self, tags: &[Tag]) -> bool {
        match self {
            TagQuery::Everything => true,
            TagQuery::Nothing => false,
            TagQuery::Any(patterns) => patterns
                .as_slice()
                .iter()
                .any(|p| tags.iter().any(|t| p.matches(t))),
            TagQuery::All(patterns) => patterns
                .as_slice()
                .iter()
                .all(|p| tags.iter().any(|t| p.matches(t))),
        }
    }

    /// Returns the patterns of an `Any` or `All` query.
    pub fn patterns(&self) -> &[TagPattern] {
        match self {
            TagQuery::Everything | TagQuery::Nothing => &[],
            TagQuery::Any(patterns) | TagQuery::All(patterns) => patterns.as_slice(),
        }
    }
}

/// Result ordering for tag searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortBy {
    /// Ascending by ID.
    #[default]
    Id,
    /// Newest date first; undated zettels last; ties by ID.
    Timeline,
    /// Ascending by title, then ID.
    Title,
}

/// Error returned when parsing an unknown sort key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort '{0}': expected 'id', 'timeline' or 'title'")]
pub struct ParseSortByError(String);

impl SortBy {
    pub const ALL: [SortBy; 3] = [SortBy::Id, SortBy::Timeline, SortBy::Title];

    pub fn label(self) -> &'static str {
        match self {
            SortBy::Id => "id",
            SortBy::Timeline => "timeline",
            SortBy::Title => "title",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortBy {
    type Err = ParseSortByError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortBy::ALL
            .into_iter()
            .find(|k| k.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseSortByError(s.to_string()))
    }
}

/// Ordering and truncation applied to a tag search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SearchOptions {
    pub sort: SortBy,
    pub limit: Option<NonZeroUsize>,
}

impl SearchOptions {
    pub fn sorted_by(sort: SortBy) -> Self {
        Self { sort, limit: None }
    }

    pub fn with_limit(mut self, limit: Option<NonZeroUsize>) -> Self {
        self.limit = limit;
        self
    }
}

/// A query that selects zettels.
///
/// The optional connection is context for the caller rendering the result
/// (for example, how the selected zettels relate to the linking zettel). It
/// never filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZettelQuery {
    /// The zettel with this ID, if any.
    ById {
        id: ZettelId,
        connection: Option<Connection>,
    },
    /// Every zettel whose tags satisfy the tag query.
    ByTag {
        tags: TagQuery,
        connection: Option<Connection>,
        options: SearchOptions,
    },
}

impl ZettelQuery {
    pub fn by_id(id: ZettelId) -> Self {
        ZettelQuery::ById {
            id,
            connection: None,
        }
    }

    pub fn by_tag(tags: TagQuery) -> Self {
        ZettelQuery::ByTag {
            tags,
            connection: None,
            options: SearchOptions::default(),
        }
    }

    /// Sets the connection context.
    pub fn with_connection(mut self, conn: Option<Connection>) -> Self {
        match &mut self {
            ZettelQuery::ById { connection, .. } | ZettelQuery::ByTag { connection, .. } => {
                *connection = conn
            }
        }
        self
    }

    /// Sets search options. Has no effect on `ById`.
    pub fn with_options(mut self, opts: SearchOptions) -> Self {
        if let ZettelQuery::ByTag { options, .. } = &mut self {
            *options = opts;
        }
        self
    }

    pub fn connection(&self) -> Option<Connection> {
        match self {
            ZettelQuery::ById { connection, .. } | ZettelQuery::ByTag { connection, .. } => {
                *connection
            }
        }
    }

    pub fn shape(&self) -> ResultShape {
        match self {
            ZettelQuery::ById { .. } => ResultShape::SingleZettel,
            ZettelQuery::ByTag { .. } => ResultShape::ZettelSet,
        }
    }
}
