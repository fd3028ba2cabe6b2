//! Zettel summary: the metadata a query sees for each note.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::domain::{Tag, ZettelId};

/// A zettel's identity and organizational metadata.
///
/// The body and links live in [`StoredNote`](crate::infra::StoredNote); this
/// is the summary a resolver returns for queries.
///
/// # Examples
///
/// ```
/// use neuron::domain::{Tag, Zettel};
///
/// let zettel = Zettel::builder("abc123".parse().unwrap(), "Tag Hierarchies")
///     .tags(vec![Tag::new("pkm/tags").unwrap()])
///     .build();
/// assert_eq!(zettel.title(), "Tag Hierarchies");
/// assert_eq!(zettel.tags().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Zettel {
    id: ZettelId,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: Vec<Tag>,
}

impl Zettel {
    /// Creates a zettel with no date and no tags.
    ///
    /// A blank title falls back to the identifier text.
    pub fn new(id: ZettelId, title: impl Into<String>) -> Self {
        Self::builder(id, title).build()
    }

    /// Creates a builder for a zettel with optional fields.
    pub fn builder(id: ZettelId, title: impl Into<String>) -> ZettelBuilder {
        ZettelBuilder {
            id,
            title: title.into(),
            date: None,
            tags: Vec::new(),
        }
    }

    pub fn id(&self) -> &ZettelId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

impl fmt::Display for Zettel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.title, self.id)
    }
}

/// Builder for constructing a Zettel with optional fields.
pub struct ZettelBuilder {
    id: ZettelId,
    title: String,
    date: Option<NaiveDate>,
    tags: Vec<Tag>,
}

impl ZettelBuilder {
    /// Sets the zettel's date.
    pub fn date(mut self, date: Option<NaiveDate>) -> Self {
        self.date = date;
        self
    }

    /// Sets the zettel's tags.
    ///
    /// Duplicates are removed (first occurrence kept).
    pub fn tags(mut self, tags: Vec<Tag>) -> Self {
        let mut seen = Vec::new();
        for tag in tags {
            if !seen.contains(&tag) {
                seen.push(tag);
            }
        }
        self.tags = seen;
        self
    }

    pub fn build(self) -> Zettel {
        let trimmed = self.title.trim();
        let title = if trimmed.is_empty() {
            self.id.to_string()
        } else {
            trimmed.to_string()
        };

        Zettel {
            id: self.id,
            title,
            date: self.date,
            tags: self.tags,
        }
    }
}
