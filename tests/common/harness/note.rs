//! Builder for test zettels with sensible defaults.

use chrono::NaiveDate;
use neuron::domain::{Tag, ZettelId};
use neuron::infra::{Frontmatter, serialize};

/// Builder for creating test zettels with sensible defaults.
///
/// The ID is required since it doubles as the file stem and link target.
#[derive(Debug)]
pub struct TestNote {
    id: ZettelId,
    title: Option<String>,
    date: Option<NaiveDate>,
    tags: Vec<Tag>,
    body: String,
}

impl TestNote {
    /// Creates a new test zettel with the given ID and no front matter.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self {
            id: id.as_ref().parse().expect("Invalid ZettelId"),
            title: None,
            date: None,
            tags: Vec::new(),
            body: String::new(),
        }
    }

    /// Sets the front matter title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the front matter date from `YYYY-MM-DD`.
    pub fn date(mut self, date: &str) -> Self {
        self.date = Some(date.parse().expect("Invalid date"));
        self
    }

    /// Adds a tag to the zettel.
    pub fn tag(mut self, tag: impl AsRef<str>) -> Self {
        self.tags.push(Tag::new(tag.as_ref()).expect("Invalid tag"));
        self
    }

    /// Sets the body content (builder method).
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns the ID.
    pub fn zettel_id(&self) -> &ZettelId {
        &self.id
    }

    /// Returns the file name this zettel is stored under.
    pub fn filename(&self) -> String {
        format!("{}.md", self.id.as_str())
    }

    /// Renders the full file content.
    pub fn to_markdown(&self) -> String {
        let frontmatter = Frontmatter {
            title: self.title.clone(),
            date: self.date,
            tags: self.tags.clone(),
        };
        serialize(&frontmatter, &self.body).expect("Front matter should serialize")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuron::infra::parse;

    // ===========================================
    // Phase 2: TestNote Builder
    // ===========================================

    #[test]
    fn test_note_new_with_id() {
        let note = TestNote::new("alpha");
        assert_eq!(note.zettel_id().as_str(), "alpha");
        assert_eq!(note.filename(), "alpha.md");
    }

    #[test]
    fn test_note_without_metadata_is_body_only() {
        let note = TestNote::new("alpha").body("Just text.\n");
        assert_eq!(note.to_markdown(), "Just text.\n");
    }

    #[test]
    fn test_note_builder_fluent() {
        let note = TestNote::new("adr-001")
            .title("Architecture Decisions")
            .date("2024-01-15")
            .tag("software/architecture")
            .body("We chose Rust.\n");

        let parsed = parse(&note.to_markdown()).expect("Should parse");
        assert_eq!(
            parsed.frontmatter.title.as_deref(),
            Some("Architecture Decisions")
        );
        assert_eq!(parsed.frontmatter.tags[0].as_str(), "software/architecture");
        assert!(parsed.body.contains("We chose Rust."));
    }
}
