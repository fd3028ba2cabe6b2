//! Validation issue types for the check command.
//!
//! These types represent problems found while loading a zettelkasten and
//! building its graph: unreadable notes, duplicate IDs, links that do not
//! parse, links to missing zettels, and isolated zettels.

use std::path::PathBuf;

use crate::domain::ZettelId;

/// A validation issue found while building the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// The zettel where the issue was found.
    pub zettel: ZettelId,
    /// The kind of validation issue.
    pub kind: ValidationKind,
}

impl ValidationIssue {
    /// Creates a new validation issue.
    pub fn new(zettel: ZettelId, kind: ValidationKind) -> Self {
        Self { zettel, kind }
    }

    /// Creates an unreadable note issue.
    pub fn unreadable(zettel: ZettelId, error: impl ToString) -> Self {
        Self::new(zettel, ValidationKind::Unreadable(error.to_string()))
    }

    /// Creates a duplicate ID issue.
    pub fn duplicate_id(
        zettel: ZettelId,
        first_path: impl Into<PathBuf>,
        duplicate_path: impl Into<PathBuf>,
    ) -> Self {
        Self::new(
            zettel,
            ValidationKind::DuplicateId {
                first_path: first_path.into(),
                duplicate_path: duplicate_path.into(),
            },
        )
    }

    /// Creates an invalid link issue.
    pub fn invalid_link(zettel: ZettelId, text: impl Into<String>, error: impl ToString) -> Self {
        Self::new(
            zettel,
            ValidationKind::InvalidLink {
                text: text.into(),
                reason: error.to_string(),
            },
        )
    }

    /// Creates a broken link issue.
    pub fn broken_link(zettel: ZettelId, target: ZettelId) -> Self {
        Self::new(zettel, ValidationKind::BrokenLink { target })
    }

    /// Creates an isolated zettel issue (no connections in or out).
    pub fn isolated(zettel: ZettelId) -> Self {
        Self::new(zettel, ValidationKind::Isolated)
    }

    pub fn is_broken_link(&self) -> bool {
        matches!(self.kind, ValidationKind::BrokenLink { .. })
    }

    pub fn is_invalid_link(&self) -> bool {
        matches!(self.kind, ValidationKind::InvalidLink { .. })
    }

    /// Returns the severity of this issue.
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.zettel, self.kind)
    }
}

/// The kind of validation issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationKind {
    /// Note file could not be read or parsed.
    Unreadable(String),

    /// Two files map to the same zettel ID; the first one wins.
    DuplicateId {
        first_path: PathBuf,
        duplicate_path: PathBuf,
    },

    /// A wiki-link or query link in the body did not parse.
    InvalidLink { text: String, reason: String },

    /// A link references a zettel that doesn't exist.
    BrokenLink { target: ZettelId },

    /// Zettel has no connections in either direction.
    Isolated,
}

impl ValidationKind {
    /// Returns the severity of this kind of issue.
    pub fn severity(&self) -> Severity {
        match self {
            ValidationKind::Unreadable(_) => Severity::Error,
            ValidationKind::DuplicateId { .. } => Severity::Error,
            ValidationKind::InvalidLink { .. } => Severity::Error,
            ValidationKind::BrokenLink { .. } => Severity::Error,
            ValidationKind::Isolated => Severity::Warning,
        }
    }
}

impl std::fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationKind::Unreadable(msg) => write!(f, "unreadable note: {}", msg),
            ValidationKind::DuplicateId {
                first_path,
                duplicate_path,
            } => write!(
                f,
                "duplicate ID in {} (first seen in {})",
                duplicate_path.display(),
                first_path.display()
            ),
            ValidationKind::InvalidLink { text, reason } => {
                write!(f, "invalid link '{}': {}", text, reason)
            }
            ValidationKind::BrokenLink { target } => write!(f, "broken link to '{}'", target),
            ValidationKind::Isolated => write!(f, "isolated zettel (no connections)"),
        }
    }
}

/// Severity level of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Summary of validation results.
#[derive(Debug, Clone, Default)]
pub struct ValidationSummary {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn total(&self) -> usize {
        self.issues.len()
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity() == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity() == Severity::Warning)
            .count()
    }

    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Returns issues grouped by severity, errors first.
    pub fn issues_by_severity(&self) -> impl Iterator<Item = &ValidationIssue> {
        let mut sorted: Vec<_> = self.issues.iter().collect();
        sorted.sort_by_key(|i| std::cmp::Reverse(i.severity()));
        sorted.into_iter()
    }
}

impl FromIterator<ValidationIssue> for ValidationSummary {
    fn from_iter<I: IntoIterator<Item = ValidationIssue>>(iter: I) -> Self {
        Self {
            issues: iter.into_iter().collect(),
        }
    }
}
