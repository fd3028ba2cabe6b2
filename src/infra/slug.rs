//! Slug generation for title-derived zettel IDs.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::domain::ZettelId;

const MAX_LENGTH: usize = 50;

/// Converts a title to an identifier-safe slug.
///
/// - Decomposes accented letters (NFKD) and drops the combining marks
/// - Converts to lowercase
/// - Replaces spaces with hyphens
/// - Keeps only ASCII alphanumeric characters, hyphens, and underscores
/// - Collapses consecutive hyphens and trims them from both ends
/// - Truncates to 50 characters (at a hyphen boundary if possible)
///
/// Returns an empty string when nothing usable remains; callers decide
/// whether that is an error.
///
/// # Examples
///
/// ```
/// use neuron::infra::slugify;
///
/// assert_eq!(slugify("API Design"), "api-design");
/// assert_eq!(slugify("Café Notes"), "cafe-notes");
/// assert_eq!(slugify("!!!"), "");
/// ```
pub fn slugify(title: &str) -> String {
    let mut result = String::new();
    for c in title.nfkd().filter(|c| !is_combining_mark(*c)) {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() || c == '_' {
            result.push(c);
        } else if c == ' ' || c == '-' {
            result.push('-');
        }
    }

    let mut collapsed = String::with_capacity(result.len());
    let mut prev_was_hyphen = false;
    for c in result.chars() {
        if c == '-' {
            if !prev_was_hyphen {
                collapsed.push(c);
            }
            prev_was_hyphen = true;
        } else {
            collapsed.push(c);
            prev_was_hyphen = false;
        }
    }

    let trimmed = collapsed.trim_matches('-');
    if trimmed.len() <= MAX_LENGTH {
        return trimmed.to_string();
    }

    // Only use a hyphen boundary if it's not too early
    let truncated = &trimmed[..MAX_LENGTH];
    if let Some(last_hyphen) = truncated.rfind('-')
        && last_hyphen > MAX_LENGTH / 2
    {
        return truncated[..last_hyphen].to_string();
    }

    truncated.trim_end_matches('-').to_string()
}

/// Returns the note file name for an identifier: `{id}.md`.
///
/// # Examples
///
/// ```
/// use neuron::domain::ZettelId;
/// use neuron::infra::zettel_filename;
///
/// let id: ZettelId = "api-design".parse().unwrap();
/// assert_eq!(zettel_filename(&id), "api-design.md");
/// ```
pub fn zettel_filename(id: &ZettelId) -> String {
    format!("{}.md", id.as_str())
}
