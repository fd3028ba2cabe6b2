//! Front matter parser for extracting YAML metadata from zettel files.
//!
//! Front matter is optional. A file that does not open with a `---` line is
//! all body.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::domain::Tag;

/// Metadata block at the top of a zettel file.
///
/// Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frontmatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<Tag>,
}

/// Result of splitting a zettel file into front matter and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedNote {
    pub frontmatter: Frontmatter,
    pub body: String,
}

/// Errors during front matter parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing closing front matter delimiter '---'")]
    MissingClosingDelimiter,

    #[error("invalid YAML in front matter: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
}

/// Parses markdown content with optional YAML front matter.
///
/// # Format
/// ```text
/// ---
/// title: Note Title
/// date: 2024-01-15
/// tags:
///   - project/alpha
/// ---
/// Body content here...
/// ```
///
/// # Errors
///
/// Returns `ParseError` if an opening `---` has no matching close, or the
/// YAML between the delimiters is invalid.
pub fn parse(content: &str) -> Result<ParsedNote, ParseError> {
    let after_opening = if content.starts_with("---\r\n") {
        5
    } else if content.starts_with("---\n") {
        4
    } else {
        return Ok(ParsedNote {
            frontmatter: Frontmatter::default(),
            body: content.to_string(),
        });
    };

    let yaml_and_rest = &content[after_opening..];
    let closing_pos = find_closing_delimiter(yaml_and_rest)?;
    let yaml_content = &yaml_and_rest[..closing_pos];

    let after_closing = &yaml_and_rest[closing_pos..];
    let body_start = if after_closing.starts_with("---\r\n") {
        closing_pos + 5
    } else if after_closing.starts_with("---\n") {
        closing_pos + 4
    } else {
        closing_pos + 3
    };
    let body = yaml_and_rest.get(body_start..).unwrap_or_default().to_string();

    let frontmatter = if yaml_content.trim().is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml_content)?
    };

    Ok(ParsedNote { frontmatter, body })
}

/// Serializes front matter and body to markdown.
///
/// Empty front matter is omitted entirely.
pub fn serialize(frontmatter: &Frontmatter, body: &str) -> Result<String, serde_yaml::Error> {
    if *frontmatter == Frontmatter::default() {
        return Ok(body.to_string());
    }
    let yaml = serde_yaml::to_string(frontmatter)?;
    Ok(format!("---\n{}---\n{}", yaml, body))
}

/// Returns the text of the first `# ` heading outside fenced code.
pub fn first_heading(body: &str) -> Option<&str> {
    let mut in_fence = false;
    for line in body.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if let Some(heading) = trimmed.strip_prefix("# ") {
            let heading = heading.trim();
            if !heading.is_empty() {
                return Some(heading);
            }
        }
    }
    None
}

/// Finds the position of the closing `---` delimiter.
///
/// The closing delimiter must:
/// - Appear at the start of a line
/// - Be exactly `---` followed by newline or EOF
fn find_closing_delimiter(content: &str) -> Result<usize, ParseError> {
    let mut pos = 0;
    let bytes = content.as_bytes();

    while pos < bytes.len() {
        if content[pos..].starts_with("---") {
            let after = pos + 3;
            if after >= bytes.len()
                || bytes[after] == b'\n'
                || (bytes[after] == b'\r' && bytes.get(after + 1) == Some(&b'\n'))
            {
                return Ok(pos);
            }
        }

        match content[pos..].find('\n') {
            Some(newline_offset) => pos += newline_offset + 1,
            None => break,
        }
    }

    Err(ParseError::MissingClosingDelimiter)
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Tag>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Tag>>::deserialize(deserializer)?.unwrap_or_default())
}
