//! Link extraction from zettel bodies.
//!
//! - `[[id]]` is an ordinary wiki-link
//! - `[[[id]]]` is a folgezettel wiki-link
//! - `<neuron://...>` and `[text](neuron://...)` are query links
//!
//! Anything inside fenced code blocks is ignored.

use regex::Regex;
use std::sync::LazyLock;

use crate::domain::{Connection, ZettelId};
use crate::infra::RawLink;
use crate::query::parse_query_link;

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\[\[\[(?P<folge>[^\[\]\n]+)\]\]\]",
        r"|\[\[(?P<ordinary>[^\[\]\n]+)\]\]",
        r"|<(?P<auto>neuron:[^>\s]*)>",
        r"|\]\((?P<target>neuron:[^)\s]*)\)",
    ))
    .expect("link pattern is valid")
});

/// Extracts every wiki-link and query link from a markdown body, in order.
///
/// Links that look like links but fail to parse are returned as
/// [`RawLink::Invalid`] so callers can report them.
///
/// # Examples
///
/// ```
/// use neuron::domain::Connection;
/// use neuron::infra::{extract_links, RawLink};
///
/// let links = extract_links("See [[abc]] and [[[def]]].");
/// assert_eq!(links.len(), 2);
/// assert!(matches!(
///     &links[1],
///     RawLink::Zettel { connection: Connection::Folgezettel, .. }
/// ));
/// ```
pub fn extract_links(body: &str) -> Vec<RawLink> {
    let mut links = Vec::new();
    let mut fence: Option<&str> = None;

    for line in body.lines() {
        let trimmed = line.trim_start();
        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            continue;
        }
        if trimmed.starts_with("```") {
            fence = Some("```");
            continue;
        }
        if trimmed.starts_with("~~~") {
            fence = Some("~~~");
            continue;
        }

        for caps in LINK_RE.captures_iter(line) {
            let link = if let Some(m) = caps.name("folge") {
                wiki_link(m.as_str(), Connection::Folgezettel)
            } else if let Some(m) = caps.name("ordinary") {
                wiki_link(m.as_str(), Connection::Ordinary)
            } else if let Some(m) = caps.name("auto").or_else(|| caps.name("target")) {
                query_link(m.as_str())
            } else {
                continue;
            };
            links.push(link);
        }
    }

    links
}

fn wiki_link(text: &str, connection: Connection) -> RawLink {
    match ZettelId::parse(text.trim()) {
        Ok(id) => RawLink::Zettel { id, connection },
        Err(e) => RawLink::Invalid {
            text: text.to_string(),
            error: e.to_string(),
        },
    }
}

fn query_link(text: &str) -> RawLink {
    match parse_query_link(text) {
        Ok(query) => RawLink::Query(query),
        Err(e) => RawLink::Invalid {
            text: text.to_string(),
            error: e.to_string(),
        },
    }
}
