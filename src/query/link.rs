//! Parsing and rendering of `neuron://` query links.
//!
//! Recognized forms:
//!
//! ```text
//! neuron://zettel/<id>[?connection=<kind>]
//! neuron://zettel?id=<id>[&connection=<kind>]
//! neuron://search[?tag=<pattern>...][&match=any|all|none][&connection=<kind>]
//!                [&sort=id|timeline|title | &timeline][&limit=<n>]
//! neuron://graph
//! neuron://backlinks?id=<id>[&connection=<kind>]
//! neuron://uplinks?id=<id>
//! ```

use std::num::NonZeroUsize;
use thiserror::Error;
use url::Url;
use url::form_urlencoded::Serializer;

use crate::domain::{
    Connection, ParseTagPatternError, TagPattern, ZettelId, ZettelIdError,
};
use crate::query::{GraphQuery, Query, SearchOptions, SortBy, TagQuery, ZettelQuery};

/// URI scheme of query links.
pub const SCHEME: &str = "neuron";

/// Error returned when query link text cannot be turned into a [`Query`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryLinkError {
    #[error("not a URI: '{text}'")]
    NotAUri {
        text: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unrecognized query link '{link}': {reason}")]
    Unrecognized { link: String, reason: String },

    #[error(transparent)]
    Id(#[from] ZettelIdError),

    #[error(transparent)]
    TagPattern(#[from] ParseTagPatternError),
}

impl QueryLinkError {
    fn unrecognized(link: &str, reason: impl Into<String>) -> Self {
        QueryLinkError::Unrecognized {
            link: link.to_string(),
            reason: reason.into(),
        }
    }
}

/// Parses query link text into a typed [`Query`].
///
/// # Errors
///
/// - `NotAUri` if the text is not a URI at all
/// - `Unrecognized` for a foreign scheme, unknown kind, unknown or repeated
///   parameter, missing ID, or bad parameter value
/// - `Id` / `TagPattern` when an embedded ID or pattern is invalid
///
/// # Examples
///
/// ```
/// use neuron::domain::TagPattern;
/// use neuron::query::{parse_query_link, Query, TagQuery, ZettelQuery};
///
/// let query = parse_query_link("neuron://search?tag=project%2Falpha").unwrap();
/// let expected = ZettelQuery::by_tag(TagQuery::any(vec![
///     TagPattern::new("project/alpha").unwrap(),
/// ]));
/// assert_eq!(query, Query::Zettel(expected));
/// ```
pub fn parse_query_link(text: &str) -> Result<Query, QueryLinkError> {
    let url = Url::parse(text).map_err(|source| QueryLinkError::NotAUri {
        text: text.to_string(),
        source,
    })?;

    if url.scheme() != SCHEME {
        return Err(QueryLinkError::unrecognized(
            text,
            format!("scheme must be '{}'", SCHEME),
        ));
    }
    if url.fragment().is_some() {
        return Err(QueryLinkError::unrecognized(
            text,
            "fragments are not supported",
        ));
    }

    let Some(kind) = url.host_str() else {
        return Err(QueryLinkError::unrecognized(text, "missing query kind"));
    };
    let path = raw_path(text);

    match kind {
        "zettel" => parse_zettel(text, &url, path),
        "search" => {
            require_empty_path(text, path)?;
            parse_search(text, &url)
        }
        "graph" => {
            require_empty_path(text, path)?;
            Params::new(text, &url, &[])?;
            Ok(Query::Graph(GraphQuery::Id))
        }
        "backlinks" => {
            require_empty_path(text, path)?;
            let mut params = Params::new(text, &url, &["id", "connection"])?;
            let id = params.required_id()?;
            let connection = params.connection()?;
            Ok(Query::Graph(GraphQuery::backlinks_of(id, connection)))
        }
        "uplinks" => {
            require_empty_path(text, path)?;
            let mut params = Params::new(text, &url, &["id"])?;
            let id = params.required_id()?;
            Ok(Query::Graph(GraphQuery::uplinks_of(id)))
        }
        other => Err(QueryLinkError::unrecognized(
            text,
            format!("unknown query kind '{}'", other),
        )),
    }
}

/// Path as written in the link, without its leading `/`.
///
/// URL parsing resolves `.` and `..` segments away, so `neuron://zettel/..`
/// would otherwise look like a link with no ID at all.
fn raw_path(text: &str) -> &str {
    let rest = text.trim().split_once("://").map_or("", |(_, rest)| rest);
    let before_query = rest.split(['?', '#']).next().unwrap_or_default();
    before_query
        .find('/')
        .map_or("", |start| &before_query[start..])
        .trim_start_matches('/')
}

fn parse_zettel(text: &str, url: &Url, path: &str) -> Result<Query, QueryLinkError> {
    let mut params = Params::new(text, url, &["id", "connection"])?;
    let from_query = params.take_one("id")?;

    let raw_id = match (path.is_empty(), from_query) {
        (false, None) => path.to_string(),
        (true, Some(id)) => id,
        (false, Some(_)) => {
            return Err(QueryLinkError::unrecognized(
                text,
                "ID given both in path and as parameter",
            ));
        }
        (true, None) => return Err(QueryLinkError::unrecognized(text, "missing zettel ID")),
    };

    let id = ZettelId::parse(&raw_id)?;
    let connection = params.connection()?;
    Ok(Query::Zettel(
        ZettelQuery::by_id(id).with_connection(connection),
    ))
}

fn parse_search(text: &str, url: &Url) -> Result<Query, QueryLinkError> {
    let mut params = Params::new(
        text,
        url,
        &["tag", "match", "connection", "sort", "timeline", "limit"],
    )?;

    let patterns = params
        .take_all("tag")
        .iter()
        .map(|p| TagPattern::new(p))
        .collect::<Result<Vec<_>, _>>()?;

    let tags = match params.take_one("match")?.as_deref() {
        None | Some("any") => TagQuery::any(patterns),
        Some("all") => TagQuery::all(patterns),
        Some("none") if patterns.is_empty() => TagQuery::Nothing,
        Some("none") => {
            return Err(QueryLinkError::unrecognized(
                text,
                "match=none cannot be combined with tags",
            ));
        }
        Some(other) => {
            return Err(QueryLinkError::unrecognized(
                text,
                format!("unknown match mode '{}'", other),
            ));
        }
    };

    let connection = params.connection()?;

    let sort = match (params.take_one("sort")?, params.take_one("timeline")?) {
        (None, None) => SortBy::default(),
        (Some(sort), None) => sort
            .parse::<SortBy>()
            .map_err(|e| QueryLinkError::unrecognized(text, e.to_string()))?,
        (None, Some(flag)) if flag.is_empty() => SortBy::Timeline,
        (None, Some(_)) => {
            return Err(QueryLinkError::unrecognized(
                text,
                "'timeline' is a flag and takes no value",
            ));
        }
        (Some(_), Some(_)) => {
            return Err(QueryLinkError::unrecognized(
                text,
                "'sort' and 'timeline' are mutually exclusive",
            ));
        }
    };

    let limit = params
        .take_one("limit")?
        .map(|raw| {
            raw.parse::<NonZeroUsize>().map_err(|_| {
                QueryLinkError::unrecognized(
                    text,
                    format!("limit must be a positive integer, got '{}'", raw),
                )
            })
        })
        .transpose()?;

    let options = SearchOptions::sorted_by(sort).with_limit(limit);
    Ok(Query::Zettel(
        ZettelQuery::by_tag(tags)
            .with_connection(connection)
            .with_options(options),
    ))
}

fn require_empty_path(text: &str, path: &str) -> Result<(), QueryLinkError> {
    if path.is_empty() {
        Ok(())
    } else {
        Err(QueryLinkError::unrecognized(
            text,
            format!("unexpected path '/{}'", path),
        ))
    }
}

/// Decoded query parameters, checked against the keys a form allows.
struct Params<'a> {
    link: &'a str,
    pairs: Vec<(String, String)>,
}

impl<'a> Params<'a> {
    fn new(link: &'a str, url: &Url, allowed: &[&str]) -> Result<Self, QueryLinkError> {
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        if let Some((key, _)) = pairs.iter().find(|(k, _)| !allowed.contains(&k.as_str())) {
            return Err(QueryLinkError::unrecognized(
                link,
                format!("unknown parameter '{}'", key),
            ));
        }
        Ok(Self { link, pairs })
    }

    fn take_all(&mut self, key: &str) -> Vec<String> {
        let (taken, rest): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.pairs).into_iter().partition(|(k, _)| k == key);
        self.pairs = rest;
        taken.into_iter().map(|(_, v)| v).collect()
    }

    fn take_one(&mut self, key: &str) -> Result<Option<String>, QueryLinkError> {
        let mut values = self.take_all(key);
        if values.len() > 1 {
            return Err(QueryLinkError::unrecognized(
                self.link,
                format!("parameter '{}' given more than once", key),
            ));
        }
        Ok(values.pop())
    }

    fn required_id(&mut self) -> Result<ZettelId, QueryLinkError> {
        match self.take_one("id")? {
            Some(raw) => Ok(ZettelId::parse(&raw)?),
            None => Err(QueryLinkError::unrecognized(self.link, "missing 'id' parameter")),
        }
    }

    fn connection(&mut self) -> Result<Option<Connection>, QueryLinkError> {
        self.take_one("connection")?
            .map(|raw| {
                raw.parse::<Connection>()
                    .map_err(|e| QueryLinkError::unrecognized(self.link, e.to_string()))
            })
            .transpose()
    }
}

/// Renders the canonical link for a query.
pub(super) fn render(query: &Query) -> String {
    let mut params = Serializer::new(String::new());

    let base = match query {
        Query::Zettel(ZettelQuery::ById { id, connection }) => {
            if let Some(conn) = connection {
                params.append_pair("connection", conn.label());
            }
            format!("{}://zettel/{}", SCHEME, id)
        }
        Query::Zettel(ZettelQuery::ByTag {
            tags,
            connection,
            options,
        }) => {
            for pattern in tags.patterns() {
                params.append_pair("tag", pattern.as_str());
            }
            match tags {
                TagQuery::All(_) => {
                    params.append_pair("match", "all");
                }
                TagQuery::Nothing => {
                    params.append_pair("match", "none");
                }
                TagQuery::Everything | TagQuery::Any(_) => {}
            }
            if let Some(conn) = connection {
                params.append_pair("connection", conn.label());
            }
            if options.sort != SortBy::default() {
                params.append_pair("sort", options.sort.label());
            }
            if let Some(limit) = options.limit {
                params.append_pair("limit", &limit.to_string());
            }
            format!("{}://search", SCHEME)
        }
        Query::Graph(GraphQuery::Id) => format!("{}://graph", SCHEME),
        Query::Graph(GraphQuery::BacklinksOf { connection, id }) => {
            params.append_pair("id", id.as_str());
            if let Some(conn) = connection {
                params.append_pair("connection", conn.label());
            }
            format!("{}://backlinks", SCHEME)
        }
    };

    let query_string = params.finish();
    if query_string.is_empty() {
        base
    } else {
        format!("{}?{}", base, query_string)
    }
}
