//! Output format types for CLI commands.

use clap::ValueEnum;
use serde::Serialize;

use crate::domain::Zettel;
use crate::graph::{Edge, QueryResult};

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for programmatic consumption
    Json,
}

/// Wrapper for serializable command output.
#[derive(Debug, Serialize)]
pub struct Output<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> Output<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Prints `data` in the requested format, using `human` for the text form.
pub fn emit<T: Serialize>(
    format: OutputFormat,
    data: &T,
    human: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Human => print!("{}", human(data)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&Output::new(data))?),
    }
    Ok(())
}

/// Renders any query result as text.
pub fn render_result(result: &QueryResult) -> String {
    match result {
        QueryResult::Zettel { zettel, .. } => match zettel {
            Some(z) => render_zettels(std::slice::from_ref(z)),
            None => "No zettel found.\n".to_string(),
        },
        QueryResult::Zettels { zettels, .. } => render_zettels(zettels),
        QueryResult::Edges(edges) => render_edges(edges),
        QueryResult::Graph(snapshot) => {
            let mut out = render_zettels(&snapshot.zettels);
            if !snapshot.edges.is_empty() {
                out.push('\n');
                out.push_str(&render_edges(&snapshot.edges));
            }
            out
        }
    }
}

/// Renders a table of zettels with a trailing count.
pub fn render_zettels(zettels: &[Zettel]) -> String {
    if zettels.is_empty() {
        return "No zettels found.\n".to_string();
    }

    let mut lines = vec![
        format!("{:<26}  {:<50}  {:>10}", "ID", "Title", "Date"),
        format!(
            "{:<26}  {:<50}  {:>10}",
            "-".repeat(26),
            "-".repeat(50),
            "-".repeat(10)
        ),
    ];
    for zettel in zettels {
        let date = zettel
            .date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        lines.push(format!(
            "{:<26}  {:<50}  {:>10}",
            zettel.id().as_str(),
            truncate_str(zettel.title(), 50),
            date
        ));
    }
    lines.push(String::new());
    lines.push(format!("{} zettel(s)", zettels.len()));
    lines.join("\n") + "\n"
}

/// Renders a table of edges with a trailing count.
pub fn render_edges(edges: &[Edge]) -> String {
    if edges.is_empty() {
        return "No links found.\n".to_string();
    }

    let mut lines = vec![
        format!("{:<26}  {:<26}  {}", "From", "To", "Connection"),
        format!(
            "{:<26}  {:<26}  {}",
            "-".repeat(26),
            "-".repeat(26),
            "-".repeat(11)
        ),
    ];
    lines.extend(edges.iter().map(|edge| {
        format!(
            "{:<26}  {:<26}  {}",
            edge.from.as_str(),
            edge.to.as_str(),
            edge.connection
        )
    }));
    lines.push(String::new());
    lines.push(format!("{} link(s)", edges.len()));
    lines.join("\n") + "\n"
}

/// Truncates a string to a maximum display width, adding ellipsis if needed.
pub(crate) fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
