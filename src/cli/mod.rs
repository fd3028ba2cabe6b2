//! CLI command definitions and handlers

pub mod config;
pub mod handlers;
pub mod output;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::domain::Connection;
use output::OutputFormat;

/// neuron - a zettelkasten of plain markdown files
#[derive(Parser, Debug)]
#[command(name = "neuron", version, about, long_about = None)]
pub struct Cli {
    /// Zettelkasten directory (overrides config file)
    #[arg(short = 'd', long, global = true)]
    pub dir: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new zettel
    New(NewArgs),

    /// Evaluate a neuron:// query link
    Query(QueryArgs),

    /// List zettels by tag
    Search(SearchArgs),

    /// Show zettels that link to a given zettel
    Backlinks(BacklinksArgs),

    /// Show the folgezettel parents of a zettel
    Uplinks(UplinksArgs),

    /// Print the whole graph as JSON
    Graph,

    /// Check for broken links, unreadable zettels, and isolated zettels
    Check,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `new` command
#[derive(Parser, Debug)]
pub struct NewArgs {
    /// Derive the ID from this title instead of generating a random one
    #[arg(long, value_name = "TITLE")]
    pub id_title: Option<String>,

    /// Title of the new zettel (defaults to the --id-title text)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Add a tag (can be specified multiple times)
    #[arg(long = "tag", action = ArgAction::Append)]
    pub tags: Vec<String>,
}

/// Arguments for the `query` command
#[derive(Parser, Debug)]
pub struct QueryArgs {
    /// Query link, e.g. neuron://search?tag=project/*
    pub link: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `search` command
#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Tag pattern (can be specified multiple times; none matches every zettel)
    #[arg(short, long = "tag", action = ArgAction::Append)]
    pub tags: Vec<String>,

    /// Require every pattern to match instead of any
    #[arg(long)]
    pub all: bool,

    /// Sort newest first
    #[arg(long)]
    pub timeline: bool,

    /// Show at most this many zettels
    #[arg(short = 'n', long)]
    pub limit: Option<NonZeroUsize>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `backlinks` command
#[derive(Parser, Debug)]
pub struct BacklinksArgs {
    /// Zettel ID
    pub id: String,

    /// Only show links of this kind (ordinary, folgezettel)
    #[arg(short, long)]
    pub connection: Option<Connection>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `uplinks` command
#[derive(Parser, Debug)]
pub struct UplinksArgs {
    /// Zettel ID
    pub id: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish)
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` takes precedence over the `-v` count.
pub fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
