//! neuron - a zettelkasten query graph over plain markdown files

pub mod cli;
pub mod domain;
pub mod graph;
pub mod infra;
pub mod query;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use cli::{
    Cli, Command,
    config::Config,
    handlers::{
        handle_backlinks, handle_check, handle_graph, handle_new, handle_query, handle_search,
        handle_uplinks,
    },
    init_logging,
};

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Command::Completions(args) = &cli.command {
        clap_complete::generate(args.shell, &mut Cli::command(), "neuron", &mut std::io::stdout());
        return Ok(());
    }

    let config = Config::load()?;
    let notes_dir = config.notes_dir(cli.dir.as_ref());
    tracing::debug!(dir = %notes_dir.display(), "using zettelkasten directory");

    match &cli.command {
        Command::New(args) => handle_new(args, &notes_dir, &config),
        Command::Query(args) => handle_query(args, &notes_dir),
        Command::Search(args) => handle_search(args, &notes_dir),
        Command::Backlinks(args) => handle_backlinks(args, &notes_dir),
        Command::Uplinks(args) => handle_uplinks(args, &notes_dir),
        Command::Graph => handle_graph(&notes_dir),
        Command::Check => handle_check(&notes_dir),
        Command::Completions(_) => Ok(()),
    }
}
