//! Folio CLI - article pipeline for a portfolio site.
//!
//! Provides commands for:
//! - `build`: Render every article to HTML plus JSON metadata
//! - `check`: Compile articles and report errors
//! - `toc`: Print an article's anchor list
//! - `render`: Print one article's HTML

mod articles;
mod commands;
mod error;
mod index;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, CheckArgs, RenderArgs, TocArgs};
use output::Output;

/// Folio - article pipeline.
#[derive(Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    /// Enable info-level logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render all articles to an output directory.
    Build(BuildArgs),
    /// Compile articles and report every error.
    Check(CheckArgs),
    /// Print the table of contents of an article.
    Toc(TocArgs),
    /// Print the HTML of one article.
    Render(RenderArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG (default WARN)
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Check(args) => args.execute(),
        Commands::Toc(args) => args.execute(),
        Commands::Render(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
