//! dochook CLI - build-time documentation hooks.
//!
//! Provides commands for:
//! - `prebuild`: Create the diagram cache directory
//! - `lint`: Count diagram fences without accessibility markers
//! - `render`: Render Graphviz diagrams into themed, cached SVGs
//! - `inject`: Add accessibility metadata to diagrams in rendered pages
//! - `timestamps`: Update `last_updated` front matter

mod commands;
mod error;
mod output;
mod pages;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{InjectArgs, LintArgs, PrebuildArgs, RenderArgs, TimestampsArgs};
use output::Output;

/// dochook - build-time documentation hooks.
#[derive(Parser)]
#[command(name = "dochook", version, about)]
struct Cli {
    /// Path to configuration file (default: auto-discover dochook.toml).
    #[arg(short, long, global = true, env = "DOCHOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output (show per-page progress).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the diagram cache directory under the site directory.
    Prebuild(PrebuildArgs),
    /// Report diagram fences without an accessibility marker.
    Lint(LintArgs),
    /// Render Graphviz diagrams from a .dot/.gv file or a markdown page.
    Render(RenderArgs),
    /// Inject accessibility metadata into rendered HTML pages.
    Inject(InjectArgs),
    /// Update `last_updated` front matter from file modification times.
    Timestamps(TimestampsArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Prebuild(args) => args.execute(config_path),
        Commands::Lint(args) => args.execute(config_path),
        Commands::Render(args) => args.execute(config_path),
        Commands::Inject(args) => args.execute(config_path),
        Commands::Timestamps(args) => args.execute(config_path),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
