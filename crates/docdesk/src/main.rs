//! docdesk CLI - versioned documentation viewer core.
//!
//! Provides commands for:
//! - `sync`: Download and install every catalog version
//! - `render`: Render one document as HTML
//! - `nav`: Render the navigation index as HTML
//! - `list`: List documents of an installed version

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ListArgs, NavArgs, RenderArgs, SyncArgs};
use output::Output;

/// docdesk - versioned documentation viewer.
#[derive(Parser)]
#[command(name = "docdesk", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download and install every catalog version.
    Sync(SyncArgs),
    /// Render one document as HTML.
    Render(RenderArgs),
    /// Render the navigation index as HTML.
    Nav(NavArgs),
    /// List documents of an installed version.
    List(ListArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // Check if verbose flag is set for sync command
    let verbose = matches!(&cli.command, Commands::Sync(args) if args.verbose);

    // Initialize tracing with appropriate log level
    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Sync(args) => args.execute(),
        Commands::Render(args) => args.execute(),
        Commands::Nav(args) => args.execute(),
        Commands::List(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
