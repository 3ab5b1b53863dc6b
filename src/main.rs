//! docsync - keep AI agent guidance documents in step with commit history.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use docsync::cli::{self, Cli, Commands};

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so reports on stdout stay clean
    let default_level = if cli.verbose {
        "docsync=debug"
    } else {
        "docsync=info"
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let result = match &cli.command {
        Commands::Report(args) => cli::report::run(args),
        Commands::Advance(args) => cli::advance::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
