//! CLI commands for docsync.

pub mod advance;
pub mod report;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// docsync - keep AI agent guidance documents in step with commit history
#[derive(Parser, Debug)]
#[command(name = "docsync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize commits since the last checkpoint as Markdown
    Report(ReportArgs),

    /// Record the current tip as the start of the next report
    Advance(AdvanceArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Repository to analyze
    #[arg(long, default_value = ".")]
    pub repo_path: PathBuf,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Summarize commits after this one, ignoring the checkpoint
    #[arg(short, long)]
    pub start: Option<String>,

    /// Commits to summarize when no start commit is known (default 50)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_commits: Option<u32>,

    /// Checkpoint file (default: .github/copilot-instructions.metadata.json)
    #[arg(long)]
    pub checkpoint: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct AdvanceArgs {
    /// Repository whose tip becomes the new checkpoint
    #[arg(long, default_value = ".")]
    pub repo_path: PathBuf,

    /// Checkpoint file (default: .github/copilot-instructions.metadata.json)
    #[arg(long)]
    pub checkpoint: Option<PathBuf>,

    /// Show the update without writing it
    #[arg(long)]
    pub dry_run: bool,

    /// Commit the updated checkpoint with this message
    #[arg(short, long)]
    pub commit: Option<String>,
}
