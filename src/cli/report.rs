//! `docsync report`.

use std::fs;
use std::io::{self, Write};

use tracing::info;

use crate::cli::ReportArgs;
use crate::config::Config;
use crate::error::Error;
use crate::history::GitHistory;
use crate::report::{self, RenderOptions, ReportOptions};

/// Run the report command.
pub fn run(args: &ReportArgs) -> Result<(), Error> {
    let text = generate(args)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &text).map_err(|source| Error::OutputWrite {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), "Wrote report");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Build and render the report without writing it anywhere.
pub fn generate(args: &ReportArgs) -> Result<String, Error> {
    let history = GitHistory::open(&args.repo_path)?;
    let config = Config::load(&args.repo_path)?;

    let options = ReportOptions {
        start: args.start.clone(),
        checkpoint_path: config.checkpoint_path(&args.repo_path, args.checkpoint.as_deref()),
        max_commits: args
            .max_commits
            .map_or(config.report.max_commits, |n| n as usize),
        guidance_path: config.report.guidance_path.clone(),
    };
    let report = report::build(&history, &options)?;

    let render_options = RenderOptions {
        max_files_per_commit: config.report.max_files_per_commit,
        category_preview: config.report.category_preview,
        include_body: config.report.include_body,
    };
    Ok(report::render(&report, &render_options))
}
