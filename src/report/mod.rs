//! Change reports: what happened between the checkpoint and the tip.

pub mod category;
pub mod range;
mod render;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::checkpoint::Checkpoint;
use crate::error::Error;
use crate::history::{ChangeKind, CommitRecord, History};

pub use category::Category;
pub use range::{CommitRange, RangeRequest, RangeSource};
pub use render::{render, RenderOptions};

/// Conditions worth telling the operator about that do not stop the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The checkpoint exists but could not be read or parsed.
    CheckpointUnreadable(String),
    /// The checkpoint start does not resolve or is not an ancestor of the tip.
    CheckpointStartUnusable(String),
    NoCommitsInRange,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::CheckpointUnreadable(reason) => {
                write!(f, "checkpoint unreadable, using recent commits: {}", reason)
            }
            Warning::CheckpointStartUnusable(commit) => write!(
                f,
                "checkpoint start {} is not an ancestor of the tip, using recent commits",
                commit
            ),
            Warning::NoCommitsInRange => f.write_str("no commits in range"),
        }
    }
}

/// Inputs for [`build`].
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Explicit start commit; bypasses the checkpoint.
    pub start: Option<String>,
    pub checkpoint_path: PathBuf,
    /// Size of the fallback window.
    pub max_commits: usize,
    /// Repository-relative path of the guidance document.
    pub guidance_path: String,
}

/// Every kind of change seen for one path across the range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TouchedFile {
    pub kinds: BTreeSet<ChangeKind>,
    /// Paths this file was renamed from.
    pub previous_paths: BTreeSet<String>,
}

/// An aggregated change report, ready to render.
#[derive(Debug, Clone)]
pub struct Report {
    pub range: CommitRange,
    pub files: BTreeMap<String, TouchedFile>,
    /// Indices into `range.commits` of the commits touching each category.
    pub categories: BTreeMap<Category, Vec<usize>>,
    /// Categories touched by each commit, parallel to `range.commits`.
    pub commit_categories: Vec<BTreeSet<Category>>,
    pub warnings: Vec<Warning>,
}

impl Report {
    pub fn commit_count(&self) -> usize {
        self.range.commits.len()
    }
}

/// Resolve the range and aggregate its commits.
pub fn build<H: History>(history: &H, options: &ReportOptions) -> Result<Report, Error> {
    let mut warnings = Vec::new();

    let checkpoint_start = match options.start {
        Some(_) => None,
        None => checkpoint_start(options, &mut warnings),
    };

    let request = RangeRequest {
        explicit: options.start.as_deref(),
        checkpoint_start: checkpoint_start.as_deref(),
        limit: options.max_commits,
    };
    let range = range::resolve(history, &request, &mut warnings)?;

    if range.commits.is_empty() {
        warn!("No commits in range");
        warnings.push(Warning::NoCommitsInRange);
    }

    let files = touched_files(&range.commits);
    let commit_categories = commit_categories(&range.commits, &options.guidance_path);
    let categories = categorize(&commit_categories);

    Ok(Report {
        range,
        files,
        categories,
        commit_categories,
        warnings,
    })
}

/// `range_start_commit` from the checkpoint, if there is a readable one.
fn checkpoint_start(options: &ReportOptions, warnings: &mut Vec<Warning>) -> Option<String> {
    match Checkpoint::load(&options.checkpoint_path) {
        Ok(Some(checkpoint)) => checkpoint.range_start_commit,
        Ok(None) => {
            info!(
                path = %options.checkpoint_path.display(),
                "No checkpoint found, using recent commits"
            );
            None
        }
        Err(e) => {
            warn!(error = %e, "Ignoring unreadable checkpoint");
            warnings.push(Warning::CheckpointUnreadable(e.to_string()));
            None
        }
    }
}

/// Union of change kinds per path.
///
/// A rename that also edits the file records both `renamed` and `modified`.
fn touched_files(commits: &[CommitRecord]) -> BTreeMap<String, TouchedFile> {
    let mut files: BTreeMap<String, TouchedFile> = BTreeMap::new();
    for change in commits.iter().flat_map(|c| &c.changes) {
        let entry = files.entry(change.path.clone()).or_default();
        entry.kinds.insert(change.kind);
        if change.kind == ChangeKind::Renamed && change.edited {
            entry.kinds.insert(ChangeKind::Modified);
        }
        if let Some(old) = &change.old_path {
            entry.previous_paths.insert(old.clone());
        }
    }
    files
}

fn commit_categories(commits: &[CommitRecord], guidance_path: &str) -> Vec<BTreeSet<Category>> {
    commits
        .iter()
        .map(|commit| {
            commit
                .changes
                .iter()
                .map(|change| category::classify(&change.path, guidance_path))
                .collect()
        })
        .collect()
}

fn categorize(per_commit: &[BTreeSet<Category>]) -> BTreeMap<Category, Vec<usize>> {
    let mut categories: BTreeMap<Category, Vec<usize>> = BTreeMap::new();
    for (index, touched) in per_commit.iter().enumerate() {
        for category in touched {
            categories.entry(*category).or_default().push(index);
        }
    }
    categories
}
