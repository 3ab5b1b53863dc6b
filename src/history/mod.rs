//! Commit history queries.
//!
//! The report and advance logic only see the [`History`] trait. [`GitHistory`]
//! implements it over a local git repository.

pub mod git;

#[cfg(test)]
pub(crate) mod fake;

use std::fmt;

use crate::error::Error;

pub use git::GitHistory;

/// How a file changed in a single commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChangeKind {
    Added,
    Modified,
    Renamed,
    Deleted,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Modified => "modified",
            ChangeKind::Renamed => "renamed",
            ChangeKind::Deleted => "deleted",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single file touched by a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Path after the commit (the old path for deletions).
    pub path: String,
    /// Previous path, set for renames.
    pub old_path: Option<String>,
    pub kind: ChangeKind,
    /// Content also changed; only meaningful for renames.
    pub edited: bool,
}

impl FileChange {
    pub fn new(path: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            old_path: None,
            kind,
            edited: kind == ChangeKind::Modified,
        }
    }

    pub fn renamed(old_path: impl Into<String>, path: impl Into<String>, edited: bool) -> Self {
        Self {
            path: path.into(),
            old_path: Some(old_path.into()),
            kind: ChangeKind::Renamed,
            edited,
        }
    }
}

/// Metadata and file changes of one commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub id: String,
    pub parents: Vec<String>,
    pub author: String,
    pub email: String,
    /// Author time, ISO-8601 with the commit's own UTC offset.
    pub timestamp: String,
    pub subject: String,
    pub body: String,
    pub changes: Vec<FileChange>,
}

impl CommitRecord {
    /// Abbreviated id for headings.
    pub fn short_id(&self) -> &str {
        short_id(&self.id)
    }
}

/// The commit `HEAD` points at, plus the branch it was reached through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipInfo {
    pub id: String,
    pub author: String,
    pub email: String,
    pub timestamp: String,
    /// Branch shorthand, or `HEAD` when detached.
    pub branch: String,
}

/// Read-only view of a repository's commit graph.
pub trait History {
    /// Resolve a commit-ish to a full commit id, `None` if it names no commit.
    fn resolve(&self, reference: &str) -> Result<Option<String>, Error>;

    /// The current tip, `None` when the branch has no commits yet.
    fn tip(&self) -> Result<Option<TipInfo>, Error>;

    /// True if `ancestor` is `descendant` or reachable from it.
    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool, Error>;

    /// Commits reachable from the tip and not from `after`, newest first,
    /// stopping after `limit` commits.
    fn commits(&self, after: Option<&str>, limit: Option<usize>)
        -> Result<Vec<CommitRecord>, Error>;
}

/// First eight characters of a commit id.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
