//! [`History`] over a local git repository.

use std::path::Path;

use chrono::{DateTime, FixedOffset, Utc};
use git2::{
    Commit, Delta, DiffFindOptions, DiffOptions, ErrorCode, Oid, Reference, Repository, Sort,
};
use tracing::debug;

use crate::error::Error;
use crate::history::{ChangeKind, CommitRecord, FileChange, History, TipInfo};

/// A git repository opened at a working-tree root.
pub struct GitHistory {
    repo: Repository,
}

impl GitHistory {
    /// Open the repository rooted at `path`.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let repo = Repository::open(path).map_err(|e| match e.code() {
            ErrorCode::NotFound => Error::RepositoryNotFound(path.to_path_buf()),
            _ => Error::Git(e),
        })?;
        debug!(path = %path.display(), "Opened repository");

        Ok(Self { repo })
    }

    /// Stage `file` and commit it on the current branch.
    ///
    /// Uses the signature from the repository's git config. Returns the new
    /// commit id.
    pub fn commit_file(&self, file: &Path, message: &str) -> Result<String, Error> {
        let workdir = self
            .repo
            .workdir()
            .ok_or_else(|| Error::other("bare repository has no working tree"))?
            .canonicalize()?;
        let absolute = file.canonicalize()?;
        let relative = absolute.strip_prefix(&workdir).map_err(|_| {
            Error::other(format!("{} is outside the repository", file.display()))
        })?;

        let mut index = self.repo.index()?;
        index.add_path(relative)?;
        index.write()?;
        let tree = self.repo.find_tree(index.write_tree()?)?;

        let signature = self.repo.signature()?;
        let parent = self.repo.head()?.peel_to_commit()?;
        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;

        debug!(commit = %oid, path = %relative.display(), "Committed file");
        Ok(oid.to_string())
    }

    /// `HEAD`, or `None` on an unborn branch.
    fn head(&self) -> Result<Option<Reference<'_>>, Error> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head)),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn record(&self, commit: &Commit<'_>) -> Result<CommitRecord, Error> {
        let author = commit.author();
        Ok(CommitRecord {
            id: commit.id().to_string(),
            parents: commit.parent_ids().map(|id| id.to_string()).collect(),
            author: author.name().unwrap_or("Unknown").to_string(),
            email: author.email().unwrap_or_default().to_string(),
            timestamp: format_time(author.when()),
            subject: commit.summary().unwrap_or_default().to_string(),
            body: commit.body().unwrap_or_default().trim().to_string(),
            changes: self.changes(commit)?,
        })
    }

    /// Files changed relative to the first parent, or the empty tree for a
    /// root commit.
    fn changes(&self, commit: &Commit<'_>) -> Result<Vec<FileChange>, Error> {
        let tree = commit.tree()?;
        let parent_tree = if commit.parent_count() > 0 {
            Some(commit.parent(0)?.tree()?)
        } else {
            None
        };

        let mut diff_opts = DiffOptions::new();
        diff_opts.ignore_filemode(true);
        let mut diff =
            self.repo
                .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut diff_opts))?;

        let mut find_opts = DiffFindOptions::new();
        find_opts.renames(true);
        diff.find_similar(Some(&mut find_opts))?;

        let mut changes = Vec::new();
        for delta in diff.deltas() {
            let old_path = delta.old_file().path().map(path_string);
            let new_path = delta.new_file().path().map(path_string);

            let change = match delta.status() {
                Delta::Added | Delta::Copied => {
                    new_path.map(|p| FileChange::new(p, ChangeKind::Added))
                }
                Delta::Deleted => old_path.map(|p| FileChange::new(p, ChangeKind::Deleted)),
                Delta::Modified | Delta::Typechange => {
                    new_path.map(|p| FileChange::new(p, ChangeKind::Modified))
                }
                Delta::Renamed => match (old_path, new_path) {
                    (Some(old), Some(new)) => {
                        let edited = delta.old_file().id() != delta.new_file().id();
                        Some(FileChange::renamed(old, new, edited))
                    }
                    _ => None,
                },
                _ => None,
            };

            if let Some(change) = change {
                changes.push(change);
            }
        }

        Ok(changes)
    }
}

impl History for GitHistory {
    fn resolve(&self, reference: &str) -> Result<Option<String>, Error> {
        let object = match self.repo.revparse_single(reference) {
            Ok(object) => object,
            Err(e) => {
                debug!(reference, error = %e, "Reference did not resolve");
                return Ok(None);
            }
        };
        Ok(object.peel_to_commit().ok().map(|c| c.id().to_string()))
    }

    fn tip(&self) -> Result<Option<TipInfo>, Error> {
        let Some(head) = self.head()? else {
            return Ok(None);
        };
        let branch = if head.is_branch() {
            head.shorthand().unwrap_or("HEAD").to_string()
        } else {
            "HEAD".to_string()
        };
        let commit = head.peel_to_commit()?;
        let author = commit.author();

        Ok(Some(TipInfo {
            id: commit.id().to_string(),
            author: author.name().unwrap_or("Unknown").to_string(),
            email: author.email().unwrap_or_default().to_string(),
            timestamp: format_time(author.when()),
            branch,
        }))
    }

    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool, Error> {
        if ancestor == descendant {
            return Ok(true);
        }
        let ancestor = Oid::from_str(ancestor)?;
        let descendant = Oid::from_str(descendant)?;
        Ok(self.repo.graph_descendant_of(descendant, ancestor)?)
    }

    fn commits(
        &self,
        after: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<CommitRecord>, Error> {
        if self.head()?.is_none() {
            return Ok(Vec::new());
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push_head()?;
        if let Some(after) = after {
            revwalk.hide(Oid::from_str(after)?)?;
        }

        let mut records = Vec::new();
        for oid in revwalk {
            if limit.is_some_and(|limit| records.len() >= limit) {
                break;
            }
            let commit = self.repo.find_commit(oid?)?;
            records.push(self.record(&commit)?);
        }

        debug!(count = records.len(), after, "Walked commits");
        Ok(records)
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// ISO-8601 in the offset the time was recorded with.
fn format_time(time: git2::Time) -> String {
    let utc = DateTime::<Utc>::from_timestamp(time.seconds(), 0).unwrap_or_default();
    match FixedOffset::east_opt(time.offset_minutes() * 60) {
        Some(offset) => utc.with_timezone(&offset).to_rfc3339(),
        None => utc.to_rfc3339(),
    }
}
