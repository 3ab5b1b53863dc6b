//! Commit range selection.

use tracing::{info, warn};

use crate::error::Error;
use crate::history::{CommitRecord, History};
use crate::report::Warning;

/// How the start of a range was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeSource {
    /// `--start` on the command line.
    Explicit,
    /// `range_start_commit` from the checkpoint.
    Checkpoint,
    /// The most recent `limit` commits.
    Window { limit: usize },
}

/// The half-open range `(start, end]` with its commits.
#[derive(Debug, Clone)]
pub struct CommitRange {
    pub source: RangeSource,
    /// Exclusive lower bound, `None` for the beginning of history.
    pub start: Option<String>,
    /// The tip, `None` when the branch has no commits.
    pub end: Option<String>,
    /// Oldest first.
    pub commits: Vec<CommitRecord>,
}

/// Inputs to range selection, in order of precedence.
#[derive(Debug, Clone, Default)]
pub struct RangeRequest<'a> {
    pub explicit: Option<&'a str>,
    pub checkpoint_start: Option<&'a str>,
    pub limit: usize,
}

/// Pick the range: explicit start, then a usable checkpoint start, then the
/// automatic window.
pub fn resolve<H: History>(
    history: &H,
    request: &RangeRequest<'_>,
    warnings: &mut Vec<Warning>,
) -> Result<CommitRange, Error> {
    let end = history.tip()?.map(|tip| tip.id);

    if let Some(reference) = request.explicit {
        let start = history
            .resolve(reference)?
            .ok_or_else(|| Error::InvalidCommitReference(reference.to_string()))?;
        return bounded(history, RangeSource::Explicit, start, end);
    }

    if let Some(candidate) = request.checkpoint_start {
        match usable_start(history, candidate, end.as_deref())? {
            Some(start) => return bounded(history, RangeSource::Checkpoint, start, end),
            None => {
                warn!(
                    commit = candidate,
                    "Checkpoint start is not an ancestor of the tip, falling back to recent commits"
                );
                warnings.push(Warning::CheckpointStartUnusable(candidate.to_string()));
            }
        }
    }

    window(history, request.limit, end)
}

/// The checkpoint start, if it names a commit the tip descends from.
fn usable_start<H: History>(
    history: &H,
    candidate: &str,
    tip: Option<&str>,
) -> Result<Option<String>, Error> {
    let (Some(start), Some(tip)) = (history.resolve(candidate)?, tip) else {
        return Ok(None);
    };
    if history.is_ancestor(&start, tip)? {
        Ok(Some(start))
    } else {
        Ok(None)
    }
}

fn bounded<H: History>(
    history: &H,
    source: RangeSource,
    start: String,
    end: Option<String>,
) -> Result<CommitRange, Error> {
    let mut commits = history.commits(Some(&start), None)?;
    commits.reverse();
    info!(start = %start, count = commits.len(), "Resolved commit range");

    Ok(CommitRange {
        source,
        start: Some(start),
        end,
        commits,
    })
}

fn window<H: History>(
    history: &H,
    limit: usize,
    end: Option<String>,
) -> Result<CommitRange, Error> {
    let mut commits = history.commits(None, Some(limit))?;
    commits.reverse();
    let start = commits.first().and_then(|c| c.parents.first().cloned());
    info!(limit, count = commits.len(), "Using the most recent commits");

    Ok(CommitRange {
        source: RangeSource::Window { limit },
        start,
        end,
        commits,
    })
}
