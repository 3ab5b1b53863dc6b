//! Checkpoint advancement.
//!
//! Run after the guidance document has been brought up to date: the next
//! report starts from the current tip.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::checkpoint::{Checkpoint, CheckpointLock};
use crate::error::Error;
use crate::history::History;

/// Inputs for [`advance`].
#[derive(Debug, Clone)]
pub struct AdvanceOptions {
    pub repo_path: PathBuf,
    pub checkpoint_path: PathBuf,
    /// Compute the new checkpoint without writing it.
    pub dry_run: bool,
}

/// Result of an advancement.
#[derive(Debug, Clone)]
pub struct Advancement {
    pub previous: Checkpoint,
    pub updated: Checkpoint,
    /// False for dry runs.
    pub written: bool,
}

/// Bump `doc_revision` and move `range_start_commit` to the tip.
///
/// The write holds [`CheckpointLock`] and replaces the file atomically; on
/// any error the previous checkpoint is left as it was.
pub fn advance<H: History>(history: &H, options: &AdvanceOptions) -> Result<Advancement, Error> {
    let path = &options.checkpoint_path;
    let tip = history
        .tip()?
        .ok_or_else(|| Error::EmptyRepository(options.repo_path.clone()))?;

    let previous = Checkpoint::load_or_default(path)?;
    let updated = previous.advanced(&tip)?;

    if options.dry_run {
        return Ok(Advancement {
            previous,
            updated,
            written: false,
        });
    }

    write_locked(path, previous.doc_revision, &updated)?;
    info!(
        path = %path.display(),
        revision = updated.doc_revision,
        commit = %tip.id,
        "Advanced checkpoint"
    );

    Ok(Advancement {
        previous,
        updated,
        written: true,
    })
}

/// Save `updated` under the lock, provided the file still carries the
/// revision `updated` was computed from.
fn write_locked(path: &Path, based_on: u64, updated: &Checkpoint) -> Result<(), Error> {
    let _lock = CheckpointLock::acquire(path)?;

    let found = Checkpoint::load(path)?.map_or(0, |c| c.doc_revision);
    if found != based_on {
        return Err(Error::CheckpointConflict {
            path: path.to_path_buf(),
            expected: based_on,
            found,
        });
    }

    updated.save(path)
}
