//! Advisory lock serialising checkpoint writers.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::error::Error;

/// Exclusive lock on `<checkpoint>.lock`, released on drop.
///
/// The lock file itself is never removed: unlinking it would let a process
/// still holding the old inode lock it while a newcomer locks a fresh file
/// under the same name.
#[derive(Debug)]
pub struct CheckpointLock {
    file: File,
    path: PathBuf,
}

impl CheckpointLock {
    /// Take the lock without waiting.
    ///
    /// Fails with [`Error::CheckpointLocked`] if another process holds it.
    /// The lock file lives next to the checkpoint, so a missing parent
    /// directory surfaces as [`Error::CheckpointWrite`].
    pub fn acquire(checkpoint: &Path) -> Result<Self, Error> {
        let path = lock_path(checkpoint);
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| Error::CheckpointWrite {
                path: checkpoint.to_path_buf(),
                source,
            })?;

        if let Err(e) = FileExt::try_lock_exclusive(&file) {
            if e.kind() == fs2::lock_contended_error().kind() {
                return Err(Error::CheckpointLocked(checkpoint.to_path_buf()));
            }
            return Err(Error::Io(e));
        }

        debug!(path = %path.display(), "Acquired checkpoint lock");
        Ok(Self { file, path })
    }
}

impl Drop for CheckpointLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        debug!(path = %self.path.display(), "Released checkpoint lock");
    }
}

fn lock_path(checkpoint: &Path) -> PathBuf {
    let name = checkpoint
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "checkpoint".to_string());
    checkpoint.with_file_name(format!("{}.lock", name))
}
