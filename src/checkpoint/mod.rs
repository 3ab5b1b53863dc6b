//! The checkpoint file: where the last analysis stopped.
//!
//! A small JSON document owned by `docsync advance`. Keys this crate does not
//! know about are carried through unchanged.

mod lock;

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::Error;
use crate::history::TipInfo;

pub use lock::CheckpointLock;

/// Persisted checkpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Bumped exactly once per advancement.
    #[serde(default, deserialize_with = "lenient_revision")]
    pub doc_revision: u64,

    /// Exclusive lower bound of the next report range.
    #[serde(
        default,
        deserialize_with = "non_empty",
        skip_serializing_if = "Option::is_none"
    )]
    pub range_start_commit: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_last_update",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_update: Option<LastUpdate>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The tip commit recorded by the latest advancement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastUpdate {
    pub commit: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub timestamp: String,
    pub branch: String,
}

impl From<&TipInfo> for LastUpdate {
    fn from(tip: &TipInfo) -> Self {
        Self {
            commit: tip.id.clone(),
            author: tip.author.clone(),
            email: Some(tip.email.clone()).filter(|e| !e.is_empty()),
            timestamp: tip.timestamp.clone(),
            branch: tip.branch.clone(),
        }
    }
}

impl Checkpoint {
    /// Read a checkpoint, `None` if the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>, Error> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(Error::CheckpointRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let checkpoint = serde_json::from_str(&data).map_err(|source| Error::CheckpointParse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(checkpoint))
    }

    /// Read a checkpoint, starting from revision 0 when the file is absent.
    pub fn load_or_default(path: &Path) -> Result<Self, Error> {
        match Self::load(path)? {
            Some(checkpoint) => Ok(checkpoint),
            None => {
                debug!(path = %path.display(), "No checkpoint yet, starting at revision 0");
                Ok(Self::default())
            }
        }
    }

    /// The checkpoint after one advancement to `tip`.
    pub fn advanced(&self, tip: &TipInfo) -> Result<Self, Error> {
        let doc_revision = self
            .doc_revision
            .checked_add(1)
            .ok_or_else(|| Error::other("doc_revision overflow"))?;

        Ok(Self {
            doc_revision,
            range_start_commit: Some(tip.id.clone()),
            last_update: Some(LastUpdate::from(tip)),
            extra: self.extra.clone(),
        })
    }

    /// Replace the file atomically. The parent directory must exist.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let mut data = serde_json::to_vec_pretty(self)?;
        data.push(b'\n');

        write_atomic(path, &data).map_err(|source| Error::CheckpointWrite {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), revision = self.doc_revision, "Saved checkpoint");
        Ok(())
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent)?;
    if let Ok(existing) = fs::metadata(path) {
        tmp.as_file().set_permissions(existing.permissions())?;
    }
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// `null` and numeric strings count as revisions too; anything else that
/// is not a non-negative integer is an error.
fn lenient_revision<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    match Option::<Value>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| D::Error::custom(format!("invalid doc_revision {}", n))),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(0),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("invalid doc_revision {:?}", s))),
        Some(other) => Err(D::Error::custom(format!("invalid doc_revision {}", other))),
    }
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Unrecognised `last_update` shapes are dropped rather than failing the
/// whole file; the next advancement rewrites the field anyway.
fn lenient_last_update<'de, D>(deserializer: D) -> Result<Option<LastUpdate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match serde_json::from_value(v) {
        Ok(update) => Some(update),
        Err(e) => {
            warn!(error = %e, "Ignoring unrecognised last_update");
            None
        }
    }))
}
