//! Configuration for docsync.
//!
//! Read from `.github/docsync.toml` under the repository root. Every field is
//! optional; a missing file yields the defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Config file location, relative to the repository root.
pub const CONFIG_FILE: &str = ".github/docsync.toml";

/// Project configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub checkpoint: CheckpointConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointConfig {
    /// Checkpoint file, relative to the repository root.
    #[serde(default = "default_checkpoint_path")]
    pub path: PathBuf,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            path: default_checkpoint_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Size of the automatic window when no start commit is known.
    #[serde(default = "default_max_commits")]
    pub max_commits: usize,

    /// Files listed under each commit; 0 lists all of them.
    #[serde(default = "default_max_files_per_commit")]
    pub max_files_per_commit: usize,

    /// Commits previewed under each category heading.
    #[serde(default = "default_category_preview")]
    pub category_preview: usize,

    #[serde(default = "default_true")]
    pub include_body: bool,

    /// The guidance document, relative to the repository root.
    #[serde(default = "default_guidance_path")]
    pub guidance_path: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_commits: default_max_commits(),
            max_files_per_commit: default_max_files_per_commit(),
            category_preview: default_category_preview(),
            include_body: true,
            guidance_path: default_guidance_path(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_checkpoint_path() -> PathBuf {
    PathBuf::from(".github").join("copilot-instructions.metadata.json")
}

fn default_max_commits() -> usize {
    50
}

fn default_max_files_per_commit() -> usize {
    10
}

fn default_category_preview() -> usize {
    3
}

fn default_guidance_path() -> String {
    ".github/copilot-instructions.md".to_string()
}

impl Config {
    /// Path to the config file for a repository.
    pub fn path(repo_root: &Path) -> PathBuf {
        repo_root.join(CONFIG_FILE)
    }

    /// Load config for a repository, falling back to defaults when absent.
    pub fn load(repo_root: &Path) -> Result<Self, Error> {
        let path = Self::path(repo_root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse {
            path,
            message: e.to_string(),
        })
    }

    /// Checkpoint location for a repository: the explicit override if given,
    /// otherwise the configured path joined to the repository root.
    pub fn checkpoint_path(&self, repo_root: &Path, explicit: Option<&Path>) -> PathBuf {
        match explicit {
            Some(path) => path.to_path_buf(),
            None => repo_root.join(&self.checkpoint.path),
        }
    }
}
