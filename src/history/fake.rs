//! In-memory linear history for range tests.

use crate::error::Error;
use crate::history::{ChangeKind, CommitRecord, FileChange, History, TipInfo};

pub(crate) struct FakeHistory {
    /// Oldest first; each commit's parent is the one before it.
    pub commits: Vec<CommitRecord>,
}

impl FakeHistory {
    /// Commits named by single letters, e.g. `"ABCD"`, each touching
    /// `<letter>.rs`.
    pub fn linear(names: &str) -> Self {
        let mut commits: Vec<CommitRecord> = Vec::new();
        for (i, name) in names.chars().enumerate() {
            let id = fake_id(name);
            let parents = commits.last().map(|c| vec![c.id.clone()]).unwrap_or_default();
            commits.push(CommitRecord {
                id,
                parents,
                author: "Bob".to_string(),
                email: "bob@example.com".to_string(),
                timestamp: format!("2024-01-{:02}T12:00:00+00:00", i + 1),
                subject: format!("Commit {}", name),
                body: String::new(),
                changes: vec![FileChange::new(
                    format!("src/{}.rs", name.to_ascii_lowercase()),
                    ChangeKind::Added,
                )],
            });
        }
        Self { commits }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.commits.iter().position(|c| c.id == id)
    }
}

/// A 40-character id built from a single letter.
pub(crate) fn fake_id(name: char) -> String {
    name.to_ascii_lowercase().to_string().repeat(40)
}

impl History for FakeHistory {
    fn resolve(&self, reference: &str) -> Result<Option<String>, Error> {
        Ok(self
            .commits
            .iter()
            .find(|c| c.id.starts_with(reference))
            .map(|c| c.id.clone()))
    }

    fn tip(&self) -> Result<Option<TipInfo>, Error> {
        Ok(self.commits.last().map(|c| TipInfo {
            id: c.id.clone(),
            author: c.author.clone(),
            email: c.email.clone(),
            timestamp: c.timestamp.clone(),
            branch: "main".to_string(),
        }))
    }

    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> Result<bool, Error> {
        Ok(match (self.position(ancestor), self.position(descendant)) {
            (Some(a), Some(d)) => a <= d,
            _ => false,
        })
    }

    fn commits(
        &self,
        after: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<CommitRecord>, Error> {
        let start = after.and_then(|id| self.position(id)).map_or(0, |i| i + 1);
        let mut newest_first: Vec<CommitRecord> =
            self.commits[start..].iter().rev().cloned().collect();
        if let Some(limit) = limit {
            newest_first.truncate(limit);
        }
        Ok(newest_first)
    }
}
