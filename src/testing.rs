//! Scratch git repositories for tests.

use std::fs;
use std::path::Path;

use git2::{IndexAddOption, Oid, Repository, ResetType, Signature, Time};
use tempfile::TempDir;

/// A throwaway repository with a deterministic commit clock.
pub(crate) struct RepoFixture {
    dir: TempDir,
    pub repo: Repository,
    clock: i64,
}

impl RepoFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "Alice").unwrap();
            config.set_str("user.email", "alice@example.com").unwrap();
        }
        Self {
            dir,
            repo,
            clock: 1_700_000_000,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn remove(&self, rel: &str) {
        fs::remove_file(self.dir.path().join(rel)).unwrap();
    }

    pub fn rename(&self, from: &str, to: &str) {
        let to_path = self.dir.path().join(to);
        if let Some(parent) = to_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::rename(self.dir.path().join(from), to_path).unwrap();
    }

    /// Stage every change in the working tree and commit it. Returns the id.
    pub fn commit(&mut self, message: &str) -> String {
        self.commit_with_parents(message, &[])
    }

    /// Commit the working tree as a merge of `HEAD` and `other`.
    pub fn merge(&mut self, message: &str, other: &str) -> String {
        self.commit_with_parents(message, &[other])
    }

    /// Point the current branch at `id` and reset the working tree.
    pub fn reset_hard(&self, id: &str) {
        let object = self
            .repo
            .find_object(Oid::from_str(id).unwrap(), None)
            .unwrap();
        self.repo.reset(&object, ResetType::Hard, None).unwrap();
    }

    fn commit_with_parents(&mut self, message: &str, extra: &[&str]) -> String {
        let mut index = self.repo.index().unwrap();
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .unwrap();
        index.update_all(["*"].iter(), None).unwrap();
        index.write().unwrap();
        let tree = self.repo.find_tree(index.write_tree().unwrap()).unwrap();

        self.clock += 60;
        let signature =
            Signature::new("Alice", "alice@example.com", &Time::new(self.clock, 120)).unwrap();
        let mut parents: Vec<git2::Commit<'_>> = self
            .repo
            .head()
            .ok()
            .and_then(|h| h.peel_to_commit().ok())
            .into_iter()
            .collect();
        for id in extra {
            parents.push(self.repo.find_commit(Oid::from_str(id).unwrap()).unwrap());
        }
        let parents: Vec<&git2::Commit<'_>> = parents.iter().collect();

        self.repo
            .commit(
                Some("HEAD"),
                &signature,
                &signature,
                message,
                &tree,
                &parents,
            )
            .unwrap()
            .to_string()
    }

    /// A linear history of `count` commits, each adding one file.
    pub fn linear(count: usize) -> (Self, Vec<String>) {
        let mut fixture = Self::new();
        let ids = (0..count)
            .map(|i| {
                let name = format!("file{}.txt", i);
                fixture.write(&name, &format!("content {}\n", i));
                fixture.commit(&format!("Commit {}", i))
            })
            .collect();
        (fixture, ids)
    }
}
