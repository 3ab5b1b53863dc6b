//! `docsync advance`.

use tracing::info;

use crate::advance::{self, AdvanceOptions, Advancement};
use crate::cli::AdvanceArgs;
use crate::config::Config;
use crate::error::Error;
use crate::history::{short_id, GitHistory};

/// Run the advance command.
pub fn run(args: &AdvanceArgs) -> Result<(), Error> {
    let history = GitHistory::open(&args.repo_path)?;
    let config = Config::load(&args.repo_path)?;
    let checkpoint_path = config.checkpoint_path(&args.repo_path, args.checkpoint.as_deref());

    let options = AdvanceOptions {
        repo_path: args.repo_path.clone(),
        checkpoint_path: checkpoint_path.clone(),
        dry_run: args.dry_run,
    };
    let outcome = advance::advance(&history, &options)?;
    println!("{}", summary(&outcome));

    if let Some(message) = &args.commit {
        if outcome.written {
            let id = history.commit_file(&checkpoint_path, message)?;
            info!(commit = %id, "Committed checkpoint");
            println!("Committed checkpoint as {}", short_id(&id));
        } else {
            info!("Dry run, not committing");
        }
    }

    Ok(())
}

/// One-paragraph description of what changed.
pub fn summary(outcome: &Advancement) -> String {
    let previous_start = outcome
        .previous
        .range_start_commit
        .as_deref()
        .map_or("none".to_string(), |id| short_id(id).to_string());
    let new_start = outcome
        .updated
        .range_start_commit
        .as_deref()
        .map_or("none".to_string(), |id| short_id(id).to_string());

    let mut text = format!(
        "doc_revision: {} -> {}\nrange_start_commit: {} -> {}",
        outcome.previous.doc_revision, outcome.updated.doc_revision, previous_start, new_start
    );
    if let Some(update) = &outcome.updated.last_update {
        text.push_str(&format!(
            "\nlast_update: {} by {} on {}",
            update.timestamp, update.author, update.branch
        ));
    }
    if !outcome.written {
        text.push_str("\n(dry run, nothing written)");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::Checkpoint;
    use crate::history::History;
    use crate::testing::RepoFixture;
    use std::fs;
    use std::path::Path;

    fn args(repo: &Path) -> AdvanceArgs {
        AdvanceArgs {
            repo_path: repo.to_path_buf(),
            checkpoint: None,
            dry_run: false,
            commit: None,
        }
    }

    fn default_checkpoint(repo: &Path) -> std::path::PathBuf {
        repo.join(".github/copilot-instructions.metadata.json")
    }

    #[test]
    fn test_run_writes_default_checkpoint() {
        let (fixture, ids) = RepoFixture::linear(3);
        fs::create_dir_all(fixture.path().join(".github")).unwrap();

        run(&args(fixture.path())).unwrap();

        let saved = Checkpoint::load(&default_checkpoint(fixture.path()))
            .unwrap()
            .unwrap();
        assert_eq!(saved.doc_revision, 1);
        assert_eq!(saved.range_start_commit.as_deref(), Some(ids[2].as_str()));
    }

    #[test]
    fn test_run_respects_explicit_checkpoint() {
        let (fixture, ids) = RepoFixture::linear(2);
        let path = fixture.path().join("state.json");
        let mut advance_args = args(fixture.path());
        advance_args.checkpoint = Some(path.clone());

        run(&advance_args).unwrap();

        let saved = Checkpoint::load(&path).unwrap().unwrap();
        assert_eq!(saved.range_start_commit.as_deref(), Some(ids[1].as_str()));
        assert!(!default_checkpoint(fixture.path()).exists());
    }

    #[test]
    fn test_run_missing_github_directory() {
        let (fixture, _) = RepoFixture::linear(1);

        let err = run(&args(fixture.path())).unwrap_err();
        assert!(matches!(err, Error::CheckpointWrite { .. }));
        assert!(!fixture.path().join(".github").exists());
    }

    #[test]
    fn test_run_commits_checkpoint() {
        let (fixture, ids) = RepoFixture::linear(2);
        fs::create_dir_all(fixture.path().join(".github")).unwrap();
        let mut advance_args = args(fixture.path());
        advance_args.commit = Some("Update guidance metadata".to_string());

        run(&advance_args).unwrap();

        let history = GitHistory::open(fixture.path()).unwrap();
        let tip = history.tip().unwrap().unwrap();
        assert_ne!(tip.id, ids[1]);
        let commits = history.commits(Some(&ids[1]), None).unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].subject, "Update guidance metadata");

        // The checkpoint names the commit it was computed from, not the one
        // that recorded it.
        let saved = Checkpoint::load(&default_checkpoint(fixture.path()))
            .unwrap()
            .unwrap();
        assert_eq!(saved.range_start_commit.as_deref(), Some(ids[1].as_str()));
    }

    #[test]
    fn test_dry_run_skips_commit() {
        let (fixture, ids) = RepoFixture::linear(2);
        fs::create_dir_all(fixture.path().join(".github")).unwrap();
        let mut advance_args = args(fixture.path());
        advance_args.dry_run = true;
        advance_args.commit = Some("Should not happen".to_string());

        run(&advance_args).unwrap();

        let history = GitHistory::open(fixture.path()).unwrap();
        assert_eq!(history.tip().unwrap().unwrap().id, ids[1]);
        assert!(!default_checkpoint(fixture.path()).exists());
    }

    #[test]
    fn test_summary() {
        let (fixture, ids) = RepoFixture::linear(2);
        fs::create_dir_all(fixture.path().join(".github")).unwrap();
        let history = GitHistory::open(fixture.path()).unwrap();
        let options = AdvanceOptions {
            repo_path: fixture.path().to_path_buf(),
            checkpoint_path: default_checkpoint(fixture.path()),
            dry_run: true,
        };

        let outcome = advance::advance(&history, &options).unwrap();
        let text = summary(&outcome);
        assert!(text.contains("doc_revision: 0 -> 1"));
        assert!(text.contains(&format!("range_start_commit: none -> {}", &ids[1][..8])));
        assert!(text.contains("by Alice"));
        assert!(text.ends_with("(dry run, nothing written)"));
    }
}
