//! Markdown rendering.
//!
//! Output depends only on the report, so identical ranges render to
//! identical bytes.

use crate::history::{short_id, ChangeKind, CommitRecord, FileChange};
use crate::report::{RangeSource, Report, Warning};

/// Presentation knobs.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Files listed per commit; 0 lists all of them.
    pub max_files_per_commit: usize,
    /// Commits previewed under each category.
    pub category_preview: usize,
    pub include_body: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_files_per_commit: 10,
            category_preview: 3,
            include_body: true,
        }
    }
}

/// Render a report as a self-contained Markdown document.
pub fn render(report: &Report, options: &RenderOptions) -> String {
    let mut lines: Vec<String> = Vec::new();

    render_header(report, &mut lines);

    if report.range.commits.is_empty() {
        lines.push("_No commits in range._".to_string());
        return finish(lines);
    }

    render_categories(report, options, &mut lines);
    render_commits(report, options, &mut lines);
    render_files(report, &mut lines);

    finish(lines)
}

fn finish(mut lines: Vec<String>) -> String {
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn render_header(report: &Report, lines: &mut Vec<String>) {
    let range = &report.range;
    let start = match &range.start {
        Some(id) => format!("after `{}`", id),
        None => "beginning of history".to_string(),
    };
    let end = match &range.end {
        Some(id) => format!("`{}`", id),
        None => "(no commits)".to_string(),
    };
    let source = match range.source {
        RangeSource::Explicit => "explicit start commit".to_string(),
        RangeSource::Checkpoint => "checkpoint".to_string(),
        RangeSource::Window { limit } => format!("most recent {} commits", limit),
    };

    lines.push("# Change summary".to_string());
    lines.push(String::new());
    lines.push(format!("- **Start**: {}", start));
    lines.push(format!("- **End**: {}", end));
    lines.push(format!("- **Commits**: {}", report.commit_count()));
    lines.push(format!("- **Range source**: {}", source));
    for warning in &report.warnings {
        // The body already says so.
        if *warning != Warning::NoCommitsInRange {
            lines.push(format!("- **Warning**: {}", warning));
        }
    }
    lines.push(String::new());
}

fn render_categories(report: &Report, options: &RenderOptions, lines: &mut Vec<String>) {
    if report.categories.is_empty() {
        return;
    }

    lines.push("## Changes by category".to_string());
    lines.push(String::new());

    for (category, indices) in &report.categories {
        lines.push(format!(
            "### {} ({})",
            category.label(),
            plural(indices.len(), "commit")
        ));
        lines.push(String::new());

        for &index in indices.iter().take(options.category_preview) {
            let commit = &report.range.commits[index];
            lines.push(format!(
                "- {} (`{}`, {}): {}",
                subject(commit),
                commit.short_id(),
                commit.author,
                impact(report, index)
            ));
        }
        if indices.len() > options.category_preview {
            let rest = indices.len() - options.category_preview;
            lines.push(format!("- ... and {} more {}", rest, noun(rest, "commit")));
        }
        lines.push(String::new());
    }
}

fn render_commits(report: &Report, options: &RenderOptions, lines: &mut Vec<String>) {
    lines.push("## Commits".to_string());
    lines.push(String::new());

    for (i, commit) in report.range.commits.iter().enumerate() {
        lines.push(format!("### {}. {}", i + 1, subject(commit)));
        lines.push(String::new());
        lines.push(format!("- **Commit**: `{}`", commit.id));
        if commit.email.is_empty() {
            lines.push(format!("- **Author**: {}", commit.author));
        } else {
            lines.push(format!("- **Author**: {} <{}>", commit.author, commit.email));
        }
        lines.push(format!("- **Date**: {}", commit.timestamp));
        if commit.parents.len() > 1 {
            let parents: Vec<String> = commit
                .parents
                .iter()
                .map(|p| format!("`{}`", short_id(p)))
                .collect();
            lines.push(format!("- **Merge of**: {}", parents.join(", ")));
        }
        lines.push(format!("- **Impact**: {}", impact(report, i)));
        lines.push(String::new());

        if options.include_body && !commit.body.is_empty() {
            lines.extend(commit.body.lines().map(str::to_string));
            lines.push(String::new());
        }

        if commit.changes.is_empty() {
            lines.push("_No file changes._".to_string());
            lines.push(String::new());
            continue;
        }

        lines.push("**Files**:".to_string());
        lines.push(String::new());
        let shown = match options.max_files_per_commit {
            0 => commit.changes.len(),
            max => max.min(commit.changes.len()),
        };
        for change in &commit.changes[..shown] {
            lines.push(format!("- {}", describe_change(change)));
        }
        if shown < commit.changes.len() {
            let rest = commit.changes.len() - shown;
            lines.push(format!("- ... and {} more {}", rest, noun(rest, "file")));
        }
        lines.push(String::new());
    }
}

fn render_files(report: &Report, lines: &mut Vec<String>) {
    lines.push(format!(
        "## Touched files ({})",
        plural(report.files.len(), "file")
    ));
    lines.push(String::new());

    for (path, file) in &report.files {
        let kinds: Vec<&str> = file.kinds.iter().map(ChangeKind::as_str).collect();
        let mut line = format!("- `{}`: {}", path, kinds.join(", "));
        if !file.previous_paths.is_empty() {
            let previous: Vec<String> = file
                .previous_paths
                .iter()
                .map(|p| format!("`{}`", p))
                .collect();
            line.push_str(&format!(" (from {})", previous.join(", ")));
        }
        lines.push(line);
    }
    lines.push(String::new());
}

fn describe_change(change: &FileChange) -> String {
    match (&change.old_path, change.kind) {
        (Some(old), ChangeKind::Renamed) if change.edited => {
            format!("renamed, edited: `{}` -> `{}`", old, change.path)
        }
        (Some(old), ChangeKind::Renamed) => format!("renamed: `{}` -> `{}`", old, change.path),
        _ => format!("{}: `{}`", change.kind, change.path),
    }
}

/// Categories a commit touches and how many files it changed.
fn impact(report: &Report, index: usize) -> String {
    let count = report.range.commits[index].changes.len();
    let labels: Vec<&str> = report
        .commit_categories
        .get(index)
        .into_iter()
        .flatten()
        .map(|c| c.label())
        .collect();
    if labels.is_empty() {
        return "no file changes".to_string();
    }
    format!("{}; {}", labels.join(", "), plural(count, "file"))
}

fn subject(commit: &CommitRecord) -> &str {
    if commit.subject.is_empty() {
        "(no subject)"
    } else {
        &commit.subject
    }
}

fn plural(count: usize, word: &str) -> String {
    format!("{} {}", count, noun(count, word))
}

fn noun(count: usize, word: &str) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
