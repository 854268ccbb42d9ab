//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag.
//! Formatting functions return strings so they can be tested without
//! capturing stdout. Diagnostics go through `tracing`, not this module.

use std::fmt::Display;

use crate::core::branch::BranchView;
use crate::core::commit::CommitView;
use crate::core::repository::Status;

/// Characters of a commit id shown in listings.
pub const SHORT_ID_LEN: usize = 8;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Format the commit history, newest first.
///
/// ```text
/// * 3f2a9c1d (HEAD -> main) Merge feature into main
/// |   Merge: 9be01c44 47aa2e10
/// * 47aa2e10 (feature) add login
/// * 0c1d2e3f (root)
/// ```
pub fn format_log(commits: &[CommitView], current_branch: &str) -> String {
    let mut lines = Vec::new();

    for commit in commits.iter().rev() {
        let mut line = format!("* {}", short(commit.id.as_str()));

        let labels = format_labels(&commit.branches, current_branch);
        if !labels.is_empty() {
            line.push_str(&format!(" ({labels})"));
        }

        if !commit.message.is_empty() {
            line.push(' ');
            line.push_str(&commit.message);
        }
        if commit.parents.is_empty() {
            line.push_str(" (root)");
        }
        lines.push(line);

        if commit.parents.len() > 1 {
            let parents: Vec<_> = commit.parents.iter().map(|p| short(p.as_str())).collect();
            lines.push(format!("|   Merge: {}", parents.join(" ")));
        }
    }

    lines.join("\n")
}

fn format_labels(branches: &[String], current_branch: &str) -> String {
    branches
        .iter()
        .map(|b| {
            if b == current_branch {
                format!("HEAD -> {b}")
            } else {
                b.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format the branch list, marking the current branch with `*`.
pub fn format_branches(branches: &[BranchView], current_branch: &str) -> String {
    let width = branches.iter().map(|b| b.name.len()).max().unwrap_or(0);
    branches
        .iter()
        .map(|b| {
            let marker = if b.name == current_branch { '*' } else { ' ' };
            format!(
                "{marker} {:<width$}  {}",
                b.name,
                short(b.head_commit.as_str())
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a repository status summary.
pub fn format_status(status: &Status) -> String {
    format!(
        "On branch {}\n{} commit(s), {} branch(es)\nBranches:\n{}",
        status.current_branch,
        status.total_commits,
        status.total_branches,
        format_list(&status.branches, "  ")
    )
}

/// Format a list of items.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn short(id: &str) -> &str {
    &id[..SHORT_ID_LEN.min(id.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::repository::{Repository, RepositorySettings};

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn log_lists_newest_first_with_labels() {
        let mut repo = Repository::new();
        let c1 = repo.create_commit("first", "");
        repo.create_branch("feature").unwrap();

        let out = format_log(&repo.commit_history(), repo.current_branch());
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            format!("* {} (feature, HEAD -> main) first", c1.as_str())
        );
        assert!(lines[1].ends_with("(root)"));
    }

    #[test]
    fn log_marks_root_with_message() {
        let repo = Repository::with_settings(RepositorySettings {
            root_message: "Initial commit".into(),
            ..RepositorySettings::default()
        });

        let out = format_log(&repo.commit_history(), repo.current_branch());
        assert!(out.ends_with("(HEAD -> main) Initial commit (root)"));
    }

    #[test]
    fn log_shows_merge_parents() {
        let mut repo = Repository::new();
        repo.checkout_branch("feature").unwrap();
        repo.create_commit("f", "");
        repo.merge_branches("feature", "main").unwrap();

        let out = format_log(&repo.commit_history(), repo.current_branch());
        assert!(out.contains("Merge feature into main"));
        assert!(out.contains("|   Merge: "));
    }

    #[test]
    fn branches_mark_current() {
        let mut repo = Repository::new();
        repo.checkout_branch("longer-name").unwrap();
        let out = format_branches(&repo.branches(), repo.current_branch());
        let lines: Vec<_> = out.lines().collect();
        assert!(lines[0].starts_with("* longer-name"));
        assert!(lines[1].starts_with("  main       "));
    }

    #[test]
    fn status_summary() {
        let repo = Repository::new();
        let out = format_status(&repo.status());
        assert!(out.starts_with("On branch main"));
        assert!(out.contains("1 commit(s), 1 branch(es)"));
        assert!(out.ends_with("  main"));
    }

    #[test]
    fn format_list_prefixes_items() {
        assert_eq!(format_list(&["a", "b"], "- "), "- a\n- b");
    }
}
