//! core::verify
//!
//! Repository invariant verification.
//!
//! # Checks
//!
//! - At least one branch exists and the current branch is one of them
//! - Every branch head names an existing commit
//! - Every parent id names an existing commit; no commit has more than two
//! - Exactly one commit is parentless, and it is the recorded root
//! - Every branch head reaches the root by following first parents
//!
//! # Invariants
//!
//! - Never mutates the repository
//! - Must be deterministic

use thiserror::Error;

use super::graph::first_parents_from;
use super::repository::Repository;

/// Errors from verification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("repository has no branches")]
    NoBranches,

    #[error("current branch does not exist: {0}")]
    CurrentBranchMissing(String),

    #[error("branch '{branch}' points at missing commit {commit}")]
    HeadMissing { branch: String, commit: String },

    #[error("commit {commit} references missing parent {parent}")]
    ParentMissing { commit: String, parent: String },

    #[error("commit {0} has more than two parents")]
    TooManyParents(String),

    #[error("expected exactly one root commit, found {0}")]
    RootCount(usize),

    #[error("branch '{0}' does not reach the root commit")]
    Unrooted(String),
}

/// Result of verification.
#[derive(Debug)]
pub struct VerifyResult {
    /// Whether verification passed
    pub ok: bool,
    /// Errors found during verification
    pub errors: Vec<VerifyError>,
}

impl VerifyResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: vec![],
        }
    }

    /// Create a failed result with errors.
    pub fn failure(errors: Vec<VerifyError>) -> Self {
        Self { ok: false, errors }
    }
}

/// Check every structural invariant of `repo`.
pub fn verify(repo: &Repository) -> VerifyResult {
    let mut errors = Vec::new();

    if repo.branch_count() == 0 {
        errors.push(VerifyError::NoBranches);
    }
    if !repo.has_branch(repo.current_branch()) {
        errors.push(VerifyError::CurrentBranchMissing(
            repo.current_branch().to_string(),
        ));
    }

    let mut roots = 0;
    for commit in repo.commits() {
        if commit.is_root() {
            roots += 1;
        }
        if commit.parents().len() > 2 {
            errors.push(VerifyError::TooManyParents(commit.id().to_string()));
        }
        for parent in commit.parents() {
            if repo.commit(parent).is_none() {
                errors.push(VerifyError::ParentMissing {
                    commit: commit.id().to_string(),
                    parent: parent.to_string(),
                });
            }
        }
    }
    if roots != 1 || !repo.commit(repo.root()).is_some_and(|c| c.is_root()) {
        errors.push(VerifyError::RootCount(roots));
    }

    for branch in repo.branch_entries() {
        let head = branch.head_commit();
        if repo.commit(head).is_none() {
            errors.push(VerifyError::HeadMissing {
                branch: branch.name().to_string(),
                commit: head.to_string(),
            });
            continue;
        }
        if first_parents_from(repo, head).last() != Some(repo.root()) {
            errors.push(VerifyError::Unrooted(branch.name().to_string()));
        }
    }

    if errors.is_empty() {
        VerifyResult::success()
    } else {
        VerifyResult::failure(errors)
    }
}
