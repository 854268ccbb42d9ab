//! core::branch
//!
//! Named, movable pointers into the commit graph.

use serde::{Deserialize, Serialize};

use super::types::CommitId;

/// A branch: a name and the commit it currently points to.
///
/// The repository guarantees `head_commit` always names an existing commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    name: String,
    head_commit: CommitId,
}

impl Branch {
    pub(crate) fn new(name: impl Into<String>, head_commit: CommitId) -> Self {
        Self {
            name: name.into(),
            head_commit,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn head_commit(&self) -> &CommitId {
        &self.head_commit
    }

    /// Point the branch at a different commit.
    pub(crate) fn advance(&mut self, to: CommitId) {
        self.head_commit = to;
    }

    pub fn view(&self) -> BranchView {
        BranchView {
            name: self.name.clone(),
            head_commit: self.head_commit.clone(),
        }
    }
}

/// A detached copy of a branch for callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchView {
    pub name: String,
    pub head_commit: CommitId,
}
