//! core::commit
//!
//! Immutable commit records and their read-only views.
//!
//! # Invariants
//!
//! - A commit is never mutated after creation
//! - `parents` holds zero ids (root), one id (ordinary commit), or two ids
//!   (merge commit, target first)

use serde::{Deserialize, Serialize};

use super::types::{CommitId, UtcTimestamp};

/// Author recorded on every commit.
pub const AUTHOR: &str = "Git Simulator User";

/// A node in the commit graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    id: CommitId,
    message: String,
    content: String,
    parents: Vec<CommitId>,
    timestamp: UtcTimestamp,
    author: String,
}

impl Commit {
    /// Create a commit record. Parent existence is the repository's concern.
    pub(crate) fn new(
        id: CommitId,
        message: impl Into<String>,
        content: impl Into<String>,
        parents: Vec<CommitId>,
        timestamp: UtcTimestamp,
    ) -> Self {
        Self {
            id,
            message: message.into(),
            content: content.into(),
            parents,
            timestamp,
            author: AUTHOR.to_string(),
        }
    }

    pub fn id(&self) -> &CommitId {
        &self.id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Parent ids in order. For merges the target's head comes first.
    pub fn parents(&self) -> &[CommitId] {
        &self.parents
    }

    /// The first parent, if any.
    pub fn first_parent(&self) -> Option<&CommitId> {
        self.parents.first()
    }

    pub fn timestamp(&self) -> UtcTimestamp {
        self.timestamp
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// True for the parentless commit created at initialization.
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// True for commits created by a merge.
    pub fn is_merge(&self) -> bool {
        self.parents.len() == 2
    }
}

/// A snapshot of a commit plus the branches whose head is that commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitView {
    pub id: CommitId,
    pub message: String,
    pub content: String,
    pub parents: Vec<CommitId>,
    pub timestamp: UtcTimestamp,
    pub author: String,
    pub branches: Vec<String>,
}

impl CommitView {
    pub(crate) fn new(commit: &Commit, branches: Vec<String>) -> Self {
        Self {
            id: commit.id.clone(),
            message: commit.message.clone(),
            content: commit.content.clone(),
            parents: commit.parents.clone(),
            timestamp: commit.timestamp,
            author: commit.author.clone(),
            branches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> CommitId {
        CommitId::new(s).unwrap()
    }

    #[test]
    fn root_commit_has_no_parents() {
        let c = Commit::new(id("aaaa0000"), "Initial commit", "", vec![], UtcTimestamp::now());
        assert!(c.is_root());
        assert!(!c.is_merge());
        assert_eq!(c.first_parent(), None);
        assert_eq!(c.author(), AUTHOR);
    }

    #[test]
    fn merge_commit_keeps_parent_order() {
        let c = Commit::new(
            id("cccc0000"),
            "Merge feature into main",
            "",
            vec![id("aaaa0000"), id("bbbb0000")],
            UtcTimestamp::now(),
        );
        assert!(c.is_merge());
        assert_eq!(c.first_parent(), Some(&id("aaaa0000")));
        assert_eq!(c.parents()[1], id("bbbb0000"));
    }

    #[test]
    fn view_serializes_expected_fields() {
        let c = Commit::new(id("aaaa1111"), "msg", "body", vec![], UtcTimestamp::now());
        let view = CommitView::new(&c, vec!["main".into()]);
        let json = serde_json::to_value(&view).unwrap();
        for field in ["id", "message", "content", "parents", "timestamp", "author", "branches"] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
        assert_eq!(json["branches"][0], "main");
    }
}
