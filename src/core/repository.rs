//! core::repository
//!
//! The in-memory repository: commit graph, branch table, current branch.
//!
//! # Invariants
//!
//! - There is always at least one branch, and `current_branch` names one
//! - Every branch head and every commit parent names an existing commit
//! - Commits are never mutated or removed (except by [`Repository::clear`])
//! - Exactly one commit has no parents: the root
//!
//! Every mutating operation checks its guards before touching any state,
//! so a failed call leaves the repository unchanged.
//!
//! # Example
//!
//! ```
//! use gitsim::core::repository::Repository;
//!
//! let mut repo = Repository::new();
//! repo.create_commit("add readme", "hello");
//! repo.checkout_branch("feature").unwrap();
//! repo.create_commit("work", "");
//!
//! let merge = repo.merge_branches("feature", "main").unwrap();
//! assert_eq!(repo.current_branch(), "main");
//! assert_eq!(repo.branch("main").unwrap().head_commit(), &merge);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::branch::{Branch, BranchView};
use super::clock::{Clock, SystemClock};
use super::commit::{Commit, CommitView};
use super::ids::{CommitIdGenerator, DEFAULT_ID_LENGTH};
use super::types::{CommitId, UtcTimestamp};

/// Name of the branch every repository starts on.
pub const DEFAULT_BRANCH: &str = "main";

/// Failures reported by repository operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepoError {
    /// A branch with this name already exists.
    #[error("branch '{0}' already exists")]
    NameCollision(String),

    /// No branch with this name exists.
    #[error("branch '{0}' not found")]
    UnknownBranch(String),
}

/// Knobs applied when a repository is created or cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySettings {
    /// Commit id length in hex characters.
    pub id_length: usize,
    /// Message given to the root commit.
    pub root_message: String,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            id_length: DEFAULT_ID_LENGTH,
            root_message: String::new(),
        }
    }
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    /// The branch now current.
    pub branch: String,
    /// Whether the branch was created by this checkout.
    pub created: bool,
}

/// Summary counters for a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub current_branch: String,
    pub total_commits: usize,
    pub total_branches: usize,
    pub branches: Vec<String>,
}

/// A single-user repository held entirely in memory.
#[derive(Debug)]
pub struct Repository {
    commits: HashMap<CommitId, Commit>,
    /// Commit ids in creation order.
    order: Vec<CommitId>,
    branches: BTreeMap<String, Branch>,
    current_branch: String,
    root: CommitId,
    ids: CommitIdGenerator,
    settings: RepositorySettings,
    clock: Arc<dyn Clock>,
}

impl Repository {
    /// Create a repository with default settings and the system clock.
    pub fn new() -> Self {
        Self::with_settings(RepositorySettings::default())
    }

    /// Create a repository with the given settings and the system clock.
    pub fn with_settings(settings: RepositorySettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    /// Create a repository reading time from `clock`.
    pub fn with_clock(settings: RepositorySettings, clock: Arc<dyn Clock>) -> Self {
        let mut ids = CommitIdGenerator::new(settings.id_length);
        let root = Self::root_commit(&mut ids, &settings, clock.as_ref());
        let root_id = root.id().clone();

        let mut repo = Self {
            commits: HashMap::new(),
            order: Vec::new(),
            branches: BTreeMap::new(),
            current_branch: DEFAULT_BRANCH.to_string(),
            root: root_id.clone(),
            ids,
            settings,
            clock,
        };
        repo.insert_commit(root);
        repo.branches.insert(
            DEFAULT_BRANCH.to_string(),
            Branch::new(DEFAULT_BRANCH, root_id),
        );
        debug!(root = %repo.root, "initialized repository");
        repo
    }

    fn root_commit(
        ids: &mut CommitIdGenerator,
        settings: &RepositorySettings,
        clock: &dyn Clock,
    ) -> Commit {
        let now = clock.now();
        let id = ids.next_id(&settings.root_message, "", now);
        Commit::new(
            id,
            settings.root_message.clone(),
            "",
            Vec::new(),
            UtcTimestamp::from_datetime(now),
        )
    }

    fn insert_commit(&mut self, commit: Commit) {
        self.order.push(commit.id().clone());
        self.commits.insert(commit.id().clone(), commit);
    }

    fn new_commit(&mut self, message: &str, content: &str, parents: Vec<CommitId>) -> CommitId {
        let now = self.clock.now();
        let mut id = self.ids.next_id(message, content, now);
        // Short ids can collide; each draw advances the sequence.
        while self.commits.contains_key(&id) {
            id = self.ids.next_id(message, content, now);
        }
        let commit = Commit::new(
            id.clone(),
            message,
            content,
            parents,
            UtcTimestamp::from_datetime(now),
        );
        self.insert_commit(commit);
        id
    }

    fn current(&self) -> &Branch {
        self.branches
            .get(&self.current_branch)
            .expect("current branch is always present")
    }

    /// Record a commit on the current branch and advance it.
    ///
    /// Empty message and content are allowed. Never fails.
    pub fn create_commit(&mut self, message: &str, content: &str) -> CommitId {
        let parent = self.current().head_commit().clone();
        let id = self.new_commit(message, content, vec![parent]);

        if let Some(branch) = self.branches.get_mut(&self.current_branch) {
            branch.advance(id.clone());
        }
        debug!(commit = %id, branch = %self.current_branch, "created commit");
        id
    }

    /// Create a branch at the current head without switching to it.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NameCollision`] if `name` already exists; nothing
    /// is changed in that case.
    pub fn create_branch(&mut self, name: &str) -> Result<(), RepoError> {
        if self.branches.contains_key(name) {
            return Err(RepoError::NameCollision(name.to_string()));
        }

        let head = self.current().head_commit().clone();
        debug!(branch = name, head = %head, "created branch");
        self.branches
            .insert(name.to_string(), Branch::new(name, head));
        Ok(())
    }

    /// Switch to `name`, creating it at the current head if it does not exist.
    ///
    /// # Errors
    ///
    /// Only fails if creation fails, which cannot happen because creation
    /// is attempted only for names that are absent.
    pub fn checkout_branch(&mut self, name: &str) -> Result<Checkout, RepoError> {
        let created = if self.branches.contains_key(name) {
            false
        } else {
            self.create_branch(name)?;
            true
        };

        self.current_branch = name.to_string();
        debug!(branch = name, created, "checked out branch");
        Ok(Checkout {
            branch: self.current_branch.clone(),
            created,
        })
    }

    /// Join `source` into `target` with a two-parent commit.
    ///
    /// The merge commit's parents are `[target_head, source_head]` and its
    /// message is `"Merge {source} into {target}"`. `target` advances to
    /// it and becomes the current branch. Merging a branch into itself is
    /// allowed and produces a commit whose parents are equal.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::UnknownBranch`] if either name is missing
    /// (source is checked first); nothing is changed in that case.
    pub fn merge_branches(&mut self, source: &str, target: &str) -> Result<CommitId, RepoError> {
        let source_head = self
            .branches
            .get(source)
            .ok_or_else(|| RepoError::UnknownBranch(source.to_string()))?
            .head_commit()
            .clone();
        let target_head = self
            .branches
            .get(target)
            .ok_or_else(|| RepoError::UnknownBranch(target.to_string()))?
            .head_commit()
            .clone();

        let message = format!("Merge {source} into {target}");
        let id = self.new_commit(&message, "", vec![target_head, source_head]);

        if let Some(branch) = self.branches.get_mut(target) {
            branch.advance(id.clone());
        }
        self.current_branch = target.to_string();
        debug!(commit = %id, source, target, "merged branches");
        Ok(id)
    }

    /// Every commit in creation order, labelled with the branches pointing at it.
    ///
    /// Labels are computed from the live branch table on each call.
    pub fn commit_history(&self) -> Vec<CommitView> {
        let mut labels: HashMap<&CommitId, Vec<String>> = HashMap::new();
        for (name, branch) in &self.branches {
            labels
                .entry(branch.head_commit())
                .or_default()
                .push(name.clone());
        }

        self.commits()
            .map(|commit| {
                let branches = labels.remove(commit.id()).unwrap_or_default();
                CommitView::new(commit, branches)
            })
            .collect()
    }

    /// All branches, ordered by name.
    pub fn branches(&self) -> Vec<BranchView> {
        self.branches.values().map(Branch::view).collect()
    }

    /// Current branch plus commit and branch counts.
    pub fn status(&self) -> Status {
        Status {
            current_branch: self.current_branch.clone(),
            total_commits: self.commits.len(),
            total_branches: self.branches.len(),
            branches: self.branches.keys().cloned().collect(),
        }
    }

    /// Discard everything and start over with a fresh root on `main`.
    ///
    /// The id generator is kept, so the new root never reuses the old id.
    pub fn clear(&mut self) {
        self.commits.clear();
        self.order.clear();
        self.branches.clear();

        let root = Self::root_commit(&mut self.ids, &self.settings, self.clock.as_ref());
        let root_id = root.id().clone();
        self.insert_commit(root);
        self.branches.insert(
            DEFAULT_BRANCH.to_string(),
            Branch::new(DEFAULT_BRANCH, root_id.clone()),
        );
        self.current_branch = DEFAULT_BRANCH.to_string();
        self.root = root_id;
        debug!(root = %self.root, "cleared repository");
    }

    /// Name of the current branch.
    pub fn current_branch(&self) -> &str {
        &self.current_branch
    }

    /// Head commit of the current branch.
    pub fn head(&self) -> &CommitId {
        self.current().head_commit()
    }

    /// The parentless commit created at initialization.
    pub fn root(&self) -> &CommitId {
        &self.root
    }

    pub fn commit(&self, id: &CommitId) -> Option<&Commit> {
        self.commits.get(id)
    }

    pub fn branch(&self, name: &str) -> Option<&Branch> {
        self.branches.get(name)
    }

    pub fn has_branch(&self, name: &str) -> bool {
        self.branches.contains_key(name)
    }

    /// Commits in creation order.
    pub fn commits(&self) -> impl Iterator<Item = &Commit> {
        self.order.iter().filter_map(|id| self.commits.get(id))
    }

    /// Branch records, ordered by name.
    pub fn branch_entries(&self) -> impl Iterator<Item = &Branch> {
        self.branches.values()
    }

    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }

    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    pub fn settings(&self) -> &RepositorySettings {
        &self.settings
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}
