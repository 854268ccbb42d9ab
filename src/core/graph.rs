//! core::graph
//!
//! Read-only traversals over a repository's commit DAG.
//!
//! # Architecture
//!
//! The DAG is implicit in the repository: nodes are commits and edges point
//! from child to parent. Every traversal here terminates at the root, since
//! parents only ever reference commits that existed before their child.
//!
//! Unknown ids yield empty results rather than errors.

use std::collections::{HashSet, VecDeque};

use super::repository::Repository;
use super::types::CommitId;

/// Walk first parents from a branch head down to the root.
///
/// Returns the head first and the root last, or `None` if the branch
/// does not exist.
///
/// # Example
///
/// ```
/// use gitsim::core::graph::first_parent_chain;
/// use gitsim::core::repository::Repository;
///
/// let mut repo = Repository::new();
/// let c1 = repo.create_commit("c1", "");
/// let chain = first_parent_chain(&repo, "main").unwrap();
/// assert_eq!(chain, vec![c1, repo.root().clone()]);
/// ```
pub fn first_parent_chain(repo: &Repository, branch: &str) -> Option<Vec<CommitId>> {
    let head = repo.branch(branch)?.head_commit().clone();
    Some(first_parents_from(repo, &head))
}

/// Walk first parents starting at `start`.
pub fn first_parents_from(repo: &Repository, start: &CommitId) -> Vec<CommitId> {
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut cursor = repo.commit(start);

    while let Some(commit) = cursor {
        // Guards against a malformed graph; a well-formed one never revisits.
        if !seen.insert(commit.id().clone()) {
            break;
        }
        chain.push(commit.id().clone());
        cursor = commit.first_parent().and_then(|p| repo.commit(p));
    }

    chain
}

/// All commits reachable from `start` through any parent, excluding `start`.
///
/// Breadth-first, so nearer ancestors come first.
pub fn ancestors(repo: &Repository, start: &CommitId) -> Vec<CommitId> {
    let mut result = Vec::new();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();

    if let Some(commit) = repo.commit(start) {
        visited.insert(start.clone());
        queue.extend(commit.parents().iter().cloned());
    }

    while let Some(current) = queue.pop_front() {
        if !visited.insert(current.clone()) {
            continue;
        }
        if let Some(commit) = repo.commit(&current) {
            queue.extend(commit.parents().iter().cloned());
        }
        result.push(current);
    }

    result
}

/// Whether `ancestor` is reachable from `descendant` (a commit is its own ancestor).
pub fn is_ancestor(repo: &Repository, ancestor: &CommitId, descendant: &CommitId) -> bool {
    if repo.commit(ancestor).is_none() || repo.commit(descendant).is_none() {
        return false;
    }
    ancestor == descendant || ancestors(repo, descendant).contains(ancestor)
}

/// A nearest common ancestor of `a` and `b`.
///
/// Searches breadth-first from `b` for the first commit that is also an
/// ancestor of `a` (or `a` itself). With criss-cross merges several
/// candidates can be equally near; the first one found is returned.
pub fn merge_base(repo: &Repository, a: &CommitId, b: &CommitId) -> Option<CommitId> {
    repo.commit(a)?;
    repo.commit(b)?;

    let mut from_a: HashSet<CommitId> = ancestors(repo, a).into_iter().collect();
    from_a.insert(a.clone());

    std::iter::once(b.clone())
        .chain(ancestors(repo, b))
        .find(|id| from_a.contains(id))
}
