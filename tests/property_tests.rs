//! Property-based tests for the repository model.
//!
//! These tests use proptest to drive repositories through random operation
//! sequences and verify invariants hold after every step.

use std::collections::HashSet;

use proptest::prelude::*;

use gitsim::core::graph::{ancestors, first_parent_chain};
use gitsim::core::repository::{RepoError, Repository};
use gitsim::core::types::{BranchName, CommitId};
use gitsim::core::verify::verify;

/// One repository operation.
#[derive(Debug, Clone)]
enum Op {
    Commit(String, String),
    Branch(String),
    Checkout(String),
    Merge(String, String),
    Clear,
}

/// Branch names from a small pool so collisions and hits are common.
fn branch_name() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["main", "feature", "Feature", "fix", "ghost", "a/b"])
        .prop_map(str::to_string)
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => ("[a-z ]{0,12}", "[a-z]{0,8}").prop_map(|(m, c)| Op::Commit(m, c)),
        2 => branch_name().prop_map(Op::Branch),
        3 => branch_name().prop_map(Op::Checkout),
        2 => (branch_name(), branch_name()).prop_map(|(s, t)| Op::Merge(s, t)),
        1 => Just(Op::Clear),
    ]
}

fn apply(repo: &mut Repository, op: &Op) {
    match op {
        Op::Commit(m, c) => {
            repo.create_commit(m, c);
        }
        Op::Branch(name) => {
            let _ = repo.create_branch(name);
        }
        Op::Checkout(name) => {
            repo.checkout_branch(name).unwrap();
        }
        Op::Merge(s, t) => {
            let _ = repo.merge_branches(s, t);
        }
        Op::Clear => repo.clear(),
    }
}

proptest! {
    /// Every reachable state satisfies the structural invariants.
    #[test]
    fn invariants_hold_after_every_op(ops in prop::collection::vec(op(), 0..40)) {
        let mut repo = Repository::new();
        for op in &ops {
            apply(&mut repo, op);
            let result = verify(&repo);
            prop_assert!(result.ok, "after {:?}: {:?}", op, result.errors);
        }
    }

    /// First-parent chains from every branch end at the root.
    #[test]
    fn every_branch_reaches_root(ops in prop::collection::vec(op(), 0..40)) {
        let mut repo = Repository::new();
        for op in &ops {
            apply(&mut repo, op);
        }
        for branch in repo.branches() {
            let chain = first_parent_chain(&repo, &branch.name).unwrap();
            prop_assert_eq!(chain.first(), Some(&branch.head_commit));
            prop_assert_eq!(chain.last(), Some(repo.root()));
        }
    }

    /// Commit ids are unique and the history lists each commit once.
    #[test]
    fn history_has_unique_ids(ops in prop::collection::vec(op(), 0..40)) {
        let mut repo = Repository::new();
        for op in &ops {
            apply(&mut repo, op);
        }
        let history = repo.commit_history();
        let ids: HashSet<&CommitId> = history.iter().map(|c| &c.id).collect();
        prop_assert_eq!(ids.len(), history.len());
        prop_assert_eq!(history.len(), repo.commit_count());
    }

    /// Every branch is listed on exactly the commit it points at.
    #[test]
    fn branch_labels_match_heads(ops in prop::collection::vec(op(), 0..40)) {
        let mut repo = Repository::new();
        for op in &ops {
            apply(&mut repo, op);
        }
        let history = repo.commit_history();
        for branch in repo.branches() {
            let labelled: Vec<_> = history
                .iter()
                .filter(|c| c.branches.contains(&branch.name))
                .map(|c| c.id.clone())
                .collect();
            prop_assert_eq!(labelled, vec![branch.head_commit.clone()]);
        }
    }

    /// A failed merge changes nothing.
    #[test]
    fn failed_merge_is_side_effect_free(
        ops in prop::collection::vec(op(), 0..20),
        target in branch_name(),
    ) {
        let mut repo = Repository::new();
        for op in &ops {
            apply(&mut repo, op);
        }
        let history = repo.commit_history();
        let branches = repo.branches();
        let current = repo.current_branch().to_string();

        let result = repo.merge_branches("no-such-branch", &target);
        prop_assert_eq!(result, Err(RepoError::UnknownBranch("no-such-branch".into())));
        prop_assert_eq!(repo.commit_history(), history);
        prop_assert_eq!(repo.branches(), branches);
        prop_assert_eq!(repo.current_branch(), current.as_str());
    }

    /// A successful merge puts both old heads in the new head's ancestry.
    #[test]
    fn merge_joins_histories(ops in prop::collection::vec(op(), 0..20)) {
        let mut repo = Repository::new();
        for op in &ops {
            apply(&mut repo, op);
        }
        repo.checkout_branch("side").unwrap();
        repo.create_commit("side work", "");
        let source_head = repo.head().clone();
        let target_head = repo.branch("main").unwrap().head_commit().clone();

        let merge = repo.merge_branches("side", "main").unwrap();
        let commit = repo.commit(&merge).unwrap();
        prop_assert_eq!(commit.parents(), &[target_head.clone(), source_head.clone()][..]);

        let reachable = ancestors(&repo, &merge);
        prop_assert!(reachable.contains(&source_head));
        prop_assert!(reachable.contains(&target_head));
        prop_assert_eq!(repo.current_branch(), "main");
    }

    /// Creating an existing branch fails and leaves the count unchanged.
    #[test]
    fn duplicate_branch_rejected(name in branch_name()) {
        let mut repo = Repository::new();
        let first = repo.create_branch(&name);
        let count = repo.branch_count();
        let second = repo.create_branch(&name);

        prop_assert!(second.is_err());
        prop_assert_eq!(repo.branch_count(), count);
        if name == "main" {
            prop_assert!(first.is_err());
            prop_assert_eq!(count, 1);
        } else {
            prop_assert!(first.is_ok());
            prop_assert_eq!(count, 2);
        }
    }

    /// Valid branch names round-trip through serde.
    #[test]
    fn branch_name_serde_roundtrip(name in "[A-Za-z0-9][A-Za-z0-9/_.-]{0,30}") {
        let branch = BranchName::new(&name).unwrap();
        let json = serde_json::to_string(&branch).unwrap();
        let parsed: BranchName = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(branch, parsed);
    }
}
