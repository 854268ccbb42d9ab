//! gitsim - An in-memory commit graph simulator
//!
//! gitsim models the parts of version control that are easiest to draw:
//! commits forming a DAG, branches pointing into it, and the operations
//! that move them (commit, branch, checkout, merge, clear). There are no
//! file trees, diffs, or conflicts; merges always succeed when both
//! branches exist.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`core`] - Domain types, the repository, DAG queries, verification, config
//! - [`session`] - Per-session repository registry
//! - [`api`] - Request/response records and the service that maps them to the core
//! - [`cli`] - Command-line interface (interactive shell and JSON-lines batch mode)
//! - [`ui`] - Output formatting
//!
//! # Correctness Invariants
//!
//! gitsim maintains the following invariants:
//!
//! 1. A repository always has at least one branch, and the current branch exists
//! 2. Every branch head and every commit parent names an existing commit
//! 3. Every commit reaches the single root commit through its parents
//! 4. A failed operation leaves the repository unchanged

pub mod api;
pub mod cli;
pub mod core;
pub mod session;
pub mod ui;
