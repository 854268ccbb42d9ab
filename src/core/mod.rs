//! core
//!
//! Domain types and the in-memory repository model.
//!
//! # Modules
//!
//! - [`types`] - Strong types: CommitId, BranchName, UtcTimestamp
//! - [`commit`] - Immutable commit records and views
//! - [`branch`] - Branch pointers and views
//! - [`repository`] - The repository and its operations
//! - [`graph`] - Read-only DAG traversals
//! - [`verify`] - Invariant verification
//! - [`ids`] - Commit id generation
//! - [`clock`] - Time source seam
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - The repository exclusively owns its commits and branches; callers
//!   only ever receive copies
//! - Failed operations never leave partial state behind
//! - No I/O: every operation is short, synchronous, and CPU-only

pub mod branch;
pub mod clock;
pub mod commit;
pub mod config;
pub mod graph;
pub mod ids;
pub mod repository;
pub mod types;
pub mod verify;
