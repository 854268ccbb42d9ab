//! api::types
//!
//! Request and response records, one pair per operation.
//!
//! Requests carry typed fields, so a request that deserializes is already
//! well formed: session ids are UUIDs and branch names pass
//! [`BranchName`] validation. Responses keep the field names callers of
//! the visualizer expect (`commit_id`, `merge_commit_id`, `total_commits`
//! and so on).

use serde::{Deserialize, Serialize};

use crate::core::branch::BranchView;
use crate::core::commit::CommitView;
use crate::core::repository::Status;
use crate::core::types::{BranchName, CommitId};
use crate::session::SessionId;

/// Record a commit on the session's current branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRequest {
    pub session_id: SessionId,
    pub message: String,
    #[serde(default)]
    pub content: String,
}

/// Create a branch at the current head without switching to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRequest {
    pub session_id: SessionId,
    pub branch_name: BranchName,
}

/// Switch to a branch, creating it if needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub session_id: SessionId,
    pub branch_name: BranchName,
}

/// Merge `source_branch` into `target_branch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequest {
    pub session_id: SessionId,
    pub source_branch: BranchName,
    pub target_branch: BranchName,
}

/// Requests that only name a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequest {
    pub session_id: SessionId,
}

pub type LogRequest = SessionRequest;
pub type StatusRequest = SessionRequest;
pub type ClearRequest = SessionRequest;

/// Any request, tagged by its `op` field.
///
/// # Example
///
/// ```
/// use gitsim::api::Request;
///
/// let json = r#"{"op":"checkout","session_id":"67e55044-10b1-426f-9247-bb680e5fe0c8","branch_name":"feature"}"#;
/// let request: Request = serde_json::from_str(json).unwrap();
/// assert!(matches!(request, Request::Checkout(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    NewSession,
    Commit(CommitRequest),
    Branch(BranchRequest),
    Checkout(CheckoutRequest),
    Merge(MergeRequest),
    Log(LogRequest),
    Status(StatusRequest),
    Clear(ClearRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: SessionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitResponse {
    pub success: bool,
    pub commit_id: CommitId,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchResponse {
    pub success: bool,
    pub branch: String,
    pub head_commit: CommitId,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub success: bool,
    pub current_branch: String,
    pub created: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeResponse {
    pub success: bool,
    pub merge_commit_id: CommitId,
    pub current_branch: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogResponse {
    pub success: bool,
    pub commits: Vec<CommitView>,
    pub branches: Vec<BranchView>,
    pub current_branch: String,
}

/// Serializes flat: `success` alongside the [`Status`] fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    #[serde(flatten)]
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
}

/// A failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// Machine-readable failure kind
    pub error: String,
    /// Human-readable explanation
    pub detail: String,
}

/// Any response. Serializes as the inner record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Session(SessionResponse),
    Commit(CommitResponse),
    Branch(BranchResponse),
    Checkout(CheckoutResponse),
    Merge(MergeResponse),
    Log(LogResponse),
    Status(StatusResponse),
    Clear(ClearResponse),
    Error(ErrorResponse),
}

impl Response {
    /// Whether this response reports success.
    pub fn is_success(&self) -> bool {
        !matches!(self, Response::Error(_))
    }
}
