//! api
//!
//! The request/response boundary in front of the core.
//!
//! # Responsibilities
//!
//! - Resolve session ids through the [`SessionRegistry`]
//! - Call exactly one repository operation per request
//! - Translate [`RepoError`]s into [`ErrorResponse`]s
//!
//! Shape validation happens when a [`Request`] is deserialized; by the time
//! a request reaches [`Service`] its fields are well formed. Transport is
//! the caller's business: the CLI feeds requests from JSON lines, but
//! anything that can produce a `Request` can drive a `Service`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use gitsim::api::{CheckoutRequest, CommitRequest, Service};
//! use gitsim::core::types::BranchName;
//! use gitsim::session::SessionRegistry;
//!
//! let service = Service::new(Arc::new(SessionRegistry::default()));
//! let session_id = service.new_session().session_id;
//!
//! service.checkout(CheckoutRequest {
//!     session_id,
//!     branch_name: BranchName::new("feature").unwrap(),
//! }).unwrap();
//! let commit = service.commit(CommitRequest {
//!     session_id,
//!     message: "work".into(),
//!     content: String::new(),
//! });
//! assert!(commit.success);
//! ```

pub mod types;

pub use types::{
    BranchRequest, BranchResponse, CheckoutRequest, CheckoutResponse, ClearRequest,
    ClearResponse, CommitRequest, CommitResponse, ErrorResponse, LogRequest, LogResponse,
    MergeRequest, MergeResponse, Request, Response, SessionRequest, SessionResponse,
    StatusRequest, StatusResponse,
};

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::core::repository::RepoError;
use crate::session::{lock, SessionRegistry};

/// Errors surfaced to API callers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be parsed or failed shape validation.
    #[error("invalid request: {0}")]
    Malformed(String),

    #[error("Failed to create branch")]
    Branch(#[source] RepoError),

    #[error("Failed to create/checkout branch")]
    Checkout(#[source] RepoError),

    #[error("Merge failed - branches not found")]
    Merge(#[source] RepoError),
}

impl ApiError {
    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Malformed(_) => "malformed_request",
            ApiError::Branch(e) | ApiError::Checkout(e) | ApiError::Merge(e) => match e {
                RepoError::NameCollision(_) => "name_collision",
                RepoError::UnknownBranch(_) => "unknown_branch",
            },
        }
    }

    /// The underlying repository failure, if any.
    pub fn repo_error(&self) -> Option<&RepoError> {
        match self {
            ApiError::Malformed(_) => None,
            ApiError::Branch(e) | ApiError::Checkout(e) | ApiError::Merge(e) => Some(e),
        }
    }
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        let detail = match err.repo_error() {
            Some(cause) => format!("{err}: {cause}"),
            None => err.to_string(),
        };
        ErrorResponse {
            success: false,
            error: err.kind().to_string(),
            detail,
        }
    }
}

/// Serves requests against a shared session registry.
#[derive(Debug, Clone)]
pub struct Service {
    registry: Arc<SessionRegistry>,
}

impl Service {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Handle any request, folding failures into an error response.
    pub fn handle(&self, request: Request) -> Response {
        match self.dispatch(request) {
            Ok(response) => response,
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "request failed");
                Response::Error(ErrorResponse::from(&err))
            }
        }
    }

    /// Parse one JSON request and handle it.
    pub fn handle_json(&self, input: &str) -> Response {
        match serde_json::from_str::<Request>(input) {
            Ok(request) => self.handle(request),
            Err(e) => {
                let err = ApiError::Malformed(e.to_string());
                warn!(error = %err, "rejected request");
                Response::Error(ErrorResponse::from(&err))
            }
        }
    }

    fn dispatch(&self, request: Request) -> Result<Response, ApiError> {
        Ok(match request {
            Request::NewSession => Response::Session(self.new_session()),
            Request::Commit(r) => Response::Commit(self.commit(r)),
            Request::Branch(r) => Response::Branch(self.create_branch(r)?),
            Request::Checkout(r) => Response::Checkout(self.checkout(r)?),
            Request::Merge(r) => Response::Merge(self.merge(r)?),
            Request::Log(r) => Response::Log(self.log(r)),
            Request::Status(r) => Response::Status(self.status(r)),
            Request::Clear(r) => Response::Clear(self.clear(r)),
        })
    }

    /// Issue a new session.
    pub fn new_session(&self) -> SessionResponse {
        SessionResponse {
            session_id: self.registry.new_session(),
        }
    }

    pub fn commit(&self, request: CommitRequest) -> CommitResponse {
        let repo = self.registry.get_or_create(&request.session_id);
        let commit_id = lock(&repo).create_commit(&request.message, &request.content);
        CommitResponse {
            success: true,
            message: format!("Created commit: {commit_id}"),
            commit_id,
        }
    }

    pub fn create_branch(&self, request: BranchRequest) -> Result<BranchResponse, ApiError> {
        let repo = self.registry.get_or_create(&request.session_id);
        let mut repo = lock(&repo);
        let name = request.branch_name.as_str();
        repo.create_branch(name).map_err(ApiError::Branch)?;

        let head_commit = repo.head().clone();
        Ok(BranchResponse {
            success: true,
            branch: name.to_string(),
            head_commit,
            message: format!("Created branch: {name}"),
        })
    }

    pub fn checkout(&self, request: CheckoutRequest) -> Result<CheckoutResponse, ApiError> {
        let repo = self.registry.get_or_create(&request.session_id);
        let checkout = lock(&repo)
            .checkout_branch(request.branch_name.as_str())
            .map_err(ApiError::Checkout)?;

        Ok(CheckoutResponse {
            success: true,
            message: format!("Switched to branch: {}", checkout.branch),
            current_branch: checkout.branch,
            created: checkout.created,
        })
    }

    pub fn merge(&self, request: MergeRequest) -> Result<MergeResponse, ApiError> {
        let repo = self.registry.get_or_create(&request.session_id);
        let mut repo = lock(&repo);
        let source = request.source_branch.as_str();
        let target = request.target_branch.as_str();
        let merge_commit_id = repo.merge_branches(source, target).map_err(ApiError::Merge)?;

        Ok(MergeResponse {
            success: true,
            merge_commit_id,
            current_branch: repo.current_branch().to_string(),
            message: format!("Merged {source} into {target}"),
        })
    }

    pub fn log(&self, request: LogRequest) -> LogResponse {
        let repo = self.registry.get_or_create(&request.session_id);
        let repo = lock(&repo);
        LogResponse {
            success: true,
            commits: repo.commit_history(),
            branches: repo.branches(),
            current_branch: repo.current_branch().to_string(),
        }
    }

    pub fn status(&self, request: StatusRequest) -> StatusResponse {
        let repo = self.registry.get_or_create(&request.session_id);
        let status = lock(&repo).status();
        StatusResponse {
            success: true,
            status,
        }
    }

    pub fn clear(&self, request: ClearRequest) -> ClearResponse {
        let repo = self.registry.get_or_create(&request.session_id);
        lock(&repo).clear();
        ClearResponse {
            success: true,
            message: "Repository cleared successfully".to_string(),
        }
    }
}
