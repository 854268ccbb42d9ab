//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`CommitId`] - Short hexadecimal commit identifier
//! - [`BranchName`] - Boundary-validated branch name
//! - [`UtcTimestamp`] - RFC3339 timestamp
//!
//! # Validation
//!
//! These types enforce validity at construction time. The repository
//! itself accepts plain `&str` branch names; [`BranchName`] is what the
//! request boundary uses to reject malformed input before it reaches
//! the core.
//!
//! # Examples
//!
//! ```
//! use gitsim::core::types::{BranchName, CommitId};
//!
//! let branch = BranchName::new("feature/login").unwrap();
//! let id = CommitId::new("1A2b3C4d").unwrap();
//! assert_eq!(id.as_str(), "1a2b3c4d");
//!
//! assert!(BranchName::new("").is_err());
//! assert!(CommitId::new("not-hex").is_err());
//! # let _ = branch;
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("invalid commit id: {0}")]
    InvalidCommitId(String),
}

/// A commit identifier: a truncated, lowercase hex digest.
///
/// Identifiers are between [`CommitId::MIN_LEN`] and [`CommitId::MAX_LEN`]
/// characters long. They are normalized to lowercase.
///
/// # Example
///
/// ```
/// use gitsim::core::types::CommitId;
///
/// let id = CommitId::new("deadbeef").unwrap();
/// assert_eq!(id.short(4), "dead");
/// assert_eq!(id.short(100), "deadbeef");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommitId(String);

impl CommitId {
    /// Shortest identifier length accepted.
    pub const MIN_LEN: usize = 4;

    /// Longest identifier length accepted (a full SHA-256 hex digest).
    pub const MAX_LEN: usize = 64;

    /// Create a new validated commit id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidCommitId` if the string is not hex or
    /// its length is out of range.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into().to_ascii_lowercase();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Create a commit id from the leading `len` hex characters of a digest.
    ///
    /// `len` is clamped to the accepted range. The digest must be at least
    /// `MIN_LEN / 2` bytes; callers pass a full SHA-256 output.
    pub(crate) fn from_digest(digest: &[u8], len: usize) -> Self {
        let mut hex = hex::encode(digest);
        hex.truncate(len.clamp(Self::MIN_LEN, Self::MAX_LEN));
        Self(hex)
    }

    fn validate(id: &str) -> Result<(), TypeError> {
        if id.len() < Self::MIN_LEN || id.len() > Self::MAX_LEN {
            return Err(TypeError::InvalidCommitId(format!(
                "expected {} to {} hex characters, got {}",
                Self::MIN_LEN,
                Self::MAX_LEN,
                id.len()
            )));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidCommitId(
                "commit id must be hexadecimal".into(),
            ));
        }
        Ok(())
    }

    /// Get an abbreviated form of the id.
    ///
    /// Returns the first `len` characters, or the whole id if shorter.
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }

    /// Get the commit id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CommitId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CommitId> for String {
    fn from(id: CommitId) -> Self {
        id.0
    }
}

impl AsRef<str> for CommitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A branch name validated at the request boundary.
///
/// Branch names are case-sensitive. The rules are deliberately loose,
/// since this is a simulator and not a ref store:
/// - Cannot be empty
/// - Cannot start or end with whitespace
/// - Cannot contain ASCII control characters
///
/// # Example
///
/// ```
/// use gitsim::core::types::BranchName;
///
/// let name = BranchName::new("Feature").unwrap();
/// assert_eq!(name.as_str(), "Feature");
///
/// assert!(BranchName::new(" padded").is_err());
/// assert!(BranchName::new("tab\there").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBranchName` describing the first rule violated.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot be empty".into(),
            ));
        }

        if name.trim() != name {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot start or end with whitespace".into(),
            ));
        }

        if name.chars().any(|c| c.is_ascii_control()) {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot contain control characters".into(),
            ));
        }

        Ok(())
    }

    /// Get the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BranchName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BranchName> for String {
    fn from(name: BranchName) -> Self {
        name.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A UTC timestamp.
///
/// Serializes and displays as RFC3339.
///
/// # Example
///
/// ```
/// use gitsim::core::types::UtcTimestamp;
///
/// let now = UtcTimestamp::now();
/// assert!(now.to_string().contains('T'));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UtcTimestamp(chrono::DateTime<chrono::Utc>);

impl UtcTimestamp {
    /// Create a timestamp for the current moment.
    pub fn now() -> Self {
        Self(chrono::Utc::now())
    }

    /// Create a timestamp from a chrono DateTime.
    pub fn from_datetime(dt: chrono::DateTime<chrono::Utc>) -> Self {
        Self(dt)
    }

    /// Get the underlying datetime.
    pub fn as_datetime(&self) -> &chrono::DateTime<chrono::Utc> {
        &self.0
    }
}

impl std::fmt::Display for UtcTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
