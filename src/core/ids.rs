//! core::ids
//!
//! Commit identifier generation.
//!
//! # Scheme
//!
//! An id is the SHA-256 of `(message, content, clock nanos, sequence)`,
//! hex-encoded and truncated to a configured length. The sequence number
//! is per generator and strictly increasing, so two commits from the same
//! repository never hash the same input even when the clock has not
//! moved between them.
//!
//! Ids are not content addresses: identical message and content at
//! different times produce different ids. Truncation means two distinct
//! inputs can still share a prefix. At the default length of 8 hex
//! characters that is an accepted approximation; it is not detected.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use super::types::CommitId;

/// Default id length in hex characters.
pub const DEFAULT_ID_LENGTH: usize = 8;

/// Produces commit ids for one repository.
#[derive(Debug, Clone)]
pub struct CommitIdGenerator {
    length: usize,
    sequence: u64,
}

impl CommitIdGenerator {
    /// Create a generator producing ids of `length` hex characters.
    ///
    /// The length is clamped to the range [`CommitId`] accepts.
    pub fn new(length: usize) -> Self {
        Self {
            length: length.clamp(CommitId::MIN_LEN, CommitId::MAX_LEN),
            sequence: 0,
        }
    }

    /// Length of the ids this generator produces.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Derive the next id.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::Utc;
    /// use gitsim::core::ids::CommitIdGenerator;
    ///
    /// let mut ids = CommitIdGenerator::new(8);
    /// let now = Utc::now();
    /// let a = ids.next_id("msg", "", now);
    /// let b = ids.next_id("msg", "", now);
    /// assert_eq!(a.as_str().len(), 8);
    /// assert_ne!(a, b);
    /// ```
    pub fn next_id(&mut self, message: &str, content: &str, at: DateTime<Utc>) -> CommitId {
        let sequence = self.sequence;
        self.sequence += 1;

        let nanos = at
            .timestamp_nanos_opt()
            .unwrap_or_else(|| at.timestamp_micros().saturating_mul(1_000));

        let mut hasher = Sha256::new();
        hasher.update(message.as_bytes());
        hasher.update(b"\0");
        hasher.update(content.as_bytes());
        hasher.update(b"\0");
        hasher.update(nanos.to_be_bytes());
        hasher.update(sequence.to_be_bytes());

        CommitId::from_digest(&hasher.finalize(), self.length)
    }
}

impl Default for CommitIdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ID_LENGTH)
    }
}
