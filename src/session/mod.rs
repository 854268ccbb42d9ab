//! session
//!
//! Per-session repository registry.
//!
//! # Architecture
//!
//! Each session owns exactly one [`Repository`]. The registry maps session
//! ids to repositories and creates them lazily on first reference. It holds
//! no graph logic of its own.
//!
//! # Concurrency
//!
//! The map is guarded by a single mutex that is held only for lookup and
//! insert-if-absent, so two callers racing on a brand-new id observe the
//! same repository. Each repository has its own mutex; sessions never
//! contend with each other once their repository exists.
//!
//! # Example
//!
//! ```
//! use gitsim::session::SessionRegistry;
//!
//! let registry = SessionRegistry::default();
//! let id = registry.new_session();
//! let repo = registry.get_or_create(&id);
//! let commit = repo.lock().unwrap().create_commit("hello", "");
//! assert_eq!(registry.len(), 1);
//! # let _ = commit;
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::core::repository::{Repository, RepositorySettings};

/// A repository shared between the registry and in-flight callers.
pub type SharedRepository = Arc<Mutex<Repository>>;

/// Errors from session id parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid session id '{0}'")]
    InvalidId(String),
}

/// An opaque session identifier (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(Uuid);

impl SessionId {
    /// Issue a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a session id from its textual form.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidId` if `s` is not a UUID.
    pub fn parse(s: &str) -> Result<Self, SessionError> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| SessionError::InvalidId(s.to_string()))
    }
}

impl TryFrom<String> for SessionId {
    type Error = SessionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.to_string()
    }
}

impl std::str::FromStr for SessionId {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maps session ids to their repositories.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SessionId, SharedRepository>>,
    settings: RepositorySettings,
}

impl SessionRegistry {
    /// Create an empty registry whose repositories use `settings`.
    pub fn new(settings: RepositorySettings) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            settings,
        }
    }

    // Repositories are valid after any completed call, so a panic in
    // another thread does not invalidate the map.
    fn sessions(&self) -> MutexGuard<'_, HashMap<SessionId, SharedRepository>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Issue a new session id and create its repository.
    pub fn new_session(&self) -> SessionId {
        let mut sessions = self.sessions();
        let mut id = SessionId::generate();
        while sessions.contains_key(&id) {
            id = SessionId::generate();
        }
        sessions.insert(id, self.fresh_repository());
        info!(session = %id, "created session");
        id
    }

    /// Get the repository for `id`, creating it on first reference.
    pub fn get_or_create(&self, id: &SessionId) -> SharedRepository {
        let mut sessions = self.sessions();
        if let Some(repo) = sessions.get(id) {
            return Arc::clone(repo);
        }

        let repo = self.fresh_repository();
        sessions.insert(*id, Arc::clone(&repo));
        info!(session = %id, "created repository on first use");
        repo
    }

    /// Get the repository for `id` if the session exists.
    pub fn get(&self, id: &SessionId) -> Option<SharedRepository> {
        self.sessions().get(id).cloned()
    }

    /// Drop a session. Returns whether it existed.
    pub fn remove(&self, id: &SessionId) -> bool {
        let removed = self.sessions().remove(id).is_some();
        if removed {
            info!(session = %id, "removed session");
        }
        removed
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions().is_empty()
    }

    /// Settings applied to repositories this registry creates.
    pub fn settings(&self) -> &RepositorySettings {
        &self.settings
    }

    fn fresh_repository(&self) -> SharedRepository {
        Arc::new(Mutex::new(Repository::with_settings(self.settings.clone())))
    }
}

/// Lock a shared repository, recovering from poisoning.
///
/// Every repository operation completes its mutation in one step once its
/// guards pass, so the data behind a poisoned lock is still consistent.
pub fn lock(repo: &SharedRepository) -> MutexGuard<'_, Repository> {
    repo.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn session_id_round_trips_through_text() {
        let id = SessionId::generate();
        let parsed = SessionId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn session_id_rejects_garbage() {
        assert_eq!(
            SessionId::parse("not-a-uuid"),
            Err(SessionError::InvalidId("not-a-uuid".into()))
        );
    }

    #[test]
    fn new_session_creates_repository() {
        let registry = SessionRegistry::default();
        let id = registry.new_session();
        assert!(registry.get(&id).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn get_or_create_is_lazy_and_stable() {
        let registry = SessionRegistry::default();
        let id = SessionId::generate();
        assert!(registry.get(&id).is_none());

        let first = registry.get_or_create(&id);
        lock(&first).create_commit("c", "");
        let second = registry.get_or_create(&id);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(lock(&second).commit_count(), 2);
    }

    #[test]
    fn sessions_are_isolated() {
        let registry = SessionRegistry::default();
        let a = registry.new_session();
        let b = registry.new_session();

        lock(&registry.get_or_create(&a)).checkout_branch("feature").unwrap();

        let repo_b = registry.get_or_create(&b);
        let repo_b = lock(&repo_b);
        assert_eq!(repo_b.branch_count(), 1);
        assert_eq!(repo_b.current_branch(), "main");
    }

    #[test]
    fn concurrent_first_use_creates_one_repository() {
        let registry = Arc::new(SessionRegistry::default());
        let id = SessionId::generate();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    let repo = registry.get_or_create(&id);
                    lock(&repo).create_commit(&format!("c{i}"), "");
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 1);
        let repo = registry.get(&id).unwrap();
        assert_eq!(lock(&repo).commit_count(), 9);
    }

    #[test]
    fn registry_settings_apply_to_new_repositories() {
        let registry = SessionRegistry::new(RepositorySettings {
            id_length: 20,
            root_message: "Initial commit".into(),
        });
        let repo = registry.get_or_create(&SessionId::generate());
        let repo = lock(&repo);
        assert_eq!(repo.root().as_str().len(), 20);
    }

    #[test]
    fn remove_drops_session() {
        let registry = SessionRegistry::default();
        let id = registry.new_session();
        assert!(registry.remove(&id));
        assert!(!registry.remove(&id));
        assert!(registry.is_empty());
    }
}
