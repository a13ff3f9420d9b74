//! In-memory session store.
//!
//! Sessions are created lazily, keyed by id, and live for the lifetime of
//! the process — except that the store is bounded: when a new session would
//! exceed the cap, the session with the oldest `updated_at` is evicted.
//!
//! All access goes through one `tokio::sync::RwLock`; a caller's whole
//! mutation runs under a single write guard, so concurrent calls for
//! different sessions never corrupt each other and a call's history appends
//! stay adjacent.

use std::collections::HashMap;

use crabdesk_core::Session;
use tokio::sync::RwLock;
use tracing::debug;

/// Mapping from session id to conversation state.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    capacity: usize,
}

impl SessionStore {
    /// Create an empty store bounded at `capacity` sessions.
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Resolve a session and apply `f` to it under one write guard.
    ///
    /// A known `requested` id yields the existing session unchanged;
    /// anything else allocates a fresh session with a generated id. The
    /// closure runs synchronously while the guard is held — no await points
    /// can interleave another call into the middle of a mutation.
    pub async fn with_session<R>(
        &self,
        requested: Option<&str>,
        f: impl FnOnce(&mut Session) -> R,
    ) -> R {
        let mut sessions = self.sessions.write().await;

        if let Some(id) = requested
            && let Some(session) = sessions.get_mut(id)
        {
            return f(session);
        }

        if sessions.len() >= self.capacity {
            evict_oldest(&mut sessions);
        }

        let fresh = Session::new(None);
        debug!(session = %fresh.id, "Created session");
        let id = fresh.id.clone();
        f(sessions.entry(id).or_insert(fresh))
    }

    /// Snapshot of one session, if it exists.
    pub async fn get(&self, id: &str) -> Option<Session> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Number of live sessions.
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Drop the session whose `updated_at` is oldest.
fn evict_oldest(sessions: &mut HashMap<String, Session>) {
    let oldest = sessions
        .values()
        .min_by_key(|s| s.updated_at)
        .map(|s| s.id.clone());
    if let Some(id) = oldest {
        sessions.remove(&id);
        debug!(session = %id, "Evicted oldest session at capacity");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crabdesk_core::Role;

    #[tokio::test]
    async fn creates_session_lazily() {
        let store = SessionStore::new(16);
        assert_eq!(store.count().await, 0);

        let id = store.with_session(None, |s| s.id.clone()).await;
        assert_eq!(store.count().await, 1);
        assert!(store.get(&id).await.is_some());
    }

    #[tokio::test]
    async fn known_id_returns_existing_session() {
        let store = SessionStore::new(16);
        let id = store
            .with_session(None, |s| {
                s.push(Role::User, "hello");
                s.id.clone()
            })
            .await;

        let same = store.with_session(Some(&id), |s| s.id.clone()).await;
        assert_eq!(same, id);
        assert_eq!(store.get(&id).await.unwrap().history.len(), 1);
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn unknown_id_allocates_fresh_generated_id() {
        let store = SessionStore::new(16);
        let id = store
            .with_session(Some("never-seen"), |s| s.id.clone())
            .await;
        assert_ne!(id, "never-seen");
        assert!(store.get("never-seen").await.is_none());
        assert!(store.get(&id).await.is_some());
    }

    #[tokio::test]
    async fn evicts_oldest_session_at_capacity() {
        let store = SessionStore::new(2);
        let first = store.with_session(None, |s| s.id.clone()).await;
        let second = store.with_session(None, |s| s.id.clone()).await;

        // Touch the first so the second becomes oldest.
        store
            .with_session(Some(&first), |s| s.push(Role::User, "ping"))
            .await;

        let third = store.with_session(None, |s| s.id.clone()).await;

        assert_eq!(store.count().await, 2);
        assert!(store.get(&first).await.is_some());
        assert!(store.get(&second).await.is_none());
        assert!(store.get(&third).await.is_some());
    }

    #[tokio::test]
    async fn existing_session_lookup_never_evicts() {
        let store = SessionStore::new(1);
        let id = store.with_session(None, |s| s.id.clone()).await;

        for _ in 0..3 {
            store.with_session(Some(&id), |_| ()).await;
        }
        assert_eq!(store.count().await, 1);
        assert!(store.get(&id).await.is_some());
    }
}
