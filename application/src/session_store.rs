//! Process-wide session registry.
//!
//! Maps a session id to its live [`Transcript`]. The request layer is
//! concurrent, so the map sits behind a `tokio::sync::RwLock` while each
//! transcript gets its own `Mutex`: appends to different sessions never
//! contend on one lock, and two racing appends to the same session
//! serialize instead of losing an update.

use parley_domain::{Role, Transcript};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Shared handle to one session's transcript.
pub type SharedTranscript = Arc<Mutex<Transcript>>;

/// In-memory store of all live sessions.
///
/// Creation is idempotent: the first access for an id creates an empty
/// transcript, every later access returns the same instance. Sessions die
/// only through [`clear`](Self::clear) or the optional capacity bound,
/// which evicts the least-recently-active session when a new one would
/// exceed `max_sessions`.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SharedTranscript>>,
    max_sessions: Option<usize>,
}

impl SessionStore {
    /// Unbounded store.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions: None,
        }
    }

    /// Store that holds at most `max_sessions` live sessions.
    pub fn bounded(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions: Some(max_sessions.max(1)),
        }
    }

    /// Get the transcript for `session_id`, creating it if absent.
    pub async fn get_or_create(&self, session_id: &str) -> SharedTranscript {
        {
            let sessions = self.sessions.read().await;
            if let Some(transcript) = sessions.get(session_id) {
                return transcript.clone();
            }
        }

        let mut sessions = self.sessions.write().await;
        // Re-check: another task may have created it between the locks.
        if let Some(transcript) = sessions.get(session_id) {
            return transcript.clone();
        }

        if let Some(cap) = self.max_sessions
            && sessions.len() >= cap
        {
            Self::evict_least_recent(&mut sessions).await;
        }

        debug!(session_id, "creating session");
        let transcript: SharedTranscript = Arc::new(Mutex::new(Transcript::new()));
        sessions.insert(session_id.to_string(), transcript.clone());
        transcript
    }

    /// Append one turn, creating the session on demand.
    pub async fn append_turn(&self, session_id: &str, role: Role, content: impl Into<String>) {
        let transcript = self.get_or_create(session_id).await;
        let mut transcript = transcript.lock().await;
        match role {
            Role::User => transcript.push_user(content),
            Role::Assistant => transcript.push_assistant(content),
        }
    }

    /// Remove a session. Returns whether one existed.
    pub async fn clear(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(session_id).is_some();
        if removed {
            debug!(session_id, "cleared session");
        }
        removed
    }

    pub async fn exists(&self, session_id: &str) -> bool {
        self.sessions.read().await.contains_key(session_id)
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    async fn evict_least_recent(sessions: &mut HashMap<String, SharedTranscript>) {
        let mut oldest: Option<(String, chrono::DateTime<chrono::Utc>)> = None;
        for (id, transcript) in sessions.iter() {
            let last_active = transcript.lock().await.last_active();
            match &oldest {
                Some((_, ts)) if *ts <= last_active => {}
                _ => oldest = Some((id.clone(), last_active)),
            }
        }
        if let Some((id, _)) = oldest {
            debug!(session_id = %id, "evicting least-recently-active session");
            sessions.remove(&id);
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_or_create_is_idempotent() {
        let store = SessionStore::new();
        let a = store.get_or_create("s1").await;
        let b = store.get_or_create("s1").await;
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn append_creates_on_demand() {
        let store = SessionStore::new();
        assert!(!store.exists("s1").await);

        store.append_turn("s1", Role::User, "hello").await;
        assert!(store.exists("s1").await);

        let transcript = store.get_or_create("s1").await;
        let transcript = transcript.lock().await;
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.turns()[0].role, Role::User);
    }

    #[tokio::test]
    async fn clear_semantics() {
        let store = SessionStore::new();
        store.append_turn("s1", Role::User, "hello").await;

        assert!(store.clear("s1").await);
        assert!(!store.exists("s1").await);
        // Clearing again is a no-op
        assert!(!store.clear("s1").await);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn concurrent_appends_lose_nothing() {
        let store = Arc::new(SessionStore::new());
        let n = 32;

        let mut handles = Vec::new();
        for i in 0..n {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .append_turn("race", Role::User, format!("message {}", i))
                    .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let transcript = store.get_or_create("race").await;
        assert_eq!(transcript.lock().await.len(), n);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn bounded_store_evicts_least_recent() {
        let store = SessionStore::bounded(2);
        store.append_turn("a", Role::User, "first").await;
        store.append_turn("b", Role::User, "second").await;
        // Touch "a" so "b" becomes the eviction candidate
        store.append_turn("a", Role::User, "again").await;

        store.append_turn("c", Role::User, "third").await;

        assert_eq!(store.len().await, 2);
        assert!(store.exists("a").await);
        assert!(!store.exists("b").await);
        assert!(store.exists("c").await);
    }

    #[tokio::test]
    async fn different_sessions_are_independent() {
        let store = SessionStore::new();
        store.append_turn("s1", Role::User, "one").await;
        store.append_turn("s2", Role::User, "two").await;
        store.append_turn("s2", Role::Assistant, "reply").await;

        assert_eq!(store.get_or_create("s1").await.lock().await.len(), 1);
        assert_eq!(store.get_or_create("s2").await.lock().await.len(), 2);

        store.clear("s1").await;
        assert!(store.exists("s2").await);
    }
}
