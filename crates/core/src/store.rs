//! In-Memory Session Store
//!
//! A bounded cache of live conversation sessions. The store is constructed
//! once at the composition root and shared by handle; it deliberately has no
//! durability: a process restart drops every session.

use crate::session::Session;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

/// Default maximum number of live sessions.
pub const DEFAULT_CAPACITY: usize = 100;

struct Inner {
    entries: HashMap<String, Session>,
    /// Insertion-order list of live session ids, oldest save first. Used
    /// only for eviction bookkeeping, never for conversation ordering.
    order: VecDeque<String>,
}

/// Bounded session cache with eviction by *write* recency.
///
/// Eviction order is maintained per save: re-saving an existing session
/// moves it to the back of the queue, and once the cache exceeds capacity
/// the least-recently-saved session is dropped. A plain `get` never promotes
/// an entry. True LRU would reorder on read as well; mission sessions are
/// read and immediately re-saved on every turn, so write recency tracks
/// activity closely enough and keeps reads side-effect free.
pub struct SessionStore {
    inner: Mutex<Inner>,
    capacity: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl SessionStore {
    /// Creates a store with the default capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store bounded to `capacity` live sessions.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity,
        }
    }

    /// Returns a copy of the session, if it is live. Does not affect
    /// eviction order.
    pub fn get(&self, session_id: &str) -> Option<Session> {
        self.inner.lock().entries.get(session_id).cloned()
    }

    /// Saves a session under its own id, overwriting any existing entry and
    /// marking it most-recently-saved. Evicts the oldest-by-save-time
    /// session if the store would exceed its capacity.
    pub fn save(&self, session: Session) {
        let id = session.session_id.clone();
        let mut inner = self.inner.lock();

        if inner.entries.contains_key(&id) {
            inner.order.retain(|existing| existing != &id);
        }
        inner.order.push_back(id.clone());
        inner.entries.insert(id, session);

        while inner.entries.len() > self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.entries.remove(&oldest);
                tracing::debug!(session_id = %oldest, "evicted least-recently-saved session");
            }
        }
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The configured session bound.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every session. Intended for test isolation.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str) -> Session {
        Session::new(id.to_string(), "mission".to_string(), "user".to_string())
    }

    #[test]
    fn test_get_absent_returns_none() {
        let store = SessionStore::new();
        assert!(store.get("nope").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_then_get_round_trip() {
        let store = SessionStore::new();
        store.save(session("s1"));
        let got = store.get("s1").expect("saved session should be live");
        assert_eq!(got.session_id, "s1");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_save_overwrites_instead_of_duplicating() {
        let store = SessionStore::new();
        store.save(session("s1"));
        let mut updated = session("s1");
        updated.push(crate::session::MessageRole::User, "hi");
        store.save(updated);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("s1").unwrap().messages.len(), 1);
    }

    #[test]
    fn test_len_never_exceeds_capacity() {
        let store = SessionStore::with_capacity(3);
        for i in 0..20 {
            store.save(session(&format!("s{i}")));
            assert!(store.len() <= 3);
        }
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_eviction_drops_least_recently_saved() {
        let store = SessionStore::with_capacity(2);
        store.save(session("s1"));
        store.save(session("s2"));
        store.save(session("s3"));

        assert!(store.get("s1").is_none());
        assert!(store.get("s2").is_some());
        assert!(store.get("s3").is_some());

        // Re-saving s2 moves it to the back, so s3 is now the oldest.
        store.save(session("s2"));
        store.save(session("s4"));

        assert!(store.get("s3").is_none());
        assert!(store.get("s2").is_some());
        assert!(store.get("s4").is_some());
    }

    #[test]
    fn test_get_does_not_promote() {
        let store = SessionStore::with_capacity(2);
        store.save(session("a"));
        store.save(session("b"));

        // Reading `a` must not save it from eviction.
        assert!(store.get("a").is_some());
        store.save(session("c"));

        assert!(store.get("a").is_none());
        assert!(store.get("b").is_some());
        assert!(store.get("c").is_some());
    }

    #[test]
    fn test_clear_removes_everything() {
        let store = SessionStore::with_capacity(2);
        store.save(session("s1"));
        store.save(session("s2"));
        store.clear();

        assert!(store.is_empty());
        assert!(store.get("s1").is_none());

        // The order list must be reset too, or a later save would try to
        // evict an id that no longer exists.
        store.save(session("s3"));
        assert_eq!(store.len(), 1);
        assert!(store.get("s3").is_some());
    }
}
