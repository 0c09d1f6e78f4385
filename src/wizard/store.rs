use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::SessionContext;

struct SessionEntry {
    context: SessionContext,
    last_seen: Instant,
}

impl SessionEntry {
    fn new(now: Instant) -> Self {
        SessionEntry {
            context: SessionContext::default(),
            last_seen: now,
        }
    }
}

/// Process-wide map of wizard sessions keyed by the session cookie.
///
/// Sessions idle for longer than `ttl` are dropped, and once `capacity` is
/// reached the least recently seen session makes room for a new one.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
    capacity: usize,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        SessionStore {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            capacity: capacity.max(1),
            ttl,
        }
    }

    /// Reuses a known session id or starts a fresh context. The flag is
    /// `true` when a new session was created.
    pub fn resolve(&self, requested: Option<Uuid>) -> (Uuid, bool) {
        self.resolve_at(requested, Instant::now())
    }

    fn resolve_at(&self, requested: Option<Uuid>, now: Instant) -> (Uuid, bool) {
        let mut sessions = self.sessions.lock();

        let before = sessions.len();
        sessions.retain(|_, entry| now.saturating_duration_since(entry.last_seen) < self.ttl);
        if sessions.len() < before {
            debug!("Expired {} idle wizard sessions", before - sessions.len());
        }

        if let Some(id) = requested {
            if let Some(entry) = sessions.get_mut(&id) {
                entry.last_seen = now;
                return (id, false);
            }
        }

        while sessions.len() >= self.capacity {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| *id);
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                    debug!("Evicted wizard session {} to stay within capacity", id);
                }
                None => break,
            }
        }

        let id = Uuid::new_v4();
        sessions.insert(id, SessionEntry::new(now));
        debug!("Created wizard session {}", id);
        (id, true)
    }

    pub fn snapshot(&self, id: Uuid) -> SessionContext {
        self.sessions
            .lock()
            .get(&id)
            .map(|entry| entry.context.clone())
            .unwrap_or_default()
    }

    pub fn update<R>(&self, id: Uuid, apply: impl FnOnce(&mut SessionContext) -> R) -> R {
        let now = Instant::now();
        let mut sessions = self.sessions.lock();
        let entry = sessions.entry(id).or_insert_with(|| SessionEntry::new(now));
        entry.last_seen = now;
        apply(&mut entry.context)
    }

    pub fn restart(&self, id: Uuid) {
        if let Some(entry) = self.sessions.lock().get_mut(&id) {
            entry.context = SessionContext::default();
            entry.last_seen = Instant::now();
            debug!("Restarted wizard session {}", id);
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }
}
