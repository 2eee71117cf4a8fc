use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::clock::Clock;
use crate::config::Config;
use crate::db::DbPool;

/// A bearer token issued at login.
#[derive(Clone, Debug)]
pub struct Session {
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

/// Server-side session store, keyed by token.
pub type SessionStore = Arc<Mutex<HashMap<String, Session>>>;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub clock: Arc<dyn Clock>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(db: DbPool, config: Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            clock,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Register a new session for `user_id` and return its token.
    pub fn open_session(&self, user_id: i64, token: String) -> Session {
        let session = Session {
            user_id,
            expires_at: self.clock.now() + self.config.session_ttl(),
        };
        let now = self.clock.now();
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(token, session.clone());
        session
    }

    /// The user behind `token`, if the session exists and has not expired.
    /// Expired sessions are dropped on lookup.
    pub fn session_user(&self, token: &str) -> Option<i64> {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        match sessions.get(token) {
            Some(session) if session.expires_at > now => Some(session.user_id),
            Some(_) => {
                sessions.remove(token);
                None
            }
            None => None,
        }
    }

    pub fn close_session(&self, token: &str) -> bool {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(token)
            .is_some()
    }
}
