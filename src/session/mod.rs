//! Server-side session store.
//!
//! The browser cookie carries only an opaque session id; the OAuth tokens
//! stay in this in-memory map. Sessions live for one hour and are swept by a
//! background task.

pub mod cookie;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::oauth::TokenBundle;

/// Session lifetime, matching the cookie's `Max-Age`.
pub const SESSION_TTL_SECS: i64 = 60 * 60;

/// Interval between expiry sweeps.
const SWEEP_INTERVAL_SECS: u64 = 60;

/// One connected browser session.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub tokens: Arc<TokenBundle>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// In-memory session map keyed by session id.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    ttl: Duration,
}

impl SessionStore {
    /// Create a store with the default one-hour lifetime.
    pub fn new() -> Arc<Self> {
        Self::with_ttl(Duration::seconds(SESSION_TTL_SECS))
    }

    pub fn with_ttl(ttl: Duration) -> Arc<Self> {
        Arc::new(Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        })
    }

    /// Store tokens under a fresh session id.
    pub async fn create(&self, tokens: TokenBundle) -> Session {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            tokens: Arc::new(tokens),
            created_at: now,
            expires_at: now + self.ttl,
        };

        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());

        info!(session_id = %session.id, "Session created");
        session
    }

    /// Look up a live session. Expired sessions are treated as absent.
    pub async fn get(&self, id: Uuid) -> Option<Session> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&id)
            .filter(|s| !s.is_expired(Utc::now()))
            .cloned()
    }

    /// Swap in refreshed tokens. The session's own expiry is unchanged.
    pub async fn update_tokens(&self, id: Uuid, tokens: TokenBundle) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id)?;
        session.tokens = Arc::new(tokens);
        debug!(session_id = %id, "Session tokens updated");
        Some(session.clone())
    }

    /// Invalidate a session. Returns whether it existed.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!(session_id = %id, "Session removed");
        }
        removed
    }

    /// Drop every expired session. Returns how many were removed.
    pub async fn expire_old(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now));
        let expired = before - sessions.len();
        if expired > 0 {
            info!(count = expired, "Expired sessions swept");
        }
        expired
    }

}

#[cfg(test)]
impl SessionStore {
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Spawn a background task that sweeps expired sessions every minute.
pub fn spawn_expiry_task(store: Arc<SessionStore>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(tokio::time::Duration::from_secs(SWEEP_INTERVAL_SECS));
        loop {
            interval.tick().await;
            store.expire_old().await;
        }
    })
}
