//! In-memory session store
//!
//! Keyed by the session cookie's UUID. Each entry hands out an
//! `Arc<Mutex<InterviewSession>>` so one chat turn holds the session for
//! its whole read-modify-write cycle and concurrent tabs serialize instead
//! of racing. Sessions expire after an idle TTL; nothing survives a
//! process restart.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::core::session::InterviewSession;

struct SessionSlot {
    session: Arc<Mutex<InterviewSession>>,
    last_active: Instant,
}

/// Process-memory session registry with TTL expiry
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, SessionSlot>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Fetch a live session, refreshing its idle clock
    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<InterviewSession>>> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&id) {
            Some(slot) if slot.last_active.elapsed() <= self.ttl => {
                slot.last_active = Instant::now();
                Some(Arc::clone(&slot.session))
            }
            Some(_) => {
                sessions.remove(&id);
                None
            }
            None => None,
        }
    }

    /// Fetch a live session or lazily create a fresh one
    pub async fn get_or_create(&self, id: Uuid) -> Arc<Mutex<InterviewSession>> {
        if let Some(session) = self.get(id).await {
            return session;
        }

        let mut sessions = self.sessions.write().await;
        let slot = sessions.entry(id).or_insert_with(|| SessionSlot {
            session: Arc::new(Mutex::new(InterviewSession::new())),
            last_active: Instant::now(),
        });
        slot.last_active = Instant::now();
        Arc::clone(&slot.session)
    }

    /// Drop a session; returns whether one existed
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Drop every expired session; returns how many were removed
    pub async fn sweep_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, slot| slot.last_active.elapsed() <= self.ttl);
        let swept = before - sessions.len();
        if swept > 0 {
            debug!("swept {swept} expired interview sessions");
        }
        swept
    }

    /// Number of live entries (expired-but-unswept included)
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
