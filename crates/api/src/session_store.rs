//! In-memory booking sessions with idle expiry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

use bookvisit_core::session::VisitSessionData;
use bookvisit_core::slots::VisitSlot;
use bookvisit_core::visitor::VisitorListItem;

/// How often expired sessions are swept.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Everything kept between wizard requests for one booking.
#[derive(Debug, Clone)]
pub struct BookingSession {
    pub data: VisitSessionData,
    /// The prisoner's full visitor list, loaded when the session started.
    pub visitor_list: Vec<VisitorListItem>,
    /// Slots shown by the most recent date/time page. Slot choices are
    /// only accepted from this list.
    pub slot_listing: Vec<VisitSlot>,
    last_touched: Instant,
}

impl BookingSession {
    pub fn new(data: VisitSessionData, visitor_list: Vec<VisitorListItem>) -> Self {
        Self {
            data,
            visitor_list,
            slot_listing: Vec::new(),
            last_touched: Instant::now(),
        }
    }
}

/// Booking sessions keyed by id.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application. Handlers work on a copy and write it back
/// with [`SessionStore::save`], so no lock is held across upstream calls.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, BookingSession>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Start a session and return its id.
    pub async fn create(&self, session: BookingSession) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.write().await.insert(id, session);
        id
    }

    /// A copy of the session, refreshing its idle timer. Expired sessions
    /// are dropped and reported as missing.
    pub async fn load(&self, id: Uuid) -> Option<BookingSession> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id)?;
        if session.last_touched.elapsed() >= self.ttl {
            sessions.remove(&id);
            return None;
        }
        session.last_touched = Instant::now();
        Some(session.clone())
    }

    pub async fn save(&self, id: Uuid, mut session: BookingSession) {
        session.last_touched = Instant::now();
        self.sessions.write().await.insert(id, session);
    }

    pub async fn remove(&self, id: Uuid) -> Option<BookingSession> {
        self.sessions.write().await.remove(&id)
    }

    /// Drop every session idle for longer than the TTL.
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.last_touched.elapsed() < self.ttl);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Spawn the periodic expiry sweep.
pub fn start_sweeper(store: Arc<SessionStore>, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);

        loop {
            interval.tick().await;
            let purged = store.purge_expired().await;
            if purged > 0 {
                tracing::info!(purged, "Expired booking sessions removed");
            } else {
                tracing::debug!("Session sweep: nothing to remove");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> BookingSession {
        BookingSession::new(VisitSessionData::default(), Vec::new())
    }

    #[tokio::test]
    async fn save_and_load() {
        let store = SessionStore::new(Duration::from_secs(60));
        let id = store.create(session()).await;

        let mut loaded = store.load(id).await.unwrap();
        loaded.data.visit_reference = Some("ab-cd-ef-gh".into());
        store.save(id, loaded).await;

        let reloaded = store.load(id).await.unwrap();
        assert_eq!(reloaded.data.visit_reference.as_deref(), Some("ab-cd-ef-gh"));
    }

    #[tokio::test]
    async fn unknown_id_is_missing() {
        let store = SessionStore::new(Duration::from_secs(60));
        assert!(store.load(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn idle_sessions_expire() {
        let store = SessionStore::new(Duration::from_millis(5));
        let id = store.create(session()).await;
        store.create(session()).await;

        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(store.load(id).await.is_none());
        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn remove_ends_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        let id = store.create(session()).await;
        assert!(store.remove(id).await.is_some());
        assert_eq!(store.len().await, 0);
    }
}
