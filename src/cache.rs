//! Wizard session store backed by a moka cache
//!
//! Wizard sessions live here between requests. Entries expire after a period
//! of inactivity, which drops the draft the same way an explicit abandon does.

use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::booking::BookingSession;

/// Open booking sessions keyed by session id
#[derive(Clone)]
pub struct SessionCache {
    sessions: Cache<Uuid, Arc<BookingSession>>,
}

impl SessionCache {
    pub fn new(capacity: u64, idle: Duration) -> Self {
        Self {
            sessions: Cache::builder()
                .max_capacity(capacity)
                .time_to_idle(idle)
                .build(),
        }
    }

    pub async fn insert(&self, session: Arc<BookingSession>) {
        self.sessions.insert(session.id(), session).await;
    }

    pub async fn get(&self, id: &Uuid) -> Option<Arc<BookingSession>> {
        let hit = self.sessions.get(id).await;
        match hit {
            Some(_) => debug!("Session cache HIT: {}", id),
            None => debug!("Session cache MISS: {}", id),
        }
        hit
    }

    /// Remove a session, returning it if it was present
    pub async fn remove(&self, id: &Uuid) -> Option<Arc<BookingSession>> {
        let removed = self.sessions.remove(id).await;
        if removed.is_some() {
            info!("Session {} removed from cache", id);
        }
        removed
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            sessions: self.sessions.entry_count(),
        }
    }
}

/// Cache statistics for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub sessions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{BookingServices, InMemoryBookingStore, SimulatedGateway};
    use crate::catalog::StaticCatalog;

    fn services() -> BookingServices {
        BookingServices {
            catalog: Arc::new(StaticCatalog::with_fixtures()),
            gateway: Arc::new(SimulatedGateway::new(Duration::ZERO)),
            sink: Arc::new(InMemoryBookingStore::new()),
            payment_timeout: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn test_insert_get_remove() {
        let cache = SessionCache::new(10, Duration::from_secs(60));
        let session = BookingSession::start(&services(), Uuid::new_v4(), "1").unwrap();
        let id = session.id();

        cache.insert(session).await;
        assert_eq!(cache.get(&id).await.map(|s| s.id()), Some(id));

        assert!(cache.remove(&id).await.is_some());
        assert!(cache.get(&id).await.is_none());
        assert!(cache.remove(&id).await.is_none());
    }
}
