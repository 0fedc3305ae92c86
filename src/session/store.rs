use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::{Cluster, Session};

/// In-memory registry of live sessions
#[derive(Clone)]
pub struct SessionStore {
    cluster: Arc<Cluster>,
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Session>>>>,
}

impl SessionStore {
    pub fn new(cluster: Arc<Cluster>) -> Self {
        Self {
            cluster,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn cluster(&self) -> &Arc<Cluster> {
        &self.cluster
    }

    /// Start a new session (runs its startup query) and register it
    pub async fn create(&self) -> Arc<Session> {
        let session = Arc::new(Session::start(self.cluster.clone()).await);
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.id(), session.clone());
        metrics::gauge!("podviewer_sessions_active", sessions.len() as f64);
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Session>> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop sessions idle for longer than `ttl`. Returns how many were removed.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.idle_for() <= ttl);
        let evicted = before - sessions.len();
        metrics::gauge!("podviewer_sessions_active", sessions.len() as f64);
        if evicted > 0 {
            info!(evicted, remaining = sessions.len(), "Evicted idle sessions");
        }
        evicted
    }

    /// Periodically evict idle sessions. Runs until the task is dropped.
    pub async fn run_sweeper(self, ttl: Duration, interval: Duration) {
        info!(ttl_secs = ttl.as_secs(), "Session sweeper started");
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            self.evict_idle(ttl).await;
        }
    }
}
