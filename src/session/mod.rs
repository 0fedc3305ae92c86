//! Per-session display state
//!
//! Each browser session owns a `DisplayState` that only the startup and
//! refresh triggers mutate. The cluster connection is shared read-only.

mod store;

pub use store::SessionStore;

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ConfigError;
use crate::k8s::PodLister;
use crate::models::{ConfigStatus, DisplayState, Notification, PodSummary, QueryResult, Trigger};

/// Outcome of the startup credential load, shared by every session
pub struct Cluster {
    status: ConfigStatus,
    lister: Option<Arc<dyn PodLister>>,
}

impl Cluster {
    pub fn connected(lister: Arc<dyn PodLister>) -> Self {
        Self {
            status: ConfigStatus::loaded(),
            lister: Some(lister),
        }
    }

    pub fn unavailable(err: &ConfigError) -> Self {
        Self {
            status: ConfigStatus::failed(err),
            lister: None,
        }
    }

    pub fn status(&self) -> &ConfigStatus {
        &self.status
    }

    /// Run one pod listing. `None` when credentials never loaded.
    pub async fn query(&self) -> Option<QueryResult> {
        let lister = self.lister.as_ref()?;

        let started = Instant::now();
        let result = lister.list_pods().await;
        let outcome = if result.is_ok() { "success" } else { "error" };
        metrics::increment_counter!("podviewer_pod_queries_total", "outcome" => outcome);
        metrics::histogram!(
            "podviewer_pod_query_duration_seconds",
            started.elapsed().as_secs_f64()
        );

        Some(result)
    }
}

/// Result of a refresh request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The query ran and its result replaced the display state
    Applied,
    /// Another refresh for this session is in flight; state untouched
    Busy,
    /// Credentials are not loaded; no query was attempted
    Unconfigured,
}

/// Everything a renderer needs, captured at one instant
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct SessionView {
    pub id: Uuid,
    pub config_status: ConfigStatus,
    pub notification: Option<Notification>,
    pub pods: Vec<PodSummary>,
    pub pod_count: usize,
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// One viewer session
pub struct Session {
    id: Uuid,
    cluster: Arc<Cluster>,
    state: RwLock<DisplayState>,
    in_flight: Mutex<()>,
    last_seen: std::sync::Mutex<Instant>,
}

impl Session {
    fn new(cluster: Arc<Cluster>) -> Self {
        Self {
            id: Uuid::new_v4(),
            cluster,
            state: RwLock::new(DisplayState::default()),
            in_flight: Mutex::new(()),
            last_seen: std::sync::Mutex::new(Instant::now()),
        }
    }

    /// Create a session and run its startup query
    #[instrument(skip_all)]
    pub async fn start(cluster: Arc<Cluster>) -> Self {
        let session = Self::new(cluster);
        // Not yet visible to any other caller, so no single-flight gate here
        match session.cluster.query().await {
            Some(result) => session.state.write().await.apply(Trigger::Startup, result),
            None => debug!(session = %session.id, "Credentials not loaded, skipping startup query"),
        }
        info!(session = %session.id, "Session started");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Re-run the pod query and replace the display state with its result.
    /// Rejected while another refresh for this session is running.
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn refresh(&self) -> RefreshOutcome {
        self.touch();

        let Ok(_guard) = self.in_flight.try_lock() else {
            debug!("Refresh already in flight, ignoring");
            return RefreshOutcome::Busy;
        };

        match self.cluster.query().await {
            Some(result) => {
                self.state.write().await.apply(Trigger::Refresh, result);
                RefreshOutcome::Applied
            }
            None => {
                self.state.write().await.reject_unconfigured();
                RefreshOutcome::Unconfigured
            }
        }
    }

    pub async fn view(&self) -> SessionView {
        self.touch();
        let state = self.state.read().await;
        SessionView {
            id: self.id,
            config_status: self.cluster.status().clone(),
            notification: state.notification.clone(),
            pods: state.pods.clone(),
            pod_count: state.pods.len(),
            refreshed_at: state.refreshed_at,
        }
    }

    pub(crate) fn idle_for(&self) -> std::time::Duration {
        self.last_seen
            .lock()
            .map(|seen| seen.elapsed())
            .unwrap_or_default()
    }

    fn touch(&self) {
        if let Ok(mut seen) = self.last_seen.lock() {
            *seen = Instant::now();
        }
    }
}
