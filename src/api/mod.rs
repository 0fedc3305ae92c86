pub mod health;
pub mod metrics;
pub mod openapi;
pub mod pages;
pub mod response;
pub mod sessions;

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::Config;
use crate::session::{Cluster, SessionStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: Config, cluster: Cluster) -> Self {
        Self {
            config,
            sessions: SessionStore::new(Arc::new(cluster)),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn cluster(&self) -> &Cluster {
        self.sessions.cluster()
    }
}
