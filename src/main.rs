use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pod_viewer::{
    api::AppState,
    config::Config,
    create_router,
    k8s::{load_credentials, KubePodLister},
    session::Cluster,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first so the log format can follow it
    let config = Config::load()?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Pod Viewer");

    let metrics = PrometheusBuilder::new().install_recorder()?;

    // Credentials are checked once; a failure keeps the UI up with the error shown
    let cluster = match load_credentials().and_then(|endpoint| {
        KubePodLister::new(&endpoint, config.page_size, config.query_timeout())
    }) {
        Ok(lister) => {
            tracing::info!("Kubernetes in-cluster config loaded");
            Cluster::connected(Arc::new(lister))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load Kubernetes in-cluster config");
            Cluster::unavailable(&e)
        }
    };

    let state = AppState::new(config.clone(), cluster).with_metrics(metrics);

    tokio::spawn(
        state
            .sessions
            .clone()
            .run_sweeper(config.session_ttl(), config.sweep_interval()),
    );

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
