//! Pod Viewer
//!
//! Lists every pod in the cluster the service runs in and renders them in a
//! browser page with a manual refresh button.

pub mod api;
pub mod config;
pub mod error;
pub mod k8s;
pub mod models;
pub mod session;
pub mod ui;

use axum::http::{header, Method};
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::openapi::ApiDoc;
use crate::api::AppState;

/// Create the application router with the given state
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_allowed_origins);

    Router::new()
        // Browser pages
        .route("/", get(api::pages::index))
        .route("/sessions/:id", get(api::pages::show))
        .route("/sessions/:id/refresh", post(api::pages::refresh))
        // JSON API
        .route("/api/sessions", post(api::sessions::create))
        .route("/api/sessions/:id", get(api::sessions::get))
        .route("/api/sessions/:id/refresh", post(api::sessions::refresh))
        .route("/api/config/status", get(api::health::config_status))
        // Health and metrics
        .route("/health", get(api::health::health_check))
        .route("/metrics", get(api::metrics::metrics_handler))
        // OpenAPI / Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// CORS for the JSON API, restricted to the configured origins
fn cors_layer(allowed_origins: &str) -> CorsLayer {
    let origins: Vec<_> = allowed_origins
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}
