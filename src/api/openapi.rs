//! OpenAPI documentation for the pod viewer JSON API

use utoipa::OpenApi;

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pod Viewer API",
        version = "1.0.0",
        description = "Lists every pod in the cluster the service runs in.\n\nEach session keeps its own pod list; refreshing replaces it wholesale.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    tags(
        (name = "sessions", description = "Viewer sessions - create, read, refresh"),
        (name = "cluster", description = "Service health and credential status")
    ),
    paths(
        crate::api::sessions::create,
        crate::api::sessions::get,
        crate::api::sessions::refresh,
        crate::api::health::health_check,
        crate::api::health::config_status,
    ),
    components(
        schemas(
            crate::session::SessionView,
            crate::models::PodSummary,
            crate::models::Notification,
            crate::models::NotificationKind,
            crate::models::ConfigStatus,
            crate::api::health::HealthResponse,
            crate::api::response::ApiError,
        )
    )
)]
pub struct ApiDoc;

/// Pretty-printed OpenAPI document, as served under `/api-docs/openapi.json`
pub fn document() -> Result<String, serde_json::Error> {
    ApiDoc::openapi().to_pretty_json()
}
