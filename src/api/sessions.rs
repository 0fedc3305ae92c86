//! JSON API over viewer sessions

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::api::{response::ApiError, AppState};
use crate::error::{AppError, AppResult};
use crate::session::{RefreshOutcome, SessionView};

/// Create a session and run its startup query
#[utoipa::path(
    post,
    path = "/api/sessions",
    tag = "sessions",
    responses(
        (status = 200, description = "New session with its initial pod list", body = SessionView),
    )
)]
pub async fn create(State(state): State<AppState>) -> Json<SessionView> {
    let session = state.sessions.create().await;
    Json(session.view().await)
}

/// Current display state of a session
#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session state", body = SessionView),
        (status = 404, description = "Unknown or expired session", body = ApiError),
    )
)]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session not found: {}", id)))?;

    Ok(Json(session.view().await))
}

/// Re-run the pod query for a session
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/refresh",
    tag = "sessions",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Refreshed session state", body = SessionView),
        (status = 404, description = "Unknown or expired session", body = ApiError),
        (status = 409, description = "A refresh is already running", body = ApiError),
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionView>> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session not found: {}", id)))?;

    match session.refresh().await {
        RefreshOutcome::Busy => Err(AppError::RefreshInProgress(format!(
            "A refresh is already running for session {}",
            id
        ))),
        outcome => {
            info!(session = %id, ?outcome, "Session refreshed");
            Ok(Json(session.view().await))
        }
    }
}
