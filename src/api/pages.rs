//! Browser-facing pages
//!
//! Plain request/response: opening `/` starts a session and redirects to its
//! page; the refresh button posts back and redirects again.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::debug;
use uuid::Uuid;

use crate::api::AppState;
use crate::ui::render_page;

/// Start a new session and send the browser to it
pub async fn index(State(state): State<AppState>) -> Redirect {
    let session = state.sessions.create().await;
    Redirect::to(&format!("/sessions/{}", session.id()))
}

/// Render a session. Unknown or expired sessions start over.
pub async fn show(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.sessions.get(id).await {
        Some(session) => Html(render_page(&session.view().await)).into_response(),
        None => {
            debug!(session = %id, "Unknown session, starting a new one");
            Redirect::to("/").into_response()
        }
    }
}

/// Refresh button. A refresh already in flight makes this a no-op.
pub async fn refresh(State(state): State<AppState>, Path(id): Path<Uuid>) -> Redirect {
    match state.sessions.get(id).await {
        Some(session) => {
            session.refresh().await;
            Redirect::to(&format!("/sessions/{}", id))
        }
        None => Redirect::to("/"),
    }
}
