//! Error types for the pod viewer
//!
//! - `ConfigError`: in-cluster credentials could not be loaded at startup
//! - `QueryError`: a pod listing call failed
//! - `AppError`: failures surfaced by HTTP handlers

use std::path::PathBuf;
use std::time::Duration;

use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::api::response::ApiResponse;

/// Credential material missing, unreadable or malformed
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("in-cluster config unavailable: {0}")]
    InCluster(#[from] kube::config::InClusterError),

    #[error("no service account token file configured")]
    NoTokenFile,

    #[error("failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("service account token {} is empty", .0.display())]
    EmptyToken(PathBuf),

    #[error("CA bundle contains no certificates")]
    NoCaCerts,

    #[error("failed to build Kubernetes client: {0}")]
    Client(String),
}

/// A pod listing call failed
#[derive(Debug, Clone, Error, PartialEq)]
pub enum QueryError {
    #[error("API server rejected the request ({code}): {message}")]
    Rejected { code: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("pagination error: {0}")]
    Pagination(String),
}

impl From<kube::Error> for QueryError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(resp) => QueryError::Rejected {
                code: resp.code,
                message: resp.message,
            },
            kube::Error::SerdeError(e) => QueryError::Decode(e.to_string()),
            other => QueryError::Transport(other.to_string()),
        }
    }
}

/// Errors returned from HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    RefreshInProgress(String),
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::RefreshInProgress(_) => "REFRESH_IN_PROGRESS",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        ApiResponse::error(self.code(), self.to_string()).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
