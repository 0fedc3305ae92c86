use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::Pod;
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::ToSchema;

use crate::error::QueryError;

/// The slice of a pod the viewer displays
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct PodSummary {
    pub name: String,
    pub namespace: String,
    /// Empty until the pod has been assigned an address
    #[serde(default)]
    pub ip: String,
}

impl PodSummary {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        ip: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ip: ip.into(),
        }
    }

    pub fn has_ip(&self) -> bool {
        !self.ip.is_empty()
    }
}

impl From<&Pod> for PodSummary {
    fn from(pod: &Pod) -> Self {
        Self {
            name: pod.metadata.name.clone().unwrap_or_default(),
            namespace: pod.metadata.namespace.clone().unwrap_or_default(),
            ip: pod
                .status
                .as_ref()
                .and_then(|s| s.pod_ip.clone())
                .unwrap_or_default(),
        }
    }
}

/// Outcome of one pod listing. Always replaces the previous one.
pub type QueryResult = Result<Vec<PodSummary>, QueryError>;

/// Severity of a notification line
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient message about the last operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

/// Outcome of loading in-cluster credentials, fixed for the process lifetime
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct ConfigStatus {
    pub loaded: bool,
    pub message: String,
}

impl ConfigStatus {
    pub fn loaded() -> Self {
        Self {
            loaded: true,
            message: "Kubernetes in-cluster config loaded successfully.".to_string(),
        }
    }

    pub fn failed(cause: impl std::fmt::Display) -> Self {
        Self {
            loaded: false,
            message: format!("Error loading Kubernetes in-cluster config: {}", cause),
        }
    }
}

/// Which event caused a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Startup,
    Refresh,
}

/// Per-session display state
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DisplayState {
    pub pods: Vec<PodSummary>,
    pub notification: Option<Notification>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl DisplayState {
    /// Replace the pod list with `result`. A failure clears the list and
    /// pairs the clearing with an error notification.
    pub fn apply(&mut self, trigger: Trigger, result: QueryResult) {
        match result {
            Ok(pods) => {
                let message = match trigger {
                    Trigger::Startup => format!("Listed {} pods on startup.", pods.len()),
                    Trigger::Refresh => "Pods refreshed successfully!".to_string(),
                };
                self.pods = pods;
                self.notification = Some(Notification::success(message));
            }
            Err(e) => {
                let prefix = match trigger {
                    Trigger::Startup => "Error fetching pods on startup",
                    Trigger::Refresh => "Error refreshing pods",
                };
                self.pods.clear();
                self.notification = Some(Notification::error(format!("{}: {}", prefix, e)));
            }
        }
        self.refreshed_at = Some(Utc::now());
    }

    /// Refresh requested without loaded credentials
    pub fn reject_unconfigured(&mut self) {
        self.pods.clear();
        self.notification = Some(Notification::error(
            "Cannot refresh pods: Kubernetes config is not loaded.",
        ));
    }
}
