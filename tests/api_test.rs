//! Integration tests for the HTTP surface

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tokio::sync::Notify;
use tower::ServiceExt;

use pod_viewer::{
    api::AppState,
    config::Config,
    error::{ConfigError, QueryError},
    k8s::PodLister,
    models::{PodSummary, QueryResult},
    session::Cluster,
};

/// Hands out scripted results in order, repeating the last one
struct ScriptedLister {
    results: Mutex<Vec<QueryResult>>,
    calls: AtomicUsize,
}

impl ScriptedLister {
    fn new(results: Vec<QueryResult>) -> Arc<Self> {
        Arc::new(Self {
            results: Mutex::new(results),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PodLister for ScriptedLister {
    async fn list_pods(&self) -> QueryResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut results = self.results.lock().unwrap();
        if results.len() > 1 {
            results.remove(0)
        } else {
            results[0].clone()
        }
    }
}

/// Answers the startup query at once and holds every later query until released
struct GatedLister {
    calls: AtomicUsize,
    entered: Notify,
    release: Notify,
}

impl GatedLister {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            entered: Notify::new(),
            release: Notify::new(),
        })
    }
}

#[async_trait]
impl PodLister for GatedLister {
    async fn list_pods(&self) -> QueryResult {
        if self.calls.fetch_add(1, Ordering::SeqCst) > 0 {
            self.entered.notify_one();
            self.release.notified().await;
        }
        Ok(two_pods())
    }
}

fn setup_app(cluster: Cluster) -> Router {
    let state = AppState::new(Config::default(), cluster);
    pod_viewer::create_router(state)
}

fn two_pods() -> Vec<PodSummary> {
    vec![
        PodSummary::new("a", "default", "10.0.0.1"),
        PodSummary::new("b", "kube-system", ""),
    ]
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    (status, headers, body)
}

async fn send_json(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = send(app, method, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_app(Cluster::connected(ScriptedLister::new(vec![Ok(vec![])])));
    let (status, json) = send_json(&app, "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_create_session_lists_pods() {
    let lister = ScriptedLister::new(vec![Ok(two_pods())]);
    let app = setup_app(Cluster::connected(lister.clone()));

    let (status, json) = send_json(&app, "POST", "/api/sessions").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(lister.calls(), 1);
    assert_eq!(json["config_status"]["loaded"], true);
    assert_eq!(json["pod_count"], 2);
    assert_eq!(json["pods"][0]["name"], "a");
    assert_eq!(json["pods"][1]["namespace"], "kube-system");
    assert_eq!(json["pods"][1]["ip"], "");
    assert_eq!(json["notification"]["kind"], "success");
}

#[tokio::test]
async fn test_session_page_shows_cards() {
    let app = setup_app(Cluster::connected(ScriptedLister::new(vec![Ok(two_pods())])));

    let (status, headers, _) = send(&app, "GET", "/").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    let location = headers[header::LOCATION].to_str().unwrap().to_string();
    assert!(location.starts_with("/sessions/"));

    let (status, _, body) = send(&app, "GET", &location).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();

    assert_eq!(html.matches("class=\"pod-item\"").count(), 2);
    assert!(html.contains("Pod Name: a"));
    assert!(html.contains("Pod IP: 10.0.0.1"));
    assert!(html.contains("&lt;none&gt;"));
    assert!(html.contains("Kubernetes in-cluster config loaded successfully."));
    assert!(!html.contains("notification error"));
}

#[tokio::test]
async fn test_missing_credentials_never_query() {
    let err = ConfigError::ReadFile {
        path: "/var/run/secrets/kubernetes.io/serviceaccount/token".into(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
    };
    let app = setup_app(Cluster::unavailable(&err));

    let (status, json) = send_json(&app, "GET", "/api/config/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["loaded"], false);
    assert!(json["message"]
        .as_str()
        .unwrap()
        .contains("No such file or directory"));

    let (_, headers, _) = send(&app, "GET", "/").await;
    let location = headers[header::LOCATION].to_str().unwrap().to_string();
    let (_, _, body) = send(&app, "GET", &location).await;
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("Error loading Kubernetes in-cluster config"));
    assert!(html.contains("No pods found or an error occurred."));

    let id = location.trim_start_matches("/sessions/");
    let (status, json) = send_json(&app, "POST", &format!("/api/sessions/{}/refresh", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pod_count"], 0);
    assert_eq!(json["notification"]["kind"], "error");
}

#[tokio::test]
async fn test_refresh_failure_then_success() {
    let lister = ScriptedLister::new(vec![
        Ok(vec![PodSummary::new("before", "default", "10.0.0.1")]),
        Err(QueryError::Rejected {
            code: 401,
            message: "Unauthorized".to_string(),
        }),
        Ok(vec![PodSummary::new("after", "default", "10.0.0.2")]),
    ]);
    let app = setup_app(Cluster::connected(lister.clone()));

    let (_, created) = send_json(&app, "POST", "/api/sessions").await;
    let id = created["id"].as_str().unwrap().to_string();
    let refresh = format!("/api/sessions/{}/refresh", id);

    let (status, failed) = send_json(&app, "POST", &refresh).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(failed["pod_count"], 0);
    assert_eq!(failed["notification"]["kind"], "error");
    assert!(failed["notification"]["message"]
        .as_str()
        .unwrap()
        .contains("Unauthorized"));

    let (_, recovered) = send_json(&app, "POST", &refresh).await;
    assert_eq!(recovered["pod_count"], 1);
    assert_eq!(recovered["pods"][0]["name"], "after");
    assert_eq!(recovered["notification"]["message"], "Pods refreshed successfully!");
    assert_eq!(lister.calls(), 3);
}

#[tokio::test]
async fn test_page_refresh_redirects_back() {
    let lister = ScriptedLister::new(vec![Ok(two_pods())]);
    let app = setup_app(Cluster::connected(lister.clone()));

    let (_, headers, _) = send(&app, "GET", "/").await;
    let location = headers[header::LOCATION].to_str().unwrap().to_string();

    let (status, headers, _) = send(&app, "POST", &format!("{}/refresh", location)).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], location.as_str());
    assert_eq!(lister.calls(), 2);
}

#[tokio::test]
async fn test_unknown_session() {
    let app = setup_app(Cluster::connected(ScriptedLister::new(vec![Ok(vec![])])));
    let id = uuid::Uuid::new_v4();

    let (status, json) = send_json(&app, "GET", &format!("/api/sessions/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "NOT_FOUND");

    let (status, headers, _) = send(&app, "GET", &format!("/sessions/{}", id)).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/");
}

#[tokio::test]
async fn test_sessions_do_not_share_state() {
    let lister = ScriptedLister::new(vec![
        Ok(vec![PodSummary::new("first", "default", "10.0.0.1")]),
        Ok(vec![PodSummary::new("second", "default", "10.0.0.2")]),
    ]);
    let app = setup_app(Cluster::connected(lister));

    let (_, one) = send_json(&app, "POST", "/api/sessions").await;
    let (_, two) = send_json(&app, "POST", "/api/sessions").await;
    assert_ne!(one["id"], two["id"]);

    let one_id = one["id"].as_str().unwrap();
    let (_, one_now) = send_json(&app, "GET", &format!("/api/sessions/{}", one_id)).await;
    assert_eq!(one_now["pods"][0]["name"], "first");
    assert_eq!(two["pods"][0]["name"], "second");
}

#[tokio::test]
async fn test_overlapping_refresh_conflicts() {
    let lister = GatedLister::new();
    let app = setup_app(Cluster::connected(lister.clone()));

    let (_, created) = send_json(&app, "POST", "/api/sessions").await;
    let refresh = format!("/api/sessions/{}/refresh", created["id"].as_str().unwrap());

    let first = tokio::spawn({
        let app = app.clone();
        let refresh = refresh.clone();
        async move { send_json(&app, "POST", &refresh).await }
    });
    lister.entered.notified().await;

    let (status, json) = send_json(&app, "POST", &refresh).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "REFRESH_IN_PROGRESS");

    lister.release.notify_one();
    let (status, json) = first.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pod_count"], 2);
    assert_eq!(json["notification"]["message"], "Pods refreshed successfully!");
    assert_eq!(lister.calls.load(Ordering::SeqCst), 2);
}
