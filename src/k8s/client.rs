//! Read-only pod listing against the cluster API server

use std::collections::HashSet;
use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::{
    api::{Api, ListParams},
    Client,
};
use tracing::{debug, info, instrument, warn};

use crate::error::{ConfigError, QueryError};
use crate::k8s::ClusterEndpoint;
use crate::models::{PodSummary, QueryResult};

/// Source of pod listings
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PodLister: Send + Sync {
    /// List every pod visible across all namespaces
    async fn list_pods(&self) -> QueryResult;
}

/// One page of a pod listing
#[derive(Debug, Clone, Default)]
pub struct PodPage {
    pub pods: Vec<PodSummary>,
    pub continue_token: Option<String>,
}

/// Fetch pages until the server stops handing out continue tokens.
///
/// `fetch` receives the token of the previous page (`None` for the first).
/// Pods already seen under the same `(namespace, name)` are dropped.
pub async fn collect_pages<F, Fut>(mut fetch: F) -> QueryResult
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<PodPage, QueryError>>,
{
    let mut pods = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut token: Option<String> = None;

    for page_num in 1.. {
        let page = fetch(token.clone()).await?;
        debug!(page = page_num, count = page.pods.len(), "Fetched pod page");

        for pod in page.pods {
            if seen.insert((pod.namespace.clone(), pod.name.clone())) {
                pods.push(pod);
            } else {
                warn!(
                    namespace = %pod.namespace,
                    name = %pod.name,
                    "Duplicate pod across pages, skipping"
                );
            }
        }

        match page.continue_token.filter(|t| !t.is_empty()) {
            Some(next) if token.as_deref() == Some(next.as_str()) => {
                return Err(QueryError::Pagination(format!(
                    "server repeated continue token after page {}",
                    page_num
                )));
            }
            Some(next) => token = Some(next),
            None => break,
        }
    }

    Ok(pods)
}

/// Lists pods through the Kubernetes API with the service account credentials
#[derive(Clone)]
pub struct KubePodLister {
    client: Client,
    page_size: u32,
    timeout: Duration,
}

impl KubePodLister {
    /// Build a client for `endpoint`. No request is sent.
    pub fn new(
        endpoint: &ClusterEndpoint,
        page_size: u32,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let client = Client::try_from(endpoint.client_config(timeout))
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        info!(
            url = %endpoint.base_url(),
            page_size,
            timeout_secs = timeout.as_secs(),
            "Kubernetes client ready"
        );

        Ok(Self::with_client(client, page_size, timeout))
    }

    pub fn with_client(client: Client, page_size: u32, timeout: Duration) -> Self {
        Self {
            client,
            page_size,
            timeout,
        }
    }

    async fn fetch_page(
        api: Api<Pod>,
        page_size: u32,
        token: Option<String>,
    ) -> Result<PodPage, QueryError> {
        let mut lp = ListParams::default().limit(page_size);
        if let Some(token) = &token {
            lp = lp.continue_token(token);
        }

        let list = api.list(&lp).await?;
        Ok(PodPage {
            continue_token: list.metadata.continue_.clone(),
            pods: list.items.iter().map(PodSummary::from).collect(),
        })
    }
}

#[async_trait]
impl PodLister for KubePodLister {
    #[instrument(skip(self))]
    async fn list_pods(&self) -> QueryResult {
        let api: Api<Pod> = Api::all(self.client.clone());
        let page_size = self.page_size;
        let started = Instant::now();

        let listing = collect_pages(|token| Self::fetch_page(api.clone(), page_size, token));
        let result = match tokio::time::timeout(self.timeout, listing).await {
            Ok(result) => result,
            Err(_) => Err(QueryError::Timeout(self.timeout)),
        };

        match &result {
            Ok(pods) => info!(
                count = pods.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Listed pods"
            ),
            Err(e) => warn!(error = %e, "Pod listing failed"),
        }

        result
    }
}
