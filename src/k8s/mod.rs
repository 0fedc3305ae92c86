//! Kubernetes integration for the pod viewer
//!
//! - Loading in-cluster service account credentials
//! - Listing pods across all namespaces, following continue tokens

mod client;
mod credentials;

pub use client::{collect_pages, KubePodLister, PodLister, PodPage};
#[cfg(test)]
pub use client::MockPodLister;
pub use credentials::{load_credentials, ClusterEndpoint};
