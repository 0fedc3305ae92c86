//! In-cluster service account credentials
//!
//! `kube::Config::incluster` reads the API server address from
//! `KUBERNETES_SERVICE_HOST`/`KUBERNETES_SERVICE_PORT` and the CA bundle and
//! namespace from the service account mount. It only records where the token
//! lives, so the token file is checked here. Nothing touches the network.

use std::path::{Path, PathBuf};
use std::time::Duration;

use kube::Config;
use tracing::{debug, instrument};

use crate::error::ConfigError;

/// API server address, trust roots and token location, checked once at startup
#[derive(Debug, Clone)]
pub struct ClusterEndpoint {
    config: Config,
    token_file: PathBuf,
}

impl ClusterEndpoint {
    /// Accept `config` once it has trust roots and a readable, non-empty token file
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let token_file = config
            .auth_info
            .token_file
            .as_deref()
            .map(PathBuf::from)
            .ok_or(ConfigError::NoTokenFile)?;
        check_token(&token_file)?;

        if config.root_cert.as_ref().map_or(true, Vec::is_empty) {
            return Err(ConfigError::NoCaCerts);
        }

        Ok(Self { config, token_file })
    }

    pub fn base_url(&self) -> String {
        self.config.cluster_url.to_string()
    }

    pub fn namespace(&self) -> &str {
        &self.config.default_namespace
    }

    pub fn token_file(&self) -> &Path {
        &self.token_file
    }

    pub fn ca_cert_count(&self) -> usize {
        self.config.root_cert.as_ref().map_or(0, Vec::len)
    }

    /// Client config bounded by `read_timeout`. kube re-reads the token file
    /// on its own, so rotated projected tokens keep working.
    pub fn client_config(&self, read_timeout: Duration) -> Config {
        let mut config = self.config.clone();
        config.read_timeout = Some(read_timeout);
        config
    }
}

/// Load credentials from the ambient environment and the default mount
#[instrument]
pub fn load_credentials() -> Result<ClusterEndpoint, ConfigError> {
    let endpoint = ClusterEndpoint::from_config(Config::incluster()?)?;
    debug!(
        url = %endpoint.base_url(),
        namespace = endpoint.namespace(),
        certs = endpoint.ca_cert_count(),
        "Loaded service account credentials"
    );
    Ok(endpoint)
}

fn check_token(path: &Path) -> Result<(), ConfigError> {
    let token = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    if token.trim().is_empty() {
        return Err(ConfigError::EmptyToken(path.to_path_buf()));
    }
    Ok(())
}
