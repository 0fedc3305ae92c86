use std::time::Duration;

use anyhow::{ensure, Result};
use serde::Deserialize;

/// Service settings. Every field has a default; `PODVIEWER_*` environment
/// variables (or a `.env` file) override them.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Pods requested per list page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,

    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    #[serde(default)]
    pub log_json: bool,

    /// Comma separated list of origins allowed to call the JSON API
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: String,
}

fn default_port() -> u16 {
    8080
}

fn default_page_size() -> u32 {
    500
}

fn default_query_timeout_secs() -> u64 {
    30
}

fn default_session_ttl_secs() -> u64 {
    30 * 60
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_cors_allowed_origins() -> String {
    "http://localhost:8080,http://127.0.0.1:8080".to_string()
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("PODVIEWER").try_parsing(true))
            .build()?;

        let settings: Config = config.try_deserialize()?;
        settings.validate()?;

        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.page_size > 0, "page_size must be greater than zero");
        ensure!(
            self.query_timeout_secs > 0,
            "query_timeout_secs must be greater than zero"
        );
        ensure!(
            self.session_ttl_secs > 0,
            "session_ttl_secs must be greater than zero"
        );
        // tokio::time::interval panics on a zero period
        ensure!(
            self.sweep_interval_secs > 0,
            "sweep_interval_secs must be greater than zero"
        );
        Ok(())
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            page_size: default_page_size(),
            query_timeout_secs: default_query_timeout_secs(),
            session_ttl_secs: default_session_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            log_json: false,
            cors_allowed_origins: default_cors_allowed_origins(),
        }
    }
}
