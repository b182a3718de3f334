//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use backend::inbound::http::state::UploadSettings;
use backend::inbound::http::token_config::TokenSettings;
use backend::outbound::persistence::DbPool;
use url::Url;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Where and how to reach the document builder.
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    pub(crate) base_url: Url,
    pub(crate) timeout: Duration,
}

impl BuilderConfig {
    #[must_use]
    pub fn new(base_url: Url, timeout: Duration) -> Self {
        Self { base_url, timeout }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) tokens: TokenSettings,
    pub(crate) builder: BuilderConfig,
    pub(crate) uploads: UploadSettings,
    pub(crate) cors_origins: Vec<String>,
    pub(crate) db_pool: Option<DbPool>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration; persistence defaults to in-memory
    /// stores until a pool is attached.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        tokens: TokenSettings,
        builder: BuilderConfig,
        uploads: UploadSettings,
    ) -> Self {
        Self {
            bind_addr,
            tokens,
            builder,
            uploads,
            cors_origins: Vec::new(),
            db_pool: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Browser origins allowed to call the API.
    #[must_use]
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
