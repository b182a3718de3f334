//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `GENDOC_*` environment variables and config
//! files, in that order of precedence. The token signing secret is not part
//! of these settings; see [`crate::inbound::http::token_config`].

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::inbound::http::state::{DEFAULT_UPLOAD_LIMIT_BYTES, UploadSettings};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_BUILDER_URL: &str = "http://localhost:5002";
pub const DEFAULT_BUILDER_TIMEOUT_SECS: u64 = 180;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:5173"];

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind host '{value}': {source}")]
    InvalidHost {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid document builder URL '{value}': {source}")]
    InvalidBuilderUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },
}

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GENDOC")]
pub struct AppSettings {
    /// Interface to bind; defaults to all interfaces.
    pub host: Option<String>,
    /// Port to bind.
    #[ortho_config(default = 3001)]
    pub port: u16,
    /// PostgreSQL connection URL; in-memory stores are used when absent.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub db_pool_size: Option<u32>,
    /// Base URL of the document builder service.
    pub builder_url: Option<String>,
    /// Timeout for builder calls, in seconds.
    #[ortho_config(default = 180)]
    pub builder_timeout_secs: u64,
    /// Directory where uploads are staged during a request.
    pub upload_dir: Option<PathBuf>,
    /// Largest accepted upload, in bytes.
    pub upload_limit_bytes: Option<usize>,
    /// Browser origins allowed by CORS.
    pub cors_origins: Option<Vec<String>>,
}

impl AppSettings {
    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let ip = match self.host.as_deref() {
            Some(host) => host
                .parse::<IpAddr>()
                .map_err(|source| SettingsError::InvalidHost {
                    value: host.to_owned(),
                    source,
                })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Document builder base URL.
    pub fn builder_url(&self) -> Result<Url, SettingsError> {
        let raw = self.builder_url.as_deref().unwrap_or(DEFAULT_BUILDER_URL);
        Url::parse(raw).map_err(|source| SettingsError::InvalidBuilderUrl {
            value: raw.to_owned(),
            source,
        })
    }

    /// Timeout applied to each builder call.
    pub fn builder_timeout(&self) -> Result<Duration, SettingsError> {
        match self.builder_timeout_secs {
            0 => Err(SettingsError::Zero {
                name: "builder_timeout_secs",
            }),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// Upload staging directory and size limit.
    pub fn uploads(&self) -> Result<UploadSettings, SettingsError> {
        let max_bytes = self.upload_limit_bytes.unwrap_or(DEFAULT_UPLOAD_LIMIT_BYTES);
        if max_bytes == 0 {
            return Err(SettingsError::Zero {
                name: "upload_limit_bytes",
            });
        }
        let directory = self
            .upload_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR));
        Ok(UploadSettings::new(directory, max_bytes))
    }

    /// Origins accepted by the CORS layer.
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_origins.clone().unwrap_or_else(|| {
            DEFAULT_CORS_ORIGINS
                .iter()
                .map(|origin| (*origin).to_owned())
                .collect()
        })
    }
}
