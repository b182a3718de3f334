//! Backend entry-point: loads settings, wires adapters and serves the REST API.

mod server;

use actix_web::web;
#[cfg(feature = "metrics")]
use server::make_metrics;
use color_eyre::eyre::{Context, Result};
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::inbound::http::token_config::{BuildMode, token_settings_from_env};
use backend::outbound::persistence::{DbPool, PoolConfig};
use backend::settings::AppSettings;
use ortho_config::OrthoConfig;
use server::{BuilderConfig, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("loading settings")?;
    let tokens = token_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("loading token signing secret")?;
    info!(fingerprint = %tokens.fingerprint, "token signing secret loaded");

    let builder = BuilderConfig::new(settings.builder_url()?, settings.builder_timeout()?);
    let mut config = ServerConfig::new(settings.bind_addr()?, tokens, builder, settings.uploads()?)
        .with_cors_origins(settings.cors_origins());

    if let Some(url) = settings.database_url.as_deref() {
        let mut pool_config = PoolConfig::new(url);
        if let Some(size) = settings.db_pool_size {
            pool_config = pool_config.with_max_size(size);
        }
        let pool = DbPool::new(pool_config)
            .await
            .wrap_err("connecting to PostgreSQL")?;
        config = config.with_db_pool(pool);
    }

    #[cfg(feature = "metrics")]
    {
        config = config.with_metrics(make_metrics());
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("starting HTTP server")?;
    server.await.wrap_err("HTTP server failed")
}
