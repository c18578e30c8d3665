//! Backend entry-point: loads settings, runs migrations, and serves the API.

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use studyhall_backend::inbound::http::health::HealthState;
use studyhall_backend::outbound::persistence::{DbPool, PoolConfig};
use studyhall_backend::server::{AppSettings, ServerConfig, create_server, run_migrations};

fn to_io_error(err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(err.to_string())
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(to_io_error)?;
    let key = settings.session_key().map_err(to_io_error)?;
    let mut config = ServerConfig::from_settings(&settings, key).map_err(to_io_error)?;

    if let Some(database_url) = &settings.database_url {
        run_migrations(database_url).await?;
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .map_err(to_io_error)?;
        config = config.with_db_pool(pool);
    } else {
        info!("no database URL configured, running in fixture mode");
    }

    #[cfg(feature = "metrics")]
    {
        let prometheus = studyhall_backend::server::metrics::make_metrics()
            .map_err(std::io::Error::other)?;
        config = config.with_metrics(Some(prometheus));
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(bind_addr = %settings.bind_addr, "server started");
    server.await
}
