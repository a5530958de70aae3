mod agent_client;
mod config;
mod db;
mod errors;
mod extract;
mod jobs;
mod models;
mod profiles;
mod roadmaps;
mod roles;
mod routes;
mod seed;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::agent_client::AgentClient;
use crate::config::Config;
use crate::db::create_pool;
use crate::jobs::store::PgJobStore;
use crate::profiles::store::PgProfileStore;
use crate::roadmaps::store::PgRoadmapStore;
use crate::roles::catalog::PgRoleCatalog;
use crate::routes::build_router;
use crate::seed::seed_starter_data;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobsUpi API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url, config.database_max_connections).await?;

    // Initialize agent client
    let agent = AgentClient::new(
        &config.agent_api_url,
        Duration::from_secs(config.agent_timeout_secs),
        config.agent_max_retries,
    )
    .context("Failed to build agent HTTP client")?;
    info!(
        "Agent client initialized (base url: {}, timeout: {}s, retries: {})",
        agent.base_url(),
        config.agent_timeout_secs,
        config.agent_max_retries
    );

    let state = AppState {
        profiles: Arc::new(PgProfileStore::new(db.clone())),
        roles: Arc::new(PgRoleCatalog::new(db.clone())),
        roadmaps: Arc::new(PgRoadmapStore::new(db.clone())),
        jobs: Arc::new(PgJobStore::new(db)),
        agent: Arc::new(agent),
    };

    if std::env::args().skip(1).any(|arg| arg == "--seed") {
        seed_starter_data(state.roles.as_ref(), state.jobs.as_ref()).await?;
        return Ok(());
    }

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&config.allowed_origins)),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");
    info!("Core API base URL: {}", config.core_api_url);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Credentialed CORS for the configured client origins. Origins that are not
/// valid header values are skipped.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
