mod applications;
mod auth;
mod catalog;
mod config;
mod db;
mod errors;
mod ledger;
mod models;
mod postings;
mod readiness;
mod routes;
mod rpc_client;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::applications::lock::SubmitLock;
use crate::auth::jwt::JwtKeys;
use crate::catalog::SeedCatalog;
use crate::config::{Config, ReadinessBackend};
use crate::db::{create_pool, run_migrations};
use crate::readiness::{LedgerReadinessScorer, ReadinessScorer};
use crate::routes::build_router;
use crate::rpc_client::{RpcClient, RpcReadinessScorer};
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

    info!("Starting Futora API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    // Initialize Redis (submission locks)
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    let scorer = build_scorer(&config, &db)?;
    info!("Readiness scorer initialized (backend: {})", scorer.backend());

    let seed = Arc::new(SeedCatalog::load());
    info!(
        "Seed catalog loaded: {} courses, {} events (enabled: {})",
        seed.courses.len(),
        seed.events.len(),
        config.catalog_seed_enabled
    );

    // Build app state
    let state = AppState {
        db,
        jwt: JwtKeys::from_secret(&config.jwt_secret),
        scorer,
        submit_lock: SubmitLock::new(redis, config.submit_lock_ttl_ms),
        seed,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        // TODO: restrict CORS to the web app's origin once it is configurable
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Selects the readiness backend named by `READINESS_BACKEND`.
fn build_scorer(config: &Config, db: &sqlx::PgPool) -> Result<Arc<dyn ReadinessScorer>> {
    let scorer: Arc<dyn ReadinessScorer> = match config.readiness_backend {
        ReadinessBackend::Ledger => Arc::new(LedgerReadinessScorer::new(db.clone())),
        ReadinessBackend::Rpc => {
            let base_url = config
                .backend_url
                .clone()
                .context("BACKEND_URL is required for the rpc backend")?;
            let key = config
                .backend_service_key
                .clone()
                .context("BACKEND_SERVICE_KEY is required for the rpc backend")?;
            Arc::new(RpcReadinessScorer(RpcClient::new(base_url, key)?))
        }
    };
    Ok(scorer)
}
