use std::sync::Arc;

use sqlx::PgPool;

use crate::applications::lock::SubmitLock;
use crate::auth::jwt::JwtKeys;
use crate::catalog::SeedCatalog;
use crate::config::Config;
use crate::readiness::ReadinessScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Token validation keys, built once at startup.
    pub jwt: JwtKeys,
    /// Pluggable readiness scorer. Default: LedgerReadinessScorer. Swap via READINESS_BACKEND.
    pub scorer: Arc<dyn ReadinessScorer>,
    pub submit_lock: SubmitLock,
    /// Fixture tier merged under the primary catalog tables.
    pub seed: Arc<SeedCatalog>,
}
