//! Readiness evaluation: a pluggable, trait-based scorer mapping (user, posting) to 0–100.
//!
//! Default: `LedgerReadinessScorer` (loads the skill ledger and the posting's declared
//! requirements from Postgres, then runs the pure `compute_readiness`).
//! Alternative: `rpc_client::RpcReadinessScorer` (delegates to the hosted backend's
//! `calculate_readiness_score` procedure).
//!
//! `AppState` holds an `Arc<dyn ReadinessScorer>`, selected at startup via `READINESS_BACKEND`.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::auth::Session;
use crate::errors::AppError;
use crate::ledger;
use crate::models::posting::PostingTarget;
use crate::models::skill::{SkillRequirementRow, UserSkillRow};

pub const MAX_SCORE: u8 = 100;

/// Per-requirement weight cap; keeps the weighted sums finite.
const MAX_WEIGHT: f64 = 1e6;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching handlers or the gate.
///
/// `Ok(None)` means the backend had no data for the pair (unknown profile, no answer).
/// Callers never use the raw result directly; they go through [`effective_score`].
#[async_trait]
pub trait ReadinessScorer: Send + Sync {
    async fn score(&self, user_id: Uuid, target: PostingTarget) -> Result<Option<i64>, AppError>;

    /// Short backend label for logs ("ledger" | "rpc").
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// Fail-closed resolution
// ────────────────────────────────────────────────────────────────────────────

/// Resolves the score a session effectively has for a posting.
///
/// Anonymous sessions score 0 without calling the backend. Backend errors and missing
/// data also resolve to 0; they are logged, never returned.
pub async fn effective_score(
    scorer: &dyn ReadinessScorer,
    session: &Session,
    target: PostingTarget,
) -> u8 {
    let Some(user) = session.user() else {
        return 0;
    };

    match scorer.score(user.user_id, target).await {
        Ok(Some(raw)) => clamp_score(raw),
        Ok(None) => {
            warn!(
                backend = scorer.backend(),
                user_id = %user.user_id,
                target = %target,
                "Readiness scorer returned no data; treating as 0"
            );
            0
        }
        Err(e) => {
            warn!(
                backend = scorer.backend(),
                user_id = %user.user_id,
                target = %target,
                "Readiness scoring failed; treating as 0: {e}"
            );
            0
        }
    }
}

pub fn clamp_score(raw: i64) -> u8 {
    raw.clamp(0, MAX_SCORE as i64) as u8
}

// ────────────────────────────────────────────────────────────────────────────
// LedgerReadinessScorer (default)
// ────────────────────────────────────────────────────────────────────────────

pub struct LedgerReadinessScorer {
    db: PgPool,
}

impl LedgerReadinessScorer {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReadinessScorer for LedgerReadinessScorer {
    async fn score(&self, user_id: Uuid, target: PostingTarget) -> Result<Option<i64>, AppError> {
        if !ledger::profile_exists(&self.db, user_id).await? {
            return Ok(None);
        }
        let skills = ledger::get_user_skills(&self.db, user_id).await?;
        let requirements = ledger::get_requirements(&self.db, target).await?;
        Ok(Some(compute_readiness(&skills, &requirements) as i64))
    }

    fn backend(&self) -> &'static str {
        "ledger"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core readiness algorithm
// ────────────────────────────────────────────────────────────────────────────

/// Pure readiness function.
///
/// 1. Empty ledger → 0.
/// 2. No declared requirements → 100 if any skill has level > 0, else 0.
/// 3. Otherwise: Σ(weight × coverage) / Σ(weight) × 100, where
///    coverage = min(level, required_level) / required_level (1.0 when required_level ≤ 0)
///    non-positive weights count as 1.0 and weights above `MAX_WEIGHT` are capped.
///
/// Non-decreasing in every skill level.
pub fn compute_readiness(skills: &[UserSkillRow], requirements: &[SkillRequirementRow]) -> u8 {
    if skills.is_empty() {
        return 0;
    }

    if requirements.is_empty() {
        return if skills.iter().any(|s| s.level > 0) {
            MAX_SCORE
        } else {
            0
        };
    }

    let levels: HashMap<Uuid, i32> = skills.iter().map(|s| (s.skill_id, s.level)).collect();

    let mut total_weight = 0.0_f64;
    let mut covered = 0.0_f64;

    for req in requirements {
        let weight = effective_weight(req.weight);
        total_weight += weight;

        let level = levels.get(&req.skill_id).copied().unwrap_or(0).max(0);
        let coverage = if req.required_level <= 0 {
            1.0
        } else {
            (level.min(req.required_level) as f64) / (req.required_level as f64)
        };
        covered += weight * coverage;
    }

    let ratio = if total_weight > 0.0 {
        covered / total_weight
    } else {
        0.0
    };
    clamp_score((ratio * 100.0).round() as i64)
}

fn effective_weight(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight.min(MAX_WEIGHT)
    } else {
        1.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
