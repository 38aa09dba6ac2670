//! Axum route handlers for readiness queries.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{AuthUser, Session};
use crate::errors::AppError;
use crate::models::posting::PostingTarget;
use crate::postings::get_min_readiness;
use crate::readiness::{effective_score, UnlockDecision};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReadinessQuery {
    pub job_id: Option<Uuid>,
    pub internship_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub target: PostingTarget,
    #[serde(flatten)]
    pub decision: UnlockDecision,
    pub scorer_backend: &'static str,
}

/// GET /api/v1/readiness?job_id=… | ?internship_id=…
///
/// Score and gate decision for the signed-in user against one posting.
pub async fn handle_get_readiness(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ReadinessQuery>,
) -> Result<Json<ReadinessResponse>, AppError> {
    let target = PostingTarget::from_ids(query.job_id, query.internship_id)?;
    let min_required = get_min_readiness(&state.db, target).await?;

    let session = Session::Authenticated(user);
    let score = effective_score(state.scorer.as_ref(), &session, target).await;

    Ok(Json(ReadinessResponse {
        target,
        decision: UnlockDecision::evaluate(score, min_required),
        scorer_backend: state.scorer.backend(),
    }))
}
