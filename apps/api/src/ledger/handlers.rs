use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::ledger::{
    get_profile, get_skills_for_user, get_user_skills, record_completion, Completion,
};
use crate::models::profile::{ProfileRow, UserRole};
use crate::models::skill::{CompletionSource, SkillRow, UserSkillRow};
use crate::state::AppState;

#[derive(Serialize)]
pub struct LedgerResponse {
    pub profile: ProfileRow,
    pub skills: Vec<UserSkillRow>,
    /// Names and categories of the skills referenced by `skills`.
    pub catalog: Vec<SkillRow>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CompletionRequest {
    pub user_id: Uuid,
    pub skill_id: Uuid,
    pub source: CompletionSource,
    #[validate(range(min = 0, max = 10))]
    pub level_awarded: i32,
}

/// GET /api/v1/ledger
pub async fn handle_get_ledger(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<LedgerResponse>, AppError> {
    let profile = get_profile(&state.db, user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", user.user_id)))?;
    let skills = get_user_skills(&state.db, user.user_id).await?;
    let catalog = get_skills_for_user(&state.db, user.user_id).await?;
    Ok(Json(LedgerResponse {
        profile,
        skills,
        catalog,
    }))
}

/// POST /api/v1/ledger/completions
pub async fn handle_record_completion(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CompletionRequest>,
) -> Result<Json<UserSkillRow>, AppError> {
    user.require_role(&[UserRole::Admin])?;
    req.validate()?;

    let row = record_completion(
        &state.db,
        &Completion {
            user_id: req.user_id,
            skill_id: req.skill_id,
            source: req.source,
            level_awarded: req.level_awarded,
        },
    )
    .await?;
    Ok(Json(row))
}
