use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::applications::lifecycle::transition_application;
use crate::applications::submission::{submit_application, SubmitApplicationRequest};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::application::{ApplicationRow, ApplicationStatus};
use crate::models::profile::UserRole;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
}

/// POST /api/v1/applications
pub async fn handle_submit_application(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<SubmitApplicationRequest>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    let row = submit_application(
        &state.db,
        state.scorer.as_ref(),
        &state.submit_lock,
        user,
        request,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ApplicationRow>>, AppError> {
    let rows = sqlx::query_as::<_, ApplicationRow>(
        "SELECT * FROM applications WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user.user_id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows))
}

/// PATCH /api/v1/applications/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<ApplicationRow>, AppError> {
    user.require_role(&[UserRole::Employer, UserRole::Admin])?;
    let row = transition_application(&state.db, id, update.status).await?;
    Ok(Json(row))
}
