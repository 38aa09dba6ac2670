use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::auth::Session;
use crate::errors::AppError;
use crate::models::posting::{InternshipRow, JobRow};
use crate::postings::{get_internship, get_job, list_internships, list_jobs, PageParams};
use crate::readiness::{score_posting, score_postings, ScoredPosting};
use crate::state::AppState;

/// GET /api/v1/jobs?limit=&offset=
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    session: Session,
    Query(page): Query<PageParams>,
) -> Result<Json<Vec<ScoredPosting<JobRow>>>, AppError> {
    let jobs = list_jobs(&state.db, page.resolve()).await?;
    Ok(Json(
        score_postings(state.scorer.as_ref(), &session, jobs).await,
    ))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Json<ScoredPosting<JobRow>>, AppError> {
    let job = get_job(&state.db, id).await?;
    Ok(Json(score_posting(state.scorer.as_ref(), &session, job).await))
}

/// GET /api/v1/internships?limit=&offset=
pub async fn handle_list_internships(
    State(state): State<AppState>,
    session: Session,
    Query(page): Query<PageParams>,
) -> Result<Json<Vec<ScoredPosting<InternshipRow>>>, AppError> {
    let internships = list_internships(&state.db, page.resolve()).await?;
    Ok(Json(
        score_postings(state.scorer.as_ref(), &session, internships).await,
    ))
}

/// GET /api/v1/internships/:id
pub async fn handle_get_internship(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Json<ScoredPosting<InternshipRow>>, AppError> {
    let internship = get_internship(&state.db, id).await?;
    Ok(Json(
        score_posting(state.scorer.as_ref(), &session, internship).await,
    ))
}
