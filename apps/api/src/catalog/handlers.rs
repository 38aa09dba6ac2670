use axum::{extract::State, Json};

use crate::catalog::{merge_tiers, Sourced};
use crate::errors::AppError;
use crate::models::catalog::{CourseRow, EventRow};
use crate::state::AppState;

/// GET /api/v1/courses
pub async fn handle_list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<Sourced<CourseRow>>>, AppError> {
    let primary = sqlx::query_as::<_, CourseRow>("SELECT * FROM courses ORDER BY created_at DESC")
        .fetch_all(&state.db)
        .await?;
    let seed = if state.config.catalog_seed_enabled {
        state.seed.courses.clone()
    } else {
        Vec::new()
    };
    Ok(Json(merge_tiers(primary, seed)))
}

/// GET /api/v1/events
pub async fn handle_list_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<Sourced<EventRow>>>, AppError> {
    let primary = sqlx::query_as::<_, EventRow>("SELECT * FROM events ORDER BY created_at DESC")
        .fetch_all(&state.db)
        .await?;
    let seed = if state.config.catalog_seed_enabled {
        state.seed.events.clone()
    } else {
        Vec::new()
    };
    Ok(Json(merge_tiers(primary, seed)))
}
