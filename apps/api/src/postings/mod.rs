// Job and internship boards. Listings are read newest first and decorated with the
// caller's readiness before they leave the service.

pub mod handlers;

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::posting::{InternshipRow, JobRow, PostingTarget};

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 100;

/// `?limit=&offset=` on board listings.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Resolved window: `limit` in `1..=MAX_PAGE_SIZE`, `offset` never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl PageParams {
    pub fn resolve(self) -> Page {
        Page {
            limit: self
                .limit
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
            offset: self.offset.unwrap_or(0).max(0),
        }
    }
}

pub async fn list_jobs(pool: &PgPool, page: Page) -> Result<Vec<JobRow>, AppError> {
    Ok(sqlx::query_as::<_, JobRow>(
        "SELECT * FROM jobs ORDER BY created_at DESC, id LIMIT $1 OFFSET $2",
    )
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(pool)
    .await?)
}

pub async fn list_internships(pool: &PgPool, page: Page) -> Result<Vec<InternshipRow>, AppError> {
    Ok(sqlx::query_as::<_, InternshipRow>(
        "SELECT * FROM internships ORDER BY created_at DESC, id LIMIT $1 OFFSET $2",
    )
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(pool)
    .await?)
}

pub async fn get_job(pool: &PgPool, id: Uuid) -> Result<JobRow, AppError> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

pub async fn get_internship(pool: &PgPool, id: Uuid) -> Result<InternshipRow, AppError> {
    sqlx::query_as::<_, InternshipRow>("SELECT * FROM internships WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Internship {id} not found")))
}

/// Stored threshold of a posting; 404 if the posting does not exist.
pub async fn get_min_readiness(
    pool: &PgPool,
    target: PostingTarget,
) -> Result<Option<i32>, AppError> {
    let sql = match target {
        PostingTarget::Job(_) => "SELECT min_readiness_score FROM jobs WHERE id = $1",
        PostingTarget::Internship(_) => {
            "SELECT min_readiness_score FROM internships WHERE id = $1"
        }
    };
    sqlx::query_scalar::<_, Option<i32>>(sql)
        .bind(target.id())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Posting {target} not found")))
}
