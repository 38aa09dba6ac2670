use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "content_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContentCategory {
    Technology,
    Business,
    Design,
    Marketing,
    DataScience,
    Finance,
    Healthcare,
    Other,
}

/// The posting a score or an application refers to. Exactly one of job / internship,
/// which the storage layer mirrors with a `num_nonnulls(job_id, internship_id) = 1` check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum PostingTarget {
    Job(Uuid),
    Internship(Uuid),
}

impl PostingTarget {
    /// Builds a target from the nullable column / query pair used on the wire.
    pub fn from_ids(job_id: Option<Uuid>, internship_id: Option<Uuid>) -> Result<Self, AppError> {
        match (job_id, internship_id) {
            (Some(id), None) => Ok(PostingTarget::Job(id)),
            (None, Some(id)) => Ok(PostingTarget::Internship(id)),
            (None, None) => Err(AppError::Validation(
                "one of job_id or internship_id is required".to_string(),
            )),
            (Some(_), Some(_)) => Err(AppError::Validation(
                "job_id and internship_id are mutually exclusive".to_string(),
            )),
        }
    }

    pub fn job_id(&self) -> Option<Uuid> {
        match self {
            PostingTarget::Job(id) => Some(*id),
            PostingTarget::Internship(_) => None,
        }
    }

    pub fn internship_id(&self) -> Option<Uuid> {
        match self {
            PostingTarget::Internship(id) => Some(*id),
            PostingTarget::Job(_) => None,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            PostingTarget::Job(id) | PostingTarget::Internship(id) => *id,
        }
    }

    pub fn kind_str(&self) -> &'static str {
        match self {
            PostingTarget::Job(_) => "job",
            PostingTarget::Internship(_) => "internship",
        }
    }
}

impl std::fmt::Display for PostingTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind_str(), self.id())
    }
}

/// Anything that can be scored and gated: both jobs and internships.
pub trait Posting {
    fn target(&self) -> PostingTarget;
    /// Raw stored threshold. May be NULL or out of range in legacy rows;
    /// see `gate::normalize_min_required`.
    fn min_readiness_score(&self) -> Option<i32>;
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub description: Option<String>,
    pub category: Option<ContentCategory>,
    pub employment_type: Option<String>,
    pub location: Option<String>,
    /// Served normalised through `UnlockDecision`.
    #[serde(skip_serializing)]
    pub min_readiness_score: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Posting for JobRow {
    fn target(&self) -> PostingTarget {
        PostingTarget::Job(self.id)
    }

    fn min_readiness_score(&self) -> Option<i32> {
        self.min_readiness_score
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InternshipRow {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub description: Option<String>,
    pub category: Option<ContentCategory>,
    pub duration_weeks: Option<i32>,
    pub is_paid: bool,
    /// Served normalised through `UnlockDecision`.
    #[serde(skip_serializing)]
    pub min_readiness_score: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Posting for InternshipRow {
    fn target(&self) -> PostingTarget {
        PostingTarget::Internship(self.id)
    }

    fn min_readiness_score(&self) -> Option<i32> {
        self.min_readiness_score
    }
}
