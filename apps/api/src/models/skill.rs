use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::posting::ContentCategory;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SkillRow {
    pub id: Uuid,
    pub name: String,
    pub category: ContentCategory,
}

/// One entry of a user's skill ledger. Rows are only ever upgraded, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSkillRow {
    pub user_id: Uuid,
    pub skill_id: Uuid,
    pub level: i32,
    pub courses_completed: i32,
    pub projects_completed: i32,
    pub updated_at: DateTime<Utc>,
}

/// A skill a posting declares as required, with the level that counts as full coverage.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SkillRequirementRow {
    pub skill_id: Uuid,
    pub required_level: i32,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "completion_source", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CompletionSource {
    Course,
    Project,
}
