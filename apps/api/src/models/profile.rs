#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Employer,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Employer => "employer",
            UserRole::Admin => "admin",
        }
    }

    /// Parses the role claim carried in access tokens. Unknown roles degrade to `Student`.
    pub fn from_claim(s: &str) -> Self {
        match s {
            "employer" => UserRole::Employer,
            "admin" => UserRole::Admin,
            _ => UserRole::Student,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub display_name: String,
    pub role: UserRole,
    pub streak_days: i32,
    pub xp: i64,
    pub created_at: DateTime<Utc>,
}
