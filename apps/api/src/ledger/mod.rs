//! Skill ledger: per-user skill levels derived from completed courses and approved projects.
//!
//! Rows are upgrade-only. `record_completion` never lowers a level and never deletes.

pub mod handlers;

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::posting::PostingTarget;
use crate::models::profile::ProfileRow;
use crate::models::skill::{CompletionSource, SkillRequirementRow, SkillRow, UserSkillRow};

pub async fn profile_exists(pool: &PgPool, user_id: Uuid) -> Result<bool, AppError> {
    Ok(
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM profiles WHERE id = $1)")
            .bind(user_id)
            .fetch_one(pool)
            .await?,
    )
}

pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<ProfileRow>, AppError> {
    Ok(
        sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn get_user_skills(pool: &PgPool, user_id: Uuid) -> Result<Vec<UserSkillRow>, AppError> {
    Ok(sqlx::query_as::<_, UserSkillRow>(
        "SELECT * FROM user_skills WHERE user_id = $1 ORDER BY level DESC, skill_id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

/// Catalog entries for every skill in a user's ledger.
pub async fn get_skills_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<SkillRow>, AppError> {
    Ok(sqlx::query_as::<_, SkillRow>(
        r#"
        SELECT s.id, s.name, s.category
        FROM skills s
        JOIN user_skills us ON us.skill_id = s.id
        WHERE us.user_id = $1
        ORDER BY s.name
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

/// Declared skill requirements of a job or internship.
pub async fn get_requirements(
    pool: &PgPool,
    target: PostingTarget,
) -> Result<Vec<SkillRequirementRow>, AppError> {
    let sql = match target {
        PostingTarget::Job(_) => {
            "SELECT skill_id, required_level, weight FROM skill_requirements \
             WHERE job_id = $1"
        }
        PostingTarget::Internship(_) => {
            "SELECT skill_id, required_level, weight FROM skill_requirements \
             WHERE internship_id = $1"
        }
    };
    Ok(sqlx::query_as::<_, SkillRequirementRow>(sql)
        .bind(target.id())
        .fetch_all(pool)
        .await?)
}

/// A completion event to fold into the ledger.
#[derive(Debug, Clone, Copy)]
pub struct Completion {
    pub user_id: Uuid,
    pub skill_id: Uuid,
    pub source: CompletionSource,
    pub level_awarded: i32,
}

/// Upgrade-only upsert. Counters grow by the bound deltas inside the statement, so concurrent
/// completions for the same (user, skill) each land even when no row exists yet.
const RECORD_COMPLETION_SQL: &str = r#"
    INSERT INTO user_skills (user_id, skill_id, level, courses_completed, projects_completed)
    VALUES ($1, $2, $3, $4, $5)
    ON CONFLICT (user_id, skill_id) DO UPDATE SET
        level = GREATEST(user_skills.level, EXCLUDED.level),
        courses_completed = user_skills.courses_completed + EXCLUDED.courses_completed,
        projects_completed = user_skills.projects_completed + EXCLUDED.projects_completed,
        updated_at = now()
    RETURNING *
"#;

/// What a single completion contributes: the awarded level (never negative) and a
/// one-step bump of the matching counter. Returns `(level, courses_delta, projects_delta)`.
pub fn completion_delta(completion: &Completion) -> (i32, i32, i32) {
    let level = completion.level_awarded.max(0);
    match completion.source {
        CompletionSource::Course => (level, 1, 0),
        CompletionSource::Project => (level, 0, 1),
    }
}

/// Folds a completion into the ledger with a single atomic upsert.
pub async fn record_completion(
    pool: &PgPool,
    completion: &Completion,
) -> Result<UserSkillRow, AppError> {
    let (level, courses, projects) = completion_delta(completion);

    let row = sqlx::query_as::<_, UserSkillRow>(RECORD_COMPLETION_SQL)
        .bind(completion.user_id)
        .bind(completion.skill_id)
        .bind(level)
        .bind(courses)
        .bind(projects)
        .fetch_one(pool)
        .await?;

    info!(
        user_id = %completion.user_id,
        skill_id = %completion.skill_id,
        level = row.level,
        "Recorded {:?} completion",
        completion.source
    );
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion(source: CompletionSource, level_awarded: i32) -> Completion {
        Completion {
            user_id: Uuid::new_v4(),
            skill_id: Uuid::new_v4(),
            source,
            level_awarded,
        }
    }

    #[test]
    fn test_course_completion_bumps_course_counter() {
        let delta = completion_delta(&completion(CompletionSource::Course, 2));
        assert_eq!(delta, (2, 1, 0));
    }

    #[test]
    fn test_project_completion_bumps_project_counter() {
        let delta = completion_delta(&completion(CompletionSource::Project, 4));
        assert_eq!(delta, (4, 0, 1));
    }

    #[test]
    fn test_negative_award_is_ignored() {
        let delta = completion_delta(&completion(CompletionSource::Project, -3));
        assert_eq!(delta, (0, 0, 1));
    }

    #[test]
    fn test_completion_upsert_never_lowers_level() {
        assert!(RECORD_COMPLETION_SQL
            .contains("level = GREATEST(user_skills.level, EXCLUDED.level)"));
    }

    #[test]
    fn test_concurrent_completions_both_count() {
        // Two first-time completions racing on the same pair must add, not collapse to max.
        assert!(RECORD_COMPLETION_SQL.contains(
            "courses_completed = user_skills.courses_completed + EXCLUDED.courses_completed"
        ));
        assert!(RECORD_COMPLETION_SQL.contains(
            "projects_completed = user_skills.projects_completed + EXCLUDED.projects_completed"
        ));
        assert!(!RECORD_COMPLETION_SQL.contains("FOR UPDATE"));
        assert!(!RECORD_COMPLETION_SQL.contains("GREATEST(user_skills.courses_completed"));
    }
}
