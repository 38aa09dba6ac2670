//! Application submission: validate → gate → snapshot → insert (at most once).

use serde::Deserialize;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::applications::lock::SubmitLock;
use crate::auth::{AuthUser, Session};
use crate::errors::AppError;
use crate::ledger::profile_exists;
use crate::models::application::ApplicationRow;
use crate::models::posting::PostingTarget;
use crate::postings::get_min_readiness;
use crate::readiness::{effective_score, ReadinessScorer, UnlockDecision};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitApplicationRequest {
    pub job_id: Option<Uuid>,
    pub internship_id: Option<Uuid>,
    #[validate(length(max = 5000))]
    pub cover_letter: Option<String>,
    #[validate(url)]
    pub resume_url: Option<String>,
}

impl SubmitApplicationRequest {
    /// Field-level checks plus the exactly-one-target rule; runs before any remote call.
    pub fn validated_target(&self) -> Result<PostingTarget, AppError> {
        self.validate()?;
        PostingTarget::from_ids(self.job_id, self.internship_id)
    }
}

/// A row ready to insert. `readiness_score` is the gate-time snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
    pub user_id: Uuid,
    pub target: PostingTarget,
    pub readiness_score: u8,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
}

/// Builds the insert for an unlocked posting; a locked gate rejects with the threshold.
pub fn prepare_application(
    user: &AuthUser,
    target: PostingTarget,
    decision: &UnlockDecision,
    request: SubmitApplicationRequest,
) -> Result<NewApplication, AppError> {
    decision.ensure_unlocked()?;
    Ok(NewApplication {
        user_id: user.user_id,
        target,
        readiness_score: decision.readiness_score(),
        cover_letter: request
            .cover_letter
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty()),
        resume_url: request.resume_url,
    })
}

/// Inserts with status `pending`. A second application for the same (user, posting)
/// hits a partial unique index and is reported as a conflict.
pub async fn insert_application(
    pool: &PgPool,
    new: &NewApplication,
) -> Result<ApplicationRow, AppError> {
    sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications
            (user_id, job_id, internship_id, status, readiness_score, cover_letter, resume_url)
        VALUES ($1, $2, $3, 'pending', $4, $5, $6)
        ON CONFLICT DO NOTHING
        RETURNING *
        "#,
    )
    .bind(new.user_id)
    .bind(new.target.job_id())
    .bind(new.target.internship_id())
    .bind(new.readiness_score as i16)
    .bind(new.cover_letter.as_deref())
    .bind(new.resume_url.as_deref())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::Conflict(format!("Already applied to {}", new.target)))
}

/// A signed-in identity without a profile row cannot own an application.
pub fn require_profile(exists: bool, user_id: Uuid) -> Result<(), AppError> {
    if exists {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("Profile {user_id} not found")))
    }
}

/// Full submission flow for a signed-in user.
pub async fn submit_application(
    pool: &PgPool,
    scorer: &dyn ReadinessScorer,
    lock: &SubmitLock,
    user: AuthUser,
    request: SubmitApplicationRequest,
) -> Result<ApplicationRow, AppError> {
    let target = request.validated_target()?;
    require_profile(profile_exists(pool, user.user_id).await?, user.user_id)?;
    let min_required = get_min_readiness(pool, target).await?;

    let guard = match lock.try_acquire(user.user_id, target).await {
        Ok(Some(guard)) => Some(guard),
        Ok(None) => {
            return Err(AppError::Conflict(
                "A submission for this posting is already in progress".to_string(),
            ))
        }
        Err(e) => {
            warn!("Submission lock unavailable, relying on unique index: {e}");
            None
        }
    };

    let session = Session::Authenticated(user.clone());
    let score = effective_score(scorer, &session, target).await;
    let decision = UnlockDecision::evaluate(score, min_required);

    let result = match prepare_application(&user, target, &decision, request) {
        Ok(new) => insert_application(pool, &new).await,
        Err(e) => Err(e),
    };

    if let Some(guard) = guard {
        if let Err(e) = lock.release(guard).await {
            warn!("Failed to release submission lock (expires on TTL): {e}");
        }
    }

    match &result {
        Ok(row) => info!(
            application_id = %row.id,
            user_id = %user.user_id,
            target = %target,
            readiness_score = row.readiness_score,
            "Application submitted"
        ),
        Err(AppError::Locked { required }) => info!(
            user_id = %user.user_id,
            target = %target,
            score,
            required = *required,
            "Submission blocked by unlock gate"
        ),
        Err(_) => {}
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::UserRole;

    fn user() -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            role: UserRole::Student,
        }
    }

    fn request(job_id: Option<Uuid>, internship_id: Option<Uuid>) -> SubmitApplicationRequest {
        SubmitApplicationRequest {
            job_id,
            internship_id,
            cover_letter: Some("  I would love to join.  ".to_string()),
            resume_url: Some("https://example.com/cv.pdf".to_string()),
        }
    }

    #[test]
    fn test_unlocked_application_snapshots_score() {
        let user = user();
        let job = Uuid::new_v4();
        let decision = UnlockDecision::evaluate(80, Some(75));

        let new = prepare_application(
            &user,
            PostingTarget::Job(job),
            &decision,
            request(Some(job), None),
        )
        .unwrap();

        assert_eq!(new.readiness_score, 80);
        assert_eq!(new.user_id, user.user_id);
        assert_eq!(new.target.job_id(), Some(job));
        assert_eq!(new.cover_letter.as_deref(), Some("I would love to join."));
    }

    #[test]
    fn test_locked_posting_is_rejected_with_threshold() {
        let job = Uuid::new_v4();
        let decision = UnlockDecision::evaluate(80, Some(90));

        let err = prepare_application(
            &user(),
            PostingTarget::Job(job),
            &decision,
            request(Some(job), None),
        )
        .unwrap_err();

        assert!(matches!(err, AppError::Locked { required: 90 }));
        assert_eq!(err.to_string(), "90% readiness required");
    }

    #[test]
    fn test_missing_profile_is_rejected_before_insert() {
        let user_id = Uuid::new_v4();
        let err = require_profile(false, user_id).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.to_string(), format!("Not found: Profile {user_id} not found"));
        assert!(require_profile(true, user_id).is_ok());
    }

    #[test]
    fn test_blank_cover_letter_is_dropped() {
        let job = Uuid::new_v4();
        let mut req = request(Some(job), None);
        req.cover_letter = Some("   ".to_string());
        let decision = UnlockDecision::evaluate(10, Some(0));
        let new = prepare_application(&user(), PostingTarget::Job(job), &decision, req).unwrap();
        assert_eq!(new.cover_letter, None);
    }

    #[test]
    fn test_validation_requires_exactly_one_target() {
        assert!(matches!(
            request(None, None).validated_target(),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            request(Some(Uuid::new_v4()), Some(Uuid::new_v4())).validated_target(),
            Err(AppError::Validation(_))
        ));
        let id = Uuid::new_v4();
        assert_eq!(
            request(None, Some(id)).validated_target().unwrap(),
            PostingTarget::Internship(id)
        );
    }

    #[test]
    fn test_validation_rejects_bad_resume_url() {
        let mut req = request(Some(Uuid::new_v4()), None);
        req.resume_url = Some("not a url".to_string());
        assert!(matches!(req.validated_target(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validation_rejects_oversized_cover_letter() {
        let mut req = request(Some(Uuid::new_v4()), None);
        req.cover_letter = Some("x".repeat(5001));
        assert!(matches!(req.validated_target(), Err(AppError::Validation(_))));
    }
}
