//! Application status state machine.
//!
//! ```text
//! pending ─▶ reviewing ─▶ shortlisted ─▶ accepted
//!                │              │
//!                └─▶ rejected ◀─┘
//! ```
//! `accepted` and `rejected` are terminal.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{ApplicationRow, ApplicationStatus};

impl ApplicationStatus {
    pub fn allowed_next(&self) -> &'static [ApplicationStatus] {
        use ApplicationStatus::*;
        match self {
            Pending => &[Reviewing],
            Reviewing => &[Shortlisted, Rejected],
            Shortlisted => &[Accepted, Rejected],
            Rejected | Accepted => &[],
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_next().is_empty()
    }

    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    pub fn transition_to(self, next: ApplicationStatus) -> Result<ApplicationStatus, AppError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AppError::Validation(format!(
                "cannot move application from '{}' to '{}'",
                self.as_str(),
                next.as_str()
            )))
        }
    }
}

pub async fn get_application(pool: &PgPool, id: Uuid) -> Result<ApplicationRow, AppError> {
    sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}

/// Compare-and-set on the current status. Only `status` and `updated_at` are written.
const TRANSITION_SQL: &str = r#"
    UPDATE applications
    SET status = $1, updated_at = now()
    WHERE id = $2 AND status = $3
    RETURNING *
"#;

/// Moves an application to `next`.
pub async fn transition_application(
    pool: &PgPool,
    id: Uuid,
    next: ApplicationStatus,
) -> Result<ApplicationRow, AppError> {
    let current = get_application(pool, id).await?;
    let target = current.target()?;
    current.status.transition_to(next)?;

    let updated = sqlx::query_as::<_, ApplicationRow>(TRANSITION_SQL)
        .bind(next)
        .bind(id)
        .bind(current.status)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| {
            AppError::Conflict(format!("Application {id} changed status concurrently"))
        })?;

    info!(
        application_id = %id,
        target = %target,
        "Application moved {} -> {}",
        current.status.as_str(),
        next.as_str()
    );
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ApplicationStatus::*;

    const ALL: [ApplicationStatus; 5] = [Pending, Reviewing, Shortlisted, Rejected, Accepted];

    #[test]
    fn test_happy_path_to_accepted() {
        let status = Pending
            .transition_to(Reviewing)
            .and_then(|s| s.transition_to(Shortlisted))
            .and_then(|s| s.transition_to(Accepted))
            .unwrap();
        assert_eq!(status, Accepted);
    }

    #[test]
    fn test_accepted_only_from_shortlisted() {
        for from in ALL {
            assert_eq!(from.can_transition_to(Accepted), from == Shortlisted, "{from:?}");
        }
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for next in ALL {
            assert!(Rejected.transition_to(next).is_err());
            assert!(Accepted.transition_to(next).is_err());
        }
        assert!(Rejected.is_terminal());
        assert!(Accepted.is_terminal());
        assert!(!Pending.is_terminal());
    }

    #[test]
    fn test_pending_cannot_skip_review() {
        assert!(Pending.transition_to(Shortlisted).is_err());
        assert!(Pending.transition_to(Rejected).is_err());
    }

    #[test]
    fn test_self_transition_rejected() {
        for status in ALL {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn test_error_names_both_states() {
        let err = Reviewing.transition_to(Accepted).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("reviewing") && msg.contains("accepted"), "{msg}");
    }

    #[test]
    fn test_status_update_keeps_readiness_snapshot() {
        let set_clause = TRANSITION_SQL
            .split("SET")
            .nth(1)
            .and_then(|rest| rest.split("WHERE").next())
            .unwrap();
        let columns: Vec<&str> = set_clause
            .split(',')
            .filter_map(|assignment| assignment.split('=').next())
            .map(str::trim)
            .collect();
        assert_eq!(columns, ["status", "updated_at"]);
        assert!(!TRANSITION_SQL.contains("readiness_score"));
    }

    #[test]
    fn test_status_update_is_compare_and_set() {
        assert!(TRANSITION_SQL.contains("WHERE id = $2 AND status = $3"));
    }
}
