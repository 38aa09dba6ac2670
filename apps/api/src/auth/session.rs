//! Identity extractors.
//!
//! Handlers that need a user take [`AuthUser`] (401 when absent). Handlers that work
//! for everyone take [`Session`]; an anonymous session is never eligible and never
//! triggers a scoring call.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::auth::jwt::validate_token;
use crate::errors::AppError;
use crate::models::profile::UserRole;
use crate::state::AppState;

/// Authenticated user extracted from a Bearer token in the `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl AuthUser {
    pub fn require_role(&self, allowed: &[UserRole]) -> Result<(), AppError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

#[derive(Debug, Clone)]
pub enum Session {
    Anonymous,
    Authenticated(AuthUser),
}

impl Session {
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated(user) => Some(user),
        }
    }
}

/// Reads the bearer token. `Ok(None)` when no `Authorization` header is present.
fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(header) = parts.headers.get("authorization") else {
        return Ok(None);
    };
    let value = header.to_str().map_err(|_| AppError::Unauthorized)?;
    value
        .strip_prefix("Bearer ")
        .map(Some)
        .ok_or(AppError::Unauthorized)
}

fn authenticate(token: &str, state: &AppState) -> Result<AuthUser, AppError> {
    let claims = validate_token(token, &state.jwt).map_err(|e| {
        tracing::debug!("Rejected access token: {e}");
        AppError::Unauthorized
    })?;
    Ok(AuthUser {
        user_id: claims.sub,
        role: UserRole::from_claim(&claims.role),
    })
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.ok_or(AppError::Unauthorized)?;
        authenticate(token, state)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    // A missing header is anonymous; a present but invalid token is still a 401.
    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            None => Ok(Session::Anonymous),
            Some(token) => authenticate(token, state).map(Session::Authenticated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_role() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            role: UserRole::Employer,
        };
        assert!(user.require_role(&[UserRole::Employer, UserRole::Admin]).is_ok());
        assert!(matches!(
            user.require_role(&[UserRole::Admin]),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_anonymous_session_has_no_user() {
        assert!(Session::Anonymous.user().is_none());
    }
}
