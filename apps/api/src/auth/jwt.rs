//! Access tokens are HS256-signed JWTs issued by the hosted auth service. This service
//! only validates them.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's profile id.
    pub sub: Uuid,
    /// Role name (`student`, `employer`, `admin`).
    #[serde(default)]
    pub role: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Key material built once at startup from `JWT_SECRET`.
#[derive(Clone)]
pub struct JwtKeys {
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

pub fn validate_token(token: &str, keys: &JwtKeys) -> Result<Claims, jsonwebtoken::errors::Error> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(token, &keys.decoding, &validation).map(|data| data.claims)
}

#[cfg(test)]
pub fn issue_token(claims: &Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn claims(exp_offset: Duration) -> Claims {
        Claims {
            sub: Uuid::new_v4(),
            role: "student".to_string(),
            exp: (Utc::now() + exp_offset).timestamp(),
        }
    }

    #[test]
    fn test_issue_then_validate() {
        let keys = JwtKeys::from_secret("test-secret");
        let original = claims(Duration::minutes(15));
        let token = issue_token(&original, "test-secret").unwrap();
        let decoded = validate_token(&token, &keys).unwrap();
        assert_eq!(decoded.sub, original.sub);
        assert_eq!(decoded.role, "student");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token(&claims(Duration::minutes(15)), "a").unwrap();
        assert!(validate_token(&token, &JwtKeys::from_secret("b")).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let keys = JwtKeys::from_secret("test-secret");
        let token = issue_token(&claims(Duration::hours(-2)), "test-secret").unwrap();
        assert!(validate_token(&token, &keys).is_err());
    }
}
