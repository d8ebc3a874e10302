/// Token claims
///
/// The signed payload carried inside every access and refresh token. A
/// claims set is immutable once issued; renewal and revocation key on the
/// `jti`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// User email
    pub email: String,
    /// Admin role flag
    pub is_admin: bool,
    /// Unique token identifier
    pub jti: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create new claims for a user with a fresh random token identifier.
    pub fn new(user_id: Uuid, email: String, is_admin: bool, ttl_seconds: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            email,
            is_admin,
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + ttl_seconds,
        }
    }

    /// Extract the user ID from the subject claim.
    ///
    /// # Errors
    /// Returns error if the subject is not a valid UUID
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::Internal("Invalid user ID in token".to_string()))
    }

    /// Expiration instant as a timestamp value.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_carry_identity_and_ttl() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "test@example.com".to_string(), true, 3600);

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "test@example.com");
        assert!(claims.is_admin);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn token_identifier_is_unique_per_claims() {
        let user_id = Uuid::new_v4();
        let a = Claims::new(user_id, "test@example.com".to_string(), false, 3600);
        let b = Claims::new(user_id, "test@example.com".to_string(), false, 3600);

        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn user_id_extraction() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "test@example.com".to_string(), false, 3600);

        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn invalid_user_id() {
        let mut claims = Claims::new(Uuid::new_v4(), "test@example.com".to_string(), false, 3600);
        claims.sub = "invalid-uuid".to_string();

        assert!(claims.user_id().is_err());
    }
}
