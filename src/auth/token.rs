/// Token signing and verification
///
/// Issues and verifies the signed, time-bound tokens carrying identity
/// claims. The signing algorithm is pinned to HS256 on both ends; a token
/// presented with any other algorithm fails verification.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::error::{AppError, AuthError};

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Build a service around a symmetric secret. Minimum secret length is
    /// enforced at process bootstrap, not here.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No clock leeway: a token is rejected from its expiry instant on.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign a fresh token for the user, valid for `ttl_seconds`.
    /// Every call produces a new unique token identifier.
    ///
    /// # Errors
    /// Returns error if signing fails
    pub fn create_token(
        &self,
        user_id: Uuid,
        email: &str,
        is_admin: bool,
        ttl_seconds: i64,
    ) -> Result<(String, Claims), AppError> {
        let claims = Claims::new(user_id, email.to_string(), is_admin, ttl_seconds);

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))?;

        Ok((token, claims))
    }

    /// Parse and cryptographically verify a token, returning its claims.
    ///
    /// Expired, mis-signed, and malformed tokens fail with distinct errors;
    /// all of them map to 401 but the distinction is kept in the logs.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::warn!("Token verification failed: {}", e);
                let kind = match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    jsonwebtoken::errors::ErrorKind::InvalidSignature
                    | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => {
                        AuthError::InvalidSignature
                    }
                    _ => AuthError::MalformedToken,
                };
                AppError::Auth(kind)
            })
    }
}
