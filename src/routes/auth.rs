/// Session endpoints
///
/// Login mints an access/refresh token pair and creates the server-side
/// session keyed by the refresh token's claim id. Renewal re-validates
/// against that session before minting a new access token; the session row
/// is what lets the server refuse a refresh token it has already signed.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{verify_password, TokenService};
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError, ErrorContext};
use crate::middleware::AuthenticatedUser;
use crate::routes::users::UserResponse;
use crate::store::{Session, Store};
use crate::validators::is_valid_email;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub session_id: String,
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token_expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewAccessTokenRequest {
    pub refresh_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewAccessTokenResponse {
    pub access_token: String,
    pub access_token_expires_at: DateTime<Utc>,
}

/// POST /users/login
///
/// # Errors
/// - 400: malformed body or email
/// - 401: wrong password
/// - 500: unknown email (not distinguished from internal failure), hashing
///   or signing failure, store failure
pub async fn login(
    form: web::Json<LoginRequest>,
    store: web::Data<dyn Store>,
    tokens: web::Data<TokenService>,
    jwt: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("login");

    let email = is_valid_email(&form.email)?;
    let user = store.get_user_by_email(&email).await?;

    if !verify_password(&form.password, &user.password_hash)? {
        tracing::warn!(request_id = %context.request_id, email = %email, "Wrong password");
        return Err(AppError::Auth(AuthError::InvalidCredentials));
    }

    let (access_token, access_claims) =
        tokens.create_token(user.id, &user.email, user.is_admin, jwt.access_token_expiry)?;
    let (refresh_token, refresh_claims) =
        tokens.create_token(user.id, &user.email, user.is_admin, jwt.refresh_token_expiry)?;

    // The session is keyed by the refresh token's claim id; that row is the
    // sole source of truth for whether the refresh token is still usable.
    let session = store
        .create_session(Session {
            id: refresh_claims.jti.clone(),
            user_email: user.email.clone(),
            refresh_token: refresh_token.clone(),
            is_revoked: false,
            created_at: Utc::now(),
            expires_at: refresh_claims.expires_at(),
        })
        .await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id,
        session_id = %session.id,
        "User logged in"
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        session_id: session.id,
        access_token,
        refresh_token,
        access_token_expires_at: access_claims.expires_at(),
        refresh_token_expires_at: refresh_claims.expires_at(),
        user: UserResponse::from(&user),
    }))
}

/// POST /tokens/renew
///
/// Exchanges a refresh token for a new access token. No auth header is
/// required; the refresh token in the body is the credential. The refresh
/// token and its session are left untouched.
///
/// # Errors
/// - 401: invalid/expired refresh token, revoked or expired session, email
///   mismatch
/// - 500: session record missing (not distinguished from internal failure)
pub async fn renew_access_token(
    form: web::Json<RenewAccessTokenRequest>,
    store: web::Data<dyn Store>,
    tokens: web::Data<TokenService>,
    jwt: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("renew_access_token");

    let claims = tokens.verify_token(&form.refresh_token)?;
    let session = store.get_session(&claims.jti).await?;

    if session.is_revoked {
        tracing::warn!(
            request_id = %context.request_id,
            session_id = %session.id,
            "Renewal attempt on revoked session"
        );
        return Err(AppError::Auth(AuthError::SessionRevoked));
    }
    if session.user_email != claims.email {
        tracing::warn!(
            request_id = %context.request_id,
            session_id = %session.id,
            "Renewal attempt with mismatched email"
        );
        return Err(AppError::Auth(AuthError::EmailMismatch));
    }
    if session.is_expired() {
        return Err(AppError::Auth(AuthError::SessionExpired));
    }

    let user_id = claims.user_id()?;
    let (access_token, access_claims) =
        tokens.create_token(user_id, &claims.email, claims.is_admin, jwt.access_token_expiry)?;

    tracing::info!(
        request_id = %context.request_id,
        session_id = %session.id,
        "Access token renewed"
    );

    Ok(HttpResponse::Ok().json(RenewAccessTokenResponse {
        access_token,
        access_token_expires_at: access_claims.expires_at(),
    }))
}

/// POST /tokens/revoke (bearer)
///
/// Flips the session named by the caller's claims to revoked; the record is
/// kept for audit, unlike logout.
pub async fn revoke_session(
    user: AuthenticatedUser,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    store.revoke_session(&user.0.jti).await?;

    tracing::info!(session_id = %user.0.jti, "Session revoked");

    Ok(HttpResponse::NoContent().finish())
}

/// POST /users/logout (bearer)
///
/// Deletes the session named by the caller's claims outright.
pub async fn logout(
    user: AuthenticatedUser,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    store.delete_session(&user.0.jti).await?;

    tracing::info!(session_id = %user.0.jti, "User logged out");

    Ok(HttpResponse::NoContent().finish())
}
