/// Bearer-token request guards
///
/// `AuthenticatedUser` and `AdminUser` are extractors: declaring one as a
/// handler parameter is what gates the route. Both share the same
/// verification core; handlers receive the verified claims directly and
/// never re-parse the token.

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::{Claims, TokenService};
use crate::error::{AppError, AuthError};

/// Any caller holding a valid bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

/// A caller holding a valid bearer token whose claims carry the admin flag.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

/// Pull the bearer token out of the Authorization header and verify it.
///
/// The header must have exactly two whitespace-separated fields and the
/// first must be `Bearer`.
fn bearer_claims(req: &HttpRequest) -> Result<Claims, AppError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AppError::Auth(AuthError::MissingToken))?;

    let raw = header_value
        .to_str()
        .map_err(|_| AppError::Auth(AuthError::MalformedAuthHeader))?;

    let fields: Vec<&str> = raw.split_whitespace().collect();
    if fields.len() != 2 || fields[0] != "Bearer" {
        return Err(AppError::Auth(AuthError::MalformedAuthHeader));
    }

    let token_service = req
        .app_data::<web::Data<TokenService>>()
        .ok_or_else(|| AppError::Internal("Token service not configured".to_string()))?;

    token_service.verify_token(fields[1])
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(bearer_claims(req).map(AuthenticatedUser))
    }
}

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(bearer_claims(req).and_then(|claims| {
            if !claims.is_admin {
                tracing::warn!(user = %claims.sub, "Admin route rejected non-admin user");
                return Err(AppError::Auth(AuthError::NotAdmin));
            }
            Ok(AdminUser(claims))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App, HttpResponse};
    use uuid::Uuid;

    const TEST_SECRET: &str = "test-secret-key-at-least-32-characters-long";

    async fn protected(_user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    async fn admin_only(_user: AdminUser) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    fn token_service() -> TokenService {
        TokenService::new(TEST_SECRET)
    }

    async fn status_for(auth_header: Option<&str>, path: &str) -> StatusCode {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(token_service()))
                .route("/protected", web::get().to(protected))
                .route("/admin", web::get().to(admin_only)),
        )
        .await;

        let mut req = test::TestRequest::get().uri(path);
        if let Some(value) = auth_header {
            req = req.insert_header((header::AUTHORIZATION, value));
        }
        let res = test::call_service(&app, req.to_request()).await;
        res.status()
    }

    #[actix_web::test]
    async fn missing_header_is_unauthorized() {
        assert_eq!(status_for(None, "/protected").await, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn garbage_token_is_unauthorized() {
        assert_eq!(
            status_for(Some("Bearer garbage"), "/protected").await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn malformed_headers_are_unauthorized() {
        for value in ["Bearer", "Basic dXNlcjpwYXNz", "Bearer a b", "token-alone"] {
            assert_eq!(
                status_for(Some(value), "/protected").await,
                StatusCode::UNAUTHORIZED,
                "header {:?} should be rejected",
                value
            );
        }
    }

    #[actix_web::test]
    async fn valid_token_passes_the_plain_gate() {
        let service = token_service();
        let (token, _) = service
            .create_token(Uuid::new_v4(), "user@example.com", false, 3600)
            .unwrap();

        assert_eq!(
            status_for(Some(&format!("Bearer {}", token)), "/protected").await,
            StatusCode::OK
        );
    }

    #[actix_web::test]
    async fn expired_token_is_unauthorized() {
        let service = token_service();
        let (token, _) = service
            .create_token(Uuid::new_v4(), "user@example.com", false, -120)
            .unwrap();

        assert_eq!(
            status_for(Some(&format!("Bearer {}", token)), "/protected").await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn non_admin_is_forbidden_on_admin_gate() {
        let service = token_service();
        let (token, _) = service
            .create_token(Uuid::new_v4(), "user@example.com", false, 3600)
            .unwrap();

        assert_eq!(
            status_for(Some(&format!("Bearer {}", token)), "/admin").await,
            StatusCode::FORBIDDEN
        );
    }

    #[actix_web::test]
    async fn admin_passes_the_admin_gate() {
        let service = token_service();
        let (token, _) = service
            .create_token(Uuid::new_v4(), "admin@example.com", true, 3600)
            .unwrap();

        assert_eq!(
            status_for(Some(&format!("Bearer {}", token)), "/admin").await,
            StatusCode::OK
        );
    }
}
