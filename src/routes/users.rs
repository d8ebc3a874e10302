/// User endpoints
///
/// Public creation, admin-only listing and deletion, and self-service
/// updates for the authenticated caller.

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::hash_password;
use crate::error::{AppError, ErrorContext};
use crate::middleware::{AdminUser, AuthenticatedUser};
use crate::store::{Store, User};
use crate::validators::{is_valid_email, is_valid_name};

/// Create/update payload. All fields are optional on update; empty values
/// leave the stored field untouched.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersResponse {
    pub users: Vec<UserResponse>,
}

/// POST /users
pub async fn create_user(
    form: web::Json<UserRequest>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("create_user");

    let email = is_valid_email(&form.email)?;
    let name = is_valid_name(&form.name)?;
    let password_hash = hash_password(&form.password)?;

    let user = store
        .create_user(User {
            id: Uuid::nil(),
            name,
            email,
            password_hash,
            is_admin: form.is_admin,
            created_at: Utc::now(),
            updated_at: None,
        })
        .await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id,
        "User created"
    );

    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}

/// GET /users (admin)
pub async fn list_users(
    _admin: AdminUser,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let users = store.list_users().await?;

    Ok(HttpResponse::Ok().json(ListUsersResponse {
        users: users.iter().map(UserResponse::from).collect(),
    }))
}

/// PATCH /users
///
/// Updates the caller's own record; identity comes from the verified claims.
pub async fn update_user(
    user: AuthenticatedUser,
    form: web::Json<UserRequest>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let claims = user.0;
    let mut record = store.get_user_by_email(&claims.email).await?;

    patch_user(&mut record, &form)?;
    record.updated_at = Some(Utc::now());

    let updated = store.update_user(record).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(&updated)))
}

/// DELETE /users/{id} (admin)
pub async fn delete_user(
    _admin: AdminUser,
    path: web::Path<Uuid>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    store.delete_user(path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

fn patch_user(user: &mut User, req: &UserRequest) -> Result<(), AppError> {
    if !req.name.is_empty() {
        user.name = is_valid_name(&req.name)?;
    }
    if !req.email.is_empty() {
        user.email = is_valid_email(&req.email)?;
    }
    if req.is_admin {
        user.is_admin = true;
    }
    if !req.password.is_empty() {
        user.password_hash = hash_password(&req.password)?;
    }
    Ok(())
}
