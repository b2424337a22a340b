//! Handlers for `/admin/users` (user management).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bimbingan_core::error::CoreError;
use bimbingan_core::types::DbId;
use bimbingan_core::validation::{normalize_optional, validate_input};
use bimbingan_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use bimbingan_db::repositories::{RoleRepo, SessionRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::RoleFilterParams;
use crate::response::{created, Created, DataResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    /// NIM for students, NIP for advisors.
    #[validate(length(max = 30))]
    pub identity_number: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    pub role_id: DbId,
}

impl CreateUserRequest {
    fn into_new_user(self, password_hash: String) -> CreateUser {
        CreateUser {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password_hash,
            full_name: self.full_name.trim().to_string(),
            identity_number: normalize_optional(self.identity_number),
            phone: normalize_optional(self.phone),
            role_id: self.role_id,
        }
    }
}

/// Request body for `PUT /admin/users/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub full_name: Option<String>,
    #[validate(length(max = 30))]
    pub identity_number: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    pub role_id: Option<DbId>,
    pub is_active: Option<bool>,
}

/// Request body for `POST /admin/users/{id}/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/users
///
/// Create a new user and return it with 201 Created.
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<Created<UserResponse>> {
    validate_input(&input)?;
    validate_password_strength(&input.password)?;
    ensure_role_exists(&state, input.role_id).await?;

    let password_hash = hash_new_password(&input.password)?;
    let user = UserRepo::create(&state.pool, &input.into_new_user(password_hash)).await?;
    tracing::info!(user_id = user.id, admin_id = admin.user_id, "User created");

    let response = user_to_response(&state, &user).await?;
    Ok(created(response))
}

/// GET /api/v1/admin/users
///
/// List users with resolved role names, optionally filtered by `?role_id=`.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<RoleFilterParams>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let (users, roles) = tokio::try_join!(
        UserRepo::list(&state.pool, params.role_id),
        RoleRepo::list(&state.pool),
    )?;
    let role_names: HashMap<DbId, String> =
        roles.into_iter().map(|role| (role.id, role.name)).collect();

    let data = users
        .iter()
        .map(|user| {
            let role_name = role_names
                .get(&user.role_id)
                .cloned()
                .unwrap_or_else(|| "unknown".to_string());
            UserResponse::from_user(user, role_name)
        })
        .collect();

    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| user_not_found(id))?;

    let response = user_to_response(&state, &user).await?;
    Ok(Json(DataResponse { data: response }))
}

/// PUT /api/v1/admin/users/{id}
///
/// Update a user's account fields (not the password).
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    validate_input(&input)?;
    if let Some(role_id) = input.role_id {
        ensure_role_exists(&state, role_id).await?;
    }

    let update_dto = UpdateUser {
        username: normalize_optional(input.username),
        email: normalize_optional(input.email),
        full_name: normalize_optional(input.full_name),
        identity_number: normalize_optional(input.identity_number),
        phone: normalize_optional(input.phone),
        role_id: input.role_id,
        is_active: input.is_active,
    };

    let user = UserRepo::update(&state.pool, id, &update_dto)
        .await?
        .ok_or_else(|| user_not_found(id))?;

    let response = user_to_response(&state, &user).await?;
    Ok(Json(DataResponse { data: response }))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Soft-deactivate a user and revoke their sessions. Returns 204 No Content.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Conflict(
            "Admins cannot deactivate their own account".into(),
        )));
    }

    if !UserRepo::deactivate(&state.pool, id).await? {
        return Err(user_not_found(id));
    }

    SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    tracing::info!(user_id = id, admin_id = admin.user_id, "User deactivated");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/users/{id}/reset-password
///
/// Admin-initiated password reset for a user.
pub async fn reset_password(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password_strength(&input.new_password)?;

    let password_hash = hash_new_password(&input.new_password)?;

    if !UserRepo::update_password(&state.pool, id, &password_hash).await? {
        return Err(user_not_found(id));
    }
    // Existing sessions were opened with the old password.
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    tracing::info!(user_id = id, admin_id = admin.user_id, revoked, "Password reset by admin");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn user_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}

fn hash_new_password(password: &str) -> AppResult<String> {
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

/// Convert a [`User`] row into a safe [`UserResponse`] by resolving the role name.
async fn user_to_response(state: &AppState, user: &User) -> AppResult<UserResponse> {
    let role_name = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    Ok(UserResponse::from_user(user, role_name))
}

async fn ensure_role_exists(state: &AppState, role_id: DbId) -> AppResult<()> {
    RoleRepo::find_by_id(&state.pool, role_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Unknown role_id {role_id}"
            )))
        })
}
