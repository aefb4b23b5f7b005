//! Handlers for the `/admin/users` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kiss_core::error::CoreError;
use kiss_core::types::DbId;
use kiss_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use kiss_db::repositories::{RoleRepo, SessionRepo, UserRepo};
use serde::Deserialize;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/users`. The plaintext password is hashed
/// here; the repository only ever sees the hash.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role_id: DbId,
    pub unit_id: Option<DbId>,
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
/// Creating an account with an admin-level role takes the superadmin role.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    require_role_grant(&state, &actor, input.role_id).await?;
    validate_password_strength(&input.password)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let password_hash = hash_password(&input.password)?;
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            email: input.email,
            password_hash,
            role_id: input.role_id,
            unit_id: input.unit_id,
        },
    )
    .await?;

    let response = to_response(&state, user).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// GET /api/v1/admin/users
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    let mut responses = Vec::with_capacity(users.len());
    for user in users {
        responses.push(to_response(&state, user).await?);
    }
    Ok(Json(DataResponse { data: responses }))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let response = to_response(&state, user).await?;
    Ok(Json(DataResponse { data: response }))
}

/// PUT /api/v1/admin/users/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    if let Some(role_id) = input.role_id {
        require_role_grant(&state, &actor, role_id).await?;
    }
    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    let response = to_response(&state, user).await?;
    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/admin/users/{id}/reset-password
///
/// Sets a new password and revokes every session of the user.
pub async fn reset_password(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password_strength(&input.new_password)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let password_hash = hash_password(&input.new_password)?;
    let updated = UserRepo::set_password_hash(&state.pool, id, &password_hash).await?;
    if !updated {
        return Err(not_found(id));
    }

    SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/admin/users/{id}
///
/// Deactivates the account (no hard delete) and revokes its sessions.
pub async fn deactivate(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deactivated = UserRepo::deactivate(&state.pool, id).await?;
    if !deactivated {
        return Err(not_found(id));
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Only superadmins may hand out the admin or superadmin roles.
async fn require_role_grant(state: &AppState, actor: &AuthUser, role_id: DbId) -> AppResult<()> {
    use kiss_core::roles::{ROLE_STAFF, ROLE_SUPERADMIN};

    let role_name = RoleRepo::resolve_name(&state.pool, role_id).await?;
    if role_name != ROLE_STAFF && actor.role != ROLE_SUPERADMIN {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Granting the {role_name} role requires the superadmin role"
        ))));
    }
    Ok(())
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "User",
        id,
    })
}

/// Resolve the role name and strip the password hash.
async fn to_response(state: &AppState, user: User) -> AppResult<UserResponse> {
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    Ok(UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        role,
        role_id: user.role_id,
        unit_id: user.unit_id,
        is_active: user.is_active,
        last_login_at: user.last_login_at,
        created_at: user.created_at,
    })
}
