//! Handlers for the authenticated user's notification feed.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use kiss_core::error::CoreError;
use kiss_core::types::DbId;
use kiss_db::models::notification::Notification;
use kiss_db::repositories::NotificationRepo;
use kiss_db::{clamp_limit, clamp_offset};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the notification listing.
#[derive(Debug, Deserialize)]
pub struct NotificationListParams {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Response body for `GET /notifications/unread-count`.
#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub unread: i64,
}

/// GET /api/v1/notifications
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<NotificationListParams>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let notifications = NotificationRepo::list_for_user(
        &state.pool,
        auth_user.user_id,
        params.unread_only,
        clamp_limit(params.limit, 50, 200),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse {
        data: notifications,
    }))
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<UnreadCount>>> {
    let unread = NotificationRepo::unread_count(&state.pool, auth_user.user_id).await?;
    Ok(Json(DataResponse {
        data: UnreadCount { unread },
    }))
}

/// POST /api/v1/notifications/{id}/read
///
/// Marking is scoped to the caller; another user's notification id reads
/// as 404.
pub async fn mark_read(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let marked = NotificationRepo::mark_read(&state.pool, id, auth_user.user_id).await?;
    if !marked {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<StatusCode> {
    NotificationRepo::mark_all_read(&state.pool, auth_user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
