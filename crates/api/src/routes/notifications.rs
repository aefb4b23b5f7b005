//! Route definitions for in-app notifications.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notifications;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// All routes require auth and are scoped to the calling user.
///
/// ```text
/// GET  /                 -> list (?unread_only, limit, offset)
/// GET  /unread-count     -> unread_count
/// POST /{id}/read        -> mark_read
/// POST /read-all         -> mark_all_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::list))
        .route("/unread-count", get(notifications::unread_count))
        .route("/{id}/read", post(notifications::mark_read))
        .route("/read-all", post(notifications::mark_all_read))
}
