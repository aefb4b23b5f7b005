//! Route definitions for the public and admin ticket surfaces.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::tickets;
use crate::state::AppState;

/// Public ticket routes mounted at `/tickets`.
///
/// ```text
/// POST /                         -> submit (anonymous)
/// GET  /track/{ticket_number}    -> track (redacted view)
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", post(tickets::submit))
        .route("/track/{ticket_number}", get(tickets::track))
}

/// Admin ticket routes mounted at `/admin/tickets`.
///
/// All routes require auth; staff only see their own unit's tickets.
///
/// ```text
/// GET    /                   -> list (filterable)
/// GET    /{id}               -> get_by_id
/// GET    /{id}/history       -> history
/// PUT    /{id}/status        -> change_status
/// PUT    /{id}/assign        -> assign
/// POST   /{id}/respond       -> respond
/// DELETE /{id}               -> delete (soft, admin only)
/// POST   /{id}/restore       -> restore (admin only)
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(tickets::list))
        .route(
            "/{id}",
            get(tickets::get_by_id).delete(tickets::delete),
        )
        .route("/{id}/history", get(tickets::history))
        .route("/{id}/status", put(tickets::change_status))
        .route("/{id}/assign", put(tickets::assign))
        .route("/{id}/respond", post(tickets::respond))
        .route("/{id}/restore", post(tickets::restore))
}
