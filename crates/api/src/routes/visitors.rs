//! Route definitions for visitor registration.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::visitors;
use crate::state::AppState;

/// Public visitor routes mounted at `/visitors`.
///
/// ```text
/// POST / -> register (anonymous)
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new().route("/", post(visitors::register))
}

/// Admin visitor routes mounted at `/admin/visitors`.
///
/// ```text
/// GET    /           -> list (date-filterable)
/// GET    /export     -> export (CSV download)
/// DELETE /{id}       -> delete
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(visitors::list))
        .route("/export", get(visitors::export))
        .route("/{id}", axum::routing::delete(visitors::delete))
}
