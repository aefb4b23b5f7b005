//! Route definitions for the satisfaction survey surfaces.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::surveys;
use crate::state::AppState;

/// Public survey routes mounted at `/surveys`.
///
/// ```text
/// POST / -> submit (anonymous)
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new().route("/", post(surveys::submit))
}

/// Admin survey routes mounted at `/admin/surveys`.
///
/// ```text
/// GET /             -> list
/// GET /statistics   -> statistics (overall + per-unit averages)
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(surveys::list))
        .route("/statistics", get(surveys::statistics))
}
