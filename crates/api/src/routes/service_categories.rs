//! Route definitions for service categories.

use axum::routing::get;
use axum::Router;

use crate::handlers::service_categories;
use crate::state::AppState;

/// Public category routes mounted at `/service-categories`.
///
/// ```text
/// GET / -> list (optionally filtered by ?unit_id)
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new().route("/", get(service_categories::list))
}

/// Admin category routes mounted at `/admin/service-categories`.
///
/// ```text
/// GET    /         -> list
/// POST   /         -> create
/// PUT    /{id}     -> update
/// DELETE /{id}     -> delete
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(service_categories::list).post(service_categories::create),
        )
        .route(
            "/{id}",
            axum::routing::put(service_categories::update).delete(service_categories::delete),
        )
}
