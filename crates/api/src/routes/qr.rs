//! Route definitions for QR code management and the public scan redirect.

use axum::routing::get;
use axum::Router;

use crate::handlers::qr;
use crate::state::AppState;

/// Public QR routes mounted at `/qr`.
///
/// ```text
/// GET /{code} -> scan (records the hit, 302 to the destination)
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new().route("/{code}", get(qr::scan))
}

/// Admin QR routes mounted at `/admin/qr`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> create
/// GET    /{id}             -> get_by_id
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete (deactivates)
/// GET    /{id}/analytics   -> analytics (scan counts per day)
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(qr::list).post(qr::create))
        .route(
            "/{id}",
            get(qr::get_by_id).put(qr::update).delete(qr::delete),
        )
        .route("/{id}/analytics", get(qr::analytics))
}
