//! Route definitions for hospital units and unit types.

use axum::routing::get;
use axum::Router;

use crate::handlers::units;
use crate::state::AppState;

/// Public unit routes mounted at `/units`.
///
/// The list endpoint is anonymous so submission forms can populate
/// their unit pickers.
///
/// ```text
/// GET / -> list_public (active units)
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new().route("/", get(units::list_public))
}

/// Admin unit routes mounted at `/admin/units`.
///
/// ```text
/// GET    /         -> list (may include inactive)
/// POST   /         -> create
/// GET    /{id}     -> get_by_id
/// PUT    /{id}     -> update
/// DELETE /{id}     -> deactivate
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(units::list).post(units::create))
        .route(
            "/{id}",
            get(units::get_by_id)
                .put(units::update)
                .delete(units::deactivate),
        )
}

/// Admin unit-type routes mounted at `/admin/unit-types`.
///
/// ```text
/// GET    /         -> list_types
/// POST   /         -> create_type
/// PUT    /{id}     -> update_type
/// DELETE /{id}     -> delete_type
/// ```
pub fn type_router() -> Router<AppState> {
    Router::new()
        .route("/", get(units::list_types).post(units::create_type))
        .route(
            "/{id}",
            axum::routing::put(units::update_type).delete(units::delete_type),
        )
}
