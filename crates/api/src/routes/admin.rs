//! Route definitions for `/admin` resources with no dedicated route file:
//! user management, escalation rules, reports, and the dashboard.

use axum::routing::get;
use axum::Router;

use crate::handlers::{dashboard, escalations, reports, users};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `admin` role (enforced by handler extractors);
/// granting admin-level roles additionally requires `superadmin`.
///
/// ```text
/// GET    /users                       -> list
/// POST   /users                       -> create
/// GET    /users/{id}                  -> get_by_id
/// PUT    /users/{id}                  -> update
/// DELETE /users/{id}                  -> deactivate
/// POST   /users/{id}/reset-password   -> reset_password
///
/// GET    /escalation-rules            -> list
/// POST   /escalation-rules            -> create
/// GET    /escalation-rules/{id}       -> get_by_id
/// PUT    /escalation-rules/{id}       -> update
/// DELETE /escalation-rules/{id}       -> delete
///
/// GET    /reports/summary             -> summary
/// GET    /reports/tickets.csv         -> tickets_csv
///
/// GET    /dashboard/overview          -> overview
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/{id}",
            get(users::get_by_id)
                .put(users::update)
                .delete(users::deactivate),
        )
        .route(
            "/users/{id}/reset-password",
            axum::routing::post(users::reset_password),
        )
        .route(
            "/escalation-rules",
            get(escalations::list).post(escalations::create),
        )
        .route(
            "/escalation-rules/{id}",
            get(escalations::get_by_id)
                .put(escalations::update)
                .delete(escalations::delete),
        )
        .route("/reports/summary", get(reports::summary))
        .route("/reports/tickets.csv", get(reports::tickets_csv))
        .route("/dashboard/overview", get(dashboard::overview))
}
