pub mod admin;
pub mod auth;
pub mod games;
pub mod health;
pub mod notifications;
pub mod qr;
pub mod service_categories;
pub mod surveys;
pub mod tickets;
pub mod units;
pub mod visitors;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (public)
/// /auth/logout                         logout (requires auth)
/// /auth/me                             current user (requires auth)
///
/// /tickets                             submit complaint/suggestion (public)
/// /tickets/track/{ticket_number}       track by number (public, redacted)
/// /surveys                             submit satisfaction survey (public)
/// /visitors                            register a visit (public)
/// /games/scores                        submit game score (public)
/// /games/leaderboard                   top scores (public)
/// /qr/{code}                           scan redirect (public, 307)
/// /units                               active units for form pickers (public)
/// /service-categories                  categories for form pickers (public)
///
/// /notifications                       list (?unread_only, limit, offset)
/// /notifications/unread-count          unread count (GET)
/// /notifications/{id}/read             mark read (POST)
/// /notifications/read-all              mark all read (POST)
///
/// /admin/tickets                       list, filter (staff: own unit only)
/// /admin/tickets/{id}                  get, soft-delete
/// /admin/tickets/{id}/history          status history
/// /admin/tickets/{id}/status           change status (PUT)
/// /admin/tickets/{id}/assign           assign to staff (PUT)
/// /admin/tickets/{id}/respond          record response (POST)
/// /admin/tickets/{id}/restore          restore soft-deleted (POST)
///
/// /admin/units                         list, create
/// /admin/units/{id}                    get, update, deactivate
/// /admin/unit-types                    list, create
/// /admin/unit-types/{id}               update, delete
/// /admin/service-categories            list, create
/// /admin/service-categories/{id}       update, delete
///
/// /admin/users                         list, create
/// /admin/users/{id}                    get, update, deactivate
/// /admin/users/{id}/reset-password     reset password (POST)
///
/// /admin/visitors                      list (date-filterable)
/// /admin/visitors/export               CSV download
/// /admin/visitors/{id}                 delete
///
/// /admin/surveys                       list
/// /admin/surveys/statistics            overall + per-unit averages
///
/// /admin/qr                            list, create
/// /admin/qr/{id}                       get, update, deactivate
/// /admin/qr/{id}/analytics             scan counts per day
///
/// /admin/escalation-rules              list, create
/// /admin/escalation-rules/{id}         get, update, delete
///
/// /admin/reports/summary               ticket report over a date range
/// /admin/reports/tickets.csv           ticket export (CSV)
/// /admin/dashboard/overview            headline counts
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (login, refresh, logout, me).
        .nest("/auth", auth::router())
        // Public submission surfaces (no auth).
        .nest("/tickets", tickets::public_router())
        .nest("/surveys", surveys::public_router())
        .nest("/visitors", visitors::public_router())
        .nest("/games", games::router())
        .nest("/qr", qr::public_router())
        .nest("/units", units::public_router())
        .nest("/service-categories", service_categories::public_router())
        // Per-user notification feed.
        .nest("/notifications", notifications::router())
        // Admin surfaces (role enforced by handler extractors).
        .nest("/admin/tickets", tickets::admin_router())
        .nest("/admin/units", units::admin_router())
        .nest("/admin/unit-types", units::type_router())
        .nest(
            "/admin/service-categories",
            service_categories::admin_router(),
        )
        .nest("/admin/visitors", visitors::admin_router())
        .nest("/admin/surveys", surveys::admin_router())
        .nest("/admin/qr", qr::admin_router())
        // Users, escalation rules, reports, dashboard.
        .nest("/admin", admin::router())
}
