//! Handler for the admin dashboard overview.

use axum::extract::State;
use axum::Json;
use kiss_db::repositories::{DashboardRepo, OverviewCounts};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/dashboard/overview
///
/// Landing-page counters: open tickets, today's activity, and the trailing
/// 30-day mean survey score.
pub async fn overview(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
) -> AppResult<Json<DataResponse<OverviewCounts>>> {
    let counts = DashboardRepo::overview(&state.pool).await?;
    Ok(Json(DataResponse { data: counts }))
}
