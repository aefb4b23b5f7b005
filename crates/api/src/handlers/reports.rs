//! Handlers for the ticket report endpoints.

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use kiss_core::export::csv_row;
use kiss_db::models::ticket::CountByGroup;
use kiss_db::repositories::{ReportRepo, TicketRepo};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default report window when no range is given.
const DEFAULT_REPORT_DAYS: i64 = 30;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Date-range parameters. `to` is exclusive at day granularity.
#[derive(Debug, Deserialize)]
pub struct ReportParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Response body for `GET /admin/reports/summary`.
#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub by_status: Vec<CountByGroup>,
    pub by_unit: Vec<CountByGroup>,
    pub by_category: Vec<CountByGroup>,
    /// Mean hours from creation to resolution, `None` when nothing was
    /// resolved in the range.
    pub avg_resolution_hours: Option<f64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/reports/summary
pub async fn summary(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Query(params): Query<ReportParams>,
) -> AppResult<Json<DataResponse<ReportSummary>>> {
    let (from, to) = resolve_range(&params);

    let by_status = TicketRepo::count_by_status(&state.pool, from, to).await?;
    let by_unit = ReportRepo::tickets_by_unit(&state.pool, from, to).await?;
    let by_category = ReportRepo::tickets_by_category(&state.pool, from, to).await?;
    let avg_resolution_hours = ReportRepo::avg_resolution_hours(&state.pool, from, to).await?;

    Ok(Json(DataResponse {
        data: ReportSummary {
            from,
            to,
            by_status,
            by_unit,
            by_category,
            avg_resolution_hours,
        },
    }))
}

/// GET /api/v1/admin/reports/tickets.csv
///
/// Flat CSV export of every ticket in the range, oldest first.
pub async fn tickets_csv(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Query(params): Query<ReportParams>,
) -> AppResult<impl IntoResponse> {
    let (from, to) = resolve_range(&params);
    let rows = ReportRepo::ticket_rows(&state.pool, from, to).await?;

    let mut csv = csv_row([
        "ticket_number",
        "kind",
        "category",
        "unit",
        "status",
        "subject",
        "created_at",
        "resolved_at",
    ]);
    csv.push('\n');
    for row in &rows {
        csv.push_str(&csv_row([
            row.ticket_number.as_str(),
            row.kind.as_str(),
            row.category.as_str(),
            row.unit_name.as_str(),
            row.status.as_str(),
            row.subject.as_str(),
            &row.created_at.to_rfc3339(),
            &row.resolved_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
        ]));
        csv.push('\n');
    }

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"tickets.csv\"".to_string(),
            ),
        ],
        csv,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Turn optional dates into a concrete UTC range. Defaults to the trailing
/// 30 days; `to` covers the whole named day.
fn resolve_range(params: &ReportParams) -> (DateTime<Utc>, DateTime<Utc>) {
    let to = match params.to {
        Some(date) => date
            .succ_opt()
            .unwrap_or(date)
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_else(Utc::now),
        None => Utc::now(),
    };
    let from = match params.from {
        Some(date) => date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_else(|| to - Duration::days(DEFAULT_REPORT_DAYS)),
        None => to - Duration::days(DEFAULT_REPORT_DAYS),
    };
    (from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_range_is_trailing_window() {
        let (from, to) = resolve_range(&ReportParams {
            from: None,
            to: None,
        });
        assert_eq!((to - from).num_days(), DEFAULT_REPORT_DAYS);
    }

    #[test]
    fn explicit_to_is_exclusive_end_of_day() {
        let (from, to) = resolve_range(&ReportParams {
            from: Some(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()),
            to: Some(NaiveDate::from_ymd_opt(2026, 8, 31).unwrap()),
        });
        assert_eq!(from.date_naive(), NaiveDate::from_ymd_opt(2026, 8, 1).unwrap());
        // The whole of Aug 31 is inside the range.
        assert_eq!(to.date_naive(), NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());
    }
}
