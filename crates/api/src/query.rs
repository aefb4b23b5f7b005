//! Shared query parameter types for API handlers.
//!
//! Common query structs that appear across multiple handler modules are
//! extracted here to avoid duplication.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Used by any handler that supports paginated listing. Values are clamped
/// via `kiss_db::clamp_limit` / `kiss_db::clamp_offset`.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for list endpoints that support an `include_inactive`
/// flag (units and other soft-deactivated reference data).
#[derive(Debug, Deserialize)]
pub struct IncludeInactiveParams {
    #[serde(default)]
    pub include_inactive: bool,
}

/// Date-range parameters (`?from=&to=`, ISO dates) shared by the visitor
/// listing, exports, and reports.
#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub from: Option<chrono::NaiveDate>,
    pub to: Option<chrono::NaiveDate>,
}
