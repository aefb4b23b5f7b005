//! Handlers for the satisfaction survey resource.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use kiss_core::phone::normalize_phone;
use kiss_core::survey::{validate_score, ScoreStats};
use kiss_core::types::DbId;
use kiss_db::models::survey::{CreateSurvey, Survey};
use kiss_db::repositories::SurveyRepo;
use kiss_db::{clamp_limit, clamp_offset};
use kiss_events::PortalEvent;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default statistics window when no range is given.
const DEFAULT_STATS_DAYS: i64 = 30;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for the public `POST /surveys`.
#[derive(Debug, Deserialize)]
pub struct SubmitSurveyRequest {
    pub unit_id: DbId,
    pub service_category_id: Option<DbId>,
    pub score: i16,
    pub comment: Option<String>,
    pub respondent_phone: Option<String>,
}

/// Query parameters for the admin listing.
#[derive(Debug, Deserialize)]
pub struct SurveyListParams {
    pub unit_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for `GET /admin/surveys/statistics`.
#[derive(Debug, Deserialize)]
pub struct StatisticsParams {
    pub unit_id: Option<DbId>,
    /// Trailing window in days (default 30).
    pub days: Option<i64>,
}

/// Per-unit score statistics.
#[derive(Debug, Serialize)]
pub struct UnitStats {
    pub unit_id: DbId,
    pub unit_name: String,
    #[serde(flatten)]
    pub stats: ScoreStats,
}

/// Response body for the statistics endpoint.
#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    pub overall: ScoreStats,
    pub per_unit: Vec<UnitStats>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/surveys
///
/// Public survey submission. Publishes `survey.submitted`.
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<SubmitSurveyRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Survey>>)> {
    validate_score(input.score)?;
    let respondent_phone = input
        .respondent_phone
        .as_deref()
        .map(normalize_phone)
        .transpose()?;

    let survey = SurveyRepo::create(
        &state.pool,
        &CreateSurvey {
            unit_id: input.unit_id,
            service_category_id: input.service_category_id,
            score: input.score,
            comment: input.comment,
            respondent_phone,
        },
    )
    .await?;

    state.event_bus.publish(
        PortalEvent::new("survey.submitted")
            .with_source("survey", survey.id)
            .with_payload(serde_json::json!({
                "unit_id": survey.unit_id,
                "score": survey.score,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: survey })))
}

/// GET /api/v1/admin/surveys
///
/// Staff users are pinned to their own unit; admins may filter freely.
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<SurveyListParams>,
) -> AppResult<Json<DataResponse<Vec<Survey>>>> {
    let unit_id = auth_user.unit_scope().or(params.unit_id);
    let surveys = SurveyRepo::list(
        &state.pool,
        unit_id,
        clamp_limit(params.limit, 50, 200),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse { data: surveys }))
}

/// GET /api/v1/admin/surveys/statistics
///
/// Aggregates raw scores into overall and per-unit mean/distribution.
pub async fn statistics(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<StatisticsParams>,
) -> AppResult<Json<DataResponse<StatisticsResponse>>> {
    let days = params.days.unwrap_or(DEFAULT_STATS_DAYS).clamp(1, 365);
    let to = Utc::now();
    let from = to - Duration::days(days);
    let unit_id = auth_user.unit_scope().or(params.unit_id);

    let rows = SurveyRepo::scores_in_range(&state.pool, unit_id, from, to).await?;

    let all_scores: Vec<i16> = rows.iter().map(|r| r.score).collect();
    let overall = ScoreStats::from_scores(&all_scores);

    let mut by_unit: BTreeMap<DbId, (String, Vec<i16>)> = BTreeMap::new();
    for row in rows {
        by_unit
            .entry(row.unit_id)
            .or_insert_with(|| (row.unit_name.clone(), Vec::new()))
            .1
            .push(row.score);
    }

    let per_unit = by_unit
        .into_iter()
        .map(|(unit_id, (unit_name, scores))| UnitStats {
            unit_id,
            unit_name,
            stats: ScoreStats::from_scores(&scores),
        })
        .collect();

    Ok(Json(DataResponse {
        data: StatisticsResponse { overall, per_unit },
    }))
}
