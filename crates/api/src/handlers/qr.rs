//! Handlers for QR codes: admin CRUD, scan analytics, and the public
//! redirect endpoint.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect};
use axum::Json;
use kiss_core::error::CoreError;
use kiss_core::qr::{generate_code, QrTarget};
use kiss_core::types::{DbId, Timestamp};
use kiss_db::models::qr_code::{CreateQrCode, DailyScans, QrCode, UpdateQrCode};
use kiss_db::repositories::QrRepo;
use kiss_events::PortalEvent;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/qr`.
#[derive(Debug, Deserialize)]
pub struct CreateQrRequest {
    pub label: String,
    /// One of `unit`, `form`, `url`.
    pub target: String,
    pub target_unit_id: Option<DbId>,
    pub target_url: Option<String>,
}

/// Query parameters for the analytics endpoint.
#[derive(Debug, Deserialize)]
pub struct AnalyticsParams {
    /// Trailing window in days (default 30).
    pub days: Option<i32>,
}

/// Response body for `GET /admin/qr/{id}/analytics`.
#[derive(Debug, Serialize)]
pub struct QrAnalytics {
    pub qr_code_id: DbId,
    pub total_scans: i64,
    pub last_scan_at: Option<Timestamp>,
    pub daily: Vec<DailyScans>,
}

// ---------------------------------------------------------------------------
// Admin handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/qr
///
/// Mints an opaque code and stores the target. `unit` and `form` targets
/// need `target_unit_id`; `url` targets need an absolute `target_url`.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Json(input): Json<CreateQrRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<QrCode>>)> {
    let target = QrTarget::parse(&input.target)?;
    validate_target(target, input.target_unit_id, input.target_url.as_deref())?;

    let code = generate_code();
    let qr = QrRepo::create(
        &state.pool,
        &code,
        &CreateQrCode {
            label: input.label,
            target: target.as_str().to_string(),
            target_unit_id: input.target_unit_id,
            target_url: input.target_url,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: qr })))
}

/// GET /api/v1/admin/qr
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<QrCode>>>> {
    let codes = QrRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: codes }))
}

/// GET /api/v1/admin/qr/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<QrCode>>> {
    let qr = QrRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: qr }))
}

/// PUT /api/v1/admin/qr/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateQrCode>,
) -> AppResult<Json<DataResponse<QrCode>>> {
    let qr = QrRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: qr }))
}

/// DELETE /api/v1/admin/qr/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = QrRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/qr/{id}/analytics
pub async fn analytics(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
    Query(params): Query<AnalyticsParams>,
) -> AppResult<Json<DataResponse<QrAnalytics>>> {
    let qr = QrRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let days = params.days.unwrap_or(30).clamp(1, 365);
    let daily = QrRepo::daily_scans(&state.pool, id, days).await?;
    let last_scan_at = QrRepo::last_scan_at(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: QrAnalytics {
            qr_code_id: id,
            total_scans: qr.scan_count,
            last_scan_at,
            daily,
        },
    }))
}

// ---------------------------------------------------------------------------
// Public scan endpoint
// ---------------------------------------------------------------------------

/// GET /api/v1/qr/{code}
///
/// Public scan endpoint. Records the scan, publishes `qr.scanned`, and
/// redirects to the target. Inactive codes answer 410 Gone; unknown codes
/// 404.
pub async fn scan(
    State(state): State<AppState>,
    Path(code): Path<String>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let Some(qr) = QrRepo::find_by_code(&state.pool, &code).await? else {
        return Ok((StatusCode::NOT_FOUND, "Unknown QR code").into_response());
    };

    if !qr.is_active {
        return Ok((StatusCode::GONE, "This QR code has been retired").into_response());
    }

    let user_agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok());
    let referer = headers
        .get(axum::http::header::REFERER)
        .and_then(|v| v.to_str().ok());

    QrRepo::record_scan(&state.pool, qr.id, user_agent, referer).await?;

    state.event_bus.publish(
        PortalEvent::new("qr.scanned")
            .with_source("qr_code", qr.id)
            .with_payload(serde_json::json!({
                "code": qr.code,
                "target": qr.target,
            })),
    );

    let destination = resolve_destination(&state.config.public_base_url, &qr);
    Ok(Redirect::temporary(&destination).into_response())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "QrCode",
        id,
    })
}

/// Reject target combinations that could never redirect anywhere.
fn validate_target(
    target: QrTarget,
    target_unit_id: Option<DbId>,
    target_url: Option<&str>,
) -> AppResult<()> {
    match target {
        QrTarget::Unit | QrTarget::Form => {
            if target_unit_id.is_none() {
                return Err(AppError::Core(CoreError::Validation(format!(
                    "target {} requires target_unit_id",
                    target.as_str()
                ))));
            }
        }
        QrTarget::Url => match target_url {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {}
            _ => {
                return Err(AppError::Core(CoreError::Validation(
                    "target url requires an absolute http(s) target_url".into(),
                )));
            }
        },
    }
    Ok(())
}

/// Build the redirect destination for a scanned code.
fn resolve_destination(base_url: &str, qr: &QrCode) -> String {
    let base = base_url.trim_end_matches('/');
    match qr.target.as_str() {
        "unit" => match qr.target_unit_id {
            Some(unit_id) => format!("{base}/units/{unit_id}"),
            None => base.to_string(),
        },
        "form" => match qr.target_unit_id {
            Some(unit_id) => format!("{base}/survey?unit={unit_id}"),
            None => format!("{base}/survey"),
        },
        _ => qr.target_url.clone().unwrap_or_else(|| base.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn qr(target: &str, unit: Option<DbId>, url: Option<&str>) -> QrCode {
        QrCode {
            id: 1,
            code: "AbC123XyZ789".into(),
            label: "Lobby".into(),
            target: target.into(),
            target_unit_id: unit,
            target_url: url.map(String::from),
            is_active: true,
            scan_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn unit_target_redirects_to_unit_page() {
        let dest = resolve_destination("http://localhost:5173/", &qr("unit", Some(7), None));
        assert_eq!(dest, "http://localhost:5173/units/7");
    }

    #[test]
    fn form_target_carries_unit_query() {
        let dest = resolve_destination("http://localhost:5173", &qr("form", Some(3), None));
        assert_eq!(dest, "http://localhost:5173/survey?unit=3");
    }

    #[test]
    fn url_target_uses_stored_url() {
        let dest = resolve_destination(
            "http://localhost:5173",
            &qr("url", None, Some("https://example.org/info")),
        );
        assert_eq!(dest, "https://example.org/info");
    }

    #[test]
    fn unit_target_requires_unit_id() {
        assert!(validate_target(QrTarget::Unit, None, None).is_err());
        assert!(validate_target(QrTarget::Unit, Some(1), None).is_ok());
    }

    #[test]
    fn url_target_requires_absolute_url() {
        assert!(validate_target(QrTarget::Url, None, Some("/relative")).is_err());
        assert!(validate_target(QrTarget::Url, None, Some("https://ok.example")).is_ok());
    }
}
