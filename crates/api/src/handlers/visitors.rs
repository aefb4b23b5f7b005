//! Handlers for the visitor registration resource.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use kiss_core::error::CoreError;
use kiss_core::export::csv_row;
use kiss_core::phone::normalize_phone;
use kiss_core::types::DbId;
use kiss_db::models::visitor::{CreateVisitor, Visitor};
use kiss_db::repositories::VisitorRepo;
use kiss_db::{clamp_limit, clamp_offset};
use kiss_events::PortalEvent;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for the public `POST /visitors`.
#[derive(Debug, Deserialize)]
pub struct RegisterVisitorRequest {
    pub name: String,
    pub institution: String,
    pub phone: String,
    pub email: Option<String>,
    pub purpose: Option<String>,
    pub visit_date: NaiveDate,
    pub unit_id: Option<DbId>,
}

/// Query parameters for listing and export.
#[derive(Debug, Deserialize)]
pub struct VisitorListParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/visitors
///
/// Public visitor registration. The phone number is validated and stored
/// in the normalized local form. Publishes `visitor.registered`.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterVisitorRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Visitor>>)> {
    if input.name.trim().is_empty() || input.institution.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "name and institution must not be empty".into(),
        )));
    }
    let phone = normalize_phone(&input.phone)?;

    let visitor = VisitorRepo::create(
        &state.pool,
        &CreateVisitor {
            name: input.name,
            institution: input.institution,
            phone,
            email: input.email,
            purpose: input.purpose,
            visit_date: input.visit_date,
            unit_id: input.unit_id,
        },
    )
    .await?;

    state.event_bus.publish(
        PortalEvent::new("visitor.registered")
            .with_source("visitor", visitor.id)
            .with_payload(serde_json::json!({
                "visit_date": visitor.visit_date,
                "unit_id": visitor.unit_id,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: visitor })))
}

/// GET /api/v1/admin/visitors
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Query(params): Query<VisitorListParams>,
) -> AppResult<Json<DataResponse<Vec<Visitor>>>> {
    let visitors = VisitorRepo::list(
        &state.pool,
        params.from,
        params.to,
        clamp_limit(params.limit, 50, 200),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse { data: visitors }))
}

/// GET /api/v1/admin/visitors/export
///
/// CSV export of the visitor log, oldest first, as a file download.
pub async fn export(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Query(params): Query<VisitorListParams>,
) -> AppResult<impl IntoResponse> {
    let visitors = VisitorRepo::list_for_export(&state.pool, params.from, params.to).await?;

    let mut csv = csv_row([
        "name",
        "institution",
        "phone",
        "email",
        "purpose",
        "visit_date",
        "registered_at",
    ]);
    csv.push('\n');
    for v in &visitors {
        csv.push_str(&csv_row([
            v.name.as_str(),
            v.institution.as_str(),
            v.phone.as_str(),
            v.email.as_deref().unwrap_or(""),
            v.purpose.as_deref().unwrap_or(""),
            &v.visit_date.to_string(),
            &v.created_at.to_rfc3339(),
        ]));
        csv.push('\n');
    }

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"visitors.csv\"".to_string(),
            ),
        ],
        csv,
    ))
}

/// DELETE /api/v1/admin/visitors/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = VisitorRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Visitor",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
