//! Handlers for escalation rule management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kiss_core::error::CoreError;
use kiss_core::roles::is_valid_role;
use kiss_core::ticket::TicketCategory;
use kiss_core::types::DbId;
use kiss_db::models::escalation_rule::{
    CreateEscalationRule, EscalationRule, UpdateEscalationRule,
};
use kiss_db::repositories::EscalationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/admin/escalation-rules
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Json(input): Json<CreateEscalationRule>,
) -> AppResult<(StatusCode, Json<DataResponse<EscalationRule>>)> {
    validate_rule(
        Some(input.escalate_to_role.as_str()),
        input.ticket_category.as_deref(),
        Some(input.threshold_hours),
    )?;
    let rule = EscalationRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: rule })))
}

/// GET /api/v1/admin/escalation-rules
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<EscalationRule>>>> {
    let rules = EscalationRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: rules }))
}

/// GET /api/v1/admin/escalation-rules/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EscalationRule>>> {
    let rule = EscalationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: rule }))
}

/// PUT /api/v1/admin/escalation-rules/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEscalationRule>,
) -> AppResult<Json<DataResponse<EscalationRule>>> {
    validate_rule(
        input.escalate_to_role.as_deref(),
        input.ticket_category.as_deref(),
        input.threshold_hours,
    )?;
    let rule = EscalationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: rule }))
}

/// DELETE /api/v1/admin/escalation-rules/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = EscalationRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "EscalationRule",
        id,
    })
}

/// Validate the fields a rule row cannot enforce itself.
fn validate_rule(
    escalate_to_role: Option<&str>,
    ticket_category: Option<&str>,
    threshold_hours: Option<i32>,
) -> AppResult<()> {
    if let Some(role) = escalate_to_role {
        if !is_valid_role(role) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown role: {role}"
            ))));
        }
    }
    if let Some(category) = ticket_category {
        TicketCategory::parse(category)?;
    }
    if let Some(hours) = threshold_hours {
        if hours < 1 {
            return Err(AppError::Core(CoreError::Validation(
                "threshold_hours must be at least 1".into(),
            )));
        }
    }
    Ok(())
}
