//! Handlers for the ticket resource.
//!
//! The public submission and tracking endpoints live alongside the admin
//! endpoints; the routers decide which get mounted where.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use kiss_core::error::CoreError;
use kiss_core::phone::normalize_phone;
use kiss_core::ticket::{TicketCategory, TicketKind, TicketStatus};
use kiss_core::types::DbId;
use kiss_db::models::ticket::{CreateTicket, Ticket, TicketFilter, TicketStatusHistory};
use kiss_db::repositories::TicketRepo;
use kiss_db::{clamp_limit, clamp_offset};
use kiss_events::PortalEvent;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for the public `POST /tickets`.
#[derive(Debug, Deserialize)]
pub struct SubmitTicketRequest {
    pub kind: String,
    pub category: String,
    pub unit_id: DbId,
    pub reporter_name: String,
    pub reporter_phone: Option<String>,
    pub reporter_email: Option<String>,
    pub subject: String,
    pub body: String,
}

/// Public view of a submitted ticket: enough to track it, nothing internal.
#[derive(Debug, Serialize)]
pub struct PublicTicket {
    pub ticket_number: String,
    pub status: String,
    pub subject: String,
    pub response: Option<String>,
    pub created_at: kiss_core::types::Timestamp,
}

impl From<Ticket> for PublicTicket {
    fn from(t: Ticket) -> Self {
        Self {
            ticket_number: t.ticket_number,
            status: t.status,
            subject: t.subject,
            response: t.response,
            created_at: t.created_at,
        }
    }
}

/// Query parameters for the admin listing.
#[derive(Debug, Deserialize)]
pub struct TicketListParams {
    pub status: Option<String>,
    pub kind: Option<String>,
    pub category: Option<String>,
    pub unit_id: Option<DbId>,
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request body for `POST /admin/tickets/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: String,
    pub note: Option<String>,
}

/// Request body for `POST /admin/tickets/{id}/assign`.
#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    /// `null` unassigns.
    pub user_id: Option<DbId>,
}

/// Request body for `POST /admin/tickets/{id}/respond`.
#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub response: String,
}

// ---------------------------------------------------------------------------
// Public handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/tickets
///
/// Public complaint/request submission. Allocates the ticket number and
/// publishes `ticket.created`.
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<SubmitTicketRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<PublicTicket>>)> {
    let kind = TicketKind::parse(&input.kind)?;
    let category = TicketCategory::parse(&input.category)?;

    if input.reporter_name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "reporter_name must not be empty".into(),
        )));
    }
    if input.subject.trim().is_empty() || input.body.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "subject and body must not be empty".into(),
        )));
    }

    let reporter_phone = input
        .reporter_phone
        .as_deref()
        .map(normalize_phone)
        .transpose()?;

    let ticket = TicketRepo::create(
        &state.pool,
        &CreateTicket {
            kind: kind.as_str().to_string(),
            category: category.as_str().to_string(),
            unit_id: input.unit_id,
            reporter_name: input.reporter_name,
            reporter_phone,
            reporter_email: input.reporter_email,
            reporter_user_id: None,
            subject: input.subject,
            body: input.body,
        },
    )
    .await?;

    state.event_bus.publish(
        PortalEvent::new("ticket.created")
            .with_source("ticket", ticket.id)
            .with_payload(serde_json::json!({
                "ticket_number": ticket.ticket_number,
                "subject": ticket.subject,
                "unit_id": ticket.unit_id,
                "kind": ticket.kind,
                "category": ticket.category,
            })),
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ticket.into(),
        }),
    ))
}

/// GET /api/v1/tickets/track/{ticket_number}
///
/// Public status lookup by ticket number. Returns the redacted view.
pub async fn track(
    State(state): State<AppState>,
    Path(ticket_number): Path<String>,
) -> AppResult<Json<DataResponse<PublicTicket>>> {
    let ticket = TicketRepo::find_by_number(&state.pool, &ticket_number)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No ticket with number {ticket_number}")))?;

    Ok(Json(DataResponse {
        data: ticket.into(),
    }))
}

// ---------------------------------------------------------------------------
// Admin handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/tickets
///
/// Staff users are hard-scoped to their own unit regardless of filters.
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<TicketListParams>,
) -> AppResult<Json<DataResponse<Vec<Ticket>>>> {
    let filter = TicketFilter {
        status: params.status,
        kind: params.kind,
        category: params.category,
        unit_id: params.unit_id,
        q: params.q,
    };
    let tickets = TicketRepo::list(
        &state.pool,
        &filter,
        auth_user.unit_scope(),
        clamp_limit(params.limit, 50, 200),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse { data: tickets }))
}

/// GET /api/v1/admin/tickets/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    let ticket = load_scoped(&state, &auth_user, id).await?;
    Ok(Json(DataResponse { data: ticket }))
}

/// GET /api/v1/admin/tickets/{id}/history
pub async fn history(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TicketStatusHistory>>>> {
    // Scope check happens via the ticket load.
    load_scoped(&state, &auth_user, id).await?;
    let rows = TicketRepo::history(&state.pool, id).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// PUT /api/v1/admin/tickets/{id}/status
///
/// Validates the transition against the status graph, applies it with a
/// history record, and publishes `ticket.status_changed`.
pub async fn change_status(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ChangeStatusRequest>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    let ticket = load_scoped(&state, &auth_user, id).await?;

    let from = TicketStatus::parse(&ticket.status)?;
    let to = TicketStatus::parse(&input.status)?;
    from.validate_transition(to)?;

    let updated = TicketRepo::change_status(
        &state.pool,
        id,
        from.as_str(),
        to.as_str(),
        Some(auth_user.user_id),
        input.note.as_deref(),
    )
    .await?;

    state.event_bus.publish(
        PortalEvent::new("ticket.status_changed")
            .with_source("ticket", id)
            .with_actor(auth_user.user_id)
            .with_payload(serde_json::json!({
                "ticket_number": updated.ticket_number,
                "from_status": from.as_str(),
                "to_status": to.as_str(),
            })),
    );

    Ok(Json(DataResponse { data: updated }))
}

/// PUT /api/v1/admin/tickets/{id}/assign
pub async fn assign(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<AssignRequest>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    load_scoped(&state, &auth_user, id).await?;
    let ticket = TicketRepo::assign(&state.pool, id, input.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: ticket }))
}

/// POST /api/v1/admin/tickets/{id}/respond
///
/// Record the official response text shown on the public tracking page.
pub async fn respond(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<RespondRequest>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    if input.response.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "response must not be empty".into(),
        )));
    }
    load_scoped(&state, &auth_user, id).await?;
    let ticket = TicketRepo::set_response(&state.pool, id, &input.response)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: ticket }))
}

/// DELETE /api/v1/admin/tickets/{id}
///
/// Soft delete. Admin only; staff cannot delete even within their unit.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = TicketRepo::soft_delete(&state.pool, id).await?;
    if !deleted {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/tickets/{id}/restore
pub async fn restore(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    let restored = TicketRepo::restore(&state.pool, id).await?;
    if !restored {
        return Err(not_found(id));
    }
    let ticket = TicketRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: ticket }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Ticket",
        id,
    })
}

/// Load a ticket and enforce the staff unit scope. Out-of-scope tickets
/// read as 404 rather than 403 to avoid leaking their existence.
async fn load_scoped(state: &AppState, auth_user: &AuthUser, id: DbId) -> AppResult<Ticket> {
    let ticket = TicketRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if let Some(scope) = auth_user.unit_scope() {
        if ticket.unit_id != scope {
            return Err(not_found(id));
        }
    }
    Ok(ticket)
}
