//! Handlers for unit and unit-type reference data.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use kiss_core::error::CoreError;
use kiss_core::types::DbId;
use kiss_db::models::unit::{
    CreateUnit, CreateUnitType, Unit, UnitType, UpdateUnit, UpdateUnitType,
};
use kiss_db::repositories::{UnitRepo, UnitTypeRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Unit types
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/unit-types
pub async fn create_type(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Json(input): Json<CreateUnitType>,
) -> AppResult<(StatusCode, Json<DataResponse<UnitType>>)> {
    let unit_type = UnitTypeRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: unit_type })))
}

/// GET /api/v1/admin/unit-types
pub async fn list_types(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UnitType>>>> {
    let types = UnitTypeRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: types }))
}

/// PUT /api/v1/admin/unit-types/{id}
pub async fn update_type(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUnitType>,
) -> AppResult<Json<DataResponse<UnitType>>> {
    let unit_type = UnitTypeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| type_not_found(id))?;
    Ok(Json(DataResponse { data: unit_type }))
}

/// DELETE /api/v1/admin/unit-types/{id}
///
/// Hard delete; fails with 400 INVALID_REFERENCE while units still point
/// at the type.
pub async fn delete_type(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = UnitTypeRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(type_not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/units
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Json(input): Json<CreateUnit>,
) -> AppResult<(StatusCode, Json<DataResponse<Unit>>)> {
    let unit = UnitRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: unit })))
}

/// GET /api/v1/units
///
/// Public listing for the submission forms. Active units only.
pub async fn list_public(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Unit>>>> {
    let units = UnitRepo::list(&state.pool, false).await?;
    Ok(Json(DataResponse { data: units }))
}

/// GET /api/v1/admin/units
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<Json<DataResponse<Vec<Unit>>>> {
    let units = UnitRepo::list(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse { data: units }))
}

/// GET /api/v1/admin/units/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Unit>>> {
    let unit = UnitRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: unit }))
}

/// PUT /api/v1/admin/units/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUnit>,
) -> AppResult<Json<DataResponse<Unit>>> {
    let unit = UnitRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: unit }))
}

/// DELETE /api/v1/admin/units/{id}
///
/// Units are deactivated, never hard-deleted; tickets keep their history.
pub async fn deactivate(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deactivated = UnitRepo::deactivate(&state.pool, id).await?;
    if !deactivated {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Unit", id })
}

fn type_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "UnitType",
        id,
    })
}
