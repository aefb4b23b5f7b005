//! Handlers for service category reference data.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use kiss_core::error::CoreError;
use kiss_core::types::DbId;
use kiss_db::models::service_category::{
    CreateServiceCategory, ServiceCategory, UpdateServiceCategory,
};
use kiss_db::repositories::ServiceCategoryRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the category listing.
#[derive(Debug, Deserialize)]
pub struct CategoryListParams {
    /// Restrict to one unit's categories (hospital-wide ones included).
    pub unit_id: Option<DbId>,
}

/// POST /api/v1/admin/service-categories
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Json(input): Json<CreateServiceCategory>,
) -> AppResult<(StatusCode, Json<DataResponse<ServiceCategory>>)> {
    let category = ServiceCategoryRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// GET /api/v1/service-categories
///
/// Mounted publicly as well; the survey form needs the category list.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<CategoryListParams>,
) -> AppResult<Json<DataResponse<Vec<ServiceCategory>>>> {
    let categories = ServiceCategoryRepo::list(&state.pool, params.unit_id).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// PUT /api/v1/admin/service-categories/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateServiceCategory>,
) -> AppResult<Json<DataResponse<ServiceCategory>>> {
    let category = ServiceCategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/admin/service-categories/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ServiceCategoryRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "ServiceCategory",
        id,
    })
}
