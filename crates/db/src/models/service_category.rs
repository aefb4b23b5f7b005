//! Service category reference data.

use kiss_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row from the `service_categories` table. `unit_id = NULL` means the
/// category applies hospital-wide.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ServiceCategory {
    pub id: DbId,
    pub name: String,
    pub unit_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a service category.
#[derive(Debug, Deserialize)]
pub struct CreateServiceCategory {
    pub name: String,
    pub unit_id: Option<DbId>,
}

/// DTO for updating a service category.
#[derive(Debug, Deserialize)]
pub struct UpdateServiceCategory {
    pub name: Option<String>,
    pub unit_id: Option<DbId>,
}
