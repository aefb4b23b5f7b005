//! Unit and unit-type reference data.
//!
//! Units are the routing key of the whole portal: tickets, surveys and QR
//! codes all point at one.

use kiss_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row from the `unit_types` table (e.g. clinical, administrative).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UnitType {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a unit type.
#[derive(Debug, Deserialize)]
pub struct CreateUnitType {
    pub name: String,
    pub description: Option<String>,
}

/// DTO for updating a unit type. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateUnitType {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Row from the `units` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Unit {
    pub id: DbId,
    pub name: String,
    /// Short unique code used in URLs and exports (e.g. `IGD`).
    pub code: String,
    pub unit_type_id: DbId,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a unit.
#[derive(Debug, Deserialize)]
pub struct CreateUnit {
    pub name: String,
    pub code: String,
    pub unit_type_id: DbId,
}

/// DTO for updating a unit. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateUnit {
    pub name: Option<String>,
    pub code: Option<String>,
    pub unit_type_id: Option<DbId>,
    pub is_active: Option<bool>,
}
