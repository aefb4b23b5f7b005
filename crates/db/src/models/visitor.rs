//! Visitor registration rows.

use chrono::NaiveDate;
use kiss_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Row from the `visitors` table. `phone` is stored normalized to the
/// local `08...` form.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Visitor {
    pub id: DbId,
    pub name: String,
    pub institution: String,
    pub phone: String,
    pub email: Option<String>,
    pub purpose: Option<String>,
    pub visit_date: NaiveDate,
    pub unit_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a visitor.
#[derive(Debug)]
pub struct CreateVisitor {
    pub name: String,
    pub institution: String,
    pub phone: String,
    pub email: Option<String>,
    pub purpose: Option<String>,
    pub visit_date: NaiveDate,
    pub unit_id: Option<DbId>,
}
