//! Survey response rows.

use kiss_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Row from the `surveys` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Survey {
    pub id: DbId,
    pub unit_id: DbId,
    pub service_category_id: Option<DbId>,
    pub score: i16,
    pub comment: Option<String>,
    pub respondent_phone: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for inserting a survey response.
#[derive(Debug)]
pub struct CreateSurvey {
    pub unit_id: DbId,
    pub service_category_id: Option<DbId>,
    pub score: i16,
    pub comment: Option<String>,
    pub respondent_phone: Option<String>,
}

/// Per-unit aggregate used by the statistics endpoint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UnitScoreRow {
    pub unit_id: DbId,
    pub unit_name: String,
    pub score: i16,
}
