//! Escalation rule rows.

use kiss_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row from the `escalation_rules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EscalationRule {
    pub id: DbId,
    pub name: String,
    /// Restrict to one unit, or `NULL` for hospital-wide.
    pub unit_id: Option<DbId>,
    /// Restrict to one ticket category, or `NULL` for all.
    pub ticket_category: Option<String>,
    pub threshold_hours: i32,
    /// Role whose users receive the escalation notification.
    pub escalate_to_role: String,
    /// Extra email recipient, if any.
    pub notify_email: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a rule.
#[derive(Debug, Deserialize)]
pub struct CreateEscalationRule {
    pub name: String,
    pub unit_id: Option<DbId>,
    pub ticket_category: Option<String>,
    pub threshold_hours: i32,
    pub escalate_to_role: String,
    pub notify_email: Option<String>,
}

/// DTO for updating a rule.
#[derive(Debug, Deserialize)]
pub struct UpdateEscalationRule {
    pub name: Option<String>,
    pub unit_id: Option<DbId>,
    pub ticket_category: Option<String>,
    pub threshold_hours: Option<i32>,
    pub escalate_to_role: Option<String>,
    pub notify_email: Option<String>,
    pub is_active: Option<bool>,
}
