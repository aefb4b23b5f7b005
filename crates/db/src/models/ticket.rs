//! Ticket rows, status history, and report aggregates.

use kiss_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Row from the `tickets` table.
///
/// `kind`, `category`, and `status` are stored as TEXT; the accepted
/// values and the transition graph live in `kiss_core::ticket`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ticket {
    pub id: DbId,
    pub ticket_number: String,
    pub kind: String,
    pub category: String,
    pub unit_id: DbId,
    pub reporter_name: String,
    pub reporter_phone: Option<String>,
    pub reporter_email: Option<String>,
    pub reporter_user_id: Option<DbId>,
    pub subject: String,
    pub body: String,
    pub status: String,
    pub assigned_user_id: Option<DbId>,
    pub response: Option<String>,
    pub resolved_at: Option<Timestamp>,
    pub closed_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a ticket. The repository allocates the ticket number.
#[derive(Debug)]
pub struct CreateTicket {
    pub kind: String,
    pub category: String,
    pub unit_id: DbId,
    pub reporter_name: String,
    pub reporter_phone: Option<String>,
    pub reporter_email: Option<String>,
    pub reporter_user_id: Option<DbId>,
    pub subject: String,
    pub body: String,
}

/// Filters for the admin ticket listing.
#[derive(Debug, Default)]
pub struct TicketFilter {
    pub status: Option<String>,
    pub kind: Option<String>,
    pub category: Option<String>,
    pub unit_id: Option<DbId>,
    /// Substring match over subject and ticket number.
    pub q: Option<String>,
}

/// Row from `ticket_status_history`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketStatusHistory {
    pub id: DbId,
    pub ticket_id: DbId,
    pub from_status: String,
    pub to_status: String,
    pub changed_by: Option<DbId>,
    pub note: Option<String>,
    pub created_at: Timestamp,
}

/// One (group, count) pair from a report aggregation query.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CountByGroup {
    pub group_name: String,
    pub count: i64,
}

/// Candidate row for the escalation sweeper: the subset of ticket columns
/// the rule predicate needs.
#[derive(Debug, Clone, FromRow)]
pub struct EscalatableTicket {
    pub id: DbId,
    pub ticket_number: String,
    pub unit_id: DbId,
    pub category: String,
    pub status: String,
    pub subject: String,
    pub created_at: Timestamp,
}
