//! Aggregate queries for the ticket report endpoints.

use kiss_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::ticket::CountByGroup;

/// Flat row for the ticket CSV export.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TicketReportRow {
    pub ticket_number: String,
    pub kind: String,
    pub category: String,
    pub unit_name: String,
    pub status: String,
    pub subject: String,
    pub created_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
}

pub struct ReportRepo;

impl ReportRepo {
    /// Ticket counts per unit within a range.
    pub async fn tickets_by_unit(
        pool: &PgPool,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<CountByGroup>, sqlx::Error> {
        sqlx::query_as::<_, CountByGroup>(
            "SELECT u.name AS group_name, COUNT(*) AS count
             FROM tickets t
             JOIN units u ON u.id = t.unit_id
             WHERE t.deleted_at IS NULL AND t.created_at >= $1 AND t.created_at < $2
             GROUP BY u.name ORDER BY u.name",
        )
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
    }

    /// Ticket counts per category within a range.
    pub async fn tickets_by_category(
        pool: &PgPool,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<CountByGroup>, sqlx::Error> {
        sqlx::query_as::<_, CountByGroup>(
            "SELECT category AS group_name, COUNT(*) AS count
             FROM tickets
             WHERE deleted_at IS NULL AND created_at >= $1 AND created_at < $2
             GROUP BY category ORDER BY category",
        )
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
    }

    /// Mean hours from creation to resolution for tickets resolved in the
    /// range, `None` when nothing was resolved.
    pub async fn avg_resolution_hours(
        pool: &PgPool,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Option<f64>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<f64>>(
            "SELECT AVG(EXTRACT(EPOCH FROM (resolved_at - created_at)) / 3600.0)::float8
             FROM tickets
             WHERE deleted_at IS NULL
               AND resolved_at IS NOT NULL
               AND resolved_at >= $1 AND resolved_at < $2",
        )
        .bind(from)
        .bind(to)
        .fetch_one(pool)
        .await
    }

    /// Flat ticket rows for the CSV export, oldest first.
    pub async fn ticket_rows(
        pool: &PgPool,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<TicketReportRow>, sqlx::Error> {
        sqlx::query_as::<_, TicketReportRow>(
            "SELECT t.ticket_number, t.kind, t.category, u.name AS unit_name,
                    t.status, t.subject, t.created_at, t.resolved_at
             FROM tickets t
             JOIN units u ON u.id = t.unit_id
             WHERE t.deleted_at IS NULL AND t.created_at >= $1 AND t.created_at < $2
             ORDER BY t.created_at ASC",
        )
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
    }
}
