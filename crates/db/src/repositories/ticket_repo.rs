//! Repository for the `tickets` and `ticket_status_history` tables.

use chrono::{Datelike, Utc};
use kiss_core::ticket::format_ticket_number;
use kiss_core::types::DbId;
use sqlx::PgPool;

use crate::models::ticket::{
    CountByGroup, CreateTicket, EscalatableTicket, Ticket, TicketFilter, TicketStatusHistory,
};

const COLUMNS: &str = "id, ticket_number, kind, category, unit_id, reporter_name, \
                        reporter_phone, reporter_email, reporter_user_id, subject, body, status, \
                        assigned_user_id, response, resolved_at, closed_at, deleted_at, \
                        created_at, updated_at";

const HISTORY_COLUMNS: &str = "id, ticket_id, from_status, to_status, changed_by, note, created_at";

pub struct TicketRepo;

impl TicketRepo {
    /// Insert a ticket, allocating the next `KISS-YYYYMM-NNNN` number.
    ///
    /// The per-month sequence is derived from a count query, so two
    /// concurrent submissions can race onto the same number; the unique
    /// constraint catches that and the insert is retried once with the
    /// next sequence value.
    pub async fn create(pool: &PgPool, input: &CreateTicket) -> Result<Ticket, sqlx::Error> {
        let now = Utc::now();
        let prefix = format!("KISS-{:04}{:02}-%", now.year(), now.month());

        let seq: i64 = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) + 1 FROM tickets WHERE ticket_number LIKE $1",
        )
        .bind(&prefix)
        .fetch_one(pool)
        .await?;

        match Self::insert(pool, input, now.year(), now.month(), seq).await {
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some("23505") => {
                Self::insert(pool, input, now.year(), now.month(), seq + 1).await
            }
            other => other,
        }
    }

    async fn insert(
        pool: &PgPool,
        input: &CreateTicket,
        year: i32,
        month: u32,
        seq: i64,
    ) -> Result<Ticket, sqlx::Error> {
        let ticket_number = format_ticket_number(year, month, seq);
        let query = format!(
            "INSERT INTO tickets (ticket_number, kind, category, unit_id, reporter_name,
                                  reporter_phone, reporter_email, reporter_user_id, subject, body)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(&ticket_number)
            .bind(&input.kind)
            .bind(&input.category)
            .bind(input.unit_id)
            .bind(&input.reporter_name)
            .bind(&input.reporter_phone)
            .bind(&input.reporter_email)
            .bind(input.reporter_user_id)
            .bind(&input.subject)
            .bind(&input.body)
            .fetch_one(pool)
            .await
    }

    /// Find a non-deleted ticket by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a non-deleted ticket by its public ticket number.
    pub async fn find_by_number(
        pool: &PgPool,
        ticket_number: &str,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tickets WHERE ticket_number = $1 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(ticket_number)
            .fetch_optional(pool)
            .await
    }

    /// List non-deleted tickets matching the filter, newest first.
    ///
    /// `scope_unit_id` is the hard visibility scope for staff users and is
    /// applied on top of any unit filter the caller chose.
    pub async fn list(
        pool: &PgPool,
        filter: &TicketFilter,
        scope_unit_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tickets
             WHERE deleted_at IS NULL
               AND ($1::text IS NULL OR status = $1)
               AND ($2::text IS NULL OR kind = $2)
               AND ($3::text IS NULL OR category = $3)
               AND ($4::bigint IS NULL OR unit_id = $4)
               AND ($5::bigint IS NULL OR unit_id = $5)
               AND ($6::text IS NULL OR subject ILIKE '%' || $6 || '%'
                    OR ticket_number ILIKE '%' || $6 || '%')
             ORDER BY created_at DESC
             LIMIT $7 OFFSET $8"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(&filter.status)
            .bind(&filter.kind)
            .bind(&filter.category)
            .bind(filter.unit_id)
            .bind(scope_unit_id)
            .bind(&filter.q)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Apply a status change and record it in the history, atomically.
    ///
    /// The caller validates the transition first. `resolved_at`/`closed_at`
    /// are stamped when the new status is terminal for that field.
    pub async fn change_status(
        pool: &PgPool,
        id: DbId,
        from_status: &str,
        to_status: &str,
        changed_by: Option<DbId>,
        note: Option<&str>,
    ) -> Result<Ticket, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE tickets SET
                status = $2,
                resolved_at = CASE WHEN $2 = 'resolved' THEN NOW() ELSE resolved_at END,
                closed_at = CASE WHEN $2 = 'closed' THEN NOW() ELSE closed_at END
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let ticket = sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(to_status)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO ticket_status_history (ticket_id, from_status, to_status, changed_by, note)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(from_status)
        .bind(to_status)
        .bind(changed_by)
        .bind(note)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(ticket)
    }

    /// Assign (or unassign) a handler.
    pub async fn assign(
        pool: &PgPool,
        id: DbId,
        assigned_user_id: Option<DbId>,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "UPDATE tickets SET assigned_user_id = $2
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(assigned_user_id)
            .fetch_optional(pool)
            .await
    }

    /// Record the official response text.
    pub async fn set_response(
        pool: &PgPool,
        id: DbId,
        response: &str,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "UPDATE tickets SET response = $2
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(response)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete. Returns `true` if a live row was marked.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tickets SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Undo a soft delete.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tickets SET deleted_at = NULL WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Status history for one ticket, oldest first.
    pub async fn history(
        pool: &PgPool,
        ticket_id: DbId,
    ) -> Result<Vec<TicketStatusHistory>, sqlx::Error> {
        let query = format!(
            "SELECT {HISTORY_COLUMNS} FROM ticket_status_history
             WHERE ticket_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, TicketStatusHistory>(&query)
            .bind(ticket_id)
            .fetch_all(pool)
            .await
    }

    /// Open/in-progress tickets that rule `rule_id` has not yet escalated.
    ///
    /// Age filtering happens in the sweeper via the pure rule predicate;
    /// this query only narrows to candidates.
    pub async fn list_escalation_candidates(
        pool: &PgPool,
        rule_id: DbId,
    ) -> Result<Vec<EscalatableTicket>, sqlx::Error> {
        sqlx::query_as::<_, EscalatableTicket>(
            "SELECT id, ticket_number, unit_id, category, status, subject, created_at
             FROM tickets
             WHERE deleted_at IS NULL
               AND status IN ('open', 'in_progress')
               AND id NOT IN (SELECT ticket_id FROM ticket_escalations WHERE rule_id = $1)",
        )
        .bind(rule_id)
        .fetch_all(pool)
        .await
    }

    /// Ticket counts grouped by status, within a time range and excluding
    /// soft-deleted rows. Used by the report summary.
    pub async fn count_by_status(
        pool: &PgPool,
        from: kiss_core::types::Timestamp,
        to: kiss_core::types::Timestamp,
    ) -> Result<Vec<CountByGroup>, sqlx::Error> {
        sqlx::query_as::<_, CountByGroup>(
            "SELECT status AS group_name, COUNT(*) AS count
             FROM tickets
             WHERE deleted_at IS NULL AND created_at >= $1 AND created_at < $2
             GROUP BY status ORDER BY status",
        )
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
    }
}
