//! Repository for the `escalation_rules` and `ticket_escalations` tables.

use kiss_core::types::DbId;
use sqlx::PgPool;

use crate::models::escalation_rule::{
    CreateEscalationRule, EscalationRule, UpdateEscalationRule,
};

const COLUMNS: &str = "id, name, unit_id, ticket_category, threshold_hours, escalate_to_role, \
                        notify_email, is_active, created_at, updated_at";

pub struct EscalationRepo;

impl EscalationRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateEscalationRule,
    ) -> Result<EscalationRule, sqlx::Error> {
        let query = format!(
            "INSERT INTO escalation_rules
                 (name, unit_id, ticket_category, threshold_hours, escalate_to_role, notify_email)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EscalationRule>(&query)
            .bind(&input.name)
            .bind(input.unit_id)
            .bind(&input.ticket_category)
            .bind(input.threshold_hours)
            .bind(&input.escalate_to_role)
            .bind(&input.notify_email)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<EscalationRule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM escalation_rules WHERE id = $1");
        sqlx::query_as::<_, EscalationRule>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<EscalationRule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM escalation_rules ORDER BY name");
        sqlx::query_as::<_, EscalationRule>(&query)
            .fetch_all(pool)
            .await
    }

    /// Active rules only, for the sweeper.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<EscalationRule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM escalation_rules WHERE is_active = true");
        sqlx::query_as::<_, EscalationRule>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEscalationRule,
    ) -> Result<Option<EscalationRule>, sqlx::Error> {
        let query = format!(
            "UPDATE escalation_rules SET
                name = COALESCE($2, name),
                unit_id = COALESCE($3, unit_id),
                ticket_category = COALESCE($4, ticket_category),
                threshold_hours = COALESCE($5, threshold_hours),
                escalate_to_role = COALESCE($6, escalate_to_role),
                notify_email = COALESCE($7, notify_email),
                is_active = COALESCE($8, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EscalationRule>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.unit_id)
            .bind(&input.ticket_category)
            .bind(input.threshold_hours)
            .bind(&input.escalate_to_role)
            .bind(&input.notify_email)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM escalation_rules WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record that `rule_id` escalated `ticket_id`.
    ///
    /// Returns `false` when the (rule, ticket) pair was already recorded,
    /// so a racing sweep cannot double-fire.
    pub async fn mark_escalated(
        pool: &PgPool,
        rule_id: DbId,
        ticket_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO ticket_escalations (rule_id, ticket_id)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_ticket_escalations_rule_ticket DO NOTHING",
        )
        .bind(rule_id)
        .bind(ticket_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
