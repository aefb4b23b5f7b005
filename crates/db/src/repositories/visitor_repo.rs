//! Repository for the `visitors` table.

use chrono::NaiveDate;
use kiss_core::types::DbId;
use sqlx::PgPool;

use crate::models::visitor::{CreateVisitor, Visitor};

const COLUMNS: &str =
    "id, name, institution, phone, email, purpose, visit_date, unit_id, created_at, updated_at";

pub struct VisitorRepo;

impl VisitorRepo {
    pub async fn create(pool: &PgPool, input: &CreateVisitor) -> Result<Visitor, sqlx::Error> {
        let query = format!(
            "INSERT INTO visitors (name, institution, phone, email, purpose, visit_date, unit_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Visitor>(&query)
            .bind(&input.name)
            .bind(&input.institution)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.purpose)
            .bind(input.visit_date)
            .bind(input.unit_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Visitor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM visitors WHERE id = $1");
        sqlx::query_as::<_, Visitor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List visitors within an optional visit-date range, newest visit first.
    pub async fn list(
        pool: &PgPool,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Visitor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM visitors
             WHERE ($1::date IS NULL OR visit_date >= $1)
               AND ($2::date IS NULL OR visit_date <= $2)
             ORDER BY visit_date DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Visitor>(&query)
            .bind(from)
            .bind(to)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// All visitors in a date range, unpaginated, for the CSV export.
    pub async fn list_for_export(
        pool: &PgPool,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Visitor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM visitors
             WHERE ($1::date IS NULL OR visit_date >= $1)
               AND ($2::date IS NULL OR visit_date <= $2)
             ORDER BY visit_date ASC, id ASC"
        );
        sqlx::query_as::<_, Visitor>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM visitors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
