//! Repository for the `surveys` table.

use kiss_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::survey::{CreateSurvey, Survey, UnitScoreRow};

const COLUMNS: &str =
    "id, unit_id, service_category_id, score, comment, respondent_phone, created_at";

pub struct SurveyRepo;

impl SurveyRepo {
    pub async fn create(pool: &PgPool, input: &CreateSurvey) -> Result<Survey, sqlx::Error> {
        let query = format!(
            "INSERT INTO surveys (unit_id, service_category_id, score, comment, respondent_phone)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Survey>(&query)
            .bind(input.unit_id)
            .bind(input.service_category_id)
            .bind(input.score)
            .bind(&input.comment)
            .bind(&input.respondent_phone)
            .fetch_one(pool)
            .await
    }

    /// List responses newest first, optionally scoped to a unit.
    pub async fn list(
        pool: &PgPool,
        unit_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Survey>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM surveys
             WHERE $1::bigint IS NULL OR unit_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Survey>(&query)
            .bind(unit_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Raw (unit, score) pairs within a time range for the statistics
    /// endpoint. Aggregation happens in `kiss_core::survey`.
    pub async fn scores_in_range(
        pool: &PgPool,
        unit_id: Option<DbId>,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<UnitScoreRow>, sqlx::Error> {
        sqlx::query_as::<_, UnitScoreRow>(
            "SELECT s.unit_id, u.name AS unit_name, s.score
             FROM surveys s
             JOIN units u ON u.id = s.unit_id
             WHERE ($1::bigint IS NULL OR s.unit_id = $1)
               AND s.created_at >= $2 AND s.created_at < $3",
        )
        .bind(unit_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
    }
}
