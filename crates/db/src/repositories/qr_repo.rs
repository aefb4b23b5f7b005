//! Repository for the `qr_codes` and `qr_scans` tables.

use kiss_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::qr_code::{CreateQrCode, DailyScans, QrCode, UpdateQrCode};

const COLUMNS: &str = "id, code, label, target, target_unit_id, target_url, is_active, \
                        scan_count, created_at, updated_at";

pub struct QrRepo;

impl QrRepo {
    /// Insert a QR code with a pre-minted opaque token.
    pub async fn create(
        pool: &PgPool,
        code: &str,
        input: &CreateQrCode,
    ) -> Result<QrCode, sqlx::Error> {
        let query = format!(
            "INSERT INTO qr_codes (code, label, target, target_unit_id, target_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QrCode>(&query)
            .bind(code)
            .bind(&input.label)
            .bind(&input.target)
            .bind(input.target_unit_id)
            .bind(&input.target_url)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<QrCode>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM qr_codes WHERE id = $1");
        sqlx::query_as::<_, QrCode>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find by the opaque scan token (active or not; the handler decides
    /// between 404 and 410).
    pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<QrCode>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM qr_codes WHERE code = $1");
        sqlx::query_as::<_, QrCode>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<QrCode>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM qr_codes ORDER BY created_at DESC");
        sqlx::query_as::<_, QrCode>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateQrCode,
    ) -> Result<Option<QrCode>, sqlx::Error> {
        let query = format!(
            "UPDATE qr_codes SET
                label = COALESCE($2, label),
                target_url = COALESCE($3, target_url),
                is_active = COALESCE($4, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QrCode>(&query)
            .bind(id)
            .bind(&input.label)
            .bind(&input.target_url)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM qr_codes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record one scan: bump the counter and insert the analytics row,
    /// atomically.
    pub async fn record_scan(
        pool: &PgPool,
        qr_code_id: DbId,
        user_agent: Option<&str>,
        referer: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("UPDATE qr_codes SET scan_count = scan_count + 1 WHERE id = $1")
            .bind(qr_code_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO qr_scans (qr_code_id, user_agent, referer) VALUES ($1, $2, $3)")
            .bind(qr_code_id)
            .bind(user_agent)
            .bind(referer)
            .execute(&mut *tx)
            .await?;

        tx.commit().await
    }

    /// Most recent scan time, if any.
    pub async fn last_scan_at(
        pool: &PgPool,
        qr_code_id: DbId,
    ) -> Result<Option<Timestamp>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<Timestamp>>(
            "SELECT MAX(scanned_at) FROM qr_scans WHERE qr_code_id = $1",
        )
        .bind(qr_code_id)
        .fetch_one(pool)
        .await
    }

    /// Scan counts per day over the trailing `days` days.
    pub async fn daily_scans(
        pool: &PgPool,
        qr_code_id: DbId,
        days: i32,
    ) -> Result<Vec<DailyScans>, sqlx::Error> {
        sqlx::query_as::<_, DailyScans>(
            "SELECT scanned_at::date AS day, COUNT(*) AS count
             FROM qr_scans
             WHERE qr_code_id = $1
               AND scanned_at >= NOW() - make_interval(days => $2)
             GROUP BY day ORDER BY day",
        )
        .bind(qr_code_id)
        .bind(days)
        .fetch_all(pool)
        .await
    }
}
