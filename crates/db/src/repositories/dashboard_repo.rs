//! Aggregate queries for the admin dashboard overview.

use sqlx::PgPool;

/// Counters shown on the dashboard landing page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct OverviewCounts {
    pub open_tickets: i64,
    pub tickets_today: i64,
    pub surveys_today: i64,
    pub visitors_today: i64,
    pub scans_today: i64,
    /// Mean survey score over the trailing 30 days, `None` without data.
    pub avg_score_30d: Option<f64>,
}

pub struct DashboardRepo;

impl DashboardRepo {
    /// Gather all overview counters. One query per counter keeps each
    /// trivially indexable; the handler issues them sequentially.
    pub async fn overview(pool: &PgPool) -> Result<OverviewCounts, sqlx::Error> {
        let open_tickets = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tickets
             WHERE deleted_at IS NULL AND status IN ('open', 'in_progress')",
        )
        .fetch_one(pool)
        .await?;

        let tickets_today = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tickets
             WHERE deleted_at IS NULL AND created_at >= CURRENT_DATE",
        )
        .fetch_one(pool)
        .await?;

        let surveys_today = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM surveys WHERE created_at >= CURRENT_DATE",
        )
        .fetch_one(pool)
        .await?;

        let visitors_today = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM visitors WHERE visit_date = CURRENT_DATE",
        )
        .fetch_one(pool)
        .await?;

        let scans_today = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM qr_scans WHERE scanned_at >= CURRENT_DATE",
        )
        .fetch_one(pool)
        .await?;

        let avg_score_30d = sqlx::query_scalar::<_, Option<f64>>(
            "SELECT AVG(score)::float8 FROM surveys
             WHERE created_at >= NOW() - INTERVAL '30 days'",
        )
        .fetch_one(pool)
        .await?;

        Ok(OverviewCounts {
            open_tickets,
            tickets_today,
            surveys_today,
            visitors_today,
            scans_today,
            avg_score_30d,
        })
    }
}
