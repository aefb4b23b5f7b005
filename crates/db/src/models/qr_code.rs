//! QR code and scan analytics rows.

use chrono::NaiveDate;
use kiss_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row from the `qr_codes` table. `target` is one of the
/// `kiss_core::qr::QrTarget` values.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QrCode {
    pub id: DbId,
    pub code: String,
    pub label: String,
    pub target: String,
    pub target_unit_id: Option<DbId>,
    pub target_url: Option<String>,
    pub is_active: bool,
    pub scan_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a QR code. The repository mints the opaque code.
#[derive(Debug)]
pub struct CreateQrCode {
    pub label: String,
    pub target: String,
    pub target_unit_id: Option<DbId>,
    pub target_url: Option<String>,
}

/// DTO for updating a QR code.
#[derive(Debug, Deserialize)]
pub struct UpdateQrCode {
    pub label: Option<String>,
    pub target_url: Option<String>,
    pub is_active: Option<bool>,
}

/// Row from the `qr_scans` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QrScan {
    pub id: DbId,
    pub qr_code_id: DbId,
    pub scanned_at: Timestamp,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

/// One day of scan counts for the analytics endpoint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailyScans {
    pub day: NaiveDate,
    pub count: i64,
}
