//! Notification rows.

use kiss_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub body: String,
    /// One of the `kiss_core::channels` constants.
    pub channel: String,
    pub event_id: Option<DbId>,
    pub read_at: Option<Timestamp>,
    pub delivered_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for inserting a notification.
#[derive(Debug)]
pub struct CreateNotification {
    pub user_id: DbId,
    pub title: String,
    pub body: String,
    pub channel: String,
    pub event_id: Option<DbId>,
}
