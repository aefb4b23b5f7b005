//! Durable event log rows.

use kiss_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Row from the seeded `event_types` table.
#[derive(Debug, Clone, FromRow)]
pub struct EventType {
    pub id: DbId,
    pub name: String,
}

/// Row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub event_type_id: DbId,
    pub source_entity_type: Option<String>,
    pub source_entity_id: Option<DbId>,
    pub actor_user_id: Option<DbId>,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}
