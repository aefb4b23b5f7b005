//! Repository for the `event_types` and `events` tables.

use kiss_core::types::DbId;
use sqlx::PgPool;

use crate::models::event::EventType;

pub struct EventRepo;

impl EventRepo {
    /// Resolve a dot-separated event type name to its seeded row.
    pub async fn get_event_type_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<EventType>, sqlx::Error> {
        sqlx::query_as::<_, EventType>("SELECT id, name FROM event_types WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Insert one event row, returning its id.
    pub async fn insert(
        pool: &PgPool,
        event_type_id: DbId,
        source_entity_type: Option<&str>,
        source_entity_id: Option<DbId>,
        actor_user_id: Option<DbId>,
        payload: &serde_json::Value,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO events
                 (event_type_id, source_entity_type, source_entity_id, actor_user_id, payload)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(event_type_id)
        .bind(source_entity_type)
        .bind(source_entity_id)
        .bind(actor_user_id)
        .bind(payload)
        .fetch_one(pool)
        .await
    }
}
