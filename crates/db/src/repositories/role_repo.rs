//! Repository for the seeded `roles` table.

use kiss_core::types::DbId;
use sqlx::PgPool;

use crate::models::role::Role;

pub struct RoleRepo;

impl RoleRepo {
    /// List all roles.
    pub async fn list(pool: &PgPool) -> Result<Vec<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, description, created_at, updated_at FROM roles ORDER BY id",
        )
        .fetch_all(pool)
        .await
    }

    /// Find a role by name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, description, created_at, updated_at FROM roles WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(pool)
        .await
    }

    /// Resolve a role id to its name. Errors with `RowNotFound` for a
    /// dangling id, which the API maps to 404.
    pub async fn resolve_name(pool: &PgPool, id: DbId) -> Result<String, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT name FROM roles WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
