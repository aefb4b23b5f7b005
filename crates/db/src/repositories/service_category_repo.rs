//! Repository for the `service_categories` table.

use kiss_core::types::DbId;
use sqlx::PgPool;

use crate::models::service_category::{
    CreateServiceCategory, ServiceCategory, UpdateServiceCategory,
};

const COLUMNS: &str = "id, name, unit_id, created_at, updated_at";

pub struct ServiceCategoryRepo;

impl ServiceCategoryRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateServiceCategory,
    ) -> Result<ServiceCategory, sqlx::Error> {
        let query = format!(
            "INSERT INTO service_categories (name, unit_id) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ServiceCategory>(&query)
            .bind(&input.name)
            .bind(input.unit_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ServiceCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM service_categories WHERE id = $1");
        sqlx::query_as::<_, ServiceCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List categories, optionally narrowed to those visible for a unit
    /// (unit-specific ones plus hospital-wide ones).
    pub async fn list(
        pool: &PgPool,
        unit_id: Option<DbId>,
    ) -> Result<Vec<ServiceCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM service_categories
             WHERE $1::bigint IS NULL OR unit_id = $1 OR unit_id IS NULL
             ORDER BY name"
        );
        sqlx::query_as::<_, ServiceCategory>(&query)
            .bind(unit_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateServiceCategory,
    ) -> Result<Option<ServiceCategory>, sqlx::Error> {
        let query = format!(
            "UPDATE service_categories SET
                name = COALESCE($2, name),
                unit_id = COALESCE($3, unit_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ServiceCategory>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.unit_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM service_categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
