//! Repositories for the `unit_types` and `units` tables.

use kiss_core::types::DbId;
use sqlx::PgPool;

use crate::models::unit::{CreateUnit, CreateUnitType, Unit, UnitType, UpdateUnit, UpdateUnitType};

const TYPE_COLUMNS: &str = "id, name, description, created_at, updated_at";
const UNIT_COLUMNS: &str = "id, name, code, unit_type_id, is_active, created_at, updated_at";

pub struct UnitTypeRepo;

impl UnitTypeRepo {
    pub async fn create(pool: &PgPool, input: &CreateUnitType) -> Result<UnitType, sqlx::Error> {
        let query = format!(
            "INSERT INTO unit_types (name, description) VALUES ($1, $2) RETURNING {TYPE_COLUMNS}"
        );
        sqlx::query_as::<_, UnitType>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<UnitType>, sqlx::Error> {
        let query = format!("SELECT {TYPE_COLUMNS} FROM unit_types WHERE id = $1");
        sqlx::query_as::<_, UnitType>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<UnitType>, sqlx::Error> {
        let query = format!("SELECT {TYPE_COLUMNS} FROM unit_types ORDER BY name");
        sqlx::query_as::<_, UnitType>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUnitType,
    ) -> Result<Option<UnitType>, sqlx::Error> {
        let query = format!(
            "UPDATE unit_types SET
                name = COALESCE($2, name),
                description = COALESCE($3, description)
             WHERE id = $1
             RETURNING {TYPE_COLUMNS}"
        );
        sqlx::query_as::<_, UnitType>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Hard delete. Fails with an FK violation while units still reference it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM unit_types WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct UnitRepo;

impl UnitRepo {
    pub async fn create(pool: &PgPool, input: &CreateUnit) -> Result<Unit, sqlx::Error> {
        let query = format!(
            "INSERT INTO units (name, code, unit_type_id)
             VALUES ($1, $2, $3)
             RETURNING {UNIT_COLUMNS}"
        );
        sqlx::query_as::<_, Unit>(&query)
            .bind(&input.name)
            .bind(&input.code)
            .bind(input.unit_type_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Unit>, sqlx::Error> {
        let query = format!("SELECT {UNIT_COLUMNS} FROM units WHERE id = $1");
        sqlx::query_as::<_, Unit>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List units, optionally including deactivated ones.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Unit>, sqlx::Error> {
        let query = format!(
            "SELECT {UNIT_COLUMNS} FROM units
             WHERE ($1 OR is_active = true)
             ORDER BY name"
        );
        sqlx::query_as::<_, Unit>(&query)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUnit,
    ) -> Result<Option<Unit>, sqlx::Error> {
        let query = format!(
            "UPDATE units SET
                name = COALESCE($2, name),
                code = COALESCE($3, code),
                unit_type_id = COALESCE($4, unit_type_id),
                is_active = COALESCE($5, is_active)
             WHERE id = $1
             RETURNING {UNIT_COLUMNS}"
        );
        sqlx::query_as::<_, Unit>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.code)
            .bind(input.unit_type_id)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-deactivate a unit. Existing tickets keep their reference.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE units SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
