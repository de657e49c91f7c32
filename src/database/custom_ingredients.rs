// ABOUTME: Database operations for owner-scoped custom ingredients
// ABOUTME: Insert with uniqueness on (user_id, normalized_name) and scoped lookups
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::MeasurementType;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// One stored custom ingredient
///
/// The catalog derives a full [`crate::models::CatalogEntry`] from this via
/// per-measurement-type defaults; only identity and type are persisted.
#[derive(Debug, Clone)]
pub struct CustomIngredientRow {
    /// Canonical id, `custom-<normalized-name>-<suffix>`
    pub id: String,
    /// Creating owner
    pub user_id: String,
    /// Display-cased name
    pub name: String,
    /// Normalized name, unique per owner
    pub normalized_name: String,
    /// How quantities are measured
    pub measurement_type: MeasurementType,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

fn row_to_custom(row: &SqliteRow) -> AppResult<CustomIngredientRow> {
    let type_text: String = row
        .try_get("measurement_type")
        .map_err(|e| AppError::database(format!("Failed to read custom ingredient row: {e}")))?;
    let measurement_type = MeasurementType::parse(&type_text).ok_or_else(|| {
        AppError::database(format!(
            "Corrupt measurement_type in custom_ingredients: {type_text}"
        ))
    })?;

    Ok(CustomIngredientRow {
        id: row
            .try_get("id")
            .map_err(|e| AppError::database(format!("Failed to read custom ingredient row: {e}")))?,
        user_id: row
            .try_get("user_id")
            .map_err(|e| AppError::database(format!("Failed to read custom ingredient row: {e}")))?,
        name: row
            .try_get("name")
            .map_err(|e| AppError::database(format!("Failed to read custom ingredient row: {e}")))?,
        normalized_name: row
            .try_get("normalized_name")
            .map_err(|e| AppError::database(format!("Failed to read custom ingredient row: {e}")))?,
        measurement_type,
        created_at: row
            .try_get("created_at")
            .map_err(|e| AppError::database(format!("Failed to read custom ingredient row: {e}")))?,
    })
}

impl Database {
    /// Create the custom ingredient table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails.
    pub(super) async fn migrate_custom_ingredients(&self) -> anyhow::Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS custom_ingredients (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                normalized_name TEXT NOT NULL,
                measurement_type TEXT NOT NULL,
                created_at DATETIME NOT NULL,
                UNIQUE(user_id, normalized_name)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_custom_ingredients_user ON custom_ingredients(user_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a custom ingredient
    ///
    /// A uniqueness violation on `(user_id, normalized_name)` is translated
    /// to `INGREDIENT_ALREADY_EXISTS` so a concurrent duplicate create
    /// surfaces as the same domain error as a sequential one.
    ///
    /// # Errors
    ///
    /// Returns `INGREDIENT_ALREADY_EXISTS` on a duplicate name, or a
    /// database error otherwise.
    pub async fn insert_custom_ingredient(
        &self,
        ingredient: &CustomIngredientRow,
    ) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO custom_ingredients (id, user_id, name, normalized_name, measurement_type, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(&ingredient.id)
        .bind(&ingredient.user_id)
        .bind(&ingredient.name)
        .bind(&ingredient.normalized_name)
        .bind(ingredient.measurement_type.as_str())
        .bind(ingredient.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
            {
                AppError::ingredient_already_exists(&ingredient.name)
            } else {
                AppError::database("Failed to insert custom ingredient").with_source(e)
            }
        })?;

        Ok(())
    }

    /// Look up one of the owner's custom ingredients by id
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn get_custom_ingredient_by_id(
        &self,
        id: &str,
        user_id: &str,
    ) -> AppResult<Option<CustomIngredientRow>> {
        let row = sqlx::query("SELECT * FROM custom_ingredients WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get custom ingredient: {e}")))?;

        row.as_ref().map(row_to_custom).transpose()
    }

    /// Look up one of the owner's custom ingredients by normalized name
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn get_custom_ingredient_by_normalized_name(
        &self,
        user_id: &str,
        normalized_name: &str,
    ) -> AppResult<Option<CustomIngredientRow>> {
        let row = sqlx::query(
            "SELECT * FROM custom_ingredients WHERE user_id = $1 AND normalized_name = $2",
        )
        .bind(user_id)
        .bind(normalized_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get custom ingredient: {e}")))?;

        row.as_ref().map(row_to_custom).transpose()
    }

    /// All custom ingredients belonging to the owner
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn list_custom_ingredients(
        &self,
        user_id: &str,
    ) -> AppResult<Vec<CustomIngredientRow>> {
        let rows = sqlx::query("SELECT * FROM custom_ingredients WHERE user_id = $1 ORDER BY name")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list custom ingredients: {e}")))?;

        rows.iter().map(row_to_custom).collect()
    }
}
