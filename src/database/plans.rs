// ABOUTME: Database operations for owner-scoped meal plans
// ABOUTME: Ordered recipe slots are stored as a JSON document column
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{MealPlan, PlannedMealSlot};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

fn row_to_plan(row: &SqliteRow) -> AppResult<MealPlan> {
    let slots_json: String = row
        .try_get("slots")
        .map_err(|e| AppError::database(format!("Failed to read meal plan row: {e}")))?;
    let slots: Vec<PlannedMealSlot> = serde_json::from_str(&slots_json)
        .map_err(|e| AppError::database("Corrupt slots in meal_plans").with_source(e))?;

    Ok(MealPlan {
        id: row
            .try_get("id")
            .map_err(|e| AppError::database(format!("Failed to read meal plan row: {e}")))?,
        start_date: row
            .try_get("start_date")
            .map_err(|e| AppError::database(format!("Failed to read meal plan row: {e}")))?,
        end_date: row
            .try_get("end_date")
            .map_err(|e| AppError::database(format!("Failed to read meal plan row: {e}")))?,
        slots,
        created_at: row
            .try_get("created_at")
            .map_err(|e| AppError::database(format!("Failed to read meal plan row: {e}")))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| AppError::database(format!("Failed to read meal plan row: {e}")))?,
    })
}

impl Database {
    /// Create the meal plan table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails.
    pub(super) async fn migrate_plans(&self) -> anyhow::Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS meal_plans (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                start_date DATE NOT NULL,
                end_date DATE NOT NULL,
                slots TEXT NOT NULL,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_meal_plans_user ON meal_plans(user_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a meal plan for the owner
    ///
    /// # Errors
    ///
    /// Returns a database error if the insert fails.
    pub async fn insert_plan(&self, user_id: &str, plan: &MealPlan) -> AppResult<()> {
        let slots_json = serde_json::to_string(&plan.slots)
            .map_err(|e| AppError::internal("Failed to serialize plan slots").with_source(e))?;

        sqlx::query(
            r"
            INSERT INTO meal_plans (id, user_id, start_date, end_date, slots, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(&plan.id)
        .bind(user_id)
        .bind(plan.start_date)
        .bind(plan.end_date)
        .bind(slots_json)
        .bind(plan.created_at)
        .bind(plan.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert meal plan: {e}")))?;

        Ok(())
    }

    /// Look up one of the owner's meal plans
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn get_plan_by_id(&self, id: &str, user_id: &str) -> AppResult<Option<MealPlan>> {
        let row = sqlx::query("SELECT * FROM meal_plans WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get meal plan: {e}")))?;

        row.as_ref().map(row_to_plan).transpose()
    }

    /// All the owner's meal plans, newest first with id tiebreak
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn list_plans(&self, user_id: &str) -> AppResult<Vec<MealPlan>> {
        let rows = sqlx::query(
            "SELECT * FROM meal_plans WHERE user_id = $1 ORDER BY created_at DESC, id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list meal plans: {e}")))?;

        rows.iter().map(row_to_plan).collect()
    }

    /// Delete one of the owner's meal plans; returns false when nothing
    /// matched
    ///
    /// # Errors
    ///
    /// Returns a database error if the delete fails.
    pub async fn delete_plan(&self, id: &str, user_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM meal_plans WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete meal plan: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}
