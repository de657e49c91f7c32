// ABOUTME: Database operations for owner-scoped recipes with resolved ingredient lines
// ABOUTME: Ingredient lines are stored as a JSON document column
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{MealType, Recipe, RecipeIngredientLine};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
    let meal_type_text: String = row
        .try_get("meal_type")
        .map_err(|e| AppError::database(format!("Failed to read recipe row: {e}")))?;
    let meal_type = MealType::parse(&meal_type_text).ok_or_else(|| {
        AppError::database(format!("Corrupt meal_type in recipes: {meal_type_text}"))
    })?;

    let ingredients_json: String = row
        .try_get("ingredients")
        .map_err(|e| AppError::database(format!("Failed to read recipe row: {e}")))?;
    let ingredients: Vec<RecipeIngredientLine> = serde_json::from_str(&ingredients_json)
        .map_err(|e| AppError::database("Corrupt ingredient lines in recipes").with_source(e))?;

    Ok(Recipe {
        id: row
            .try_get("id")
            .map_err(|e| AppError::database(format!("Failed to read recipe row: {e}")))?,
        name: row
            .try_get("name")
            .map_err(|e| AppError::database(format!("Failed to read recipe row: {e}")))?,
        meal_type,
        ingredients,
        notes: row
            .try_get("notes")
            .map_err(|e| AppError::database(format!("Failed to read recipe row: {e}")))?,
        created_at: row
            .try_get("created_at")
            .map_err(|e| AppError::database(format!("Failed to read recipe row: {e}")))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| AppError::database(format!("Failed to read recipe row: {e}")))?,
    })
}

fn ingredients_json(recipe: &Recipe) -> AppResult<String> {
    serde_json::to_string(&recipe.ingredients)
        .map_err(|e| AppError::internal("Failed to serialize ingredient lines").with_source(e))
}

impl Database {
    /// Create the recipes table
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails.
    pub(super) async fn migrate_recipes(&self) -> anyhow::Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                meal_type TEXT NOT NULL,
                ingredients TEXT NOT NULL,
                notes TEXT,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipes_user ON recipes(user_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a recipe for the owner
    ///
    /// # Errors
    ///
    /// Returns a database error if the insert fails.
    pub async fn insert_recipe(&self, user_id: &str, recipe: &Recipe) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO recipes (id, user_id, name, meal_type, ingredients, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(&recipe.id)
        .bind(user_id)
        .bind(&recipe.name)
        .bind(recipe.meal_type.as_str())
        .bind(ingredients_json(recipe)?)
        .bind(&recipe.notes)
        .bind(recipe.created_at)
        .bind(recipe.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert recipe: {e}")))?;

        Ok(())
    }

    /// Replace a recipe's mutable fields; returns false when no owner-scoped
    /// row matched
    ///
    /// # Errors
    ///
    /// Returns a database error if the update fails.
    pub async fn update_recipe(&self, user_id: &str, recipe: &Recipe) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE recipes
            SET name = $3, meal_type = $4, ingredients = $5, notes = $6, updated_at = $7
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(&recipe.id)
        .bind(user_id)
        .bind(&recipe.name)
        .bind(recipe.meal_type.as_str())
        .bind(ingredients_json(recipe)?)
        .bind(&recipe.notes)
        .bind(recipe.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update recipe: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Look up one of the owner's recipes
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn get_recipe_by_id(&self, id: &str, user_id: &str) -> AppResult<Option<Recipe>> {
        let row = sqlx::query("SELECT * FROM recipes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        row.as_ref().map(row_to_recipe).transpose()
    }

    /// All the owner's recipes, newest first with id tiebreak, optionally
    /// filtered by meal type
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn list_recipes(
        &self,
        user_id: &str,
        meal_type: Option<MealType>,
    ) -> AppResult<Vec<Recipe>> {
        let rows = match meal_type {
            Some(meal_type) => {
                sqlx::query(
                    "SELECT * FROM recipes WHERE user_id = $1 AND meal_type = $2 ORDER BY created_at DESC, id ASC",
                )
                .bind(user_id)
                .bind(meal_type.as_str())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    "SELECT * FROM recipes WHERE user_id = $1 ORDER BY created_at DESC, id ASC",
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;

        rows.iter().map(row_to_recipe).collect()
    }

    /// Delete one of the owner's recipes; returns false when nothing matched
    ///
    /// # Errors
    ///
    /// Returns a database error if the delete fails.
    pub async fn delete_recipe(&self, id: &str, user_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipe: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}
