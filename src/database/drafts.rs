// ABOUTME: Database operations for owner-scoped shopping list drafts
// ABOUTME: Enforces at-most-one draft per (owner, plan, idempotency key) via a partial unique index
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{DraftItem, ShoppingListDraft};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

fn row_to_draft(row: &SqliteRow) -> AppResult<ShoppingListDraft> {
    let items_json: String = row
        .try_get("items")
        .map_err(|e| AppError::database(format!("Failed to read draft row: {e}")))?;
    let items: Vec<DraftItem> = serde_json::from_str(&items_json)
        .map_err(|e| AppError::database("Corrupt items in shopping_list_drafts").with_source(e))?;

    Ok(ShoppingListDraft {
        id: row
            .try_get("id")
            .map_err(|e| AppError::database(format!("Failed to read draft row: {e}")))?,
        plan_id: row
            .try_get("plan_id")
            .map_err(|e| AppError::database(format!("Failed to read draft row: {e}")))?,
        items,
        created_at: row
            .try_get("created_at")
            .map_err(|e| AppError::database(format!("Failed to read draft row: {e}")))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| AppError::database(format!("Failed to read draft row: {e}")))?,
    })
}

fn items_json(items: &[DraftItem]) -> AppResult<String> {
    serde_json::to_string(items)
        .map_err(|e| AppError::internal("Failed to serialize draft items").with_source(e))
}

impl Database {
    /// Create the draft table and its idempotency index
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails.
    pub(super) async fn migrate_drafts(&self) -> anyhow::Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS shopping_list_drafts (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                plan_id TEXT NOT NULL,
                idempotency_key TEXT,
                items TEXT NOT NULL,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // Partial unique index: keyless drafts may repeat freely
        sqlx::query(
            r"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_drafts_idempotency
            ON shopping_list_drafts(user_id, plan_id, idempotency_key)
            WHERE idempotency_key IS NOT NULL
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_drafts_user ON shopping_list_drafts(user_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a draft; returns false when the idempotency index rejected it
    ///
    /// The caller decides whether a conflict means "re-query and return the
    /// winner" (keyed create) or is a genuine error.
    ///
    /// # Errors
    ///
    /// Returns a database error for anything other than a uniqueness
    /// violation.
    pub async fn insert_draft(
        &self,
        user_id: &str,
        idempotency_key: Option<&str>,
        draft: &ShoppingListDraft,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            INSERT INTO shopping_list_drafts (id, user_id, plan_id, idempotency_key, items, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(&draft.id)
        .bind(user_id)
        .bind(&draft.plan_id)
        .bind(idempotency_key)
        .bind(items_json(&draft.items)?)
        .bind(draft.created_at)
        .bind(draft.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(true),
            Err(e)
                if e.as_database_error()
                    .is_some_and(sqlx::error::DatabaseError::is_unique_violation) =>
            {
                Ok(false)
            }
            Err(e) => Err(AppError::database("Failed to insert draft").with_source(e)),
        }
    }

    /// Most recent draft for `(owner, plan, idempotency key)`
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn get_draft_by_idempotency_key(
        &self,
        user_id: &str,
        plan_id: &str,
        idempotency_key: &str,
    ) -> AppResult<Option<ShoppingListDraft>> {
        let row = sqlx::query(
            r"
            SELECT * FROM shopping_list_drafts
            WHERE user_id = $1 AND plan_id = $2 AND idempotency_key = $3
            ORDER BY created_at DESC
            LIMIT 1
            ",
        )
        .bind(user_id)
        .bind(plan_id)
        .bind(idempotency_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get draft by idempotency key: {e}")))?;

        row.as_ref().map(row_to_draft).transpose()
    }

    /// Look up one of the owner's drafts
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn get_draft_by_id(
        &self,
        id: &str,
        user_id: &str,
    ) -> AppResult<Option<ShoppingListDraft>> {
        let row = sqlx::query("SELECT * FROM shopping_list_drafts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get draft: {e}")))?;

        row.as_ref().map(row_to_draft).transpose()
    }

    /// All the owner's drafts, newest first with id tiebreak
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    pub async fn list_drafts(&self, user_id: &str) -> AppResult<Vec<ShoppingListDraft>> {
        let rows = sqlx::query(
            "SELECT * FROM shopping_list_drafts WHERE user_id = $1 ORDER BY created_at DESC, id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list drafts: {e}")))?;

        rows.iter().map(row_to_draft).collect()
    }

    /// Wholesale-replace a draft's item list; returns false when no
    /// owner-scoped row matched
    ///
    /// # Errors
    ///
    /// Returns a database error if the update fails.
    pub async fn replace_draft_items(
        &self,
        id: &str,
        user_id: &str,
        items: &[DraftItem],
        updated_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE shopping_list_drafts
            SET items = $3, updated_at = $4
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id)
        .bind(user_id)
        .bind(items_json(items)?)
        .bind(updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to replace draft items: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete one of the owner's drafts; returns false when nothing matched
    ///
    /// # Errors
    ///
    /// Returns a database error if the delete fails.
    pub async fn delete_draft(&self, id: &str, user_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM shopping_list_drafts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete draft: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}
