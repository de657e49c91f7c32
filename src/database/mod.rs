// ABOUTME: Database management for owner-scoped meal-plan and shopping data
// ABOUTME: Owns the SQLite pool, schema migration, and per-concern query modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Database Management
//!
//! One [`Database`] handle wraps the `SQLite` pool and carries every query
//! the engine issues. Each concern lives in its own module as an
//! `impl Database` block: custom ingredients, recipes, meal plans, and
//! shopping list drafts.
//!
//! All lookups are owner-scoped: every query filters by `user_id`, so one
//! owner can never observe another owner's rows. Uniqueness constraints back
//! the race-safe check-then-insert protocols of the catalog and draft
//! layers.

mod custom_ingredients;
mod drafts;
mod plans;
mod recipes;

pub use custom_ingredients::CustomIngredientRow;

use anyhow::Result;
use sqlx::{Pool, Sqlite, SqlitePool};

/// Database handle for all engine persistence
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Connect and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or any migration fails.
    pub async fn new(database_url: &str) -> Result<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_string()
        };

        let pool = SqlitePool::connect(&connection_options).await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Reference to the underlying pool for advanced operations
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run schema migrations
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails.
    pub async fn migrate(&self) -> Result<()> {
        self.migrate_custom_ingredients().await?;
        self.migrate_recipes().await?;
        self.migrate_plans().await?;
        self.migrate_drafts().await?;
        Ok(())
    }
}
