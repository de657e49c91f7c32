// ABOUTME: Minimal meal plan storage: ordered recipe slots over a date range
// ABOUTME: Date-range and slot validation live in the external planning layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Meal Plans
//!
//! The engine only needs plans as an ordered list of recipe references for
//! shopping list generation; this service stores and retrieves them. Slot
//! date-range math and duplicate-slot rules are owned by the external
//! planning layer and deliberately absent here.

use crate::database::Database;
use crate::errors::AppResult;
use crate::models::{MealPlan, PlannedMealSlot};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Owner-scoped meal plan storage
pub struct MealPlanService {
    database: Arc<Database>,
}

impl MealPlanService {
    /// Build the service
    #[must_use]
    pub fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    /// Store a plan with its ordered slots
    ///
    /// # Errors
    ///
    /// Returns a database error if the insert fails.
    pub async fn create(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        slots: Vec<PlannedMealSlot>,
        owner: &str,
    ) -> AppResult<MealPlan> {
        let now = Utc::now();
        let plan = MealPlan {
            id: Uuid::new_v4().to_string(),
            start_date,
            end_date,
            slots,
            created_at: now,
            updated_at: now,
        };

        self.database.insert_plan(owner, &plan).await?;
        Ok(plan)
    }

    /// Look up one of the owner's plans
    ///
    /// # Errors
    ///
    /// Returns a database error if the lookup fails.
    pub async fn find_by_id(&self, id: &str, owner: &str) -> AppResult<Option<MealPlan>> {
        self.database.get_plan_by_id(id, owner).await
    }

    /// All the owner's plans, newest first
    ///
    /// # Errors
    ///
    /// Returns a database error if the lookup fails.
    pub async fn find_all(&self, owner: &str) -> AppResult<Vec<MealPlan>> {
        self.database.list_plans(owner).await
    }

    /// Delete one of the owner's plans; false when nothing matched
    ///
    /// # Errors
    ///
    /// Returns a database error if the delete fails.
    pub async fn delete_by_id(&self, id: &str, owner: &str) -> AppResult<bool> {
        self.database.delete_plan(id, owner).await
    }
}
