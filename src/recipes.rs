// ABOUTME: Recipe service with save-time ingredient resolution
// ABOUTME: Raw ingredient references become canonical ids exactly once, when a recipe is stored
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Recipes
//!
//! Recipes store fully resolved ingredient lines. The single validation
//! decision point for ingredient identity and units is here, at save time:
//! every raw reference goes through the catalog's `resolve` and
//! `is_unit_allowed` before anything is persisted, so downstream aggregation
//! can trust stored lines.

use crate::catalog::IngredientCatalog;
use crate::database::Database;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::{MealType, Recipe, RecipeIngredientLine, Unit};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// One raw ingredient line of a create/update request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredientInput {
    /// Free-text, alias, or canonical ingredient reference
    pub ingredient_id: String,
    /// Quantity in `unit`, must be positive
    pub quantity: f64,
    /// Unit the quantity is expressed in
    pub unit: Unit,
}

/// A recipe create/update request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeInput {
    /// Recipe name
    pub name: String,
    /// Meal slot this recipe is intended for
    pub meal_type: MealType,
    /// Raw ingredient lines, resolved on save
    pub ingredients: Vec<RecipeIngredientInput>,
    /// Free-form notes
    #[serde(default)]
    pub notes: Option<String>,
}

/// Owner-scoped recipe lifecycle over the shared catalog and database
pub struct RecipeService {
    database: Arc<Database>,
    catalog: Arc<IngredientCatalog>,
}

impl RecipeService {
    /// Build the service
    #[must_use]
    pub fn new(database: Arc<Database>, catalog: Arc<IngredientCatalog>) -> Self {
        Self { database, catalog }
    }

    /// Create a recipe, resolving every ingredient line
    ///
    /// # Errors
    ///
    /// Returns `MISSING_REQUIRED_FIELD` for a blank name,
    /// `INGREDIENT_NOT_FOUND` / `INVALID_INGREDIENT_UNIT` / `INVALID_INPUT`
    /// for a bad line, or a database error.
    pub async fn create(&self, input: &RecipeInput, owner: &str) -> AppResult<Recipe> {
        let ingredients = self.resolve_lines(&input.ingredients, owner).await?;
        let name = required_name(&input.name)?;

        let now = Utc::now();
        let recipe = Recipe {
            id: Uuid::new_v4().to_string(),
            name,
            meal_type: input.meal_type,
            ingredients,
            notes: input.notes.clone(),
            created_at: now,
            updated_at: now,
        };

        self.database.insert_recipe(owner, &recipe).await?;
        debug!(recipe_id = %recipe.id, owner = %owner, "recipe created");
        Ok(recipe)
    }

    /// Update a recipe in place; `None` when the owner has no such recipe
    ///
    /// # Errors
    ///
    /// Same failure modes as [`RecipeService::create`].
    pub async fn update(
        &self,
        id: &str,
        input: &RecipeInput,
        owner: &str,
    ) -> AppResult<Option<Recipe>> {
        let Some(existing) = self.database.get_recipe_by_id(id, owner).await? else {
            return Ok(None);
        };

        let ingredients = self.resolve_lines(&input.ingredients, owner).await?;
        let name = required_name(&input.name)?;

        let recipe = Recipe {
            id: existing.id,
            name,
            meal_type: input.meal_type,
            ingredients,
            notes: input.notes.clone(),
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        if self.database.update_recipe(owner, &recipe).await? {
            Ok(Some(recipe))
        } else {
            Ok(None)
        }
    }

    /// Look up one of the owner's recipes
    ///
    /// # Errors
    ///
    /// Returns a database error if the lookup fails.
    pub async fn find_by_id(&self, id: &str, owner: &str) -> AppResult<Option<Recipe>> {
        self.database.get_recipe_by_id(id, owner).await
    }

    /// All the owner's recipes, optionally filtered by meal type
    ///
    /// # Errors
    ///
    /// Returns a database error if the lookup fails.
    pub async fn find_all(
        &self,
        meal_type: Option<MealType>,
        owner: &str,
    ) -> AppResult<Vec<Recipe>> {
        self.database.list_recipes(owner, meal_type).await
    }

    /// Delete one of the owner's recipes; false when nothing matched
    ///
    /// # Errors
    ///
    /// Returns a database error if the delete fails.
    pub async fn delete_by_id(&self, id: &str, owner: &str) -> AppResult<bool> {
        self.database.delete_recipe(id, owner).await
    }

    async fn resolve_lines(
        &self,
        inputs: &[RecipeIngredientInput],
        owner: &str,
    ) -> AppResult<Vec<RecipeIngredientLine>> {
        let mut lines = Vec::with_capacity(inputs.len());
        for input in inputs {
            let canonical_id = self
                .catalog
                .resolve(&input.ingredient_id, owner)
                .await?
                .ok_or_else(|| AppError::ingredient_not_found(&input.ingredient_id))?;

            if input.quantity <= 0.0 {
                return Err(AppError::invalid_input(format!(
                    "Quantity must be positive for ingredient {canonical_id}"
                )));
            }

            if !self
                .catalog
                .is_unit_allowed(&canonical_id, input.unit, owner)
                .await?
            {
                return Err(AppError::invalid_unit(&canonical_id, input.unit));
            }

            lines.push(RecipeIngredientLine {
                ingredient_id: canonical_id,
                quantity: input.quantity,
                unit: input.unit,
            });
        }
        Ok(lines)
    }
}

fn required_name(name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::new(
            ErrorCode::MissingRequiredField,
            "Recipe name is required",
        ));
    }
    Ok(trimmed.to_string())
}
