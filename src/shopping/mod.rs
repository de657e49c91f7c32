// ABOUTME: Shopping list generation pipeline from plan to editable draft
// ABOUTME: Wires plan lookup, recipe lookup, aggregation, and idempotent draft creation
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Shopping List Pipeline
//!
//! Front door for "generate a shopping list for this plan": looks up the
//! plan, fetches every slot's recipe, aggregates the recipe lines, and hands
//! the result to the draft layer under the caller's idempotency key.

pub mod aggregator;
pub mod drafts;

pub use aggregator::ShoppingListService;
pub use drafts::{DraftItemInput, ShoppingListDraftService};

use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::{Recipe, ShoppingListDraft};
use crate::plans::MealPlanService;
use crate::recipes::RecipeService;
use std::sync::Arc;
use tracing::info;

/// Focused dependency bundle for the generate flow
pub struct ShoppingListPipeline {
    plans: Arc<MealPlanService>,
    recipes: Arc<RecipeService>,
    aggregator: Arc<ShoppingListService>,
    drafts: Arc<ShoppingListDraftService>,
}

impl ShoppingListPipeline {
    /// Assemble the pipeline from its collaborators
    #[must_use]
    pub fn new(
        plans: Arc<MealPlanService>,
        recipes: Arc<RecipeService>,
        aggregator: Arc<ShoppingListService>,
        drafts: Arc<ShoppingListDraftService>,
    ) -> Self {
        Self {
            plans,
            recipes,
            aggregator,
            drafts,
        }
    }

    /// Generate (or return the already-generated) draft for a plan
    ///
    /// Ingredient validity was enforced when each recipe was saved;
    /// generation trusts the stored lines and treats any residual
    /// conversion failure as the hard error it is.
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` for an unknown plan,
    /// `PLAN_RECIPE_NOT_FOUND` when a slot references a missing recipe, and
    /// propagates aggregation and persistence errors.
    pub async fn generate_for_plan(
        &self,
        plan_id: &str,
        owner: &str,
        idempotency_key: Option<&str>,
    ) -> AppResult<ShoppingListDraft> {
        let plan = self
            .plans
            .find_by_id(plan_id, owner)
            .await?
            .ok_or_else(|| AppError::not_found("Plan"))?;

        let mut recipes: Vec<Recipe> = Vec::with_capacity(plan.slots.len());
        for slot in &plan.slots {
            let recipe = self
                .recipes
                .find_by_id(&slot.recipe_id, owner)
                .await?
                .ok_or_else(|| {
                    AppError::new(
                        ErrorCode::PlanRecipeNotFound,
                        format!("Recipe not found for slot: {}", slot.recipe_id),
                    )
                })?;
            recipes.push(recipe);
        }

        let items = self.aggregator.generate_from_recipes(&recipes, owner).await?;
        let draft = self
            .drafts
            .create_from_generated(owner, plan_id, &items, idempotency_key)
            .await?;

        info!(
            plan_id = %plan_id,
            draft_id = %draft.id,
            item_count = draft.items.len(),
            "shopping list generated"
        );
        Ok(draft)
    }
}
