// ABOUTME: Shopping list draft layer with idempotent creation and full item replacement
// ABOUTME: At most one draft per (owner, plan, idempotency key); all-or-nothing edit validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Draft Idempotency & Edit Layer
//!
//! Wraps generated shopping lists into owner-scoped, editable drafts.
//!
//! Creation under an idempotency key is a race-safe check-then-insert: the
//! pre-insert lookup catches plain retries, and when two identical requests
//! race, whichever insert loses to the uniqueness index re-queries and
//! returns the winner's draft instead of surfacing the conflict.
//!
//! Edits replace the entire item list; validation runs over every input item
//! before anything is written, so a rejected request leaves the stored draft
//! untouched.

use crate::database::Database;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::{DraftItem, ShoppingListDraft, ShoppingListLineItem};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Maximum characters in a draft item note
const MAX_NOTE_LENGTH: usize = 280;

/// One item of a full item-list replacement request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftItemInput {
    /// Existing item id; blank or absent assigns a fresh one
    #[serde(default)]
    pub id: Option<String>,
    /// Canonical catalog id; required unless `manual`
    #[serde(default)]
    pub ingredient_id: Option<String>,
    /// Display name
    pub name: String,
    /// Quantity in `unit`
    pub quantity: f64,
    /// Free-form unit label
    pub unit: String,
    /// Packaging triple, all-present or all-absent
    #[serde(default)]
    pub suggested_packages: Option<i64>,
    /// Packaging triple, all-present or all-absent
    #[serde(default)]
    pub package_amount: Option<f64>,
    /// Packaging triple, all-present or all-absent
    #[serde(default)]
    pub package_unit: Option<String>,
    /// Hand-added item with no catalog identity
    pub manual: bool,
    /// Checked off while shopping
    #[serde(default)]
    pub bought: Option<bool>,
    /// Free-form note, at most 280 characters
    #[serde(default)]
    pub note: Option<String>,
    /// Presentation order; absent defaults to list position
    #[serde(default)]
    pub sort_order: Option<i64>,
}

/// Owner-scoped draft lifecycle: create, edit, look up, delete
pub struct ShoppingListDraftService {
    database: Arc<Database>,
}

impl ShoppingListDraftService {
    /// Build the service over the shared database handle
    #[must_use]
    pub fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    /// Create a draft from freshly generated items, deduplicated by
    /// idempotency key
    ///
    /// A blank key is treated as absent. With a key, the most recent
    /// existing `(owner, plan, key)` draft is returned unchanged; retried
    /// generate calls never produce duplicates. Without a key every call
    /// creates a new draft.
    ///
    /// # Errors
    ///
    /// Returns a database error if persistence fails.
    pub async fn create_from_generated(
        &self,
        owner: &str,
        plan_id: &str,
        generated_items: &[ShoppingListLineItem],
        idempotency_key: Option<&str>,
    ) -> AppResult<ShoppingListDraft> {
        let key = idempotency_key
            .map(str::trim)
            .filter(|k| !k.is_empty());

        if let Some(key) = key {
            if let Some(existing) = self
                .database
                .get_draft_by_idempotency_key(owner, plan_id, key)
                .await?
            {
                debug!(draft_id = %existing.id, plan_id = %plan_id, "idempotent generate returned existing draft");
                return Ok(existing);
            }
        }

        let now = Utc::now();
        let draft = ShoppingListDraft {
            id: Uuid::new_v4().to_string(),
            plan_id: plan_id.to_string(),
            items: generated_items
                .iter()
                .enumerate()
                .map(|(index, item)| generated_draft_item(item, index))
                .collect(),
            created_at: now,
            updated_at: now,
        };

        let inserted = self.database.insert_draft(owner, key, &draft).await?;
        if inserted {
            return Ok(draft);
        }

        // Lost the insert race; the winner's draft is the caller's result
        match key {
            Some(key) => self
                .database
                .get_draft_by_idempotency_key(owner, plan_id, key)
                .await?
                .ok_or_else(|| {
                    AppError::database("Draft insert conflicted but no existing draft was found")
                }),
            None => Err(AppError::database(
                "Draft insert conflicted without an idempotency key",
            )),
        }
    }

    /// Look up one of the owner's drafts
    ///
    /// # Errors
    ///
    /// Returns a database error if the lookup fails.
    pub async fn find_by_id(&self, id: &str, owner: &str) -> AppResult<Option<ShoppingListDraft>> {
        self.database.get_draft_by_id(id, owner).await
    }

    /// All the owner's drafts, newest first
    ///
    /// # Errors
    ///
    /// Returns a database error if the lookup fails.
    pub async fn find_all(&self, owner: &str) -> AppResult<Vec<ShoppingListDraft>> {
        self.database.list_drafts(owner).await
    }

    /// Wholesale-replace a draft's item list
    ///
    /// Every input item is validated before any change is applied; the first
    /// invalid item fails the whole request and the stored draft is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` when the owner has no such draft, one of
    /// the `SHOPPING_ITEM_*` codes for an invalid item, or a database error.
    pub async fn replace_items(
        &self,
        id: &str,
        owner: &str,
        items: &[DraftItemInput],
    ) -> AppResult<ShoppingListDraft> {
        let existing = self
            .database
            .get_draft_by_id(id, owner)
            .await?
            .ok_or_else(|| AppError::not_found("Shopping list"))?;

        validate_items(items)?;

        let replacement: Vec<DraftItem> = items
            .iter()
            .enumerate()
            .map(|(index, item)| draft_item_from_input(item, index))
            .collect();

        let now = Utc::now();
        let updated = self
            .database
            .replace_draft_items(id, owner, &replacement, now)
            .await?;
        if !updated {
            // Deleted between lookup and write
            return Err(AppError::not_found("Shopping list"));
        }

        Ok(ShoppingListDraft {
            items: replacement,
            updated_at: now,
            ..existing
        })
    }

    /// Delete one of the owner's drafts; false when nothing matched
    ///
    /// # Errors
    ///
    /// Returns a database error if the delete fails.
    pub async fn delete_by_id(&self, id: &str, owner: &str) -> AppResult<bool> {
        self.database.delete_draft(id, owner).await
    }
}

fn generated_draft_item(item: &ShoppingListLineItem, index: usize) -> DraftItem {
    DraftItem {
        id: Uuid::new_v4().to_string(),
        ingredient_id: Some(item.ingredient_id.clone()),
        name: item.display_name.clone(),
        quantity: item.required_base_amount,
        unit: item.base_unit.as_str().to_string(),
        suggested_packages: Some(item.suggested_packages),
        package_amount: Some(item.package_amount),
        package_unit: Some(item.package_unit.as_str().to_string()),
        manual: false,
        bought: false,
        note: None,
        sort_order: index as i64,
    }
}

fn draft_item_from_input(item: &DraftItemInput, index: usize) -> DraftItem {
    let id = match &item.id {
        Some(id) if !id.trim().is_empty() => id.clone(),
        _ => Uuid::new_v4().to_string(),
    };

    DraftItem {
        id,
        ingredient_id: item.ingredient_id.clone(),
        name: item.name.trim().to_string(),
        quantity: item.quantity,
        unit: item.unit.trim().to_string(),
        suggested_packages: item.suggested_packages,
        package_amount: item.package_amount,
        package_unit: item.package_unit.clone(),
        manual: item.manual,
        bought: item.bought.unwrap_or(false),
        note: item.note.as_ref().map(|n| n.trim().to_string()),
        sort_order: item.sort_order.unwrap_or(index as i64),
    }
}

/// All-or-nothing validation over a replacement item list
fn validate_items(items: &[DraftItemInput]) -> AppResult<()> {
    for (index, item) in items.iter().enumerate() {
        let context = format!("items[{index}]");

        if !item.manual
            && item
                .ingredient_id
                .as_ref()
                .is_none_or(|id| id.trim().is_empty())
        {
            return Err(AppError::new(
                ErrorCode::ShoppingItemIngredientRequired,
                format!("{context}.ingredientId is required when manual=false"),
            ));
        }

        let has_suggested_packages = item.suggested_packages.is_some();
        let has_package_amount = item.package_amount.is_some();
        let has_package_unit = item
            .package_unit
            .as_ref()
            .is_some_and(|unit| !unit.trim().is_empty());
        let has_packaging_data = has_suggested_packages || has_package_amount || has_package_unit;
        let has_complete_packaging_data =
            has_suggested_packages && has_package_amount && has_package_unit;

        if has_packaging_data && !has_complete_packaging_data {
            return Err(AppError::new(
                ErrorCode::ShoppingItemPackageFieldsIncomplete,
                format!(
                    "{context} package fields must be sent together: suggestedPackages, packageAmount, packageUnit"
                ),
            ));
        }

        if item.suggested_packages.is_some_and(|packages| packages <= 0) {
            return Err(AppError::new(
                ErrorCode::ShoppingItemInvalidSuggestedPackages,
                format!("{context}.suggestedPackages must be > 0"),
            ));
        }

        if item.package_amount.is_some_and(|amount| amount <= 0.0) {
            return Err(AppError::new(
                ErrorCode::ShoppingItemInvalidPackageAmount,
                format!("{context}.packageAmount must be > 0"),
            ));
        }

        if item
            .note
            .as_ref()
            .is_some_and(|note| note.chars().count() > MAX_NOTE_LENGTH)
        {
            return Err(AppError::new(
                ErrorCode::ShoppingItemNoteTooLong,
                format!("{context}.note max length is {MAX_NOTE_LENGTH}"),
            ));
        }

        if item.sort_order.is_some_and(|order| order < 0) {
            return Err(AppError::new(
                ErrorCode::ShoppingItemInvalidSortOrder,
                format!("{context}.sortOrder must be >= 0"),
            ));
        }
    }

    Ok(())
}
