// ABOUTME: Shopping list aggregation across recipes
// ABOUTME: Sums base amounts per canonical ingredient and rounds up to package counts
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Shopping List Aggregator
//!
//! Folds every ingredient line of every recipe into one running total per
//! canonical ingredient id, then shapes the totals into purchasable line
//! items. Accumulation is commutative, so recipe order never changes the
//! sums; the output is sorted by display name (then id) so presentation is
//! deterministic as well.

use crate::catalog::IngredientCatalog;
use crate::conversion::ConversionEngine;
use crate::errors::{AppError, AppResult};
use crate::models::{MeasurementType, Recipe, ShoppingListLineItem, Unit};
use std::collections::HashMap;
use std::sync::Arc;

/// Aggregates recipes into a consolidated shopping list
pub struct ShoppingListService {
    catalog: Arc<IngredientCatalog>,
    conversion: Arc<ConversionEngine>,
}

impl ShoppingListService {
    /// Build the aggregator over shared catalog and conversion engine
    #[must_use]
    pub fn new(catalog: Arc<IngredientCatalog>, conversion: Arc<ConversionEngine>) -> Self {
        Self {
            catalog,
            conversion,
        }
    }

    /// Generate consolidated line items from resolved recipes
    ///
    /// Lines converting to zero (to-taste) contribute nothing; ingredients
    /// whose total stays at or below zero are excluded entirely. The first
    /// conversion error aborts the whole generation.
    ///
    /// # Errors
    ///
    /// Propagates conversion errors (`INGREDIENT_NOT_FOUND`,
    /// `INVALID_INGREDIENT_UNIT`, `MISSING_CONVERSION_RULE`) and raises
    /// `CONFIG_ERROR` when a catalog entry's package size cannot be
    /// expressed in its own base unit.
    pub async fn generate_from_recipes(
        &self,
        recipes: &[Recipe],
        owner: &str,
    ) -> AppResult<Vec<ShoppingListLineItem>> {
        let mut totals: HashMap<String, f64> = HashMap::new();

        for recipe in recipes {
            for line in &recipe.ingredients {
                let base_amount = self
                    .conversion
                    .to_base_amount(&line.ingredient_id, line.quantity, line.unit, owner)
                    .await?;

                if base_amount <= 0.0 {
                    continue;
                }

                *totals.entry(line.ingredient_id.clone()).or_insert(0.0) += base_amount;
            }
        }

        let mut items = Vec::with_capacity(totals.len());
        for (ingredient_id, required_base_amount) in totals {
            let entry = self
                .catalog
                .find_by_id(&ingredient_id, owner)
                .await?
                .ok_or_else(|| AppError::ingredient_not_found(&ingredient_id))?;

            let package_base_amount = package_base_amount(
                entry.measurement_type,
                entry.suggested_purchase_amount,
                entry.suggested_purchase_unit,
            )?;
            if package_base_amount <= 0.0 {
                return Err(AppError::config(format!(
                    "Non-positive package size for ingredient {ingredient_id}"
                )));
            }

            let suggested_packages = (required_base_amount / package_base_amount).ceil() as i64;

            items.push(ShoppingListLineItem {
                ingredient_id: entry.id,
                display_name: entry.display_name,
                required_base_amount,
                base_unit: entry.measurement_type.base_unit(),
                suggested_packages,
                package_amount: entry.suggested_purchase_amount,
                package_unit: entry.suggested_purchase_unit,
            });
        }

        items.sort_by(|a, b| {
            a.display_name
                .cmp(&b.display_name)
                .then_with(|| a.ingredient_id.cmp(&b.ingredient_id))
        });
        Ok(items)
    }
}

/// Convert a catalog package size into the measurement type's base unit
///
/// A package unit that does not fit the measurement type is a catalog
/// authoring bug, so this is a fatal `CONFIG_ERROR` for the whole
/// generation, never a per-item skip.
fn package_base_amount(
    measurement_type: MeasurementType,
    amount: f64,
    unit: Unit,
) -> AppResult<f64> {
    match measurement_type {
        MeasurementType::Weight => match unit {
            Unit::Gram => Ok(amount),
            Unit::Kilogram => Ok(amount * 1000.0),
            _ => Err(AppError::config(format!(
                "Invalid package unit for WEIGHT: {unit}"
            ))),
        },
        MeasurementType::Volume => match unit {
            Unit::Milliliter => Ok(amount),
            Unit::Liter => Ok(amount * 1000.0),
            _ => Err(AppError::config(format!(
                "Invalid package unit for VOLUME: {unit}"
            ))),
        },
        MeasurementType::Unit => {
            if unit == Unit::Piece {
                Ok(amount)
            } else {
                Err(AppError::config(format!(
                    "Invalid package unit for UNIT: {unit}"
                )))
            }
        }
        MeasurementType::ToTaste => Ok(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_base_amount_conversions() {
        assert_eq!(
            package_base_amount(MeasurementType::Weight, 1.0, Unit::Kilogram).unwrap(),
            1000.0
        );
        assert_eq!(
            package_base_amount(MeasurementType::Volume, 500.0, Unit::Milliliter).unwrap(),
            500.0
        );
        assert_eq!(
            package_base_amount(MeasurementType::Unit, 12.0, Unit::Piece).unwrap(),
            12.0
        );
    }

    #[test]
    fn test_package_base_amount_rejects_wrong_unit() {
        let err = package_base_amount(MeasurementType::Weight, 1.0, Unit::Liter).unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::ConfigError);

        let err = package_base_amount(MeasurementType::Unit, 1.0, Unit::Gram).unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::ConfigError);
    }
}
