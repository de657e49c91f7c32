// ABOUTME: Unit conversion engine turning (ingredient, quantity, unit) into base amounts
// ABOUTME: Generic factors per measurement type plus ingredient-specific overrides
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Unit Conversion Engine
//!
//! Converts an `(ingredient, quantity, unit)` triple into the base unit for
//! the ingredient's measurement type: grams, milliliters, or pieces.
//!
//! Volume factors are generic (a cup of anything is 240 ml). Weight factors
//! for kitchen measures are not: a cup of rice and a cup of flour weigh
//! different amounts, so those conversions require an ingredient-specific
//! rule and the absence of one is a hard `MISSING_CONVERSION_RULE` error,
//! never a generic guess.
//!
//! "To taste" quantities convert to exactly zero by domain rule: seasoning
//! never contributes to totals or package counts.

use crate::catalog::IngredientCatalog;
use crate::errors::{AppError, AppResult};
use crate::models::{MeasurementType, Unit};
use std::collections::HashMap;
use std::sync::Arc;

/// Unit conversion engine over a shared catalog
pub struct ConversionEngine {
    catalog: Arc<IngredientCatalog>,
    /// Ingredient-specific to-base factors for kitchen weight measures
    specific_factors: HashMap<(&'static str, Unit), f64>,
}

impl ConversionEngine {
    /// Build the engine with the seed-aligned specific conversion rules
    #[must_use]
    pub fn new(catalog: Arc<IngredientCatalog>) -> Self {
        let mut specific_factors = HashMap::new();
        // Grams per one unit of the kitchen measure
        specific_factors.insert(("rice", Unit::Cup), 180.0);
        specific_factors.insert(("salt", Unit::Pinch), 0.3);

        Self {
            catalog,
            specific_factors,
        }
    }

    /// Convert a quantity to the ingredient's base unit
    ///
    /// # Errors
    ///
    /// Returns `INGREDIENT_NOT_FOUND` for an unknown ingredient,
    /// `INVALID_INGREDIENT_UNIT` when the unit is not allowed for it, and
    /// `MISSING_CONVERSION_RULE` when a kitchen weight measure has no
    /// ingredient-specific factor.
    pub async fn to_base_amount(
        &self,
        ingredient_id: &str,
        quantity: f64,
        unit: Unit,
        owner: &str,
    ) -> AppResult<f64> {
        let entry = self
            .catalog
            .find_by_id(ingredient_id, owner)
            .await?
            .ok_or_else(|| AppError::ingredient_not_found(ingredient_id))?;

        if !entry.allowed_units.contains(&unit) {
            return Err(AppError::invalid_unit(ingredient_id, unit));
        }

        if entry.measurement_type == MeasurementType::ToTaste || unit == Unit::ToTaste {
            return Ok(0.0);
        }

        match entry.measurement_type {
            MeasurementType::Weight => self.weight_to_grams(ingredient_id, quantity, unit),
            MeasurementType::Volume => volume_to_milliliters(quantity, unit),
            MeasurementType::Unit => count_pieces(quantity, unit),
            MeasurementType::ToTaste => Ok(0.0),
        }
    }

    /// Base unit aggregated totals for this ingredient are labeled with
    ///
    /// # Errors
    ///
    /// Returns `INGREDIENT_NOT_FOUND` for an unknown ingredient.
    pub async fn base_unit_for(&self, ingredient_id: &str, owner: &str) -> AppResult<Unit> {
        let entry = self
            .catalog
            .find_by_id(ingredient_id, owner)
            .await?
            .ok_or_else(|| AppError::ingredient_not_found(ingredient_id))?;

        Ok(entry.measurement_type.base_unit())
    }

    fn weight_to_grams(&self, ingredient_id: &str, quantity: f64, unit: Unit) -> AppResult<f64> {
        match unit {
            Unit::Gram => Ok(quantity),
            Unit::Kilogram => Ok(quantity * 1000.0),
            Unit::Cup | Unit::Tablespoon | Unit::Teaspoon | Unit::Pinch => {
                let factor = self
                    .specific_factors
                    .get(&(ingredient_id, unit))
                    .copied()
                    .ok_or_else(|| AppError::missing_conversion_rule(ingredient_id, unit))?;
                Ok(quantity * factor)
            }
            Unit::Milliliter | Unit::Liter | Unit::Piece | Unit::ToTaste => Err(
                AppError::invalid_unit(ingredient_id, unit),
            ),
        }
    }
}

fn volume_to_milliliters(quantity: f64, unit: Unit) -> AppResult<f64> {
    match unit {
        Unit::Milliliter => Ok(quantity),
        Unit::Liter => Ok(quantity * 1000.0),
        Unit::Tablespoon => Ok(quantity * 15.0),
        Unit::Teaspoon => Ok(quantity * 5.0),
        Unit::Cup => Ok(quantity * 240.0),
        Unit::Gram | Unit::Kilogram | Unit::Pinch | Unit::Piece | Unit::ToTaste => {
            Err(AppError::invalid_input(format!(
                "Unsupported VOLUME unit: {unit}"
            )))
        }
    }
}

fn count_pieces(quantity: f64, unit: Unit) -> AppResult<f64> {
    if unit == Unit::Piece {
        Ok(quantity)
    } else {
        Err(AppError::invalid_input(format!(
            "Unsupported UNIT type unit: {unit}"
        )))
    }
}
