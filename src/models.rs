// ABOUTME: Domain models for the meal-plan shopping engine
// ABOUTME: Units, measurement types, catalog entries, recipes, plans, and shopping drafts
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core domain types shared by the catalog, conversion engine, aggregator,
//! and draft layer. All enums are closed: adding a measurement type or unit
//! forces every `match` over them to be revisited.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Measurement unit a quantity can be expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Unit {
    /// Weight base unit
    Gram,
    /// 1000 grams
    Kilogram,
    /// Volume base unit
    Milliliter,
    /// 1000 milliliters
    Liter,
    /// Generic volume 240 ml; weight requires an ingredient-specific rule
    Cup,
    /// Generic volume 15 ml; weight requires an ingredient-specific rule
    Tablespoon,
    /// Generic volume 5 ml; weight requires an ingredient-specific rule
    Teaspoon,
    /// Weight only, always via an ingredient-specific rule
    Pinch,
    /// Countable base unit
    Piece,
    /// Seasoning-to-taste, never contributes to totals
    ToTaste,
}

impl Unit {
    /// Canonical wire/database representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gram => "GRAM",
            Self::Kilogram => "KILOGRAM",
            Self::Milliliter => "MILLILITER",
            Self::Liter => "LITER",
            Self::Cup => "CUP",
            Self::Tablespoon => "TABLESPOON",
            Self::Teaspoon => "TEASPOON",
            Self::Pinch => "PINCH",
            Self::Piece => "PIECE",
            Self::ToTaste => "TO_TASTE",
        }
    }

}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an ingredient's quantities are measured and summed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeasurementType {
    /// Summed in grams
    Weight,
    /// Summed in milliliters
    Volume,
    /// Summed in pieces
    Unit,
    /// Never summed; always contributes zero
    ToTaste,
}

impl MeasurementType {
    /// Canonical wire/database representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Weight => "WEIGHT",
            Self::Volume => "VOLUME",
            Self::Unit => "UNIT",
            Self::ToTaste => "TO_TASTE",
        }
    }

    /// Strict parse from the canonical representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "WEIGHT" => Some(Self::Weight),
            "VOLUME" => Some(Self::Volume),
            "UNIT" => Some(Self::Unit),
            "TO_TASTE" => Some(Self::ToTaste),
            _ => None,
        }
    }

    /// Base unit totals for this measurement type are labeled with
    #[must_use]
    pub const fn base_unit(&self) -> Unit {
        match self {
            Self::Weight => Unit::Gram,
            Self::Volume => Unit::Milliliter,
            Self::Unit => Unit::Piece,
            Self::ToTaste => Unit::ToTaste,
        }
    }
}

impl fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One canonical ingredient identity in the catalog
///
/// Seed entries are immutable once registered; custom entries are created
/// once per owner and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Globally unique canonical id (seed ids are short slugs, custom ids
    /// are `custom-<normalized-name>-<suffix>`)
    pub id: String,
    /// Human-facing name
    pub display_name: String,
    /// How quantities of this ingredient are measured
    pub measurement_type: MeasurementType,
    /// Units a recipe line may use for this ingredient
    pub allowed_units: HashSet<Unit>,
    /// Size of one purchasable package
    pub suggested_purchase_amount: f64,
    /// Unit the package size is expressed in
    pub suggested_purchase_unit: Unit,
}

/// Meal slot a recipe is planned for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MealType {
    /// Morning meal
    Breakfast,
    /// Midday meal
    Lunch,
    /// Evening meal
    Dinner,
}

impl MealType {
    /// Canonical wire/database representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "BREAKFAST",
            Self::Lunch => "LUNCH",
            Self::Dinner => "DINNER",
        }
    }

    /// Strict parse from the canonical representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BREAKFAST" => Some(Self::Breakfast),
            "LUNCH" => Some(Self::Lunch),
            "DINNER" => Some(Self::Dinner),
            _ => None,
        }
    }
}

/// One resolved ingredient line inside a stored recipe
///
/// `ingredient_id` is always canonical; raw alias input is resolved at recipe
/// save time and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredientLine {
    /// Canonical catalog id
    pub ingredient_id: String,
    /// Quantity in `unit`, strictly positive
    pub quantity: f64,
    /// Unit the quantity is expressed in
    pub unit: Unit,
}

/// A stored recipe with fully resolved ingredient lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Recipe id (uuid)
    pub id: String,
    /// Recipe name
    pub name: String,
    /// Meal slot this recipe is intended for
    pub meal_type: MealType,
    /// Resolved ingredient lines
    pub ingredients: Vec<RecipeIngredientLine>,
    /// Free-form notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// One planned meal inside a plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedMealSlot {
    /// Day the meal is planned for
    pub date: NaiveDate,
    /// Which meal of the day
    pub meal_type: MealType,
    /// Reference to a stored recipe
    pub recipe_id: String,
}

/// A meal plan: an ordered list of recipe references over a date range
///
/// Date-range and slot validation happen in the external planning layer; the
/// engine only consumes the ordered slot list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlan {
    /// Plan id (uuid)
    pub id: String,
    /// First day covered by the plan
    pub start_date: NaiveDate,
    /// Last day covered by the plan
    pub end_date: NaiveDate,
    /// Ordered planned meals
    pub slots: Vec<PlannedMealSlot>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// One aggregated line of a freshly generated shopping list
///
/// Produced by the aggregator and never mutated afterward; the draft layer
/// copies it into editable [`DraftItem`]s.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingListLineItem {
    /// Canonical catalog id
    pub ingredient_id: String,
    /// Catalog display name at generation time
    pub display_name: String,
    /// Total required amount in `base_unit`
    pub required_base_amount: f64,
    /// Base unit for the ingredient's measurement type
    pub base_unit: Unit,
    /// Packages to buy: `ceil(required / package size in base unit)`
    pub suggested_packages: i64,
    /// Package size from the catalog
    pub package_amount: f64,
    /// Unit the package size is expressed in
    pub package_unit: Unit,
}

/// One editable item of a shopping list draft
///
/// Generalizes [`ShoppingListLineItem`]: the unit is a free string because
/// manual items may carry arbitrary units the catalog knows nothing about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftItem {
    /// Item id (uuid)
    pub id: String,
    /// Canonical catalog id; required unless `manual`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredient_id: Option<String>,
    /// Display name
    pub name: String,
    /// Quantity in `unit`
    pub quantity: f64,
    /// Free-form unit label
    pub unit: String,
    /// Packages to buy, if packaging data is present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_packages: Option<i64>,
    /// Package size, if packaging data is present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_amount: Option<f64>,
    /// Package unit label, if packaging data is present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_unit: Option<String>,
    /// True for hand-added items with no catalog identity
    pub manual: bool,
    /// Checked off while shopping
    pub bought: bool,
    /// Free-form note, at most 280 characters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Presentation order, non-negative
    pub sort_order: i64,
}

/// An owner-scoped, editable shopping list draft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingListDraft {
    /// Draft id (uuid)
    pub id: String,
    /// Plan this draft was generated from
    pub plan_id: String,
    /// Editable items, wholesale-replaced on edit
    pub items: Vec<DraftItem>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_wire_names_match_as_str() {
        for unit in [
            Unit::Gram,
            Unit::Kilogram,
            Unit::Milliliter,
            Unit::Liter,
            Unit::Cup,
            Unit::Tablespoon,
            Unit::Teaspoon,
            Unit::Pinch,
            Unit::Piece,
            Unit::ToTaste,
        ] {
            let json = serde_json::to_string(&unit).unwrap();
            assert_eq!(json, format!("\"{}\"", unit.as_str()));
        }
    }

    #[test]
    fn test_measurement_type_base_unit() {
        assert_eq!(MeasurementType::Weight.base_unit(), Unit::Gram);
        assert_eq!(MeasurementType::Volume.base_unit(), Unit::Milliliter);
        assert_eq!(MeasurementType::Unit.base_unit(), Unit::Piece);
        assert_eq!(MeasurementType::ToTaste.base_unit(), Unit::ToTaste);
    }

    #[test]
    fn test_unit_serde_names() {
        let json = serde_json::to_string(&Unit::ToTaste).unwrap();
        assert_eq!(json, "\"TO_TASTE\"");
        let parsed: Unit = serde_json::from_str("\"KILOGRAM\"").unwrap();
        assert_eq!(parsed, Unit::Kilogram);
    }
}
