// ABOUTME: Ingredient catalog owning canonical ingredient identity
// ABOUTME: Versioned seed load, alias index with collision detection, owner-scoped customs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Ingredient Catalog
//!
//! Owns ingredient identity: a versioned seed catalog embedded at compile
//! time plus owner-scoped custom ingredients persisted in the database. Every
//! free-text reference is resolved through a normalized alias index to
//! exactly one canonical id.
//!
//! The alias index invariant is load-bearing: one normalized alias maps to at
//! most one ingredient id. A seed file where the same alias points at two
//! different ingredients would silently corrupt every recipe referencing it,
//! so the catalog refuses to construct instead.
//!
//! Seed structures are built once at startup and never mutated afterward;
//! they are safe to share across request tasks behind an `Arc`.

pub mod normalize;

use crate::database::{CustomIngredientRow, Database};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::models::{CatalogEntry, MeasurementType, Unit};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use normalize::{display_case, normalize_alias};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};
use uuid::Uuid;

/// Embedded versioned seed catalog
const SEED_JSON: &str = include_str!("seed/ingredients_catalog.json");

/// Oldest seed schema the engine still accepts
const MIN_SUPPORTED_CATALOG_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedFile {
    catalog_version: u32,
    ingredients: Vec<SeedIngredient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedIngredient {
    id: String,
    display_name: String,
    measurement_type: MeasurementType,
    allowed_units: Vec<Unit>,
    suggested_purchase_amount: f64,
    suggested_purchase_unit: Unit,
    #[serde(default)]
    aliases: Vec<String>,
}

/// The ingredient catalog: seed identity plus owner-scoped customs
pub struct IngredientCatalog {
    catalog_version: u32,
    seed_entries: HashMap<String, CatalogEntry>,
    alias_to_id: HashMap<String, String>,
    aliases_by_id: HashMap<String, Vec<String>>,
    database: Database,
}

impl IngredientCatalog {
    /// Build the catalog from the embedded seed
    ///
    /// # Errors
    ///
    /// Returns an error on any seed authoring bug: missing or blank required
    /// fields, empty allowed units, unsupported catalog version, or an alias
    /// mapped to two different ingredient ids. The process must refuse to
    /// start rather than run with ambiguous identity data.
    pub fn new(database: Database) -> Result<Self> {
        Self::from_seed_str(SEED_JSON, database)
    }

    /// Build the catalog from an explicit seed document
    ///
    /// # Errors
    ///
    /// Same failure modes as [`IngredientCatalog::new`].
    pub fn from_seed_str(seed: &str, database: Database) -> Result<Self> {
        let seed: SeedFile =
            serde_json::from_str(seed).context("Failed to parse ingredient seed catalog")?;

        if seed.catalog_version < MIN_SUPPORTED_CATALOG_VERSION {
            bail!(
                "Unsupported catalogVersion {} in ingredient seed (minimum {})",
                seed.catalog_version,
                MIN_SUPPORTED_CATALOG_VERSION
            );
        }

        let mut catalog = Self {
            catalog_version: seed.catalog_version,
            seed_entries: HashMap::new(),
            alias_to_id: HashMap::new(),
            aliases_by_id: HashMap::new(),
            database,
        };

        for ingredient in seed.ingredients {
            catalog.register_seed_ingredient(ingredient)?;
        }

        info!(
            seed_count = catalog.seed_entries.len(),
            catalog_version = catalog.catalog_version,
            "ingredient catalog loaded"
        );

        Ok(catalog)
    }

    fn register_seed_ingredient(&mut self, ingredient: SeedIngredient) -> Result<()> {
        if ingredient.id.trim().is_empty() {
            bail!("Ingredient seed entry with blank id");
        }
        if ingredient.display_name.trim().is_empty() {
            bail!("Ingredient seed missing displayName for id: {}", ingredient.id);
        }
        if ingredient.allowed_units.is_empty() {
            bail!(
                "Ingredient seed requires non-empty allowedUnits for id: {}",
                ingredient.id
            );
        }

        let id = ingredient.id.clone();
        let entry = CatalogEntry {
            id: id.clone(),
            display_name: ingredient.display_name.clone(),
            measurement_type: ingredient.measurement_type,
            allowed_units: ingredient.allowed_units.into_iter().collect(),
            suggested_purchase_amount: ingredient.suggested_purchase_amount,
            suggested_purchase_unit: ingredient.suggested_purchase_unit,
        };

        if self.seed_entries.insert(id.clone(), entry).is_some() {
            bail!("Duplicate ingredient id in seed: {id}");
        }

        self.register_seed_alias(&id, &id)?;
        self.register_seed_alias(&id, &ingredient.display_name)?;

        let mut kept = Vec::new();
        for alias in &ingredient.aliases {
            self.register_seed_alias(&id, alias)?;
            if !alias.trim().is_empty() {
                kept.push(alias.trim().to_string());
            }
        }
        self.aliases_by_id.insert(id, kept);

        Ok(())
    }

    /// Register one normalized alias; same-id re-registration is a no-op,
    /// cross-id collision is fatal
    fn register_seed_alias(&mut self, ingredient_id: &str, alias: &str) -> Result<()> {
        let normalized = normalize_alias(alias);
        if normalized.is_empty() {
            return Ok(());
        }

        if let Some(existing) = self
            .alias_to_id
            .insert(normalized.clone(), ingredient_id.to_string())
        {
            if existing != ingredient_id {
                bail!(
                    "Ambiguous alias '{alias}' maps to both '{existing}' and '{ingredient_id}'"
                );
            }
        }

        Ok(())
    }

    /// Seed schema version the catalog was loaded from
    #[must_use]
    pub fn catalog_version(&self) -> u32 {
        self.catalog_version
    }

    /// Full entry for a canonical id, seed first then the owner's customs
    ///
    /// # Errors
    ///
    /// Returns a database error if the custom lookup fails.
    pub async fn find_by_id(&self, ingredient_id: &str, owner: &str) -> AppResult<Option<CatalogEntry>> {
        if let Some(entry) = self.seed_entries.get(ingredient_id) {
            return Ok(Some(entry.clone()));
        }

        let custom = self
            .database
            .get_custom_ingredient_by_id(ingredient_id, owner)
            .await?;
        Ok(custom.map(|row| Self::custom_entry(&row)))
    }

    /// Resolve free-text or alias input to a canonical ingredient id
    ///
    /// Tries, in order: exact seed id, lowercased seed id, normalized seed
    /// id, normalized seed alias, the owner's custom normalized name, the
    /// owner's custom id. Blank input and unmatched input both resolve to
    /// `None`; callers surface that as `INGREDIENT_NOT_FOUND`.
    ///
    /// # Errors
    ///
    /// Returns a database error if a custom lookup fails.
    pub async fn resolve(&self, raw_input: &str, owner: &str) -> AppResult<Option<String>> {
        let direct = raw_input.trim();
        if direct.is_empty() {
            return Ok(None);
        }

        if self.seed_entries.contains_key(direct) {
            return Ok(Some(direct.to_string()));
        }

        let lowered = direct.to_lowercase();
        if self.seed_entries.contains_key(&lowered) {
            return Ok(Some(lowered));
        }

        let normalized = normalize_alias(raw_input);
        if self.seed_entries.contains_key(&normalized) {
            return Ok(Some(normalized));
        }

        if let Some(ingredient_id) = self.alias_to_id.get(&normalized) {
            return Ok(Some(ingredient_id.clone()));
        }

        if let Some(row) = self
            .database
            .get_custom_ingredient_by_normalized_name(owner, &normalized)
            .await?
        {
            return Ok(Some(row.id));
        }

        if let Some(row) = self
            .database
            .get_custom_ingredient_by_id(direct, owner)
            .await?
        {
            return Ok(Some(row.id));
        }

        Ok(None)
    }

    /// Whether a unit is in the ingredient's allowed set
    ///
    /// False for an unknown ingredient rather than an error: the caller
    /// decides whether "unknown" is its own failure.
    ///
    /// # Errors
    ///
    /// Returns a database error if the custom lookup fails.
    pub async fn is_unit_allowed(&self, ingredient_id: &str, unit: Unit, owner: &str) -> AppResult<bool> {
        Ok(self
            .find_by_id(ingredient_id, owner)
            .await?
            .is_some_and(|entry| entry.allowed_units.contains(&unit)))
    }

    /// Seed entries plus the owner's customs, sorted by display name
    ///
    /// A non-empty query filters to entries whose id, normalized display
    /// name, or any normalized alias contains the normalized query.
    ///
    /// # Errors
    ///
    /// Returns a database error if the custom listing fails.
    pub async fn list(&self, query: &str, owner: &str) -> AppResult<Vec<CatalogEntry>> {
        let customs = self.database.list_custom_ingredients(owner).await?;

        let mut entries: Vec<CatalogEntry> = self.seed_entries.values().cloned().collect();
        entries.extend(customs.iter().map(Self::custom_entry));

        let trimmed_query = query.trim();
        if !trimmed_query.is_empty() {
            let normalized_query = normalize_alias(trimmed_query);
            entries.retain(|entry| {
                entry.id.contains(&normalized_query)
                    || normalize_alias(&entry.display_name).contains(&normalized_query)
                    || self.has_matching_alias(&entry.id, &normalized_query)
            });
        }

        entries.sort_by(|a, b| {
            a.display_name
                .cmp(&b.display_name)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(entries)
    }

    /// Display-cased aliases registered for an entry, or its display name
    /// when no explicit aliases exist
    #[must_use]
    pub fn aliases_for(&self, entry: &CatalogEntry) -> Vec<String> {
        let aliases = self.aliases_by_id.get(&entry.id);
        match aliases {
            Some(aliases) if !aliases.is_empty() => {
                let mut seen = HashSet::new();
                aliases
                    .iter()
                    .map(|alias| display_case(alias))
                    .filter(|alias| seen.insert(alias.clone()))
                    .collect()
            }
            _ => vec![display_case(&entry.display_name)],
        }
    }

    /// Alias label best matching a typeahead query, for presentation
    ///
    /// Prefers an alias whose normalized form starts with the query, then
    /// one containing it, then the first registered alias, then the display
    /// name.
    #[must_use]
    pub fn preferred_label(&self, entry: &CatalogEntry, query: &str) -> String {
        let Some(aliases) = self.aliases_by_id.get(&entry.id).filter(|a| !a.is_empty()) else {
            return entry.display_name.clone();
        };

        let trimmed_query = query.trim();
        if !trimmed_query.is_empty() {
            let normalized_query = normalize_alias(trimmed_query);
            if let Some(alias) = aliases
                .iter()
                .find(|alias| normalize_alias(alias).starts_with(&normalized_query))
            {
                return display_case(alias);
            }
            if let Some(alias) = aliases
                .iter()
                .find(|alias| normalize_alias(alias).contains(&normalized_query))
            {
                return display_case(alias);
            }
        }

        display_case(&aliases[0])
    }

    /// Create an owner-scoped custom ingredient
    ///
    /// The duplicate check is race-safe: the pre-insert `resolve` catches
    /// sequential duplicates with a precise message, and the database's
    /// uniqueness constraint catches concurrent ones, both surfacing as
    /// `INGREDIENT_ALREADY_EXISTS`.
    ///
    /// # Errors
    ///
    /// Returns `MISSING_REQUIRED_FIELD` for a blank name,
    /// `INGREDIENT_ALREADY_EXISTS` for any name that already resolves for
    /// this owner, or a database error.
    pub async fn create_custom(
        &self,
        name: &str,
        measurement_type: MeasurementType,
        owner: &str,
    ) -> AppResult<CatalogEntry> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(AppError::new(
                ErrorCode::MissingRequiredField,
                "Ingredient name is required",
            ));
        }

        let canonical_name = display_case(trimmed);
        let normalized_name = normalize_alias(&canonical_name);

        if let Some(existing) = self.resolve(trimmed, owner).await? {
            return Err(AppError::ingredient_already_exists(existing));
        }

        let suffix: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
        let id = format!("custom-{normalized_name}-{suffix}");

        let row = CustomIngredientRow {
            id,
            user_id: owner.to_string(),
            name: canonical_name,
            normalized_name,
            measurement_type,
            created_at: Utc::now(),
        };

        self.database.insert_custom_ingredient(&row).await?;
        debug!(ingredient_id = %row.id, owner = %owner, "custom ingredient created");

        Ok(Self::custom_entry(&row))
    }

    /// Fixed per-measurement-type defaults for custom ingredients
    fn custom_entry(row: &CustomIngredientRow) -> CatalogEntry {
        let (allowed_units, amount, unit): (&[Unit], f64, Unit) = match row.measurement_type {
            MeasurementType::Weight => (&[Unit::Gram, Unit::Kilogram], 1.0, Unit::Kilogram),
            MeasurementType::Volume => (
                &[
                    Unit::Milliliter,
                    Unit::Liter,
                    Unit::Cup,
                    Unit::Tablespoon,
                    Unit::Teaspoon,
                ],
                1.0,
                Unit::Liter,
            ),
            MeasurementType::Unit => (&[Unit::Piece], 1.0, Unit::Piece),
            MeasurementType::ToTaste => (&[Unit::Pinch, Unit::ToTaste], 0.0, Unit::ToTaste),
        };

        CatalogEntry {
            id: row.id.clone(),
            display_name: row.name.clone(),
            measurement_type: row.measurement_type,
            allowed_units: allowed_units.iter().copied().collect(),
            suggested_purchase_amount: amount,
            suggested_purchase_unit: unit,
        }
    }

    fn has_matching_alias(&self, ingredient_id: &str, normalized_query: &str) -> bool {
        self.alias_to_id
            .iter()
            .any(|(alias, id)| id == ingredient_id && alias.contains(normalized_query))
    }
}
