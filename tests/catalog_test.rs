// ABOUTME: Integration tests for the ingredient catalog
// ABOUTME: Covers seed loading, alias resolution, and custom ingredient lifecycle
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use pantry_server::catalog::IngredientCatalog;
use pantry_server::database::CustomIngredientRow;
use pantry_server::errors::ErrorCode;
use pantry_server::models::{MeasurementType, Unit};

const OWNER: &str = "user-1";
const OTHER_OWNER: &str = "user-2";

#[tokio::test]
async fn test_seed_catalog_loads() -> Result<()> {
    let catalog = common::create_test_catalog().await?;

    assert_eq!(catalog.catalog_version(), 1);
    let rice = catalog.find_by_id("rice", OWNER).await?.unwrap();
    assert_eq!(rice.display_name, "Arroz");
    assert_eq!(rice.measurement_type, MeasurementType::Weight);
    assert!(rice.allowed_units.contains(&Unit::Cup));
    assert_eq!(rice.suggested_purchase_amount, 1.0);
    assert_eq!(rice.suggested_purchase_unit, Unit::Kilogram);
    Ok(())
}

#[tokio::test]
async fn test_resolve_exact_and_case_insensitive_id() -> Result<()> {
    let catalog = common::create_test_catalog().await?;

    assert_eq!(catalog.resolve("rice", OWNER).await?.as_deref(), Some("rice"));
    assert_eq!(catalog.resolve("RICE", OWNER).await?.as_deref(), Some("rice"));
    assert_eq!(
        catalog.resolve("  Black-Beans  ", OWNER).await?.as_deref(),
        Some("black-beans")
    );
    Ok(())
}

#[tokio::test]
async fn test_resolve_by_alias_with_diacritics() -> Result<()> {
    let catalog = common::create_test_catalog().await?;

    assert_eq!(catalog.resolve("Arroz", OWNER).await?.as_deref(), Some("rice"));
    assert_eq!(
        catalog.resolve("arroz blanco", OWNER).await?.as_deref(),
        Some("rice")
    );
    // Seed alias carries the accent; lookups without it still land
    assert_eq!(catalog.resolve("Azucar", OWNER).await?.as_deref(), Some("sugar"));
    assert_eq!(catalog.resolve("Azúcar", OWNER).await?.as_deref(), Some("sugar"));
    assert_eq!(
        catalog.resolve("platano maduro", OWNER).await?.as_deref(),
        Some("sweet-plantain")
    );
    Ok(())
}

#[tokio::test]
async fn test_resolve_unknown_name() -> Result<()> {
    let catalog = common::create_test_catalog().await?;

    assert_eq!(catalog.resolve("conejo", OWNER).await?, None);
    assert_eq!(catalog.resolve("", OWNER).await?, None);
    assert_eq!(catalog.resolve("   ", OWNER).await?, None);
    Ok(())
}

#[tokio::test]
async fn test_ambiguous_seed_alias_is_fatal() -> Result<()> {
    let database = common::create_test_database().await?;
    let seed = r#"{
      "catalogVersion": 1,
      "ingredients": [
        {
          "id": "rice",
          "displayName": "Arroz",
          "measurementType": "WEIGHT",
          "allowedUnits": ["GRAM"],
          "suggestedPurchaseAmount": 1.0,
          "suggestedPurchaseUnit": "KILOGRAM",
          "aliases": ["Arroz"]
        },
        {
          "id": "rice-premium",
          "displayName": "Arroz Premium",
          "measurementType": "WEIGHT",
          "allowedUnits": ["GRAM"],
          "suggestedPurchaseAmount": 1.0,
          "suggestedPurchaseUnit": "KILOGRAM",
          "aliases": ["ARROZ"]
        }
      ]
    }"#;

    let err = IngredientCatalog::from_seed_str(seed, database)
        .map(|_| ())
        .unwrap_err();
    assert!(err.to_string().contains("Ambiguous alias"), "got: {err}");
    Ok(())
}

#[tokio::test]
async fn test_unsupported_catalog_version_is_fatal() -> Result<()> {
    let database = common::create_test_database().await?;
    let seed = r#"{"catalogVersion": 0, "ingredients": []}"#;

    assert!(IngredientCatalog::from_seed_str(seed, database).is_err());
    Ok(())
}

#[tokio::test]
async fn test_create_custom_ingredient_round_trip() -> Result<()> {
    let catalog = common::create_test_catalog().await?;

    let created = catalog
        .create_custom("  queso FRESCO  ", MeasurementType::Weight, OWNER)
        .await?;
    assert_eq!(created.display_name, "Queso Fresco");
    assert!(created.id.starts_with("custom-queso-fresco-"));
    assert_eq!(created.suggested_purchase_amount, 1.0);
    assert_eq!(created.suggested_purchase_unit, Unit::Kilogram);
    assert!(created.allowed_units.contains(&Unit::Gram));

    // Resolvable by stored name and by id for its owner
    assert_eq!(
        catalog.resolve("queso fresco", OWNER).await?.as_deref(),
        Some(created.id.as_str())
    );
    assert_eq!(
        catalog.resolve(&created.id, OWNER).await?.as_deref(),
        Some(created.id.as_str())
    );
    assert!(catalog.find_by_id(&created.id, OWNER).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_custom_ingredients_are_owner_scoped() -> Result<()> {
    let catalog = common::create_test_catalog().await?;

    let created = catalog
        .create_custom("Queso Fresco", MeasurementType::Weight, OWNER)
        .await?;

    assert_eq!(catalog.resolve("queso fresco", OTHER_OWNER).await?, None);
    assert!(catalog.find_by_id(&created.id, OTHER_OWNER).await?.is_none());

    // The other owner can claim the same name independently
    let theirs = catalog
        .create_custom("Queso Fresco", MeasurementType::Weight, OTHER_OWNER)
        .await?;
    assert_ne!(theirs.id, created.id);
    Ok(())
}

#[tokio::test]
async fn test_create_custom_rejects_duplicates() -> Result<()> {
    let catalog = common::create_test_catalog().await?;

    catalog
        .create_custom("Queso Fresco", MeasurementType::Weight, OWNER)
        .await?;
    let err = catalog
        .create_custom("  QUESO fresco ", MeasurementType::Weight, OWNER)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::IngredientAlreadyExists);

    // Names colliding with seed entries are rejected too
    let err = catalog
        .create_custom("Arroz", MeasurementType::Weight, OWNER)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::IngredientAlreadyExists);
    Ok(())
}

#[tokio::test]
async fn test_create_custom_requires_name() -> Result<()> {
    let catalog = common::create_test_catalog().await?;

    let err = catalog
        .create_custom("   ", MeasurementType::Weight, OWNER)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);
    Ok(())
}

#[tokio::test]
async fn test_list_filters_and_sorts() -> Result<()> {
    let catalog = common::create_test_catalog().await?;

    let all = catalog.list("", OWNER).await?;
    assert_eq!(all.len(), 15);
    let mut names: Vec<String> = all.iter().map(|e| e.display_name.clone()).collect();
    let sorted = {
        let mut sorted = names.clone();
        sorted.sort();
        sorted
    };
    assert_eq!(names, sorted);

    // Alias text matches even when the display name does not
    let by_alias = catalog.list("pollo", OWNER).await?;
    assert_eq!(by_alias.len(), 1);
    assert_eq!(by_alias[0].id, "chicken-breast");

    // Custom entries show up for their owner only
    catalog
        .create_custom("Queso Fresco", MeasurementType::Weight, OWNER)
        .await?;
    names = catalog
        .list("queso", OWNER)
        .await?
        .iter()
        .map(|e| e.display_name.clone())
        .collect();
    assert_eq!(names, vec!["Queso Fresco".to_string()]);
    assert!(catalog.list("queso", OTHER_OWNER).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_seed_package_units_fit_their_measurement_type() -> Result<()> {
    let catalog = common::create_test_catalog().await?;

    for entry in catalog.list("", OWNER).await? {
        let valid = match entry.measurement_type {
            MeasurementType::Weight => {
                matches!(entry.suggested_purchase_unit, Unit::Gram | Unit::Kilogram)
            }
            MeasurementType::Volume => {
                matches!(entry.suggested_purchase_unit, Unit::Milliliter | Unit::Liter)
            }
            MeasurementType::Unit => entry.suggested_purchase_unit == Unit::Piece,
            MeasurementType::ToTaste => true,
        };
        assert!(valid, "bad package unit for {}", entry.id);
        if entry.measurement_type != MeasurementType::ToTaste {
            assert!(
                entry.suggested_purchase_amount > 0.0,
                "non-positive package for {}",
                entry.id
            );
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_aliases_and_preferred_label() -> Result<()> {
    let catalog = common::create_test_catalog().await?;

    let rice = catalog.find_by_id("rice", OWNER).await?.unwrap();
    let aliases = catalog.aliases_for(&rice);
    assert!(aliases.contains(&"Arroz Blanco".to_string()));

    // A query matching an alias surfaces that alias as the label
    assert_eq!(catalog.preferred_label(&rice, "arroz blanco"), "Arroz Blanco");
    assert_eq!(catalog.preferred_label(&rice, "rice"), "Arroz");
    Ok(())
}

fn custom_row(id: &str, owner: &str) -> CustomIngredientRow {
    CustomIngredientRow {
        id: id.to_string(),
        user_id: owner.to_string(),
        name: "Queso Fresco".to_string(),
        normalized_name: "queso-fresco".to_string(),
        measurement_type: MeasurementType::Weight,
        created_at: chrono::Utc::now(),
    }
}

#[tokio::test]
async fn test_duplicate_custom_insert_maps_unique_violation() -> Result<()> {
    let database = common::create_test_database().await?;

    database
        .insert_custom_ingredient(&custom_row("custom-queso-fresco-aaaa1111", OWNER))
        .await?;

    // Same (owner, normalized name) under a fresh id hits the table constraint,
    // the path a second writer takes when both pass the pre-insert lookup
    let err = database
        .insert_custom_ingredient(&custom_row("custom-queso-fresco-bbbb2222", OWNER))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::IngredientAlreadyExists);
    assert!(err.message.contains("Queso Fresco"));

    // A different owner may reuse the name
    database
        .insert_custom_ingredient(&custom_row("custom-queso-fresco-cccc3333", OTHER_OWNER))
        .await?;
    Ok(())
}
