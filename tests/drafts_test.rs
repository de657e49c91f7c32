// ABOUTME: Integration tests for shopping list drafts
// ABOUTME: Covers idempotent creation, item replacement validation, and owner scoping
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use pantry_server::errors::ErrorCode;
use pantry_server::models::{ShoppingListDraft, ShoppingListLineItem, Unit};
use pantry_server::shopping::DraftItemInput;

const OWNER: &str = "user-1";
const OTHER_OWNER: &str = "user-2";
const PLAN: &str = "plan-1";

fn generated_items() -> Vec<ShoppingListLineItem> {
    vec![
        ShoppingListLineItem {
            ingredient_id: "oil".to_string(),
            display_name: "Aceite".to_string(),
            required_base_amount: 600.0,
            base_unit: Unit::Milliliter,
            suggested_packages: 2,
            package_amount: 500.0,
            package_unit: Unit::Milliliter,
        },
        ShoppingListLineItem {
            ingredient_id: "rice".to_string(),
            display_name: "Arroz".to_string(),
            required_base_amount: 380.0,
            base_unit: Unit::Gram,
            suggested_packages: 1,
            package_amount: 1.0,
            package_unit: Unit::Kilogram,
        },
    ]
}

fn manual_input(name: &str) -> DraftItemInput {
    DraftItemInput {
        id: None,
        ingredient_id: None,
        name: name.to_string(),
        quantity: 1.0,
        unit: "PIECE".to_string(),
        suggested_packages: None,
        package_amount: None,
        package_unit: None,
        manual: true,
        bought: None,
        note: None,
        sort_order: None,
    }
}

async fn create_draft(
    services: &common::TestServices,
    key: Option<&str>,
) -> Result<ShoppingListDraft> {
    Ok(services
        .drafts
        .create_from_generated(OWNER, PLAN, &generated_items(), key)
        .await?)
}

#[tokio::test]
async fn test_create_maps_generated_items() -> Result<()> {
    let services = common::create_test_services().await?;

    let draft = create_draft(&services, None).await?;
    assert_eq!(draft.plan_id, PLAN);
    assert_eq!(draft.items.len(), 2);

    let oil = &draft.items[0];
    assert_eq!(oil.ingredient_id.as_deref(), Some("oil"));
    assert_eq!(oil.name, "Aceite");
    assert_eq!(oil.quantity, 600.0);
    assert_eq!(oil.unit, "MILLILITER");
    assert_eq!(oil.suggested_packages, Some(2));
    assert_eq!(oil.package_amount, Some(500.0));
    assert_eq!(oil.package_unit.as_deref(), Some("MILLILITER"));
    assert!(!oil.manual);
    assert!(!oil.bought);
    assert_eq!(oil.sort_order, 0);
    assert_eq!(draft.items[1].sort_order, 1);
    Ok(())
}

#[tokio::test]
async fn test_create_is_idempotent_per_key() -> Result<()> {
    let services = common::create_test_services().await?;

    let first = create_draft(&services, Some("key-1")).await?;
    let second = create_draft(&services, Some("key-1")).await?;
    assert_eq!(second.id, first.id);

    let third = create_draft(&services, Some("key-2")).await?;
    assert_ne!(third.id, first.id);

    // Padded keys compare by their trimmed value
    let padded = create_draft(&services, Some("  key-1  ")).await?;
    assert_eq!(padded.id, first.id);
    Ok(())
}

#[tokio::test]
async fn test_blank_key_never_deduplicates() -> Result<()> {
    let services = common::create_test_services().await?;

    let first = create_draft(&services, Some("   ")).await?;
    let second = create_draft(&services, Some("")).await?;
    let third = create_draft(&services, None).await?;
    assert_ne!(first.id, second.id);
    assert_ne!(second.id, third.id);
    assert_eq!(services.drafts.find_all(OWNER).await?.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_same_key_different_plan_creates_separate_drafts() -> Result<()> {
    let services = common::create_test_services().await?;

    let first = create_draft(&services, Some("key-1")).await?;
    let other = services
        .drafts
        .create_from_generated(OWNER, "plan-2", &generated_items(), Some("key-1"))
        .await?;
    assert_ne!(other.id, first.id);
    Ok(())
}

#[tokio::test]
async fn test_drafts_are_owner_scoped() -> Result<()> {
    let services = common::create_test_services().await?;

    let draft = create_draft(&services, Some("key-1")).await?;
    assert!(services.drafts.find_by_id(&draft.id, OTHER_OWNER).await?.is_none());
    assert!(services.drafts.find_all(OTHER_OWNER).await?.is_empty());

    // The same key under another owner is a distinct draft
    let theirs = services
        .drafts
        .create_from_generated(OTHER_OWNER, PLAN, &generated_items(), Some("key-1"))
        .await?;
    assert_ne!(theirs.id, draft.id);

    // Cross-owner deletes and edits do not touch the draft
    assert!(!services.drafts.delete_by_id(&draft.id, OTHER_OWNER).await?);
    let err = services
        .drafts
        .replace_items(&draft.id, OTHER_OWNER, &[manual_input("Pan")])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert!(services.drafts.find_by_id(&draft.id, OWNER).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_replace_items_wholesale() -> Result<()> {
    let services = common::create_test_services().await?;
    let draft = create_draft(&services, None).await?;

    let mut kept = manual_input("Pan");
    kept.note = Some("  panadería de la esquina  ".to_string());
    let updated = services
        .drafts
        .replace_items(&draft.id, OWNER, &[kept])
        .await?;
    assert_eq!(updated.id, draft.id);
    assert_eq!(updated.items.len(), 1);
    assert_eq!(updated.items[0].name, "Pan");
    assert_eq!(
        updated.items[0].note.as_deref(),
        Some("panadería de la esquina")
    );
    assert!(updated.updated_at >= draft.updated_at);

    let reloaded = services.drafts.find_by_id(&draft.id, OWNER).await?.unwrap();
    assert_eq!(reloaded.items.len(), 1);
    assert_eq!(reloaded.items[0].name, "Pan");
    Ok(())
}

#[tokio::test]
async fn test_replace_items_keeps_catalog_linked_items() -> Result<()> {
    let services = common::create_test_services().await?;
    let draft = create_draft(&services, None).await?;

    let original = &draft.items[0];
    let edited = DraftItemInput {
        id: Some(original.id.clone()),
        ingredient_id: original.ingredient_id.clone(),
        name: original.name.clone(),
        quantity: original.quantity,
        unit: original.unit.clone(),
        suggested_packages: Some(3),
        package_amount: Some(500.0),
        package_unit: Some("MILLILITER".to_string()),
        manual: false,
        bought: Some(true),
        note: None,
        sort_order: Some(0),
    };

    let updated = services
        .drafts
        .replace_items(&draft.id, OWNER, &[edited])
        .await?;
    assert_eq!(updated.items[0].id, original.id);
    assert_eq!(updated.items[0].suggested_packages, Some(3));
    assert!(updated.items[0].bought);
    Ok(())
}

#[tokio::test]
async fn test_replace_items_is_all_or_nothing() -> Result<()> {
    let services = common::create_test_services().await?;
    let draft = create_draft(&services, None).await?;

    let mut missing_ingredient = manual_input("Sin Catálogo");
    missing_ingredient.manual = false;
    let mut partial_packaging = manual_input("Pan");
    partial_packaging.suggested_packages = Some(2);
    let mut bad_packages = manual_input("Pan");
    bad_packages.suggested_packages = Some(0);
    bad_packages.package_amount = Some(1.0);
    bad_packages.package_unit = Some("PIECE".to_string());
    let mut bad_amount = manual_input("Pan");
    bad_amount.suggested_packages = Some(1);
    bad_amount.package_amount = Some(-1.0);
    bad_amount.package_unit = Some("PIECE".to_string());
    let mut long_note = manual_input("Pan");
    long_note.note = Some("x".repeat(281));
    let mut bad_order = manual_input("Pan");
    bad_order.sort_order = Some(-1);

    let cases = vec![
        (missing_ingredient, ErrorCode::ShoppingItemIngredientRequired),
        (partial_packaging, ErrorCode::ShoppingItemPackageFieldsIncomplete),
        (bad_packages, ErrorCode::ShoppingItemInvalidSuggestedPackages),
        (bad_amount, ErrorCode::ShoppingItemInvalidPackageAmount),
        (long_note, ErrorCode::ShoppingItemNoteTooLong),
        (bad_order, ErrorCode::ShoppingItemInvalidSortOrder),
    ];

    for (invalid, expected_code) in cases {
        // A valid leading item must not be applied when a later one fails
        let items = vec![manual_input("Tortillas"), invalid];
        let err = services
            .drafts
            .replace_items(&draft.id, OWNER, &items)
            .await
            .unwrap_err();
        assert_eq!(err.code, expected_code);
        assert!(err.message.contains("items[1]"), "got: {}", err.message);

        let reloaded = services.drafts.find_by_id(&draft.id, OWNER).await?.unwrap();
        assert_eq!(reloaded.items.len(), 2, "draft must be unchanged");
        assert_eq!(reloaded.items[0].name, "Aceite");
    }
    Ok(())
}

#[tokio::test]
async fn test_replace_items_allows_empty_list() -> Result<()> {
    let services = common::create_test_services().await?;
    let draft = create_draft(&services, None).await?;

    let updated = services.drafts.replace_items(&draft.id, OWNER, &[]).await?;
    assert!(updated.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_replace_items_unknown_draft() -> Result<()> {
    let services = common::create_test_services().await?;

    let err = services
        .drafts
        .replace_items("missing", OWNER, &[manual_input("Pan")])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    Ok(())
}

#[tokio::test]
async fn test_delete_draft() -> Result<()> {
    let services = common::create_test_services().await?;
    let draft = create_draft(&services, None).await?;

    assert!(services.drafts.delete_by_id(&draft.id, OWNER).await?);
    assert!(services.drafts.find_by_id(&draft.id, OWNER).await?.is_none());
    assert!(!services.drafts.delete_by_id(&draft.id, OWNER).await?);
    Ok(())
}

fn stored_draft(id: &str, plan_id: &str) -> ShoppingListDraft {
    let now = chrono::Utc::now();
    ShoppingListDraft {
        id: id.to_string(),
        plan_id: plan_id.to_string(),
        items: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_keyed_insert_conflict_keeps_first_writer() -> Result<()> {
    let database = common::create_test_database().await?;

    let winner = stored_draft("draft-a", PLAN);
    assert!(database.insert_draft(OWNER, Some("key-1"), &winner).await?);

    // Second insert under the same (owner, plan, key) loses to the index
    // without surfacing an error
    let loser = stored_draft("draft-b", PLAN);
    assert!(!database.insert_draft(OWNER, Some("key-1"), &loser).await?);

    let stored = database
        .get_draft_by_idempotency_key(OWNER, PLAN, "key-1")
        .await?
        .unwrap();
    assert_eq!(stored.id, winner.id);

    // Other keys and other owners insert cleanly
    assert!(
        database
            .insert_draft(OWNER, Some("key-2"), &stored_draft("draft-c", PLAN))
            .await?
    );
    assert!(
        database
            .insert_draft(OTHER_OWNER, Some("key-1"), &stored_draft("draft-d", PLAN))
            .await?
    );
    Ok(())
}

#[tokio::test]
async fn test_keyless_inserts_never_conflict() -> Result<()> {
    let database = common::create_test_database().await?;

    assert!(database.insert_draft(OWNER, None, &stored_draft("draft-a", PLAN)).await?);
    assert!(database.insert_draft(OWNER, None, &stored_draft("draft-b", PLAN)).await?);
    Ok(())
}
