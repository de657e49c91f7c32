// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides common database and service assembly helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
#![allow(
    dead_code,
    clippy::wildcard_in_or_patterns,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `pantry_server`
//!
//! Common setup functions to reduce duplication across integration tests.

use anyhow::Result;
use pantry_server::{
    catalog::IngredientCatalog,
    conversion::ConversionEngine,
    database::Database,
    plans::MealPlanService,
    recipes::RecipeService,
    shopping::{ShoppingListDraftService, ShoppingListPipeline, ShoppingListService},
};
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup (in-memory SQLite with migrations applied)
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    let database = Database::new("sqlite::memory:").await?;
    database.migrate().await?;
    Ok(database)
}

/// Catalog backed by a fresh in-memory database
pub async fn create_test_catalog() -> Result<Arc<IngredientCatalog>> {
    let database = create_test_database().await?;
    Ok(Arc::new(IngredientCatalog::new(database)?))
}

/// Fully assembled service stack for end-to-end tests
pub struct TestServices {
    pub database: Database,
    pub catalog: Arc<IngredientCatalog>,
    pub conversion: Arc<ConversionEngine>,
    pub recipes: Arc<RecipeService>,
    pub plans: Arc<MealPlanService>,
    pub aggregator: Arc<ShoppingListService>,
    pub drafts: Arc<ShoppingListDraftService>,
    pub pipeline: ShoppingListPipeline,
}

/// Build every service on top of a single in-memory database
pub async fn create_test_services() -> Result<TestServices> {
    let database = create_test_database().await?;
    let catalog = Arc::new(IngredientCatalog::new(database.clone())?);
    let conversion = Arc::new(ConversionEngine::new(catalog.clone()));
    let recipes = Arc::new(RecipeService::new(
        Arc::new(database.clone()),
        catalog.clone(),
    ));
    let plans = Arc::new(MealPlanService::new(Arc::new(database.clone())));
    let aggregator = Arc::new(ShoppingListService::new(
        catalog.clone(),
        conversion.clone(),
    ));
    let drafts = Arc::new(ShoppingListDraftService::new(Arc::new(database.clone())));
    let pipeline = ShoppingListPipeline::new(
        plans.clone(),
        recipes.clone(),
        aggregator.clone(),
        drafts.clone(),
    );

    Ok(TestServices {
        database,
        catalog,
        conversion,
        recipes,
        plans,
        aggregator,
        drafts,
        pipeline,
    })
}
