// ABOUTME: Unified error handling for the meal-plan shopping engine
// ABOUTME: Defines stable machine-readable error codes and HTTP response formatting
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Unified Error Handling
//!
//! Every fallible operation in the core returns [`AppResult`]. Errors carry a
//! stable machine-readable [`ErrorCode`] that the external HTTP layer maps to
//! a response status; the serde rename of each variant is the wire contract.
//!
//! Codes fall into three categories:
//! - **configuration errors** (bad seed data, missing conversion rule,
//!   invalid package unit) — data authoring bugs, never worked around;
//! - **domain validation errors** (unknown ingredient, disallowed unit,
//!   malformed draft item) — recoverable per request, mapped to 4xx;
//! - **not-found** conditions — distinct from validation, mapped to 404.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable error codes shared with the HTTP layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Ingredient catalog
    #[serde(rename = "INGREDIENT_NOT_FOUND")]
    IngredientNotFound,
    #[serde(rename = "INGREDIENT_ALREADY_EXISTS")]
    IngredientAlreadyExists,
    #[serde(rename = "INVALID_INGREDIENT_UNIT")]
    InvalidIngredientUnit,

    // Unit conversion
    #[serde(rename = "MISSING_CONVERSION_RULE")]
    MissingConversionRule,

    // Shopping list generation
    #[serde(rename = "PLAN_RECIPE_NOT_FOUND")]
    PlanRecipeNotFound,

    // Draft item validation
    #[serde(rename = "SHOPPING_ITEM_INGREDIENT_REQUIRED")]
    ShoppingItemIngredientRequired,
    #[serde(rename = "SHOPPING_ITEM_PACKAGE_FIELDS_INCOMPLETE")]
    ShoppingItemPackageFieldsIncomplete,
    #[serde(rename = "SHOPPING_ITEM_INVALID_SUGGESTED_PACKAGES")]
    ShoppingItemInvalidSuggestedPackages,
    #[serde(rename = "SHOPPING_ITEM_INVALID_PACKAGE_AMOUNT")]
    ShoppingItemInvalidPackageAmount,
    #[serde(rename = "SHOPPING_ITEM_NOTE_TOO_LONG")]
    ShoppingItemNoteTooLong,
    #[serde(rename = "SHOPPING_ITEM_INVALID_SORT_ORDER")]
    ShoppingItemInvalidSortOrder,

    // Generic validation
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField,

    // Resources
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound,

    // Configuration & infrastructure
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError,
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError,
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl ErrorCode {
    /// HTTP status the external layer should answer with for this code
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            // 400 Bad Request: domain validation failures
            Self::IngredientNotFound
            | Self::InvalidIngredientUnit
            | Self::MissingConversionRule
            | Self::PlanRecipeNotFound
            | Self::ShoppingItemIngredientRequired
            | Self::ShoppingItemPackageFieldsIncomplete
            | Self::ShoppingItemInvalidSuggestedPackages
            | Self::ShoppingItemInvalidPackageAmount
            | Self::ShoppingItemNoteTooLong
            | Self::ShoppingItemInvalidSortOrder
            | Self::InvalidInput
            | Self::MissingRequiredField => 400,

            // 404 Not Found
            Self::ResourceNotFound => 404,

            // 409 Conflict
            Self::IngredientAlreadyExists => 409,

            // 500 Internal Server Error
            Self::ConfigError | Self::DatabaseError | Self::InternalError => 500,
        }
    }

    /// Short human-readable description of the code
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::IngredientNotFound => "The referenced ingredient is not in the catalog",
            Self::IngredientAlreadyExists => "An ingredient with this name already exists",
            Self::InvalidIngredientUnit => "The unit is not allowed for this ingredient",
            Self::MissingConversionRule => {
                "No conversion rule exists for this ingredient and unit"
            }
            Self::PlanRecipeNotFound => "A plan slot references a recipe that does not exist",
            Self::ShoppingItemIngredientRequired => {
                "Non-manual shopping items must reference an ingredient"
            }
            Self::ShoppingItemPackageFieldsIncomplete => {
                "Package fields must be provided together"
            }
            Self::ShoppingItemInvalidSuggestedPackages => "Suggested packages must be positive",
            Self::ShoppingItemInvalidPackageAmount => "Package amount must be positive",
            Self::ShoppingItemNoteTooLong => "Shopping item note exceeds the maximum length",
            Self::ShoppingItemInvalidSortOrder => "Sort order must not be negative",
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ConfigError => "Configuration error encountered",
            Self::DatabaseError => "Database operation failed",
            Self::InternalError => "An internal error occurred",
        }
    }
}

/// Unified error type for the engine
#[derive(Debug, Error)]
pub struct AppError {
    /// Stable error code
    pub code: ErrorCode,
    /// Human-readable message with failing field/rule context
    pub message: String,
    /// Source error for chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new error with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Attach a source error for chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// HTTP status for this error
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Unknown or unresolvable ingredient reference
    pub fn ingredient_not_found(reference: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::IngredientNotFound,
            format!("Unknown ingredient: {reference}"),
        )
    }

    /// Duplicate custom ingredient name
    pub fn ingredient_already_exists(name: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::IngredientAlreadyExists,
            format!("Ingredient already exists: {name}"),
        )
    }

    /// Unit not in the ingredient's allowed set
    pub fn invalid_unit(ingredient_id: impl fmt::Display, unit: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::InvalidIngredientUnit,
            format!("Unit {unit} is not allowed for ingredient {ingredient_id}"),
        )
    }

    /// No ingredient-specific conversion rule for this (ingredient, unit) pair
    pub fn missing_conversion_rule(
        ingredient_id: impl fmt::Display,
        unit: impl fmt::Display,
    ) -> Self {
        Self::new(
            ErrorCode::MissingConversionRule,
            format!("Missing ingredient specific conversion for ingredient {ingredient_id} and unit {unit}"),
        )
    }

    /// Owner-scoped resource lookup miss
    pub fn not_found(resource: impl fmt::Display) -> Self {
        Self::new(ErrorCode::ResourceNotFound, format!("{resource} not found"))
    }

    /// Generic domain validation failure
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Seed/catalog data authoring bug
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Infrastructure failure from the persistence layer
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Unexpected internal failure
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result alias used across the engine
pub type AppResult<T> = Result<T, AppError>;

/// Wire shape the HTTP layer serializes errors into
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error payload
    pub error: ErrorResponseDetails,
}

/// Error payload fields
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Stable machine-readable code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
            },
        }
    }
}
