// ABOUTME: Meal-planning and shopping-list backend core library
// ABOUTME: Ingredient catalog, unit conversion, list aggregation, and draft editing
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pantry server core.
//!
//! This crate implements the domain layer of a meal-planning backend:
//!
//! - [`catalog`] — the ingredient catalog: embedded seed ingredients,
//!   alias resolution, and per-owner custom ingredients
//! - [`conversion`] — quantity conversion into per-measurement-type
//!   base units, including ingredient-specific rules
//! - [`recipes`] / [`plans`] — recipe and meal-plan storage with
//!   save-time ingredient validation
//! - [`shopping`] — shopping-list aggregation from planned recipes and
//!   the editable draft layer with idempotent creation
//!
//! All persistent state lives in SQLite via [`database::Database`]; every
//! query is scoped to an owning user so tenants never observe each
//! other's data.

pub mod catalog;
pub mod config;
pub mod conversion;
pub mod database;
pub mod errors;
pub mod logging;
pub mod models;
pub mod plans;
pub mod recipes;
pub mod shopping;
