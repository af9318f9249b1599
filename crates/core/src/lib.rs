//! Finboard Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for Finboard: holdings and their
//! transaction ledger, recurring investment plans, savings goals, settings
//! and the portfolio analytics. It is storage-agnostic and defines repository
//! traits that are implemented by the `storage-memory` crate.

pub mod constants;
pub mod errors;
pub mod goals;
pub mod investments;
pub mod pac;
pub mod portfolio;
pub mod settings;
pub mod transactions;

// Re-export common types from the portfolio module
pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

pub use finboard_market_data::AssetClass;
