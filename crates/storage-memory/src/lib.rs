//! In-memory storage implementation for Finboard.
//!
//! This crate implements the repository traits defined in `finboard-core`
//! over a single shared [`MemoryStore`]. It contains:
//! - The store itself with transactional writes
//! - Referential checks between investments, transactions and plans
//! - Repository implementations for every persisted entity
//!
//! # Architecture
//!
//! ```text
//!          core (domain)
//!               │
//!               ▼
//!   storage-memory (this crate)
//!               │
//!               ▼
//!     MemoryStore (RwLock<StoreState>)
//! ```

pub mod db;
pub mod errors;

// Repository implementations
pub mod goals;
pub mod investments;
pub mod pac;
pub mod transactions;

pub use db::{MemoryStore, StoreState};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from finboard-core for convenience
pub use finboard_core::errors::{Error, Result};
