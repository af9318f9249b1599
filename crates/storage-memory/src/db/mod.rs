//! Shared in-memory state and its transactional access helpers.
//!
//! Every repository holds an `Arc<MemoryStore>`. Reads see a consistent view
//! under a read lock. Writes run against a staged copy of the state and are
//! committed only when the closure returns `Ok`, so a failed write never leaves
//! partial changes behind.

use std::fmt::Display;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use finboard_core::goals::Goal;
use finboard_core::investments::Investment;
use finboard_core::pac::RecurringPlan;
use finboard_core::transactions::Transaction;
use log::{debug, warn};

use crate::errors::StorageError;

/// Every table of the store, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    pub investments: Vec<Investment>,
    pub transactions: Vec<Transaction>,
    pub plans: Vec<RecurringPlan>,
    pub goals: Vec<Goal>,
}

impl StoreState {
    pub fn has_investment(&self, investment_id: &str) -> bool {
        self.investments.iter().any(|i| i.id == investment_id)
    }

    pub fn investment_mut(&mut self, investment_id: &str) -> Option<&mut Investment> {
        self.investments.iter_mut().find(|i| i.id == investment_id)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the whole state.
    pub fn snapshot(&self) -> StoreState {
        self.read(StoreState::clone)
    }

    pub fn read<T>(&self, f: impl FnOnce(&StoreState) -> T) -> T {
        f(&self.read_guard())
    }

    /// Runs `f` against a staged copy and commits it only on success.
    ///
    /// The write lock is held for the whole closure, so a read-modify-write
    /// inside `f` cannot interleave with another writer.
    pub fn write<T>(
        &self,
        f: impl FnOnce(&mut StoreState) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        self.commit(f)
    }

    /// [`MemoryStore::write`] for closures that run domain logic, such as a
    /// position fold, and fail with core errors.
    pub fn write_core<T>(
        &self,
        f: impl FnOnce(&mut StoreState) -> finboard_core::Result<T>,
    ) -> finboard_core::Result<T> {
        self.commit(f)
    }

    fn commit<T, E: Display>(
        &self,
        f: impl FnOnce(&mut StoreState) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut guard = self.write_guard();
        let mut staged = guard.clone();
        let result = f(&mut staged).map_err(|e| {
            debug!("Store write rolled back: {}", e);
            e
        })?;
        *guard = staged;
        Ok(result)
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(|poisoned| {
            warn!("Store lock poisoned; recovering for read");
            poisoned.into_inner()
        })
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(|poisoned| {
            warn!("Store lock poisoned; recovering for write");
            poisoned.into_inner()
        })
    }
}
