//! Transactions module - ledger models, position folding, services, and traits.

mod position_calculator;
mod transactions_model;
mod transactions_service;
mod transactions_traits;


pub use position_calculator::{Position, PositionCalculator};
pub use transactions_model::{NewTransaction, Transaction, TransactionType};
pub use transactions_service::TransactionService;
pub use transactions_traits::{PositionFold, TransactionRepositoryTrait, TransactionServiceTrait};
