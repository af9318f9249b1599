//! In-memory storage for the transaction ledger.

mod repository;

pub use repository::TransactionRepository;
