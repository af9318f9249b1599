//! In-memory storage for investments.

mod repository;

pub use repository::InvestmentRepository;
