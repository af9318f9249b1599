//! In-memory storage for savings goals.

mod repository;

pub use repository::GoalRepository;
