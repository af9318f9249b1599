//! In-memory storage for recurring investment plans.

mod repository;

pub use repository::RecurringPlanRepository;
