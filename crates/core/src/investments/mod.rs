//! Investments module - holding models, services, and traits.

mod investments_model;
mod investments_service;
mod investments_traits;


pub use investments_model::{apply_weights, Investment, InvestmentUpdate, NewInvestment};
pub use investments_service::InvestmentService;
pub use investments_traits::{InvestmentChange, InvestmentRepositoryTrait, InvestmentServiceTrait};
