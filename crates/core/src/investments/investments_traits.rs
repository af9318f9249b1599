//! Investment repository and service traits.

use async_trait::async_trait;

use super::investments_model::{Investment, InvestmentUpdate, NewInvestment};
use crate::errors::Result;
use finboard_market_data::PriceTick;

/// In-place change to a stored investment.
pub type InvestmentChange = dyn Fn(&mut Investment) -> Result<()> + Send + Sync;

/// Trait defining the contract for investment storage.
///
/// Implementations must reject deleting an investment that is still
/// referenced by a transaction.
#[async_trait]
pub trait InvestmentRepositoryTrait: Send + Sync {
    /// Lists every investment in insertion order.
    fn list(&self) -> Result<Vec<Investment>>;

    /// Retrieves an investment by its ID.
    fn get_by_id(&self, investment_id: &str) -> Result<Investment>;

    async fn insert(&self, investment: Investment) -> Result<Investment>;

    /// Applies `change` to the stored investment and saves it in one atomic
    /// step; nothing is saved when `change` fails.
    async fn update_with(
        &self,
        investment_id: &str,
        change: &InvestmentChange,
    ) -> Result<Investment>;

    /// Deletes an investment by its ID.
    ///
    /// Returns the number of deleted records.
    async fn delete(&self, investment_id: &str) -> Result<usize>;
}

/// Trait defining the contract for investment service operations.
#[async_trait]
pub trait InvestmentServiceTrait: Send + Sync {
    async fn create_investment(&self, new_investment: NewInvestment) -> Result<Investment>;

    async fn update_investment(&self, investment_update: InvestmentUpdate) -> Result<Investment>;

    /// Sets the current price of one investment.
    async fn update_price(
        &self,
        investment_id: &str,
        price: rust_decimal::Decimal,
    ) -> Result<Investment>;

    /// Applies price ticks to every investment with a matching symbol.
    ///
    /// Returns the number of investments updated.
    async fn apply_price_ticks(&self, ticks: &[PriceTick]) -> Result<usize>;

    /// Deletes an investment; rejected while transactions reference it.
    async fn delete_investment(&self, investment_id: &str) -> Result<()>;

    fn get_investment(&self, investment_id: &str) -> Result<Investment>;

    /// All investments, with portfolio weights applied.
    fn get_investments(&self) -> Result<Vec<Investment>>;

    /// Active investments, with weights relative to the active set.
    fn get_active_investments(&self) -> Result<Vec<Investment>>;
}
