use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::investments_model::{apply_weights, Investment, InvestmentUpdate, NewInvestment};
use super::investments_traits::{InvestmentRepositoryTrait, InvestmentServiceTrait};
use crate::errors::{Error, Result};
use crate::transactions::TransactionRepositoryTrait;
use finboard_market_data::PriceTick;

/// Service for managing investments
pub struct InvestmentService {
    repository: Arc<dyn InvestmentRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
}

impl InvestmentService {
    pub fn new(
        repository: Arc<dyn InvestmentRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            transaction_repository,
        }
    }
}

/// Sets the stored price; quantity and cost basis are left as stored.
fn reprice(price: Decimal) -> impl Fn(&mut Investment) -> Result<()> + Send + Sync {
    move |investment: &mut Investment| {
        investment.set_price(price);
        investment.updated_at = Utc::now().naive_utc();
        Ok(())
    }
}

#[async_trait]
impl InvestmentServiceTrait for InvestmentService {
    async fn create_investment(&self, new_investment: NewInvestment) -> Result<Investment> {
        if let Err(e) = new_investment.validate() {
            warn!("Rejected new investment '{}': {}", new_investment.symbol, e);
            return Err(e);
        }
        let investment = Investment::from(new_investment);
        debug!(
            "Creating investment {} ({}) worth {}",
            investment.symbol, investment.asset_class, investment.current_value
        );
        self.repository.insert(investment).await
    }

    async fn update_investment(&self, investment_update: InvestmentUpdate) -> Result<Investment> {
        if let Err(e) = investment_update.validate() {
            warn!("Rejected update of investment {}: {}", investment_update.id, e);
            return Err(e);
        }
        let investment_id = investment_update.id.clone();
        self.repository
            .update_with(&investment_id, &move |investment: &mut Investment| {
                investment_update.clone().apply_to(investment);
                Ok(())
            })
            .await
    }

    async fn update_price(&self, investment_id: &str, price: Decimal) -> Result<Investment> {
        if price <= Decimal::ZERO {
            return Err(Error::invalid_input("Price must be greater than zero"));
        }
        self.repository
            .update_with(investment_id, &reprice(price))
            .await
    }

    async fn apply_price_ticks(&self, ticks: &[PriceTick]) -> Result<usize> {
        let mut updated = 0;
        for investment in self.repository.list()? {
            let Some(tick) = ticks.iter().rev().find(|t| t.symbol == investment.symbol) else {
                continue;
            };
            if tick.price <= Decimal::ZERO || tick.price == investment.current_price {
                continue;
            }
            match self
                .repository
                .update_with(&investment.id, &reprice(tick.price))
                .await
            {
                Ok(_) => updated += 1,
                Err(Error::NotFound(_)) => {
                    debug!("Investment {} removed before tick for {}", investment.id, tick.symbol);
                }
                Err(e) => return Err(e),
            }
        }
        debug!("Applied {} price tick(s) to {} investment(s)", ticks.len(), updated);
        Ok(updated)
    }

    async fn delete_investment(&self, investment_id: &str) -> Result<()> {
        let investment = self.repository.get_by_id(investment_id)?;
        let referencing = self
            .transaction_repository
            .list_for_investment(investment_id)?
            .len();
        if referencing > 0 {
            warn!(
                "Refusing to delete investment {} ({}): {} transaction(s) reference it",
                investment.symbol, investment_id, referencing
            );
            return Err(Error::ConstraintViolation(format!(
                "Investment {} has {} transaction(s); delete them first",
                investment.symbol, referencing
            )));
        }
        self.repository.delete(investment_id).await?;
        Ok(())
    }

    fn get_investment(&self, investment_id: &str) -> Result<Investment> {
        self.repository.get_by_id(investment_id)
    }

    fn get_investments(&self) -> Result<Vec<Investment>> {
        let mut investments = self.repository.list()?;
        apply_weights(&mut investments);
        Ok(investments)
    }

    fn get_active_investments(&self) -> Result<Vec<Investment>> {
        let mut investments: Vec<Investment> = self
            .repository
            .list()?
            .into_iter()
            .filter(|i| i.is_active)
            .collect();
        apply_weights(&mut investments);
        Ok(investments)
    }
}
