//! Investment (holding) domain models.

use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::DECIMAL_PRECISION;
use crate::transactions::Position;
use crate::{Error, Result};
use finboard_market_data::{AssetClass, Instrument};

/// Domain model representing a position held in the portfolio.
///
/// `current_value`, `total_return` and `total_return_percent` are caches
/// derived by [`Investment::recalculate`]; `weight` is derived across the whole
/// list by [`apply_weights`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub asset_class: AssetClass,
    pub quantity: Decimal,
    pub average_price: Decimal,
    pub current_price: Decimal,
    pub currency: String,
    pub current_value: Decimal,
    /// Cost basis including capitalised fees
    pub total_invested: Decimal,
    pub total_return: Decimal,
    pub total_return_percent: Decimal,
    /// Share of the portfolio value, 0-100
    pub weight: Decimal,
    pub sector: Option<String>,
    pub country: Option<String>,
    /// Position entered with the holding, before any ledger transaction
    pub opening_quantity: Decimal,
    pub opening_cost: Decimal,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Investment {
    /// Recomputes the value and return caches from quantity, prices and cost.
    pub fn recalculate(&mut self) {
        self.current_value = self.quantity * self.current_price;
        self.total_return = self.current_value - self.total_invested;
        self.total_return_percent = if self.total_invested.is_zero() {
            Decimal::ZERO
        } else {
            (self.total_return / self.total_invested * Decimal::ONE_HUNDRED)
                .round_dp(DECIMAL_PRECISION)
        };
    }

    /// The position the ledger folds on top of.
    pub fn opening_position(&self) -> Position {
        Position::new(self.opening_quantity, self.opening_cost)
    }

    /// Replaces quantity and cost basis with a folded position.
    pub fn apply_position(&mut self, position: &Position) {
        self.quantity = position.quantity;
        self.total_invested = position.cost_basis;
        self.average_price = position.average_price();
        self.recalculate();
    }

    pub fn set_price(&mut self, price: Decimal) {
        self.current_price = price;
        self.recalculate();
    }

    pub fn instrument(&self) -> Instrument {
        Instrument::new(
            self.symbol.clone(),
            self.asset_class,
            self.currency.clone(),
            self.current_price,
        )
    }
}

/// Sets every investment's weight to its share of the summed current value.
pub fn apply_weights(investments: &mut [Investment]) {
    let total: Decimal = investments.iter().map(|i| i.current_value).sum();
    for investment in investments.iter_mut() {
        investment.weight = if total.is_zero() {
            Decimal::ZERO
        } else {
            (investment.current_value / total * Decimal::ONE_HUNDRED).round_dp(DECIMAL_PRECISION)
        };
    }
}

/// Input model for creating a new investment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvestment {
    pub name: String,
    pub symbol: String,
    pub asset_class: AssetClass,
    pub quantity: Decimal,
    /// Average buy price of the opening position
    pub average_price: Decimal,
    /// Defaults to the average price when absent
    pub current_price: Option<Decimal>,
    #[serde(default)]
    pub fees: Decimal,
    pub currency: String,
    pub sector: Option<String>,
    pub country: Option<String>,
}

impl NewInvestment {
    /// Validates the new investment data.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::missing_field("name"));
        }
        if self.symbol.trim().is_empty() {
            return Err(Error::missing_field("symbol"));
        }
        if self.currency.trim().is_empty() {
            return Err(Error::missing_field("currency"));
        }
        if self.quantity <= Decimal::ZERO {
            return Err(Error::invalid_input("Quantity must be greater than zero"));
        }
        if self.average_price <= Decimal::ZERO {
            return Err(Error::invalid_input("Price must be greater than zero"));
        }
        if matches!(self.current_price, Some(price) if price <= Decimal::ZERO) {
            return Err(Error::invalid_input(
                "Current price must be greater than zero",
            ));
        }
        if self.fees < Decimal::ZERO {
            return Err(Error::invalid_input("Fees cannot be negative"));
        }
        Ok(())
    }
}

impl From<NewInvestment> for Investment {
    fn from(new: NewInvestment) -> Self {
        let now = Utc::now().naive_utc();
        let opening_cost = new.quantity * new.average_price + new.fees;
        let mut investment = Self {
            id: Uuid::new_v4().to_string(),
            name: new.name.trim().to_string(),
            symbol: new.symbol.trim().to_uppercase(),
            asset_class: new.asset_class,
            quantity: new.quantity,
            average_price: Decimal::ZERO,
            current_price: new.current_price.unwrap_or(new.average_price),
            currency: new.currency.trim().to_uppercase(),
            current_value: Decimal::ZERO,
            total_invested: Decimal::ZERO,
            total_return: Decimal::ZERO,
            total_return_percent: Decimal::ZERO,
            weight: Decimal::ZERO,
            sector: normalize_label(new.sector),
            country: normalize_label(new.country),
            opening_quantity: new.quantity,
            opening_cost,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let opening = investment.opening_position();
        investment.apply_position(&opening);
        investment
    }
}

/// Input model for updating descriptive fields and the price of an investment.
///
/// Quantity and cost basis are owned by the transaction ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentUpdate {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub asset_class: AssetClass,
    pub current_price: Decimal,
    pub currency: String,
    pub sector: Option<String>,
    pub country: Option<String>,
    pub is_active: bool,
}

impl InvestmentUpdate {
    /// Validates the investment update data.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::missing_field("id"));
        }
        if self.name.trim().is_empty() {
            return Err(Error::missing_field("name"));
        }
        if self.symbol.trim().is_empty() {
            return Err(Error::missing_field("symbol"));
        }
        if self.current_price <= Decimal::ZERO {
            return Err(Error::invalid_input(
                "Current price must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Applies the update onto an existing investment, refreshing caches.
    pub fn apply_to(self, investment: &mut Investment) {
        investment.name = self.name.trim().to_string();
        investment.symbol = self.symbol.trim().to_uppercase();
        investment.asset_class = self.asset_class;
        investment.currency = self.currency.trim().to_uppercase();
        investment.sector = normalize_label(self.sector);
        investment.country = normalize_label(self.country);
        investment.is_active = self.is_active;
        investment.updated_at = Utc::now().naive_utc();
        investment.set_price(self.current_price);
    }
}

fn normalize_label(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
