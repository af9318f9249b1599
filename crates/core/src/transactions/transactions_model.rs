//! Transaction ledger domain models.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Buy,
    Sell,
    /// A purchase executed by a recurring plan
    PacPayment,
}

impl TransactionType {
    /// Whether the transaction adds units to the position.
    pub fn is_acquisition(&self) -> bool {
        matches!(self, Self::Buy | Self::PacPayment)
    }
}

/// Domain model representing one ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub investment_id: String,
    pub transaction_type: TransactionType,
    pub quantity: Decimal,
    pub price: Decimal,
    pub fees: Decimal,
    /// Cash moved: `qty * price + fees` for acquisitions, `qty * price - fees` for sells
    pub total_amount: Decimal,
    pub date: NaiveDate,
    pub currency: String,
    pub is_from_pac: bool,
    pub pac_plan_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Input model for recording a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub investment_id: String,
    pub transaction_type: TransactionType,
    pub quantity: Decimal,
    pub price: Decimal,
    #[serde(default)]
    pub fees: Decimal,
    pub date: NaiveDate,
    pub currency: String,
    pub pac_plan_id: Option<String>,
    pub notes: Option<String>,
}

impl NewTransaction {
    /// Validates the new transaction data.
    pub fn validate(&self) -> Result<()> {
        if self.investment_id.trim().is_empty() {
            return Err(Error::missing_field("investmentId"));
        }
        if self.currency.trim().is_empty() {
            return Err(Error::missing_field("currency"));
        }
        if self.quantity <= Decimal::ZERO {
            return Err(Error::invalid_input("Quantity must be greater than zero"));
        }
        if self.price <= Decimal::ZERO {
            return Err(Error::invalid_input("Price must be greater than zero"));
        }
        if self.fees < Decimal::ZERO {
            return Err(Error::invalid_input("Fees cannot be negative"));
        }
        if self.transaction_type == TransactionType::PacPayment && self.pac_plan_id.is_none() {
            return Err(Error::missing_field("pacPlanId"));
        }
        Ok(())
    }

    pub fn total_amount(&self) -> Decimal {
        let gross = self.quantity * self.price;
        if self.transaction_type.is_acquisition() {
            gross + self.fees
        } else {
            gross - self.fees
        }
    }
}

impl From<NewTransaction> for Transaction {
    fn from(new: NewTransaction) -> Self {
        let total_amount = new.total_amount();
        let is_from_pac =
            new.transaction_type == TransactionType::PacPayment || new.pac_plan_id.is_some();
        Self {
            id: Uuid::new_v4().to_string(),
            investment_id: new.investment_id,
            transaction_type: new.transaction_type,
            quantity: new.quantity,
            price: new.price,
            fees: new.fees,
            total_amount,
            date: new.date,
            currency: new.currency.trim().to_uppercase(),
            is_from_pac,
            pac_plan_id: new.pac_plan_id,
            notes: new.notes,
            created_at: Utc::now().naive_utc(),
        }
    }
}
