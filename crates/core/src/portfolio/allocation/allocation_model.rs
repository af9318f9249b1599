//! Allocation models for portfolio breakdowns.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Share of the portfolio held in one bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationSlice {
    /// Stable bucket identifier (asset class code, sector or country name)
    pub key: String,
    /// Display name of the bucket
    pub label: String,
    /// Summed current value of the bucket
    pub value: Decimal,
    /// Percentage of total portfolio value (0-100)
    pub percentage: Decimal,
    /// Number of holdings in the bucket
    pub count: usize,
}
