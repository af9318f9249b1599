//! Folds holdings into allocation slices.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::AllocationSlice;
use crate::constants::{DECIMAL_PRECISION, UNSPECIFIED_LABEL};
use crate::investments::Investment;

/// Breakdown by asset class, largest bucket first.
pub fn asset_allocation(investments: &[Investment]) -> Vec<AllocationSlice> {
    allocate_by(investments, |i| {
        (
            i.asset_class.as_str().to_string(),
            i.asset_class.label().to_string(),
        )
    })
}

/// Breakdown by sector; holdings without one are grouped as "Unspecified".
pub fn sector_allocation(investments: &[Investment]) -> Vec<AllocationSlice> {
    allocate_by(investments, |i| {
        let label = bucket_label(i.sector.as_deref());
        (label.clone(), label)
    })
}

/// Breakdown by country; holdings without one are grouped as "Unspecified".
pub fn geographic_allocation(investments: &[Investment]) -> Vec<AllocationSlice> {
    allocate_by(investments, |i| {
        let label = bucket_label(i.country.as_deref());
        (label.clone(), label)
    })
}

fn bucket_label(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => UNSPECIFIED_LABEL.to_string(),
    }
}

fn allocate_by<F>(investments: &[Investment], bucket: F) -> Vec<AllocationSlice>
where
    F: Fn(&Investment) -> (String, String),
{
    let total_value: Decimal = investments.iter().map(|i| i.current_value).sum();

    let mut buckets: BTreeMap<String, AllocationSlice> = BTreeMap::new();
    for investment in investments {
        let (key, label) = bucket(investment);
        let slice = buckets.entry(key.clone()).or_insert_with(|| AllocationSlice {
            key,
            label,
            value: Decimal::ZERO,
            percentage: Decimal::ZERO,
            count: 0,
        });
        slice.value += investment.current_value;
        slice.count += 1;
    }

    let mut slices: Vec<AllocationSlice> = buckets
        .into_values()
        .map(|mut slice| {
            slice.percentage = if total_value > Decimal::ZERO {
                (slice.value / total_value * Decimal::ONE_HUNDRED).round_dp(DECIMAL_PRECISION)
            } else {
                Decimal::ZERO
            };
            slice
        })
        .collect();

    // Sort by value descending; the BTreeMap order breaks ties by key
    slices.sort_by(|a, b| b.value.cmp(&a.value));
    slices
}
