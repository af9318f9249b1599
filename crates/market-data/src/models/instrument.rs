use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::errors::MarketDataError;

/// Coarse asset classification shared by the price feed and the portfolio domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetClass {
    #[default]
    Stocks,
    Etf,
    Bonds,
    Commodities,
    RealEstate,
    Crypto,
    Alternative,
}

impl AssetClass {
    pub const ALL: [AssetClass; 7] = [
        AssetClass::Stocks,
        AssetClass::Etf,
        AssetClass::Bonds,
        AssetClass::Commodities,
        AssetClass::RealEstate,
        AssetClass::Crypto,
        AssetClass::Alternative,
    ];

    /// Stable identifier, matches the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stocks => "STOCKS",
            Self::Etf => "ETF",
            Self::Bonds => "BONDS",
            Self::Commodities => "COMMODITIES",
            Self::RealEstate => "REAL_ESTATE",
            Self::Crypto => "CRYPTO",
            Self::Alternative => "ALTERNATIVE",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Stocks => "Stocks",
            Self::Etf => "ETF",
            Self::Bonds => "Bonds",
            Self::Commodities => "Commodities",
            Self::RealEstate => "Real Estate",
            Self::Crypto => "Crypto",
            Self::Alternative => "Alternative",
        }
    }

    /// Standard deviation of a single simulated price move, as a fraction of price.
    pub fn volatility(&self) -> Decimal {
        match self {
            Self::Crypto => dec!(0.05),
            Self::Stocks | Self::Commodities => dec!(0.02),
            Self::Alternative => dec!(0.015),
            Self::Etf => dec!(0.01),
            Self::RealEstate => dec!(0.008),
            Self::Bonds => dec!(0.003),
        }
    }

    /// Whether the asset trades around the clock.
    pub fn trades_continuously(&self) -> bool {
        matches!(self, Self::Crypto)
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetClass {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace([' ', '-'], "_").as_str() {
            "STOCKS" | "STOCK" | "EQUITY" => Ok(Self::Stocks),
            "ETF" => Ok(Self::Etf),
            "BONDS" | "BOND" => Ok(Self::Bonds),
            "COMMODITIES" | "COMMODITY" => Ok(Self::Commodities),
            "REAL_ESTATE" | "REALESTATE" => Ok(Self::RealEstate),
            "CRYPTO" => Ok(Self::Crypto),
            "ALTERNATIVE" => Ok(Self::Alternative),
            _ => Err(MarketDataError::UnknownAssetClass(s.to_string())),
        }
    }
}

/// An instrument the price feed can be subscribed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub symbol: String,
    pub asset_class: AssetClass,
    pub currency: String,
    /// Last known price, used as the starting point before any tick exists.
    pub reference_price: Decimal,
}

impl Instrument {
    pub fn new(
        symbol: impl Into<String>,
        asset_class: AssetClass,
        currency: impl Into<String>,
        reference_price: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            asset_class,
            currency: currency.into(),
            reference_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crypto_is_most_volatile_and_bonds_least() {
        let max = AssetClass::ALL.iter().map(|c| c.volatility()).max().unwrap();
        let min = AssetClass::ALL.iter().map(|c| c.volatility()).min().unwrap();
        assert_eq!(max, AssetClass::Crypto.volatility());
        assert_eq!(min, AssetClass::Bonds.volatility());
    }

    #[test]
    fn test_parse_asset_class() {
        assert_eq!("etf".parse::<AssetClass>().unwrap(), AssetClass::Etf);
        assert_eq!(
            "real estate".parse::<AssetClass>().unwrap(),
            AssetClass::RealEstate
        );
        assert!("options".parse::<AssetClass>().is_err());
    }

    #[test]
    fn test_serde_representation_matches_as_str() {
        for class in AssetClass::ALL {
            let json = serde_json::to_string(&class).unwrap();
            assert_eq!(json, format!("\"{}\"", class.as_str()));
        }
    }
}
