//! Static trading-hours table.
//!
//! Hours are fixed UTC windows on weekdays. Daylight saving shifts and
//! exchange holidays are not modelled.

use chrono::{DateTime, Datelike, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use super::instrument::Instrument;

/// A trading venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Market {
    NewYork,
    London,
    Xetra,
    Paris,
    Milan,
    /// Crypto venues never close.
    Crypto,
}

impl Market {
    /// ISO 10383 Market Identifier Code.
    pub fn mic(&self) -> &'static str {
        match self {
            Self::NewYork => "XNYS",
            Self::London => "XLON",
            Self::Xetra => "XETR",
            Self::Paris => "XPAR",
            Self::Milan => "XMIL",
            Self::Crypto => "CRYPTO",
        }
    }

    /// Opening and closing time in UTC, `None` when the market never closes.
    pub fn session_utc(&self) -> Option<(NaiveTime, NaiveTime)> {
        let (open, close) = match self {
            Self::NewYork => ((14, 30), (21, 0)),
            Self::London | Self::Xetra | Self::Paris | Self::Milan => ((8, 0), (16, 30)),
            Self::Crypto => return None,
        };
        Some((
            NaiveTime::from_hms_opt(open.0, open.1, 0)?,
            NaiveTime::from_hms_opt(close.0, close.1, 0)?,
        ))
    }

    /// Whether the market is in session at `at`.
    pub fn is_open(&self, at: DateTime<Utc>) -> bool {
        let Some((open, close)) = self.session_utc() else {
            return true;
        };
        if matches!(at.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        let time = at.time();
        time >= open && time < close
    }
}

/// Resolves the trading venue of an instrument from its asset class and symbol suffix.
///
/// Symbols without a known suffix are treated as US listings.
pub fn resolve_market(instrument: &Instrument) -> Market {
    if instrument.asset_class.trades_continuously() {
        return Market::Crypto;
    }
    let suffix = instrument
        .symbol
        .rsplit_once('.')
        .map(|(_, suffix)| suffix.to_ascii_uppercase());
    match suffix.as_deref() {
        Some("MI") => Market::Milan,
        Some("DE") | Some("F") => Market::Xetra,
        Some("PA") => Market::Paris,
        Some("L") => Market::London,
        _ => Market::NewYork,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssetClass;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn instrument(symbol: &str, class: AssetClass) -> Instrument {
        Instrument::new(symbol, class, "EUR", dec!(100))
    }

    #[test]
    fn test_resolve_market_from_suffix() {
        assert_eq!(
            resolve_market(&instrument("ENI.MI", AssetClass::Stocks)),
            Market::Milan
        );
        assert_eq!(
            resolve_market(&instrument("VWCE.DE", AssetClass::Etf)),
            Market::Xetra
        );
        assert_eq!(
            resolve_market(&instrument("AAPL", AssetClass::Stocks)),
            Market::NewYork
        );
        assert_eq!(
            resolve_market(&instrument("BTC-EUR", AssetClass::Crypto)),
            Market::Crypto
        );
    }

    #[test]
    fn test_weekday_session() {
        // 2024-03-13 is a Wednesday
        let morning = Utc.with_ymd_and_hms(2024, 3, 13, 9, 0, 0).unwrap();
        let night = Utc.with_ymd_and_hms(2024, 3, 13, 22, 0, 0).unwrap();
        assert!(Market::Milan.is_open(morning));
        assert!(!Market::NewYork.is_open(morning));
        assert!(!Market::Milan.is_open(night));
    }

    #[test]
    fn test_weekend_closed_except_crypto() {
        // 2024-03-16 is a Saturday
        let saturday = Utc.with_ymd_and_hms(2024, 3, 16, 12, 0, 0).unwrap();
        assert!(!Market::Xetra.is_open(saturday));
        assert!(Market::Crypto.is_open(saturday));
    }
}
