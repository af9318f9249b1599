use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context};
use finboard_core::portfolio::TargetAllocation;
use finboard_core::settings::Settings;
use finboard_core::AssetClass;
use finboard_market_data::{BackoffPolicy, PriceFeedConfig};
use rust_decimal::Decimal;

pub struct Config {
    pub settings: Settings,
    pub price_feed: PriceFeedConfig,
    /// Seed for the simulated provider; entropy when unset
    pub simulation_seed: Option<u64>,
    pub simulation_failure_rate: f64,
    pub plan_check_interval: Duration,
    pub report_interval: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Settings::default();

        let target_allocation = match std::env::var("FINBOARD_TARGET_ALLOCATION") {
            Ok(raw) => parse_target_allocation(&raw)?,
            Err(_) => defaults.target_allocation.clone(),
        };
        let settings = Settings {
            base_currency: std::env::var("FINBOARD_BASE_CURRENCY")
                .unwrap_or(defaults.base_currency),
            rebalance_tolerance: parse_var(
                "FINBOARD_REBALANCE_TOLERANCE",
                defaults.rebalance_tolerance,
            )?,
            target_allocation,
            price_refresh_open_secs: parse_var(
                "FINBOARD_PRICE_REFRESH_OPEN_SECS",
                defaults.price_refresh_open_secs,
            )?,
            price_refresh_closed_secs: parse_var(
                "FINBOARD_PRICE_REFRESH_CLOSED_SECS",
                defaults.price_refresh_closed_secs,
            )?,
        };
        settings.validate()?;

        let backoff = BackoffPolicy {
            max_attempts: parse_var(
                "FINBOARD_FEED_MAX_ATTEMPTS",
                BackoffPolicy::default().max_attempts,
            )?,
            ..BackoffPolicy::default()
        };
        let price_feed = PriceFeedConfig {
            open_interval: Duration::from_secs(settings.price_refresh_open_secs),
            closed_interval: Duration::from_secs(settings.price_refresh_closed_secs),
            backoff,
        };

        let simulation_seed = match std::env::var("FINBOARD_SIM_SEED") {
            Ok(raw) => Some(
                raw.parse()
                    .with_context(|| format!("Invalid FINBOARD_SIM_SEED: {}", raw))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            settings,
            price_feed,
            simulation_seed,
            simulation_failure_rate: parse_var("FINBOARD_SIM_FAILURE_RATE", 0.0)?,
            plan_check_interval: Duration::from_secs(parse_var(
                "FINBOARD_PLAN_CHECK_SECS",
                3600,
            )?),
            report_interval: Duration::from_secs(parse_var("FINBOARD_REPORT_SECS", 60)?),
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid {}={}: {}", name, raw, e)),
        Err(_) => Ok(default),
    }
}

/// Parses `ETF=60,BONDS=30,STOCKS=10`.
fn parse_target_allocation(raw: &str) -> anyhow::Result<TargetAllocation> {
    let mut targets = Vec::new();
    for pair in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (class, percent) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected CLASS=PERCENT, got '{}'", pair))?;
        let class = AssetClass::from_str(class.trim())
            .map_err(|e| anyhow!("Unknown asset class '{}': {}", class, e))?;
        let percent = Decimal::from_str(percent.trim())
            .with_context(|| format!("Invalid target percent '{}'", percent))?;
        targets.push((class, percent));
    }
    let allocation = TargetAllocation::new(targets);
    allocation.validate()?;
    Ok(allocation)
}
