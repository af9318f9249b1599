use crate::errors::Result;
use crate::portfolio::TargetAllocation;
use crate::settings::{Settings, SettingsUpdate};
use async_trait::async_trait;
use log::{info, warn};
use rust_decimal::Decimal;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

// Define the trait for SettingsService
#[async_trait]
pub trait SettingsServiceTrait: Send + Sync {
    fn get_settings(&self) -> Result<Settings>;

    async fn update_settings(&self, new_settings: &SettingsUpdate) -> Result<Settings>;

    fn get_base_currency(&self) -> Result<String>;

    fn get_rebalance_tolerance(&self) -> Result<Decimal>;

    fn get_target_allocation(&self) -> Result<TargetAllocation>;
}

/// Holds the process-wide settings in memory.
pub struct SettingsService {
    settings: Arc<RwLock<Settings>>,
}

impl SettingsService {
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;
        Ok(SettingsService {
            settings: Arc::new(RwLock::new(settings)),
        })
    }

    fn read_settings(&self) -> RwLockReadGuard<'_, Settings> {
        self.settings.read().unwrap_or_else(|poisoned| {
            warn!("Settings lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write_settings(&self) -> RwLockWriteGuard<'_, Settings> {
        self.settings.write().unwrap_or_else(|poisoned| {
            warn!("Settings lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl Default for SettingsService {
    fn default() -> Self {
        SettingsService {
            settings: Arc::new(RwLock::new(Settings::default())),
        }
    }
}

// Implement the trait for SettingsService
#[async_trait]
impl SettingsServiceTrait for SettingsService {
    fn get_settings(&self) -> Result<Settings> {
        Ok(self.read_settings().clone())
    }

    async fn update_settings(&self, new_settings: &SettingsUpdate) -> Result<Settings> {
        let mut current = self.write_settings();
        let next = current.with_update(new_settings).map_err(|e| {
            warn!("Rejected settings update: {}", e);
            e
        })?;
        if next.base_currency != current.base_currency {
            info!(
                "Base currency changed from {} to {}",
                current.base_currency, next.base_currency
            );
        }
        *current = next.clone();
        Ok(next)
    }

    fn get_base_currency(&self) -> Result<String> {
        Ok(self.read_settings().base_currency.clone())
    }

    fn get_rebalance_tolerance(&self) -> Result<Decimal> {
        Ok(self.read_settings().rebalance_tolerance)
    }

    fn get_target_allocation(&self) -> Result<TargetAllocation> {
        Ok(self.read_settings().target_allocation.clone())
    }
}
