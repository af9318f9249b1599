//! Service exposing portfolio analytics over the current holdings.

use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::investments::{Investment, InvestmentServiceTrait};
use crate::settings::SettingsServiceTrait;

use super::{
    asset_allocation, diversification_score, geographic_allocation, rebalancing_plan,
    risk_assessment, sector_allocation, total_return, AllocationSlice, DiversificationReport,
    PortfolioSummary, RebalancingPlan, ReturnSummary, RiskAssessment,
};

/// Every analytics view of the portfolio at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioAnalytics {
    pub base_currency: String,
    pub summary: PortfolioSummary,
    pub asset_allocation: Vec<AllocationSlice>,
    pub sector_allocation: Vec<AllocationSlice>,
    pub geographic_allocation: Vec<AllocationSlice>,
    pub diversification: DiversificationReport,
    pub risk: RiskAssessment,
    pub rebalancing: RebalancingPlan,
}

/// Trait for portfolio analytics.
///
/// All figures are computed over active holdings.
pub trait PortfolioServiceTrait: Send + Sync {
    fn get_summary(&self) -> Result<PortfolioSummary>;

    fn get_asset_allocation(&self) -> Result<Vec<AllocationSlice>>;

    fn get_sector_allocation(&self) -> Result<Vec<AllocationSlice>>;

    fn get_geographic_allocation(&self) -> Result<Vec<AllocationSlice>>;

    fn get_total_return(&self) -> Result<ReturnSummary>;

    fn get_diversification(&self) -> Result<DiversificationReport>;

    fn get_risk_assessment(&self) -> Result<RiskAssessment>;

    /// Trades toward the configured target allocation and tolerance.
    fn get_rebalancing_plan(&self) -> Result<RebalancingPlan>;

    fn get_analytics(&self) -> Result<PortfolioAnalytics>;
}

pub struct PortfolioService {
    investment_service: Arc<dyn InvestmentServiceTrait>,
    settings_service: Arc<dyn SettingsServiceTrait>,
}

impl PortfolioService {
    pub fn new(
        investment_service: Arc<dyn InvestmentServiceTrait>,
        settings_service: Arc<dyn SettingsServiceTrait>,
    ) -> Self {
        Self {
            investment_service,
            settings_service,
        }
    }

    fn holdings(&self) -> Result<Vec<Investment>> {
        self.investment_service.get_active_investments()
    }

    fn plan_for(&self, holdings: &[Investment]) -> Result<RebalancingPlan> {
        let targets = self.settings_service.get_target_allocation()?;
        if let Err(e) = targets.validate() {
            warn!("Configured target allocation is invalid: {}", e);
            return Err(e);
        }
        let tolerance = self.settings_service.get_rebalance_tolerance()?;
        Ok(rebalancing_plan(holdings, &targets, tolerance))
    }
}

impl PortfolioServiceTrait for PortfolioService {
    fn get_summary(&self) -> Result<PortfolioSummary> {
        Ok(PortfolioSummary::from_investments(&self.holdings()?))
    }

    fn get_asset_allocation(&self) -> Result<Vec<AllocationSlice>> {
        Ok(asset_allocation(&self.holdings()?))
    }

    fn get_sector_allocation(&self) -> Result<Vec<AllocationSlice>> {
        Ok(sector_allocation(&self.holdings()?))
    }

    fn get_geographic_allocation(&self) -> Result<Vec<AllocationSlice>> {
        Ok(geographic_allocation(&self.holdings()?))
    }

    fn get_total_return(&self) -> Result<ReturnSummary> {
        Ok(total_return(&self.holdings()?))
    }

    fn get_diversification(&self) -> Result<DiversificationReport> {
        Ok(diversification_score(&self.holdings()?))
    }

    fn get_risk_assessment(&self) -> Result<RiskAssessment> {
        Ok(risk_assessment(&self.holdings()?))
    }

    fn get_rebalancing_plan(&self) -> Result<RebalancingPlan> {
        self.plan_for(&self.holdings()?)
    }

    fn get_analytics(&self) -> Result<PortfolioAnalytics> {
        let holdings = self.holdings()?;
        debug!("Computing analytics over {} holding(s)", holdings.len());
        Ok(PortfolioAnalytics {
            base_currency: self.settings_service.get_base_currency()?,
            summary: PortfolioSummary::from_investments(&holdings),
            asset_allocation: asset_allocation(&holdings),
            sector_allocation: sector_allocation(&holdings),
            geographic_allocation: geographic_allocation(&holdings),
            diversification: diversification_score(&holdings),
            risk: risk_assessment(&holdings),
            rebalancing: self.plan_for(&holdings)?,
        })
    }
}
