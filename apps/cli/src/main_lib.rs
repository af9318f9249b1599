use std::sync::Arc;

use finboard_core::goals::{GoalService, GoalServiceTrait};
use finboard_core::investments::{InvestmentService, InvestmentServiceTrait};
use finboard_core::pac::{RecurringPlanService, RecurringPlanServiceTrait};
use finboard_core::portfolio::{PortfolioService, PortfolioServiceTrait};
use finboard_core::settings::{SettingsService, SettingsServiceTrait};
use finboard_core::transactions::{TransactionService, TransactionServiceTrait};
use finboard_market_data::{PriceFeed, SimulatedProvider};
use finboard_storage_memory::{
    goals::GoalRepository, investments::InvestmentRepository, pac::RecurringPlanRepository,
    transactions::TransactionRepository, MemoryStore,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::seed::seed_sample_portfolio;

pub struct ServiceContext {
    pub settings_service: Arc<dyn SettingsServiceTrait>,
    pub investment_service: Arc<dyn InvestmentServiceTrait>,
    pub transaction_service: Arc<dyn TransactionServiceTrait>,
    pub plan_service: Arc<dyn RecurringPlanServiceTrait>,
    pub goal_service: Arc<dyn GoalServiceTrait>,
    pub portfolio_service: Arc<dyn PortfolioServiceTrait>,
    pub price_feed: Arc<PriceFeed>,
}

pub fn init_tracing() {
    let log_format = std::env::var("FINBOARD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_context(config: &Config) -> anyhow::Result<Arc<ServiceContext>> {
    let store = Arc::new(MemoryStore::new());

    let settings_service = Arc::new(SettingsService::new(config.settings.clone())?);
    let investment_repository = Arc::new(InvestmentRepository::new(store.clone()));
    let transaction_repository = Arc::new(TransactionRepository::new(store.clone()));
    let investment_service = Arc::new(InvestmentService::new(
        investment_repository,
        transaction_repository.clone(),
    ));
    let transaction_service = Arc::new(TransactionService::new(
        transaction_repository,
        investment_service.clone(),
    ));
    let plan_service = Arc::new(RecurringPlanService::new(
        Arc::new(RecurringPlanRepository::new(store.clone())),
        investment_service.clone(),
        transaction_service.clone(),
    ));
    let goal_service = Arc::new(GoalService::new(Arc::new(GoalRepository::new(
        store.clone(),
    ))));
    let portfolio_service = Arc::new(PortfolioService::new(
        investment_service.clone(),
        settings_service.clone(),
    ));

    let provider = match config.simulation_seed {
        Some(seed) => SimulatedProvider::seeded(seed),
        None => SimulatedProvider::new(),
    }
    .with_failure_rate(config.simulation_failure_rate);
    let price_feed = Arc::new(PriceFeed::new(
        Arc::new(provider),
        config.price_feed.clone(),
    ));

    let context = Arc::new(ServiceContext {
        settings_service,
        investment_service,
        transaction_service,
        plan_service,
        goal_service,
        portfolio_service,
        price_feed,
    });

    seed_sample_portfolio(&context).await?;
    subscribe_holdings(&context).await?;
    Ok(context)
}

/// Subscribes the feed to every active holding and applies the first ticks.
pub async fn subscribe_holdings(context: &ServiceContext) -> anyhow::Result<()> {
    let instruments = context
        .investment_service
        .get_active_investments()?
        .iter()
        .map(|investment| investment.instrument())
        .collect();
    let ticks = context.price_feed.subscribe(instruments).await;
    let updated = context.investment_service.apply_price_ticks(&ticks).await?;
    tracing::info!(
        "Price feed watching {} symbol(s); {} holding(s) repriced",
        context.price_feed.subscribed_symbols().len(),
        updated
    );
    Ok(())
}

pub fn print_analytics(context: &ServiceContext) -> anyhow::Result<()> {
    let analytics = context.portfolio_service.get_analytics()?;
    println!("{}", serde_json::to_string_pretty(&analytics)?);
    Ok(())
}
