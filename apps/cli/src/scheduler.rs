//! Background tasks driving the portfolio while the binary runs.
//!
//! - Price sync: every tick broadcast by the feed reprices matching holdings.
//! - Plan scheduler: executes due recurring plans on a fixed interval.
//! - Analytics reporter: logs a one-line portfolio summary.

use std::sync::Arc;

use chrono::Local;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{interval, Duration};
use tracing::{debug, info, warn};

use crate::main_lib::ServiceContext;

/// Starts applying feed ticks to holdings.
pub fn start_price_sync(context: Arc<ServiceContext>) {
    let mut ticks = context.price_feed.ticks();
    tokio::spawn(async move {
        info!("Price sync started");
        loop {
            match ticks.recv().await {
                Ok(tick) => {
                    match context
                        .investment_service
                        .apply_price_ticks(std::slice::from_ref(&tick))
                        .await
                    {
                        Ok(updated) => debug!(
                            "{} @ {} repriced {} holding(s)",
                            tick.symbol, tick.price, updated
                        ),
                        Err(e) => warn!("Failed to apply tick for {}: {}", tick.symbol, e),
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Price sync lagged; skipped {} tick(s)", skipped);
                }
                Err(RecvError::Closed) => {
                    info!("Price feed closed; price sync stopped");
                    break;
                }
            }
        }
    });
}

/// Starts executing due recurring plans every `every`.
///
/// The first check runs immediately so plans missed while the binary was down
/// are caught up at start.
pub fn start_plan_scheduler(context: Arc<ServiceContext>, every: Duration) {
    tokio::spawn(async move {
        info!("Recurring plan scheduler started ({:?} interval)", every);
        let mut check_interval = interval(every);
        loop {
            check_interval.tick().await;
            run_due_plans(&context).await;
        }
    });
}

async fn run_due_plans(context: &ServiceContext) {
    let today = Local::now().date_naive();
    match context.plan_service.process_due_payments(today).await {
        Ok(executions) if executions.is_empty() => debug!("No recurring plan due on {}", today),
        Ok(executions) => {
            for execution in &executions {
                info!(
                    "Plan {} bought {} {} for {}{}",
                    execution.plan.id,
                    execution.transaction.quantity,
                    execution.plan.symbol,
                    execution.transaction.total_amount,
                    if execution.completed { " (completed)" } else { "" }
                );
            }
        }
        Err(e) => warn!("Recurring plan run failed: {}", e),
    }
}

/// Starts logging a portfolio summary every `every`.
pub fn start_analytics_reporter(context: Arc<ServiceContext>, every: Duration) {
    tokio::spawn(async move {
        let mut report_interval = interval(every);
        loop {
            report_interval.tick().await;
            match context.portfolio_service.get_summary() {
                Ok(summary) => info!(
                    "Portfolio value {} (invested {}, return {}%), feed {:?}",
                    summary.total_value,
                    summary.total_invested,
                    summary.total_return_percent,
                    context.price_feed.status().connection
                ),
                Err(e) => warn!("Failed to compute portfolio summary: {}", e),
            }
        }
    });
}
