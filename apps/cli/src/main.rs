mod config;
mod main_lib;
mod scheduler;
mod seed;

use config::Config;
use main_lib::{build_context, init_tracing, print_analytics};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing();
    let context = build_context(&config).await?;
    print_analytics(&context)?;

    context.price_feed.start();
    scheduler::start_price_sync(context.clone());
    scheduler::start_plan_scheduler(context.clone(), config.plan_check_interval);
    scheduler::start_analytics_reporter(context.clone(), config.report_interval);

    tracing::info!("Finboard running; press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    context.price_feed.stop();
    print_analytics(&context)?;
    Ok(())
}
