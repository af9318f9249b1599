//! Sample portfolio for a fresh start.

use chrono::Local;
use finboard_core::goals::{GoalPriority, NewGoal};
use finboard_core::investments::NewInvestment;
use finboard_core::pac::{NewRecurringPlan, PlanFrequency};
use finboard_core::transactions::{NewTransaction, TransactionType};
use finboard_core::AssetClass;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::main_lib::ServiceContext;

struct SampleHolding {
    name: &'static str,
    symbol: &'static str,
    asset_class: AssetClass,
    quantity: Decimal,
    average_price: Decimal,
    sector: &'static str,
    country: &'static str,
}

const SAMPLE_HOLDINGS: [SampleHolding; 4] = [
    SampleHolding {
        name: "Vanguard FTSE All-World",
        symbol: "VWCE.DE",
        asset_class: AssetClass::Etf,
        quantity: dec!(50),
        average_price: dec!(98.50),
        sector: "Diversified",
        country: "Ireland",
    },
    SampleHolding {
        name: "Apple Inc.",
        symbol: "AAPL",
        asset_class: AssetClass::Stocks,
        quantity: dec!(10),
        average_price: dec!(170),
        sector: "Technology",
        country: "United States",
    },
    SampleHolding {
        name: "iShares Core Global Aggregate Bond",
        symbol: "AGGH",
        asset_class: AssetClass::Bonds,
        quantity: dec!(400),
        average_price: dec!(5.10),
        sector: "Fixed Income",
        country: "Ireland",
    },
    SampleHolding {
        name: "Bitcoin",
        symbol: "BTC",
        asset_class: AssetClass::Crypto,
        quantity: dec!(0.05),
        average_price: dec!(42000),
        sector: "Digital Assets",
        country: "Global",
    },
];

pub async fn seed_sample_portfolio(context: &ServiceContext) -> anyhow::Result<()> {
    let currency = context.settings_service.get_base_currency()?;
    let today = Local::now().date_naive();

    let mut created = Vec::with_capacity(SAMPLE_HOLDINGS.len());
    for sample in &SAMPLE_HOLDINGS {
        let investment = context
            .investment_service
            .create_investment(NewInvestment {
                name: sample.name.to_string(),
                symbol: sample.symbol.to_string(),
                asset_class: sample.asset_class,
                quantity: sample.quantity,
                average_price: sample.average_price,
                current_price: None,
                fees: Decimal::ZERO,
                currency: currency.clone(),
                sector: Some(sample.sector.to_string()),
                country: Some(sample.country.to_string()),
            })
            .await?;
        created.push(investment);
    }

    let (etf, stock) = (&created[0], &created[1]);
    context
        .transaction_service
        .add_transaction(NewTransaction {
            investment_id: stock.id.clone(),
            transaction_type: TransactionType::Buy,
            quantity: dec!(2),
            price: dec!(185),
            fees: dec!(1),
            date: today,
            currency: currency.clone(),
            pac_plan_id: None,
            notes: Some("Sample top-up".to_string()),
        })
        .await?;

    context
        .plan_service
        .create_plan(
            NewRecurringPlan {
                investment_id: etf.id.clone(),
                monthly_amount: dec!(300),
                frequency: PlanFrequency::Monthly,
                day_of_month: 10,
                start_date: today,
                end_date: None,
                target_amount: Some(dec!(12000)),
            },
            today,
        )
        .await?;

    context
        .goal_service
        .create_goal(NewGoal {
            name: "Emergency fund".to_string(),
            target_amount: dec!(10000),
            current_amount: dec!(3500),
            deadline: None,
            priority: GoalPriority::High,
            category: "Safety".to_string(),
            monthly_contribution: Some(dec!(500)),
        })
        .await?;

    tracing::info!(
        "Seeded sample portfolio: {} holding(s), 1 recurring plan, 1 goal",
        created.len()
    );
    Ok(())
}
