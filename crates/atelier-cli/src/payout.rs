//! Payout report handler for the CLI.

use atelier_client::AtelierClient;
use atelier_core::{load_payout_config, paid_revenue, summarize, AppConfig, PayoutReport};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Figures for one payout period. `None` amounts are derived from the
/// backend: revenue from paid orders, shipping from the ledger.
#[derive(Debug)]
pub(crate) struct PayoutPeriod {
    pub revenue: Option<Decimal>,
    pub expenses: Decimal,
    pub shipping: Option<Decimal>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Compute and print the payout split.
///
/// # Errors
///
/// Returns an error if the payout config cannot be loaded or is invalid, or
/// if revenue or shipping need to be derived and the backend call fails.
pub(crate) async fn run_payout(
    client: &AtelierClient,
    config: &AppConfig,
    period: &PayoutPeriod,
    remote_config: bool,
) -> anyhow::Result<()> {
    let shares = if remote_config {
        client.payout_config().await?
    } else {
        load_payout_config(&config.payout_config_path)?
    };

    let revenue = match period.revenue {
        Some(revenue) => revenue,
        None => {
            let orders = client.list_orders().await?;
            paid_revenue(&orders, config.display_timezone, period.from, period.to)
        }
    };
    let shipping = match period.shipping {
        Some(shipping) => shipping,
        None => {
            let records = client.list_shipping_records().await?;
            summarize(&records, period.from, period.to).total_actual
        }
    };

    let report = PayoutReport::compute(revenue, period.expenses, shipping, &shares)?;

    let fmt_bound = |d: Option<NaiveDate>| d.map_or_else(|| "\u{2014}".to_string(), |d| d.to_string());
    println!("Period:   {} .. {}", fmt_bound(period.from), fmt_bound(period.to));
    println!("Revenue:  {:>12}", report.revenue.round_dp(2).to_string());
    println!("Expenses: {:>12}", report.expenses.round_dp(2).to_string());
    println!("Shipping: {:>12}", report.shipping.round_dp(2).to_string());
    println!("DPP:      {:>12}", report.dpp.round_dp(2).to_string());
    println!();

    if report.dpp <= Decimal::ZERO {
        println!("DPP is not positive; no payouts this period");
    }
    println!("{:<20}{:>8}{:>14}", "SHARE", "PERCENT", "AMOUNT");
    for line in &report.lines {
        println!(
            "{:<20}{:>8}{:>14}",
            line.name,
            format!("{}%", line.percent.normalize()),
            line.amount.to_string()
        );
    }
    println!("{:<20}{:>8}{:>14}", "retained", "", report.retained.round_dp(2).to_string());

    Ok(())
}
