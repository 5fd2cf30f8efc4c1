mod orders;
mod payout;
mod shipping;
mod whatsapp;

use std::path::PathBuf;

use atelier_client::AtelierClient;
use atelier_core::today_in;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use crate::orders::OrdersCommands;
use crate::shipping::ShippingCommands;
use crate::whatsapp::WhatsappCommands;

#[derive(Debug, Parser)]
#[command(name = "atelier-cli")]
#[command(about = "Order desk command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse and update orders
    Orders {
        #[command(subcommand)]
        command: OrdersCommands,
    },
    /// Shipping cost ledger and bulk import
    Shipping {
        #[command(subcommand)]
        command: ShippingCommands,
    },
    /// Split the distributable profit pool across payout shares
    Payout {
        /// Revenue for the period; defaults to the total of paid orders
        #[arg(long)]
        revenue: Option<Decimal>,
        /// Expenses for the period
        #[arg(long, default_value = "0")]
        expenses: Decimal,
        /// Shipping cost for the period; defaults to the ledger's actual costs
        #[arg(long)]
        shipping: Option<Decimal>,
        /// First day of the period (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day of the period (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Use the payout shares stored by the backend instead of the local file
        #[arg(long)]
        remote_config: bool,
    },
    /// WhatsApp templates and messages
    Whatsapp {
        #[command(subcommand)]
        command: WhatsappCommands,
    },
    /// Upload a paid-orders spreadsheet to the backend
    UploadPaid {
        /// Path to the spreadsheet
        file: PathBuf,
    },
    /// Print the effective configuration (secrets redacted)
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("atelier-cli ready; run with --help to list commands");
        return Ok(());
    };

    let config = atelier_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(env = %config.env, base_url = %config.api_base_url, "configuration loaded");

    let client = AtelierClient::new(&config)?;
    let today = today_in(config.display_timezone);

    match command {
        Commands::Orders { command } => orders::run(command, client, &config, today).await?,
        Commands::Shipping { command } => shipping::run(command, &client, today).await?,
        Commands::Payout {
            revenue,
            expenses,
            shipping,
            from,
            to,
            remote_config,
        } => {
            let period = payout::PayoutPeriod {
                revenue,
                expenses,
                shipping,
                from,
                to,
            };
            payout::run_payout(&client, &config, &period, remote_config).await?;
        }
        Commands::Whatsapp { command } => whatsapp::run(command, &client).await?,
        Commands::UploadPaid { file } => run_upload_paid(&client, &file).await?,
        Commands::Config => println!("{config:#?}"),
    }

    Ok(())
}

/// Upload a paid-orders spreadsheet and print the backend's tally.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the upload fails.
async fn run_upload_paid(client: &AtelierClient, file: &std::path::Path) -> anyhow::Result<()> {
    let contents = tokio::fs::read(file)
        .await
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", file.display()))?;
    let file_name = file
        .file_name()
        .map_or_else(|| "paid-orders.xlsx".to_string(), |n| n.to_string_lossy().into_owned());

    let results = client.upload_paid_orders(&file_name, contents).await?;

    println!("processed: {}", results.processed);
    println!("updated:   {}", results.updated);
    println!("not found: {}", results.not_found);
    if !results.errors.is_empty() {
        println!("errors:");
        for error in &results.errors {
            match error.as_str() {
                Some(text) => println!("  - {text}"),
                None => println!("  - {error}"),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
