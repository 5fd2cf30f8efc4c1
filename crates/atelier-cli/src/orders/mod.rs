//! Order command handlers for the CLI.
//!
//! Read-only subcommands work on a fresh copy of the backend order list.
//! Mutating subcommands go through `OrderDesk`, which applies the tag edit
//! locally first and rolls it back if the backend rejects the write.

mod mutate;
mod query;

use atelier_client::{AtelierClient, OrderDesk};
use atelier_core::{AppConfig, OrderStatus};
use chrono::NaiveDate;
use clap::Subcommand;
use rust_decimal::Decimal;

pub(crate) use mutate::{build_change, run_orders_set_due_date, run_orders_set_status};
pub(crate) use query::{run_orders_list, run_orders_show};

/// Sub-commands available under `orders`.
#[derive(Debug, Subcommand)]
pub enum OrdersCommands {
    /// List orders with their derived status and due date
    List {
        /// Only orders in this status (e.g. confirmed, order-ready)
        #[arg(long)]
        status: Option<OrderStatus>,
        /// Only open orders past their due date
        #[arg(long)]
        overdue: bool,
        /// Maximum number of orders to show
        #[arg(long, default_value = "50")]
        limit: usize,
    },
    /// Show one order's tags, schedule and items
    Show {
        /// Order number (#1120 or 1120) or backend id
        reference: String,
    },
    /// Change an order's status
    SetStatus {
        /// Order number (#1120 or 1120) or backend id
        reference: String,
        /// Target status
        status: OrderStatus,
        /// Actual shipping cost (scooter and other-company deliveries)
        #[arg(long)]
        cost: Option<Decimal>,
        /// Pickup date (YYYY-MM-DD) when fulfilling a pickup order
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Reason, required when cancelling
        #[arg(long)]
        reason: Option<String>,
    },
    /// Set a custom due date
    SetDueDate {
        /// Order number (#1120 or 1120) or backend id
        reference: String,
        /// New due date (YYYY-MM-DD)
        date: NaiveDate,
    },
}

/// Dispatch an `orders` subcommand.
///
/// # Errors
///
/// Returns an error if the order list cannot be fetched or the subcommand
/// fails.
pub(crate) async fn run(
    command: OrdersCommands,
    client: AtelierClient,
    config: &AppConfig,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let mut desk = OrderDesk::load(client, config.display_timezone).await?;

    match command {
        OrdersCommands::List {
            status,
            overdue,
            limit,
        } => {
            run_orders_list(&desk, status, overdue, limit, today);
            Ok(())
        }
        OrdersCommands::Show { reference } => run_orders_show(&desk, &reference, today),
        OrdersCommands::SetStatus {
            reference,
            status,
            cost,
            date,
            reason,
        } => {
            let change = build_change(status, cost, date, reason);
            run_orders_set_status(&mut desk, &reference, &change, today).await
        }
        OrdersCommands::SetDueDate { reference, date } => {
            run_orders_set_due_date(&mut desk, &reference, date, today).await
        }
    }
}

/// Truncate `s` to `max` characters, marking the cut with `...`.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        format!("{}...", s.chars().take(max).collect::<String>())
    } else {
        s.to_string()
    }
}
