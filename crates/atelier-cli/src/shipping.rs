//! Shipping ledger command handlers for the CLI.
//!
//! `import` parses pasted courier statements, cross-references them against
//! the live order list and refuses to send anything while an order number
//! still matches more than one order. Use `--pick NUMBER=ID` to choose.

use std::io::Read;
use std::path::PathBuf;

use atelier_client::AtelierClient;
use atelier_core::{
    parse_shipping_costs, summarize, ImportPlan, RecordStatus, ShippingRecord, ShippingType,
};
use chrono::NaiveDate;
use clap::Subcommand;
use rust_decimal::Decimal;

/// Sub-commands available under `shipping`.
#[derive(Debug, Subcommand)]
pub enum ShippingCommands {
    /// Import actual shipping costs from pasted "order number, cost" lines
    Import {
        /// File with the pasted lines; reads stdin when omitted
        #[arg(long)]
        file: Option<PathBuf>,
        /// Pick the order for a duplicated number, e.g. --pick 1121=5503
        #[arg(long = "pick", value_parser = parse_pick)]
        picks: Vec<(String, i64)>,
        /// Show what would be imported without sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Undo a previous import batch
    Revert {
        /// Batch id printed by `shipping import`
        batch_id: String,
    },
    /// Add a single ledger entry
    Add {
        /// Order number (#1120 or 1120) or backend id
        reference: String,
        /// Carrier type: company or uber
        #[arg(long, value_parser = parse_shipping_type, default_value = "company")]
        kind: ShippingType,
        /// Amount charged to the customer
        #[arg(long)]
        charged: Decimal,
        /// Amount the delivery actually cost
        #[arg(long)]
        actual: Decimal,
        /// Entry date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Totals of charged versus actual shipping cost
    Summary {
        /// First day of the period (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day of the period (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

/// Parses `NUMBER=ID` as given to `--pick`.
pub(crate) fn parse_pick(raw: &str) -> Result<(String, i64), String> {
    let (number, id) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NUMBER=ID, got '{raw}'"))?;
    let id = id
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid order id '{id}': {e}"))?;
    Ok((number.trim().to_string(), id))
}

pub(crate) fn parse_shipping_type(raw: &str) -> Result<ShippingType, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "company" => Ok(ShippingType::Company),
        "uber" => Ok(ShippingType::Uber),
        other => Err(format!("unknown shipping type '{other}'; use company or uber")),
    }
}

/// Dispatch a `shipping` subcommand.
///
/// # Errors
///
/// Returns an error if the subcommand fails.
pub(crate) async fn run(
    command: ShippingCommands,
    client: &AtelierClient,
    today: NaiveDate,
) -> anyhow::Result<()> {
    match command {
        ShippingCommands::Import {
            file,
            picks,
            dry_run,
        } => run_shipping_import(client, file, &picks, dry_run).await,
        ShippingCommands::Revert { batch_id } => {
            let receipt = client.revert_shipping_import(&batch_id).await?;
            println!("reverted batch {batch_id}: {} record(s) removed", receipt.reverted);
            Ok(())
        }
        ShippingCommands::Add {
            reference,
            kind,
            charged,
            actual,
            date,
        } => run_shipping_add(client, &reference, kind, charged, actual, date.unwrap_or(today)).await,
        ShippingCommands::Summary { from, to } => run_shipping_summary(client, from, to).await,
    }
}

fn read_input(file: Option<PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn print_duplicates(plan: &ImportPlan) {
    for duplicate in plan.duplicates.iter().filter(|d| d.selected.is_none()) {
        println!(
            "{} ({}) matches {} orders:",
            duplicate.entry.order_number,
            duplicate.entry.cost,
            duplicate.candidates.len()
        );
        for candidate in &duplicate.candidates {
            println!(
                "    id {:<10}{:<16}{:<14}{}",
                candidate.id,
                candidate.customer_name.as_deref().unwrap_or("\u{2014}"),
                candidate.status.as_str(),
                candidate.created_at.format("%Y-%m-%d")
            );
        }
    }
}

/// Parse, cross-reference and send a batch of shipping costs.
///
/// # Errors
///
/// Returns an error if no line parses, a duplicate is unresolved, a pick is
/// invalid, or the backend rejects the batch.
async fn run_shipping_import(
    client: &AtelierClient,
    file: Option<PathBuf>,
    picks: &[(String, i64)],
    dry_run: bool,
) -> anyhow::Result<()> {
    let text = read_input(file)?;
    let batch = parse_shipping_costs(&text)?;
    if batch.skipped_lines > 0 {
        tracing::warn!(skipped = batch.skipped_lines, "some lines could not be parsed");
    }

    let orders = client.list_orders().await?;
    let mut plan = ImportPlan::cross_reference(&batch.entries, &orders);
    for (number, id) in picks {
        plan.resolve(number, *id)?;
    }

    println!(
        "parsed {} line(s), skipped {}; matched {}, duplicated {}, not found {}",
        batch.entries.len(),
        batch.skipped_lines,
        plan.matched.len(),
        plan.duplicates.len(),
        plan.not_found.len()
    );
    for missing in &plan.not_found {
        println!("  not found: {} ({})", missing.order_number, missing.cost);
    }

    if plan.unresolved() > 0 {
        print_duplicates(&plan);
        anyhow::bail!(
            "{} order number(s) match several orders; rerun with --pick NUMBER=ID for each",
            plan.unresolved()
        );
    }

    let rows = plan.commit_rows()?;
    if dry_run {
        println!("[dry-run] would import {} row(s):", rows.len());
        for row in &rows {
            println!("  {:<10}{:<12}{}", row.order_number, row.order_id, row.cost);
        }
        return Ok(());
    }

    let receipt = client.bulk_import_shipping_costs(&rows).await?;
    println!(
        "imported {} row(s) as batch {}; undo with `shipping revert {}`",
        receipt.imported, receipt.batch_id, receipt.batch_id
    );
    Ok(())
}

/// Add one ledger entry for the referenced order.
///
/// # Errors
///
/// Returns an error if the reference does not resolve to one order or the
/// backend rejects the record.
async fn run_shipping_add(
    client: &AtelierClient,
    reference: &str,
    kind: ShippingType,
    charged: Decimal,
    actual: Decimal,
    date: NaiveDate,
) -> anyhow::Result<()> {
    if charged.is_sign_negative() || actual.is_sign_negative() {
        anyhow::bail!("shipping amounts must not be negative");
    }
    let orders = client.list_orders().await?;
    let board = atelier_core::OrderBoard::new(orders);
    let order = board.find(reference)?;

    let record = ShippingRecord {
        id: None,
        order_id: order.id,
        order_number: order.name.clone(),
        kind,
        charged_cost: charged,
        actual_cost: actual,
        status: RecordStatus::Pending,
        date,
        import_batch_id: None,
    };
    let stored = client.create_shipping_record(&record).await?;
    println!(
        "recorded {} for {}: charged {}, actual {} (margin {})",
        stored.id.as_deref().unwrap_or("entry"),
        stored.order_number,
        stored.charged_cost,
        stored.actual_cost,
        stored.margin()
    );
    Ok(())
}

/// Print ledger totals for the period.
///
/// # Errors
///
/// Returns an error if the ledger cannot be fetched.
async fn run_shipping_summary(
    client: &AtelierClient,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let records = client.list_shipping_records().await?;
    let summary = summarize(&records, from, to);

    if summary.record_count == 0 {
        println!("no shipping records in this period");
        return Ok(());
    }

    println!("{:<10}{:>7}{:>14}{:>14}", "TYPE", "COUNT", "CHARGED", "ACTUAL");
    for (kind, totals) in &summary.by_type {
        println!(
            "{:<10}{:>7}{:>14}{:>14}",
            format!("{kind:?}"),
            totals.count,
            totals.charged.to_string(),
            totals.actual.to_string()
        );
    }
    println!(
        "{:<10}{:>7}{:>14}{:>14}",
        "TOTAL",
        summary.record_count,
        summary.total_charged.to_string(),
        summary.total_actual.to_string()
    );
    println!();
    println!("difference (charged - actual): {}", summary.difference);
    println!("pending: {}  settled: {}", summary.pending, summary.settled);
    Ok(())
}
