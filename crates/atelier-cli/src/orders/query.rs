use atelier_client::OrderDesk;
use atelier_core::schedule::OrderSchedule;
use atelier_core::{Order, OrderStatus};
use chrono::NaiveDate;

use super::truncate;

fn customer_name(order: &Order) -> String {
    order
        .customer
        .as_ref()
        .map(|c| {
            [c.first_name.as_deref(), c.last_name.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| "\u{2014}".to_string())
}

fn days_in_status(schedule: &OrderSchedule) -> String {
    schedule
        .days_in_status
        .map_or_else(|| "\u{2014}".to_string(), |d| format!("{d}d"))
}

/// List orders with derived status, due date and day counters.
pub(crate) fn run_orders_list(
    desk: &OrderDesk,
    status: Option<OrderStatus>,
    overdue_only: bool,
    limit: usize,
    today: NaiveDate,
) {
    let tz = desk.timezone();
    let board = desk.board();

    let rows: Vec<(&Order, OrderSchedule)> = if overdue_only {
        board.overdue(tz, today)
    } else {
        board
            .iter()
            .map(|o| (o, OrderSchedule::for_order(o, tz, today)))
            .collect()
    };
    let rows: Vec<_> = rows
        .into_iter()
        .filter(|(_, s)| status.is_none_or(|wanted| s.status == wanted))
        .take(limit)
        .collect();

    if rows.is_empty() {
        println!("no matching orders");
        return;
    }

    println!(
        "{:<9}{:<15}{:<22}{:<12}{:<8}{:<10}CUSTOMER",
        "ORDER", "STATUS", "MAKING TIME", "DUE", "LEFT", "IN STATE"
    );
    for (order, schedule) in &rows {
        let flag = if order.record().priority { "!" } else { "" };
        let due = format!(
            "{}{}",
            schedule.due_date.format("%Y-%m-%d"),
            if schedule.custom_due { "*" } else { "" }
        );
        println!(
            "{:<9}{:<15}{:<22}{:<12}{:<8}{:<10}{}",
            format!("{}{flag}", order.name),
            schedule.status.as_str(),
            schedule.making_time.label(),
            due,
            format!("{}d", schedule.days_until_due),
            days_in_status(schedule),
            truncate(&customer_name(order), 30)
        );
    }
    println!();
    println!("{} order(s); ! = priority, * = custom due date", rows.len());
}

/// Show one order in full.
///
/// # Errors
///
/// Returns an error if `reference` matches no order or several orders.
pub(crate) fn run_orders_show(
    desk: &OrderDesk,
    reference: &str,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let order = desk.board().find(reference)?;
    let record = order.record();
    let schedule = OrderSchedule::for_order(order, desk.timezone(), today);

    println!("Order {} (id {})", order.name, order.id);
    println!("Customer:    {}", customer_name(order));
    println!("Phone:       {}", order.phone().unwrap_or("\u{2014}"));
    println!("Status:      {} ({} in state)", schedule.status, days_in_status(&schedule));
    println!("Priority:    {}", if record.priority { "yes" } else { "no" });
    println!("Making time: {}", schedule.making_time.label());
    println!("Start:       {}", schedule.start_date.format("%Y-%m-%d"));
    println!(
        "Due:         {}{} ({} days left{})",
        schedule.due_date.format("%Y-%m-%d"),
        if schedule.custom_due { " (custom)" } else { "" },
        schedule.days_until_due,
        if schedule.overdue { ", OVERDUE" } else { "" }
    );
    println!("Shipping:    {}", record.effective_shipping_method());
    if let Some(cost) = record.shipping_cost {
        println!("Ship cost:   {cost}");
    }
    if let Some(reason) = &record.cancellation_reason {
        println!(
            "Cancelled:   {reason}{}",
            if record.cancelled_after_shipping {
                " (after shipping)"
            } else {
                ""
            }
        );
    }
    println!("Total:       {}", order.total_price);
    println!();
    println!("Items:");
    for item in &order.line_items {
        match &item.variant_title {
            Some(variant) => println!("  - {} x {} ({variant})", item.quantity, item.title),
            None => println!("  - {} x {}", item.quantity, item.title),
        }
    }
    println!();
    println!("Tags: {}", order.tags.joined());

    Ok(())
}
