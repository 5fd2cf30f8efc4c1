use atelier_client::{DeskError, FollowUpOutcome, OrderDesk};
use atelier_core::record::PRIORITY_TAG;
use atelier_core::{Gate, OrderStatus, StatusChange, TagOp, TransitionError};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Assemble a status change from the command line flags.
pub(crate) fn build_change(
    status: OrderStatus,
    cost: Option<Decimal>,
    date: Option<NaiveDate>,
    reason: Option<String>,
) -> StatusChange {
    let mut change = StatusChange::to(status);
    if let Some(cost) = cost {
        change = change.with_shipping_cost(cost);
    }
    if let Some(date) = date {
        change = change.with_fulfillment_date(date);
    }
    if let Some(reason) = reason {
        change = change.with_cancellation_reason(reason);
    }
    change
}

/// Flag that supplies the input for a missing gate.
fn gate_hint(err: &TransitionError) -> Option<&'static str> {
    match err {
        TransitionError::InputRequired { gate, .. } => Some(match gate {
            Gate::ShippingCost => "--cost <AMOUNT>",
            Gate::FulfillmentDate => "--date <YYYY-MM-DD>",
            Gate::CancellationReason => "--reason <TEXT>",
        }),
        TransitionError::NegativeShippingCost(_) => None,
    }
}

fn describe_op(op: &TagOp) -> String {
    match op {
        TagOp::Add(tag) => format!("+ {tag}"),
        TagOp::Remove(tag) => format!("- {tag}"),
        TagOp::RemoveKey(key) => format!("- {key}:*"),
        TagOp::SetValue { key, value } => format!("= {key}:{value}"),
    }
}

/// Change an order's status and run its follow-ups.
///
/// # Errors
///
/// Returns an error if the reference does not resolve to one order, a gate
/// input is missing, or the backend rejects the tag write (local state is
/// rolled back in that case).
pub(crate) async fn run_orders_set_status(
    desk: &mut OrderDesk,
    reference: &str,
    change: &StatusChange,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let order_id = desk.board().find(reference)?.id;

    let outcome = match desk.change_status(order_id, change, today).await {
        Ok(outcome) => outcome,
        Err(DeskError::Transition(err)) => {
            if let Some(flag) = gate_hint(&err) {
                anyhow::bail!("{err}; pass {flag}");
            }
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };

    println!("{reference}: {} -> {}", outcome.plan.from, outcome.plan.to);
    for op in outcome.plan.edit.ops() {
        println!("  {}", describe_op(op));
    }

    for follow_up in &outcome.follow_ups {
        match follow_up {
            FollowUpOutcome::ShippedMessage { message, link } => {
                println!();
                println!("Shipping notification:");
                println!("{message}");
                match link {
                    Some(link) => println!("\nSend via WhatsApp: {link}"),
                    None => println!("\n(no phone number on the order; send manually)"),
                }
            }
            FollowUpOutcome::OrderReadySent { phone } => {
                println!("order-ready message sent to {phone}");
            }
            FollowUpOutcome::Skipped { follow_up, reason } => {
                println!("skipped {follow_up:?}: {reason}");
            }
            FollowUpOutcome::Failed { follow_up, reason } => {
                tracing::warn!(?follow_up, %reason, "follow-up failed; status change kept");
                println!("follow-up failed ({reason}); the status change was kept");
            }
        }
    }

    Ok(())
}

/// Set a custom due date, escalating priority when the date is pulled in.
///
/// # Errors
///
/// Returns an error if the reference does not resolve to one order or the
/// backend rejects the tag write.
pub(crate) async fn run_orders_set_due_date(
    desk: &mut OrderDesk,
    reference: &str,
    new_due: NaiveDate,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let order_id = desk.board().find(reference)?.id;
    let edit = desk.set_custom_due_date(order_id, new_due, today).await?;

    let escalated = edit
        .ops()
        .iter()
        .any(|op| matches!(op, TagOp::Add(tag) if tag == PRIORITY_TAG));

    println!("{reference}: due {}", new_due.format("%Y-%m-%d"));
    if escalated {
        println!("marked as priority");
    }
    Ok(())
}
