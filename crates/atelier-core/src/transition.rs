//! Status changes expressed as tag edits.
//!
//! A status change never talks to the backend itself. Planning turns the
//! request into a [`TagEdit`] plus the follow-ups to run once the edit is
//! committed, or reports the [`Gate`] whose input is still missing. A caller
//! that cannot supply the input simply never commits.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::record::{
    format_tag_date, OrderTagRecord, ShippingMethod, CANCELLATION_REASON_KEY,
    CANCELLED_AFTER_SHIPPING_TAG, SHIPPING_COST_KEY,
};
use crate::status::OrderStatus;
use crate::tags::{TagEdit, TagList};

/// Template opened for the customer after an order ships.
pub const SHIPPED_TEMPLATE_KEY: &str = "order_shipped";

/// Input that must be collected before a status change may be committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Actual delivery cost for scooter and third-party company deliveries.
    ShippingCost,
    /// Date a pickup order was collected.
    FulfillmentDate,
    /// Free-text reason for cancelling.
    CancellationReason,
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gate::ShippingCost => "shipping cost",
            Gate::FulfillmentDate => "fulfillment date",
            Gate::CancellationReason => "cancellation reason",
        })
    }
}

/// Side effect to run after the tag write succeeds. Failures here never undo
/// the status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUp {
    /// Offer the customer a shipping notification built from a template.
    ShippedNotification { template_key: &'static str },
    /// Ask the backend to send the "order ready" WhatsApp message.
    OrderReadyMessage,
}

#[derive(Debug, Error, PartialEq)]
pub enum TransitionError {
    #[error("{gate} is required before changing status to {target}")]
    InputRequired { target: OrderStatus, gate: Gate },

    #[error("shipping cost must not be negative (got {0})")]
    NegativeShippingCost(Decimal),
}

/// A requested status change together with whatever gate inputs the caller
/// has already collected.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub target: OrderStatus,
    pub shipping_cost: Option<Decimal>,
    pub fulfillment_date: Option<NaiveDate>,
    pub cancellation_reason: Option<String>,
}

impl StatusChange {
    #[must_use]
    pub fn to(target: OrderStatus) -> Self {
        Self {
            target,
            shipping_cost: None,
            fulfillment_date: None,
            cancellation_reason: None,
        }
    }

    #[must_use]
    pub fn with_shipping_cost(mut self, cost: Decimal) -> Self {
        self.shipping_cost = Some(cost);
        self
    }

    #[must_use]
    pub fn with_fulfillment_date(mut self, date: NaiveDate) -> Self {
        self.fulfillment_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_cancellation_reason(mut self, reason: impl Into<String>) -> Self {
        self.cancellation_reason = Some(reason.into());
        self
    }
}

/// Everything needed to commit a status change.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub edit: TagEdit,
    pub follow_ups: Vec<FollowUp>,
}

/// Plans `change` against the current `tags`.
///
/// # Errors
///
/// Returns [`TransitionError::InputRequired`] when the target status needs a
/// gate input that `change` does not carry, and
/// [`TransitionError::NegativeShippingCost`] for a cost below zero.
pub fn plan_status_change(
    tags: &TagList,
    change: &StatusChange,
    today: NaiveDate,
) -> Result<TransitionPlan, TransitionError> {
    let record = OrderTagRecord::from_tags(tags);
    let from = record.status;
    let target = change.target;

    let mut edit = TagEdit::new();
    for marker in OrderStatus::ALL.iter().filter_map(|s| s.marker()) {
        edit = edit.remove(marker);
    }
    if let Some(marker) = target.marker() {
        edit = edit.add(marker);
    }

    let mut stamp = Some(today);
    let mut follow_ups = Vec::new();

    match target {
        OrderStatus::Fulfilled => {
            let method = record.effective_shipping_method();
            if method.requires_cost_entry() {
                let cost = change.shipping_cost.ok_or(TransitionError::InputRequired {
                    target,
                    gate: Gate::ShippingCost,
                })?;
                if cost.is_sign_negative() {
                    return Err(TransitionError::NegativeShippingCost(cost));
                }
                edit = edit.set_value(SHIPPING_COST_KEY, cost.to_string());
            } else if method == ShippingMethod::Pickup {
                let picked = change
                    .fulfillment_date
                    .ok_or(TransitionError::InputRequired {
                        target,
                        gate: Gate::FulfillmentDate,
                    })?;
                stamp = Some(picked);
            }
        }
        OrderStatus::Cancelled => {
            let reason = change
                .cancellation_reason
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .ok_or(TransitionError::InputRequired {
                    target,
                    gate: Gate::CancellationReason,
                })?;
            edit = edit.set_value(CANCELLATION_REASON_KEY, reason);
            if from == OrderStatus::Shipped {
                edit = edit.add(CANCELLED_AFTER_SHIPPING_TAG);
            }
        }
        OrderStatus::Shipped => follow_ups.push(FollowUp::ShippedNotification {
            template_key: SHIPPED_TEMPLATE_KEY,
        }),
        OrderStatus::OrderReady => follow_ups.push(FollowUp::OrderReadyMessage),
        OrderStatus::Pending => stamp = None,
        OrderStatus::OnHold
        | OrderStatus::Confirmed
        | OrderStatus::ReadyToShip
        | OrderStatus::Paid => {}
    }

    if let (Some(key), Some(date)) = (target.stamp_key(), stamp) {
        edit = edit.set_value(key, format_tag_date(date));
    }

    tracing::debug!(%from, to = %target, ops = edit.ops().len(), "planned status change");

    Ok(TransitionPlan {
        from,
        to: target,
        edit,
        follow_ups,
    })
}

#[cfg(test)]
#[path = "transition_test.rs"]
mod tests;
