//! Order lifecycle status derived from tag markers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::tags::TagList;
use crate::CoreError;

/// Lifecycle status of an order. Never stored directly; always derived from
/// the order's tags through [`STATUS_PRECEDENCE`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    #[serde(rename = "order-ready")]
    OrderReady,
    OnHold,
    Confirmed,
    ReadyToShip,
    Shipped,
    Fulfilled,
    Paid,
    Cancelled,
}

/// One row of the precedence table: if `matches` holds for a tag list, the
/// order is in `status` unless an earlier row already matched.
#[derive(Clone, Copy)]
pub struct StatusRule {
    pub status: OrderStatus,
    pub matches: fn(&TagList) -> bool,
}

impl fmt::Debug for StatusRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusRule")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Status precedence, highest first. An order with no matching marker is
/// [`OrderStatus::Pending`].
///
/// The order is load-bearing and must not be "tidied": `fulfilled` outranks
/// `shipped`, and `cancelled` outranks everything.
pub static STATUS_PRECEDENCE: [StatusRule; 8] = [
    StatusRule {
        status: OrderStatus::Cancelled,
        matches: |tags| tags.contains("cancelled"),
    },
    StatusRule {
        status: OrderStatus::Paid,
        matches: |tags| tags.contains("paid"),
    },
    StatusRule {
        status: OrderStatus::Fulfilled,
        matches: |tags| tags.contains("fulfilled"),
    },
    StatusRule {
        status: OrderStatus::Shipped,
        matches: |tags| tags.contains("shipped"),
    },
    StatusRule {
        status: OrderStatus::ReadyToShip,
        matches: |tags| tags.contains("ready_to_ship"),
    },
    StatusRule {
        status: OrderStatus::Confirmed,
        matches: |tags| tags.contains("confirmed"),
    },
    StatusRule {
        status: OrderStatus::OnHold,
        matches: |tags| tags.contains("on_hold"),
    },
    StatusRule {
        status: OrderStatus::OrderReady,
        matches: |tags| tags.contains("order-ready"),
    },
];

/// Returns the highest-precedence status whose marker is present.
#[must_use]
pub fn derive_status(tags: &TagList) -> OrderStatus {
    STATUS_PRECEDENCE
        .iter()
        .find(|rule| (rule.matches)(tags))
        .map_or(OrderStatus::Pending, |rule| rule.status)
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 9] = [
        OrderStatus::Pending,
        OrderStatus::OrderReady,
        OrderStatus::OnHold,
        OrderStatus::Confirmed,
        OrderStatus::ReadyToShip,
        OrderStatus::Shipped,
        OrderStatus::Fulfilled,
        OrderStatus::Paid,
        OrderStatus::Cancelled,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::OrderReady => "order-ready",
            OrderStatus::OnHold => "on_hold",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::ReadyToShip => "ready_to_ship",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Fulfilled => "fulfilled",
            OrderStatus::Paid => "paid",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// The bare tag that marks this status. `Pending` has none.
    #[must_use]
    pub fn marker(self) -> Option<&'static str> {
        match self {
            OrderStatus::Pending => None,
            other => Some(other.as_str()),
        }
    }

    /// Key of the `key:date` tag stamped when an order enters this status.
    #[must_use]
    pub fn stamp_key(self) -> Option<&'static str> {
        match self {
            OrderStatus::Pending => None,
            OrderStatus::OrderReady => Some("order_ready_date"),
            OrderStatus::OnHold => Some("on_hold_date"),
            OrderStatus::Confirmed => Some("confirmed_date"),
            OrderStatus::ReadyToShip => Some("ready_to_ship_date"),
            OrderStatus::Shipped => Some("shipping_date"),
            OrderStatus::Fulfilled => Some("fulfillment_date"),
            OrderStatus::Paid => Some("paid_date"),
            OrderStatus::Cancelled => Some("cancelled_date"),
        }
    }

    /// Fulfilled, paid and cancelled orders no longer count toward workload
    /// or overdue reporting.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderStatus::Fulfilled | OrderStatus::Paid | OrderStatus::Cancelled
        )
    }

    /// Returns `true` if `tag` is the marker of any status.
    #[must_use]
    pub fn is_marker(tag: &str) -> bool {
        let tag = tag.trim();
        Self::ALL
            .iter()
            .filter_map(|s| s.marker())
            .any(|m| m.eq_ignore_ascii_case(tag))
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CoreError;

    /// Accepts the canonical names; `-` and `_` are interchangeable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().replace('-', "_") == wanted)
            .ok_or_else(|| CoreError::UnknownStatus(s.to_string()))
    }
}
