use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::record::OrderTagRecord;
use crate::status::{derive_status, OrderStatus};
use crate::tags::TagList;

/// An order as returned by the backend's `/api/orders` endpoint.
///
/// The backend owns every field; this side only reads them and writes tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    /// Display number, e.g. `"#1120"`.
    pub name: String,
    /// Accepts either the comma-joined string or an array.
    #[serde(default)]
    pub tags: TagList,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub shipping_address: Option<Address>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub fulfillments: Vec<Fulfillment>,
    #[serde(default)]
    pub note: Option<String>,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub title: String,
    #[serde(default = "one")]
    pub quantity: u32,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub variant_title: Option<String>,
    /// Customizations entered at checkout (engraving text, making time choice).
    #[serde(default)]
    pub properties: Vec<LineItemProperty>,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemProperty {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fulfillment {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Keeps only ASCII digits: `"#1120"` → `"1120"`.
#[must_use]
pub fn digits_only(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

impl Order {
    /// Numeric order number with the `#` and any other decoration removed.
    #[must_use]
    pub fn order_number(&self) -> String {
        digits_only(&self.name)
    }

    #[must_use]
    pub fn status(&self) -> OrderStatus {
        derive_status(&self.tags)
    }

    #[must_use]
    pub fn record(&self) -> OrderTagRecord {
        OrderTagRecord::from_tags(&self.tags)
    }

    #[must_use]
    pub fn customer_first_name(&self) -> Option<&str> {
        self.customer
            .as_ref()
            .and_then(|c| c.first_name.as_deref())
            .filter(|n| !n.trim().is_empty())
    }

    /// Customer phone, falling back to the shipping address phone.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.customer
            .as_ref()
            .and_then(|c| c.phone.as_deref())
            .or_else(|| self.shipping_address.as_ref().and_then(|a| a.phone.as_deref()))
            .filter(|p| !p.trim().is_empty())
    }

    /// Returns `true` if `reference` names this order, either by backend id
    /// or by display number (`#1120` or `1120`).
    #[must_use]
    pub fn matches_reference(&self, reference: &str) -> bool {
        let reference = reference.trim();
        if reference.starts_with('#') {
            return digits_only(reference) == self.order_number();
        }
        reference == self.id.to_string() || reference == self.order_number()
    }
}
