//! Typed view of an order's tag list.
//!
//! [`OrderTagRecord::from_tags`] lifts the legacy tag encoding into explicit
//! fields; [`OrderTagRecord::to_tags`] writes it back in the form the backend
//! expects. Tags the record does not understand are carried through verbatim
//! in [`OrderTagRecord::other`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::status::{derive_status, OrderStatus};
use crate::tags::{split_key_value, TagList};

pub const PRIORITY_TAG: &str = "priority";
pub const CANCELLED_AFTER_SHIPPING_TAG: &str = "cancelled_after_shipping";
pub const CUSTOM_START_DATE_KEY: &str = "custom_start_date";
pub const CUSTOM_DUE_DATE_KEY: &str = "custom_due_date";
pub const SHIPPING_METHOD_KEY: &str = "shipping_method";
pub const SHIPPING_COST_KEY: &str = "shipping_cost";
pub const CANCELLATION_REASON_KEY: &str = "cancellation_reason";
pub const CITY_ID_KEY: &str = "mylerz_city_id";
pub const NEIGHBORHOOD_ID_KEY: &str = "mylerz_neighborhood_id";

const TAG_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` tag value. A trailing time component
/// (`2024-01-01T10:00:00Z`) is ignored.
#[must_use]
pub fn parse_tag_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(date_part, TAG_DATE_FORMAT).ok()
}

#[must_use]
pub fn format_tag_date(date: NaiveDate) -> String {
    date.format(TAG_DATE_FORMAT).to_string()
}

/// How an order leaves the workshop, from the `shipping_method:` tag.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShippingMethod {
    Scooter,
    OtherCompany,
    Pickup,
    /// The default courier integration.
    #[default]
    Shipblu,
    Other(String),
}

impl ShippingMethod {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ShippingMethod::Scooter => "scooter",
            ShippingMethod::OtherCompany => "other-company",
            ShippingMethod::Pickup => "pickup",
            ShippingMethod::Shipblu => "Shipblu",
            ShippingMethod::Other(raw) => raw,
        }
    }

    /// Scooter and third-party company deliveries are paid per trip, so the
    /// actual cost must be recorded when the order is fulfilled.
    #[must_use]
    pub fn requires_cost_entry(&self) -> bool {
        matches!(self, ShippingMethod::Scooter | ShippingMethod::OtherCompany)
    }
}

impl FromStr for ShippingMethod {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        Ok(match raw.to_ascii_lowercase().as_str() {
            "scooter" => ShippingMethod::Scooter,
            "other-company" | "other_company" => ShippingMethod::OtherCompany,
            "pickup" => ShippingMethod::Pickup,
            "shipblu" | "" => ShippingMethod::Shipblu,
            _ => ShippingMethod::Other(raw.to_string()),
        })
    }
}

impl fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Courier zone the order has been assigned to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationAssignment {
    pub city_id: Option<u32>,
    pub neighborhood_id: Option<u32>,
}

impl LocationAssignment {
    #[must_use]
    pub fn is_assigned(&self) -> bool {
        self.city_id.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTagRecord {
    pub status: OrderStatus,
    pub priority: bool,
    pub custom_start_date: Option<NaiveDate>,
    pub custom_due_date: Option<NaiveDate>,
    pub shipping_method: Option<ShippingMethod>,
    /// Actual delivery cost recorded on fulfillment.
    pub shipping_cost: Option<Decimal>,
    pub cancellation_reason: Option<String>,
    pub cancelled_after_shipping: bool,
    pub location: LocationAssignment,
    /// Date the order entered each status, from the status stamp tags.
    pub stamps: BTreeMap<OrderStatus, NaiveDate>,
    /// Unrecognized or malformed tags, in their original order.
    pub other: Vec<String>,
}

fn stamp_status(key: &str) -> Option<OrderStatus> {
    OrderStatus::ALL
        .into_iter()
        .find(|s| s.stamp_key().is_some_and(|k| k.eq_ignore_ascii_case(key)))
}

impl OrderTagRecord {
    /// Lifts a tag list into the typed record.
    ///
    /// The first occurrence of a known key wins; later duplicates and values
    /// that fail to parse stay in `other` so nothing is lost on write-back.
    #[must_use]
    pub fn from_tags(tags: &TagList) -> Self {
        let mut record = OrderTagRecord {
            status: derive_status(tags),
            ..Self::default()
        };

        for tag in tags.iter() {
            if OrderStatus::is_marker(tag) {
                continue;
            }
            if tag.eq_ignore_ascii_case(PRIORITY_TAG) {
                record.priority = true;
                continue;
            }
            if tag.eq_ignore_ascii_case(CANCELLED_AFTER_SHIPPING_TAG) {
                record.cancelled_after_shipping = true;
                continue;
            }
            if !record.absorb_key_value(tag) {
                record.other.push(tag.to_string());
            }
        }

        record
    }

    /// Returns `true` if `tag` was consumed into a typed field.
    fn absorb_key_value(&mut self, tag: &str) -> bool {
        let Some((key, value)) = split_key_value(tag) else {
            return false;
        };
        let key = key.to_ascii_lowercase();

        if let Some(status) = stamp_status(&key) {
            if self.stamps.contains_key(&status) {
                return false;
            }
            return parse_tag_date(value)
                .map(|date| self.stamps.insert(status, date))
                .is_some();
        }

        match key.as_str() {
            CUSTOM_START_DATE_KEY => fill(&mut self.custom_start_date, parse_tag_date(value)),
            CUSTOM_DUE_DATE_KEY => fill(&mut self.custom_due_date, parse_tag_date(value)),
            SHIPPING_METHOD_KEY => fill(&mut self.shipping_method, value.parse().ok()),
            SHIPPING_COST_KEY => fill(&mut self.shipping_cost, value.parse().ok()),
            CANCELLATION_REASON_KEY => fill(
                &mut self.cancellation_reason,
                Some(value.to_string()).filter(|v| !v.is_empty()),
            ),
            CITY_ID_KEY => fill(&mut self.location.city_id, value.parse().ok()),
            NEIGHBORHOOD_ID_KEY => fill(&mut self.location.neighborhood_id, value.parse().ok()),
            _ => false,
        }
    }

    /// Date the order entered its current status, if stamped.
    #[must_use]
    pub fn current_stamp(&self) -> Option<NaiveDate> {
        self.stamps.get(&self.status).copied()
    }

    #[must_use]
    pub fn fulfillment_date(&self) -> Option<NaiveDate> {
        self.stamps.get(&OrderStatus::Fulfilled).copied()
    }

    /// Shipping method, falling back to the default courier when untagged.
    #[must_use]
    pub fn effective_shipping_method(&self) -> ShippingMethod {
        self.shipping_method.clone().unwrap_or_default()
    }

    /// Serializes back to the legacy tag format.
    #[must_use]
    pub fn to_tags(&self) -> TagList {
        let mut tags = TagList::default();
        if let Some(marker) = self.status.marker() {
            tags.add(marker);
        }
        if self.priority {
            tags.add(PRIORITY_TAG);
        }
        if self.cancelled_after_shipping {
            tags.add(CANCELLED_AFTER_SHIPPING_TAG);
        }
        if let Some(reason) = &self.cancellation_reason {
            tags.set_value(CANCELLATION_REASON_KEY, reason);
        }
        if let Some(method) = &self.shipping_method {
            tags.set_value(SHIPPING_METHOD_KEY, method.as_str());
        }
        if let Some(cost) = self.shipping_cost {
            tags.set_value(SHIPPING_COST_KEY, &cost.to_string());
        }
        if let Some(date) = self.custom_start_date {
            tags.set_value(CUSTOM_START_DATE_KEY, &format_tag_date(date));
        }
        if let Some(date) = self.custom_due_date {
            tags.set_value(CUSTOM_DUE_DATE_KEY, &format_tag_date(date));
        }
        if let Some(city) = self.location.city_id {
            tags.set_value(CITY_ID_KEY, &city.to_string());
        }
        if let Some(neighborhood) = self.location.neighborhood_id {
            tags.set_value(NEIGHBORHOOD_ID_KEY, &neighborhood.to_string());
        }
        for (status, date) in &self.stamps {
            if let Some(key) = status.stamp_key() {
                tags.set_value(key, &format_tag_date(*date));
            }
        }
        for tag in &self.other {
            tags.add(tag);
        }
        tags
    }
}

fn fill<T>(slot: &mut Option<T>, parsed: Option<T>) -> bool {
    if slot.is_some() {
        return false;
    }
    match parsed {
        Some(value) => {
            *slot = Some(value);
            true
        }
        None => false,
    }
}
