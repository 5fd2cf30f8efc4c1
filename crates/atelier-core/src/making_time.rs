//! Production lead time inferred from line-item text.
//!
//! The storefront has no structured making-time field. Customers pick it as
//! a variant or a checkout property, so it shows up as free text such as
//! `"Rush [3 days]"` or `"Standard (7 days)"` in titles and property values.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::orders::LineItem;

pub const RUSH_DAYS: i64 = 3;
pub const HANDMADE_DAYS: i64 = 7;

static RUSH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\brush\b.*?\b3\s*-?\s*(?:working\s+)?days?\b").expect("valid regex")
});

static HANDMADE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b7\s*-?\s*(?:working\s+)?days?\b|\bhandmade\b").expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MakingTime {
    /// Every classified item is a 3-day rush.
    Rush,
    /// Every classified item is a 7-day standard handmade piece.
    Handmade,
    /// Both kinds in one order; the order waits for the slowest item.
    Mixed,
    /// Nothing in the line items mentions a making time.
    Unknown,
}

impl MakingTime {
    /// Lead time used for the default due date.
    #[must_use]
    pub fn days(self) -> i64 {
        match self {
            MakingTime::Rush => RUSH_DAYS,
            MakingTime::Handmade | MakingTime::Mixed | MakingTime::Unknown => HANDMADE_DAYS,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            MakingTime::Rush => "rush",
            MakingTime::Handmade => "handmade",
            MakingTime::Mixed => "mixed",
            MakingTime::Unknown => "unknown",
        }
    }
}

fn item_text(item: &LineItem) -> String {
    let mut text = item.title.clone();
    if let Some(variant) = &item.variant_title {
        text.push(' ');
        text.push_str(variant);
    }
    for property in &item.properties {
        text.push(' ');
        text.push_str(&property.name);
        text.push_str(": ");
        text.push_str(&property.value);
    }
    text
}

/// Classifies one line item; `None` when it carries no making-time hint.
#[must_use]
pub fn classify_item(item: &LineItem) -> Option<MakingTime> {
    let text = item_text(item);
    if RUSH_PATTERN.is_match(&text) {
        Some(MakingTime::Rush)
    } else if HANDMADE_PATTERN.is_match(&text) {
        Some(MakingTime::Handmade)
    } else {
        None
    }
}

/// Combines the per-item classifications for a whole order.
#[must_use]
pub fn detect_making_time(items: &[LineItem]) -> MakingTime {
    let mut rush = false;
    let mut handmade = false;
    for item in items {
        match classify_item(item) {
            Some(MakingTime::Rush) => rush = true,
            Some(_) => handmade = true,
            None => {}
        }
    }
    match (rush, handmade) {
        (true, true) => MakingTime::Mixed,
        (true, false) => MakingTime::Rush,
        (false, true) => MakingTime::Handmade,
        (false, false) => MakingTime::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::orders::LineItemProperty;

    fn item(title: &str, properties: &[(&str, &str)]) -> LineItem {
        LineItem {
            title: title.to_string(),
            quantity: 1,
            price: Decimal::ZERO,
            variant_title: None,
            properties: properties
                .iter()
                .map(|(n, v)| LineItemProperty {
                    name: (*n).to_string(),
                    value: (*v).to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn rush_property_is_rush() {
        let items = [item("Name Necklace", &[("Making time", "Rush [3 days]")])];
        assert_eq!(detect_making_time(&items), MakingTime::Rush);
        assert_eq!(detect_making_time(&items).days(), 3);
    }

    #[test]
    fn seven_day_title_is_handmade() {
        let items = [item("Crochet Bag - Standard (7 days)", &[])];
        assert_eq!(detect_making_time(&items), MakingTime::Handmade);
    }

    #[test]
    fn mixed_order_waits_seven_days() {
        let items = [
            item("Ring", &[("Making time", "RUSH 3-days")]),
            item("Bag", &[("Making time", "7 working days")]),
        ];
        assert_eq!(detect_making_time(&items), MakingTime::Mixed);
        assert_eq!(detect_making_time(&items).days(), 7);
    }

    #[test]
    fn no_hint_is_unknown() {
        let items = [item("Gift card", &[]), item("Brush set", &[])];
        assert_eq!(detect_making_time(&items), MakingTime::Unknown);
    }

    #[test]
    fn thirty_days_is_not_rush() {
        assert_eq!(classify_item(&item("Custom portrait (30 days)", &[])), None);
    }

    #[test]
    fn variant_title_is_scanned() {
        let mut bracelet = item("Bracelet", &[]);
        bracelet.variant_title = Some("Gold / Rush 3 days".to_string());
        assert_eq!(classify_item(&bracelet), Some(MakingTime::Rush));
    }

    #[test]
    fn rush_needs_three_day_lead_time() {
        assert_eq!(
            classify_item(&item("Rush Hour Ring (7 days)", &[])),
            Some(MakingTime::Handmade)
        );
        assert_eq!(classify_item(&item("Earrings, ships in 3 days", &[])), None);

        let mut bracelet = item("Bracelet", &[]);
        bracelet.variant_title = Some("Gold / Rush".to_string());
        assert_eq!(classify_item(&bracelet), None);
    }

    #[test]
    fn handmade_keyword_is_handmade() {
        assert_eq!(
            classify_item(&item("Handmade Crochet Bag", &[])),
            Some(MakingTime::Handmade)
        );
        assert_eq!(
            detect_making_time(&[item("Handmade Crochet Bag", &[])]).days(),
            7
        );
    }
}
