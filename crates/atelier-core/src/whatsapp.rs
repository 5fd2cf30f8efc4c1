//! WhatsApp message templates and `wa.me` deep links.

use std::collections::HashMap;
use std::sync::LazyLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::orders::{digits_only, Order};

const WA_ME_BASE: &str = "https://wa.me/";

/// Everything except unreserved characters gets escaped in the `text` query.
const MESSAGE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("valid regex"));

/// A message template stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub key: String,
    pub name: String,
    #[serde(alias = "content", alias = "message")]
    pub body: String,
}

impl MessageTemplate {
    /// Renders the template body for `order`.
    #[must_use]
    pub fn render_for(&self, order: &Order) -> String {
        render(&self.body, &order_variables(order))
    }
}

/// `- <qty> x <title>` per line item, newline separated.
#[must_use]
pub fn items_list(order: &Order) -> String {
    order
        .line_items
        .iter()
        .map(|item| format!("- {} x {}", item.quantity, item.title))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Placeholder values available to templates for one order.
#[must_use]
pub fn order_variables(order: &Order) -> HashMap<&'static str, String> {
    let customer = order.customer.clone().unwrap_or_default();

    HashMap::from([
        ("customer_first_name", customer.first_name.unwrap_or_default()),
        ("customer_last_name", customer.last_name.unwrap_or_default()),
        ("order_number", order.name.clone()),
        ("items_list", items_list(order)),
        ("total_price", format!("{:.2}", order.total_price)),
    ])
}

/// Substitutes `{{name}}` placeholders. Unknown placeholders are left as is.
#[must_use]
pub fn render(body: &str, variables: &HashMap<&'static str, String>) -> String {
    PLACEHOLDER
        .replace_all(body, |caps: &Captures<'_>| {
            variables
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Normalizes a phone number to the digits-only international form WhatsApp
/// expects. Local numbers (`01…`) get the Egyptian `2` prefix; a `00`
/// international prefix is dropped.
#[must_use]
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits = digits_only(raw);
    let digits = digits.strip_prefix("00").unwrap_or(&digits);
    if digits.is_empty() {
        return None;
    }
    if digits.starts_with('0') {
        return Some(format!("2{digits}"));
    }
    Some(digits.to_string())
}

/// `https://wa.me/<phone>?text=<message>`, or `None` if the phone has no digits.
#[must_use]
pub fn wa_me_link(phone: &str, message: &str) -> Option<String> {
    let phone = normalize_phone(phone)?;
    let text = utf8_percent_encode(message, MESSAGE_ENCODE_SET);
    Some(format!("{WA_ME_BASE}{phone}?text={text}"))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::*;
    use crate::orders::{Customer, LineItem};
    use crate::tags::TagList;

    fn item(title: &str, quantity: u32) -> LineItem {
        LineItem {
            title: title.to_string(),
            quantity,
            price: Decimal::ZERO,
            variant_title: None,
            properties: vec![],
        }
    }

    fn order() -> Order {
        Order {
            id: 5501,
            name: "#1120".to_string(),
            tags: TagList::default(),
            customer: Some(Customer {
                first_name: Some("Mona".to_string()),
                last_name: Some("Adel".to_string()),
                phone: Some("0100 123 4567".to_string()),
            }),
            shipping_address: None,
            line_items: vec![item("Beaded Bracelet", 2), item("Name Necklace", 1)],
            fulfillments: vec![],
            note: None,
            total_price: Decimal::new(450, 0),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn render_fills_known_placeholders() {
        let template = MessageTemplate {
            key: "order_shipped".to_string(),
            name: "Shipped".to_string(),
            body: "Hi {{customer_first_name}} {{ customer_last_name }}, order {{order_number}} \
                   ({{total_price}} EGP) is on its way:\n{{items_list}}"
                .to_string(),
        };
        assert_eq!(
            template.render_for(&order()),
            "Hi Mona Adel, order #1120 (450.00 EGP) is on its way:\n\
             - 2 x Beaded Bracelet\n- 1 x Name Necklace"
        );
    }

    #[test]
    fn render_leaves_unknown_placeholders() {
        let rendered = render("Track: {{tracking_url}}", &order_variables(&order()));
        assert_eq!(rendered, "Track: {{tracking_url}}");
    }

    #[test]
    fn missing_customer_renders_empty_names() {
        let mut order = order();
        order.customer = None;
        assert_eq!(render("Hi {{customer_first_name}}!", &order_variables(&order)), "Hi !");
    }

    #[test]
    fn normalize_phone_handles_local_and_international_forms() {
        assert_eq!(normalize_phone("0100 123 4567").as_deref(), Some("201001234567"));
        assert_eq!(normalize_phone("+20 100-123-4567").as_deref(), Some("201001234567"));
        assert_eq!(normalize_phone("0020 100 123 4567").as_deref(), Some("201001234567"));
        assert_eq!(normalize_phone("n/a"), None);
    }

    #[test]
    fn wa_me_link_percent_encodes_message() {
        let link = wa_me_link("01001234567", "Hi Mona, order #1120 is ready!\nThanks").unwrap();
        assert_eq!(
            link,
            "https://wa.me/201001234567?text=Hi%20Mona%2C%20order%20%231120%20is%20ready%21%0AThanks"
        );
    }

    #[test]
    fn template_accepts_content_alias() {
        let json = serde_json::json!({"key": "order_ready", "name": "Ready", "content": "Hi"});
        let template: MessageTemplate = serde_json::from_value(json).unwrap();
        assert_eq!(template.body, "Hi");
    }
}
