//! Bulk shipping-cost import from pasted spreadsheet text.
//!
//! Operators paste two columns (order number, cost) copied out of the courier
//! statement. Each line is matched against an ordered list of patterns with
//! a whitespace-split fallback; lines that still fail are dropped without an
//! itemized report. The parsed entries are then cross-referenced against the
//! full order list, because order numbers are not unique across stores.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ImportError;
use crate::orders::{digits_only, Order};
use crate::status::OrderStatus;

/// Line patterns, tried in order. Group 1 is the order number, group 2 the cost.
static LINE_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"^#?\s*(\d+)\t+\s*([\d.,]+)\s*$").expect("valid regex"),
        Regex::new(r"^#?\s*(\d+) +([\d.,]+)$").expect("valid regex"),
        Regex::new(r"(?i)^#?\s*(\d+)[\s,;|]+(?:egp|le|e£)?\s*([\d.,]+)\s*(?:egp|le|e£)?$")
            .expect("valid regex"),
    ]
});

/// Plain decimal, or digit groups of three separated by single commas.
static COST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+|\d{1,3}(?:,\d{3})+)(?:\.\d+)?$").expect("valid regex")
});

/// One parsed line: `#1120  78.36` → `{ order_number: "#1120", cost: 78.36 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingCostEntry {
    /// Always normalized to `#<digits>`.
    pub order_number: String,
    pub cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBatch {
    pub entries: Vec<ShippingCostEntry>,
    /// Non-blank lines that matched nothing or carried an invalid cost.
    pub skipped_lines: usize,
}

fn parse_cost(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if !COST_PATTERN.is_match(raw) {
        return None;
    }
    Decimal::from_str(&raw.replace(',', ""))
        .ok()
        .filter(|cost| !cost.is_sign_negative())
}

fn entry(number: &str, raw_cost: &str) -> Option<ShippingCostEntry> {
    let digits = digits_only(number);
    if digits.is_empty() {
        return None;
    }
    Some(ShippingCostEntry {
        order_number: format!("#{digits}"),
        cost: parse_cost(raw_cost)?,
    })
}

/// Parses a single pasted line. Returns `None` for anything unparsable.
#[must_use]
pub fn parse_line(line: &str) -> Option<ShippingCostEntry> {
    let line = line.trim_matches(|c: char| c == '\r' || c == '\n' || c == ' ');
    if line.is_empty() {
        return None;
    }

    for pattern in LINE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(line) {
            if let Some(parsed) = entry(&caps[1], &caps[2]) {
                return Some(parsed);
            }
        }
    }

    // Fallback: first token is the number, last token is the cost.
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (first, last) = (tokens.first()?, tokens.last()?);
    if tokens.len() < 2 {
        return None;
    }
    let number = first.trim_start_matches('#');
    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    entry(number, last)
}

/// Parses a pasted batch.
///
/// # Errors
///
/// Returns [`ImportError::NoValidEntries`] when not a single line parses.
pub fn parse_shipping_costs(text: &str) -> Result<ParsedBatch, ImportError> {
    let mut entries = Vec::new();
    let mut skipped_lines = 0usize;

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Some(parsed) => entries.push(parsed),
            None => {
                skipped_lines += 1;
                tracing::debug!(line = index + 1, "skipping unparsable shipping cost line");
            }
        }
    }

    if entries.is_empty() {
        return Err(ImportError::NoValidEntries);
    }
    Ok(ParsedBatch {
        entries,
        skipped_lines,
    })
}

/// Summary of an order shown to the operator when picking between duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderCandidate {
    pub id: i64,
    pub name: String,
    pub customer_name: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Order> for OrderCandidate {
    fn from(order: &Order) -> Self {
        let customer_name = order.customer.as_ref().and_then(|c| {
            let full = [c.first_name.as_deref(), c.last_name.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
            Some(full).filter(|n| !n.trim().is_empty())
        });
        Self {
            id: order.id,
            name: order.name.clone(),
            customer_name,
            status: order.status(),
            created_at: order.created_at,
        }
    }
}

/// An entry whose order number matched more than one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateOrder {
    pub entry: ShippingCostEntry,
    pub candidates: Vec<OrderCandidate>,
    /// Order id the operator picked, if any.
    pub selected: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedEntry {
    pub entry: ShippingCostEntry,
    pub order_id: i64,
}

/// Payload row for the backend bulk import endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingCostImport {
    pub order_id: i64,
    pub order_number: String,
    pub cost: Decimal,
}

/// Result of cross-referencing parsed entries against the order list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportPlan {
    pub matched: Vec<MatchedEntry>,
    pub duplicates: Vec<DuplicateOrder>,
    pub not_found: Vec<ShippingCostEntry>,
}

impl ImportPlan {
    /// Matches every entry against `orders` by digits-only order number.
    #[must_use]
    pub fn cross_reference(entries: &[ShippingCostEntry], orders: &[Order]) -> Self {
        let mut by_number: HashMap<String, Vec<&Order>> = HashMap::new();
        for order in orders {
            let number = order.order_number();
            if !number.is_empty() {
                by_number.entry(number).or_default().push(order);
            }
        }

        let mut plan = Self::default();
        for entry in entries {
            let number = digits_only(&entry.order_number);
            match by_number.get(&number).map(Vec::as_slice) {
                None | Some([]) => plan.not_found.push(entry.clone()),
                Some([only]) => plan.matched.push(MatchedEntry {
                    entry: entry.clone(),
                    order_id: only.id,
                }),
                Some(many) => plan.duplicates.push(DuplicateOrder {
                    entry: entry.clone(),
                    candidates: many.iter().map(|o| OrderCandidate::from(*o)).collect(),
                    selected: None,
                }),
            }
        }

        tracing::info!(
            matched = plan.matched.len(),
            duplicates = plan.duplicates.len(),
            not_found = plan.not_found.len(),
            "cross-referenced shipping cost entries"
        );
        plan
    }

    /// Picks `order_id` for every duplicate entry with this order number.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::UnknownDuplicate`] if no duplicate has this
    /// number and [`ImportError::NotACandidate`] if `order_id` is not one of
    /// its candidates.
    pub fn resolve(&mut self, order_number: &str, order_id: i64) -> Result<(), ImportError> {
        let number = digits_only(order_number);
        let mut found = false;
        for duplicate in self
            .duplicates
            .iter_mut()
            .filter(|d| digits_only(&d.entry.order_number) == number)
        {
            found = true;
            if !duplicate.candidates.iter().any(|c| c.id == order_id) {
                return Err(ImportError::NotACandidate {
                    order_number: duplicate.entry.order_number.clone(),
                    order_id,
                });
            }
            duplicate.selected = Some(order_id);
        }
        if found {
            Ok(())
        } else {
            Err(ImportError::UnknownDuplicate(order_number.to_string()))
        }
    }

    /// Number of duplicates still waiting for a pick.
    #[must_use]
    pub fn unresolved(&self) -> usize {
        self.duplicates.iter().filter(|d| d.selected.is_none()).count()
    }

    /// Rows to send to the backend.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::UnresolvedDuplicates`] while any duplicate
    /// lacks a pick, and [`ImportError::NothingToImport`] when no entry
    /// matched an order.
    pub fn commit_rows(&self) -> Result<Vec<ShippingCostImport>, ImportError> {
        let unresolved = self.unresolved();
        if unresolved > 0 {
            return Err(ImportError::UnresolvedDuplicates(unresolved));
        }

        let rows: Vec<ShippingCostImport> = self
            .matched
            .iter()
            .map(|m| (&m.entry, m.order_id))
            .chain(
                self.duplicates
                    .iter()
                    .filter_map(|d| d.selected.map(|id| (&d.entry, id))),
            )
            .map(|(entry, order_id)| ShippingCostImport {
                order_id,
                order_number: entry.order_number.clone(),
                cost: entry.cost,
            })
            .collect();

        if rows.is_empty() {
            return Err(ImportError::NothingToImport);
        }
        Ok(rows)
    }
}

#[cfg(test)]
#[path = "import_test.rs"]
mod tests;
