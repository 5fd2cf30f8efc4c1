//! Shipping cost ledger records and their summary.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Who carried the parcel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShippingType {
    Company,
    Uber,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Pending,
    Settled,
}

/// One ledger entry: what the customer was charged for delivery versus what
/// the delivery actually cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingRecord {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub order_id: i64,
    #[serde(default)]
    pub order_number: String,
    #[serde(rename = "type")]
    pub kind: ShippingType,
    pub charged_cost: Decimal,
    pub actual_cost: Decimal,
    #[serde(default)]
    pub status: RecordStatus,
    pub date: NaiveDate,
    /// Set on records created by a bulk import, so the batch can be reverted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_batch_id: Option<String>,
}

impl ShippingRecord {
    /// Charged minus actual; negative when delivery cost more than was billed.
    #[must_use]
    pub fn margin(&self) -> Decimal {
        self.charged_cost - self.actual_cost
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeTotals {
    pub count: usize,
    pub charged: Decimal,
    pub actual: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    pub record_count: usize,
    pub total_charged: Decimal,
    pub total_actual: Decimal,
    /// `total_charged - total_actual`.
    pub difference: Decimal,
    pub by_type: BTreeMap<ShippingType, TypeTotals>,
    pub pending: usize,
    pub settled: usize,
}

/// Totals over `records`, optionally limited to dates in `from..=to`.
#[must_use]
pub fn summarize(
    records: &[ShippingRecord],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> LedgerSummary {
    let mut summary = LedgerSummary::default();
    let in_period = |date: NaiveDate| from.is_none_or(|f| date >= f) && to.is_none_or(|t| date <= t);

    for record in records.iter().filter(|r| in_period(r.date)) {
        summary.record_count += 1;
        summary.total_charged += record.charged_cost;
        summary.total_actual += record.actual_cost;

        let totals = summary.by_type.entry(record.kind).or_default();
        totals.count += 1;
        totals.charged += record.charged_cost;
        totals.actual += record.actual_cost;

        match record.status {
            RecordStatus::Pending => summary.pending += 1,
            RecordStatus::Settled => summary.settled += 1,
        }
    }

    summary.difference = summary.total_charged - summary.total_actual;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: ShippingType, charged: i64, actual: i64, day: u32) -> ShippingRecord {
        ShippingRecord {
            id: None,
            order_id: i64::from(day),
            order_number: format!("#{}", 1000 + day),
            kind,
            charged_cost: Decimal::from(charged),
            actual_cost: Decimal::from(actual),
            status: if day % 2 == 0 {
                RecordStatus::Settled
            } else {
                RecordStatus::Pending
            },
            date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            import_batch_id: None,
        }
    }

    #[test]
    fn summarize_totals_by_type_and_status() {
        let records = [
            record(ShippingType::Company, 70, 60, 1),
            record(ShippingType::Uber, 50, 80, 2),
            record(ShippingType::Company, 70, 55, 3),
        ];
        let summary = summarize(&records, None, None);

        assert_eq!(summary.record_count, 3);
        assert_eq!(summary.total_charged, Decimal::from(190));
        assert_eq!(summary.total_actual, Decimal::from(195));
        assert_eq!(summary.difference, Decimal::from(-5));
        assert_eq!(summary.by_type[&ShippingType::Company].count, 2);
        assert_eq!(summary.by_type[&ShippingType::Uber].actual, Decimal::from(80));
        assert_eq!((summary.pending, summary.settled), (2, 1));
    }

    #[test]
    fn summarize_respects_period_bounds() {
        let records = [
            record(ShippingType::Company, 70, 60, 1),
            record(ShippingType::Uber, 50, 80, 2),
            record(ShippingType::Company, 70, 55, 3),
        ];
        let from = NaiveDate::from_ymd_opt(2024, 6, 2);
        let summary = summarize(&records, from, from);
        assert_eq!(summary.record_count, 1);
        assert_eq!(summary.difference, Decimal::from(-30));
    }

    #[test]
    fn record_deserializes_backend_shape() {
        let json = serde_json::json!({
            "_id": "665f1c",
            "orderId": 5501,
            "orderNumber": "#1120",
            "type": "Uber",
            "chargedCost": "70.00",
            "actualCost": 85,
            "status": "settled",
            "date": "2024-06-03"
        });
        let record: ShippingRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.id.as_deref(), Some("665f1c"));
        assert_eq!(record.kind, ShippingType::Uber);
        assert_eq!(record.margin(), Decimal::from(-15));
        assert_eq!(record.status, RecordStatus::Settled);
    }
}
