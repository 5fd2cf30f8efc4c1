//! Request and response shapes for the order desk backend.
//!
//! Several list endpoints answer either with a bare array or with the array
//! wrapped in an object; the untagged enums below accept both.

use atelier_core::{MessageTemplate, Order, PayoutConfig, ShippingCostImport, ShippingRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OrdersResponse {
    Bare(Vec<Order>),
    Wrapped { orders: Vec<Order> },
}

impl OrdersResponse {
    pub(crate) fn into_orders(self) -> Vec<Order> {
        match self {
            Self::Bare(orders) | Self::Wrapped { orders } => orders,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateTagsRequest<'a> {
    pub tags: &'a [String],
}

/// Per-file outcome of the paid-orders spreadsheet upload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResults {
    #[serde(default)]
    pub processed: u64,
    #[serde(default)]
    pub updated: u64,
    #[serde(default)]
    pub not_found: u64,
    /// Row-level problems exactly as the backend reports them.
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    pub results: UploadResults,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderReadyRequest<'a> {
    pub phone: &'a str,
    pub order_number: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TemplatesResponse {
    Bare(Vec<MessageTemplate>),
    Wrapped { templates: Vec<MessageTemplate> },
}

impl TemplatesResponse {
    pub(crate) fn into_templates(self) -> Vec<MessageTemplate> {
        match self {
            Self::Bare(templates) | Self::Wrapped { templates } => templates,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TemplateResponse {
    Wrapped { template: MessageTemplate },
    Bare(MessageTemplate),
}

impl TemplateResponse {
    pub(crate) fn into_template(self) -> MessageTemplate {
        match self {
            Self::Bare(template) | Self::Wrapped { template } => template,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ShippingRecordsResponse {
    Bare(Vec<ShippingRecord>),
    Wrapped { records: Vec<ShippingRecord> },
}

impl ShippingRecordsResponse {
    pub(crate) fn into_records(self) -> Vec<ShippingRecord> {
        match self {
            Self::Bare(records) | Self::Wrapped { records } => records,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ShippingRecordResponse {
    Wrapped { record: ShippingRecord },
    Bare(ShippingRecord),
}

impl ShippingRecordResponse {
    pub(crate) fn into_record(self) -> ShippingRecord {
        match self {
            Self::Bare(record) | Self::Wrapped { record } => record,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct BulkImportRequest<'a> {
    pub entries: &'a [ShippingCostImport],
}

/// Backend acknowledgement of a bulk shipping-cost import.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkImportReceipt {
    /// Handle for reverting the whole batch later.
    pub batch_id: String,
    pub imported: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevertReceipt {
    #[serde(default)]
    pub reverted: u64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PayoutConfigResponse {
    Wrapped { config: PayoutConfig },
    Bare(PayoutConfig),
}

impl PayoutConfigResponse {
    pub(crate) fn into_config(self) -> PayoutConfig {
        match self {
            Self::Bare(config) | Self::Wrapped { config } => config,
        }
    }
}
