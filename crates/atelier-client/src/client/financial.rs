use atelier_core::{PayoutConfig, ShippingCostImport, ShippingRecord};

use super::AtelierClient;
use crate::error::ClientError;
use crate::types::{
    BulkImportReceipt, BulkImportRequest, PayoutConfigResponse, RevertReceipt,
    ShippingRecordResponse, ShippingRecordsResponse,
};

const SHIPPING_RECORDS: &str = "api/financial/shipping-records";
const BULK_IMPORT: &str = "api/financial/shipping-records/bulk-import";

impl AtelierClient {
    /// Lists the shipping ledger.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on a non-2xx response, network failure, or an
    /// unexpected response shape.
    pub async fn list_shipping_records(&self) -> Result<Vec<ShippingRecord>, ClientError> {
        let url = self.endpoint(SHIPPING_RECORDS, &[])?;
        let response: ShippingRecordsResponse = self
            .send_json(self.client.get(url.clone()), &url, "GET shipping records")
            .await?;
        Ok(response.into_records())
    }

    /// Adds one ledger entry and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on a non-2xx response, network failure, or an
    /// unexpected response shape.
    pub async fn create_shipping_record(
        &self,
        record: &ShippingRecord,
    ) -> Result<ShippingRecord, ClientError> {
        let url = self.endpoint(SHIPPING_RECORDS, &[])?;
        let response: ShippingRecordResponse = self
            .send_json(
                self.client.post(url.clone()).json(record),
                &url,
                "POST shipping record",
            )
            .await?;
        Ok(response.into_record())
    }

    /// Sends resolved shipping-cost rows as one import batch.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on a non-2xx response, network failure, or an
    /// unexpected response shape.
    pub async fn bulk_import_shipping_costs(
        &self,
        entries: &[ShippingCostImport],
    ) -> Result<BulkImportReceipt, ClientError> {
        let url = self.endpoint(BULK_IMPORT, &[])?;
        let receipt: BulkImportReceipt = self
            .send_json(
                self.client
                    .post(url.clone())
                    .json(&BulkImportRequest { entries }),
                &url,
                "POST shipping cost bulk import",
            )
            .await?;
        tracing::info!(
            batch_id = %receipt.batch_id,
            imported = receipt.imported,
            "imported shipping costs"
        );
        Ok(receipt)
    }

    /// Removes every ledger entry created by import batch `batch_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] for an unknown batch, and other
    /// [`ClientError`] variants on failure.
    pub async fn revert_shipping_import(&self, batch_id: &str) -> Result<RevertReceipt, ClientError> {
        let url = self.endpoint(BULK_IMPORT, &[batch_id, "revert"])?;
        let receipt: RevertReceipt = self
            .send_json(
                self.client.post(url.clone()),
                &url,
                &format!("POST revert import batch {batch_id}"),
            )
            .await?;
        tracing::info!(batch_id, reverted = receipt.reverted, "reverted shipping import");
        Ok(receipt)
    }

    /// Fetches the payout shares stored by the backend.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on a non-2xx response, network failure, or an
    /// unexpected response shape.
    pub async fn payout_config(&self) -> Result<PayoutConfig, ClientError> {
        let url = self.endpoint("api/financial/payout-config", &[])?;
        let response: PayoutConfigResponse = self
            .send_json(self.client.get(url.clone()), &url, "GET payout config")
            .await?;
        Ok(response.into_config())
    }
}
