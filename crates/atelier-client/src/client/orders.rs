use atelier_core::{Order, TagList};
use reqwest::multipart::{Form, Part};

use super::AtelierClient;
use crate::error::ClientError;
use crate::types::{OrdersResponse, UpdateTagsRequest, UploadResponse, UploadResults};

impl AtelierClient {
    /// Fetches the full order list.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotFound`] / [`ClientError::UnexpectedStatus`] on a
    ///   non-2xx response.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the body is neither an order array
    ///   nor `{"orders": [...]}`.
    pub async fn list_orders(&self) -> Result<Vec<Order>, ClientError> {
        let url = self.endpoint("api/orders", &[])?;
        let response: OrdersResponse = self
            .send_json(self.client.get(url.clone()), &url, "GET api/orders")
            .await?;
        let orders = response.into_orders();
        tracing::info!(count = orders.len(), "fetched orders");
        Ok(orders)
    }

    /// Replaces an order's tag list.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on a non-2xx response or network failure.
    pub async fn update_order_tags(&self, order_id: i64, tags: &TagList) -> Result<(), ClientError> {
        let id = order_id.to_string();
        let url = self.endpoint("api/orders", &[&id, "tags"])?;
        let body = UpdateTagsRequest {
            tags: tags.as_slice(),
        };
        self.send_unit(self.client.put(url.clone()).json(&body), &url)
            .await?;
        tracing::info!(order_id, tags = %tags.joined(), "updated order tags");
        Ok(())
    }

    /// Uploads a paid-orders spreadsheet as multipart field `file`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on a non-2xx response, network failure, or an
    /// unexpected response shape.
    pub async fn upload_paid_orders(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<UploadResults, ClientError> {
        let url = self.endpoint("api/orders/upload-paid-orders", &[])?;
        let part = Part::bytes(contents).file_name(file_name.to_owned());
        let form = Form::new().part("file", part);

        let response: UploadResponse = self
            .send_json(
                self.client.post(url.clone()).multipart(form),
                &url,
                "POST api/orders/upload-paid-orders",
            )
            .await?;
        let results = response.results;
        tracing::info!(
            processed = results.processed,
            updated = results.updated,
            not_found = results.not_found,
            errors = results.errors.len(),
            "uploaded paid orders"
        );
        Ok(results)
    }
}
