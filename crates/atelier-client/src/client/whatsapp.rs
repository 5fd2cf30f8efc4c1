use atelier_core::MessageTemplate;

use super::AtelierClient;
use crate::error::ClientError;
use crate::types::{OrderReadyRequest, TemplateResponse, TemplatesResponse};

impl AtelierClient {
    /// Asks the backend to send the "order ready" WhatsApp message.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on a non-2xx response or network failure.
    pub async fn send_order_ready(&self, phone: &str, order_number: &str) -> Result<(), ClientError> {
        let url = self.endpoint("api/whatsapp/order-ready", &[])?;
        let body = OrderReadyRequest {
            phone,
            order_number,
        };
        self.send_unit(self.client.post(url.clone()).json(&body), &url)
            .await?;
        tracing::info!(order_number, "requested order-ready message");
        Ok(())
    }

    /// Lists every stored message template.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on a non-2xx response, network failure, or an
    /// unexpected response shape.
    pub async fn list_templates(&self) -> Result<Vec<MessageTemplate>, ClientError> {
        let url = self.endpoint("api/whatsapp/templates", &[])?;
        let response: TemplatesResponse = self
            .send_json(self.client.get(url.clone()), &url, "GET api/whatsapp/templates")
            .await?;
        Ok(response.into_templates())
    }

    /// Fetches one template by its key, e.g. `order_shipped`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when no template has this key, and
    /// other [`ClientError`] variants as for [`AtelierClient::list_templates`].
    pub async fn template_by_key(&self, key: &str) -> Result<MessageTemplate, ClientError> {
        let url = self.endpoint("api/whatsapp/templates/key", &[key])?;
        let response: TemplateResponse = self
            .send_json(
                self.client.get(url.clone()),
                &url,
                &format!("GET api/whatsapp/templates/key/{key}"),
            )
            .await?;
        Ok(response.into_template())
    }
}
