//! HTTP client for the order desk REST backend.

mod financial;
mod orders;
mod whatsapp;

use std::time::Duration;

use atelier_core::AppConfig;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::error::{excerpt, ClientError};

/// Client for the order desk backend.
///
/// Use [`AtelierClient::new`] with the loaded [`AppConfig`], or
/// [`AtelierClient::with_base_url`] to point at a mock server in tests.
/// Every call is a single attempt; non-2xx responses become typed errors.
pub struct AtelierClient {
    client: Client,
    base_url: Url,
    api_token: Option<String>,
}

impl AtelierClient {
    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if the
    /// configured base URL does not parse.
    pub fn new(config: &AppConfig) -> Result<Self, ClientError> {
        Self::with_base_url(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
            config.api_token.as_deref(),
        )
    }

    /// Creates a client with an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        api_token: Option<&str>,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so relative joins append to the path
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
            api_token: api_token.map(str::to_owned),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `path` (e.g. `api/orders`) against the base URL, then appends
    /// each of `segments` percent-encoded.
    fn endpoint(&self, path: &str, segments: &[&str]) -> Result<Url, ClientError> {
        let invalid = |reason: String| ClientError::InvalidBaseUrl {
            base_url: self.base_url.to_string(),
            reason,
        };
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| invalid(e.to_string()))?;
        if !segments.is_empty() {
            url.path_segments_mut()
                .map_err(|()| invalid("URL cannot be used as a base".to_string()))?
                .pop_if_empty()
                .extend(segments);
        }
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends `request` and decodes a JSON body into `T`.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &Url,
        context: &str,
    ) -> Result<T, ClientError> {
        let response = self.send(request, url).await?;
        let body = response.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| ClientError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }

    /// Sends `request`, checks the status and discards the body.
    async fn send_unit(&self, request: RequestBuilder, url: &Url) -> Result<(), ClientError> {
        self.send(request, url).await.map(drop)
    }

    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response, ClientError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        tracing::debug!(%url, status = status.as_u16(), "backend response");

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
                body: excerpt(&body),
            });
        }

        Ok(response)
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
